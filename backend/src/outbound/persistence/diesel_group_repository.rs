//! PostgreSQL-backed `GroupRepository` implementation using Diesel ORM.
//!
//! The table is named `study_groups`; `groups` would collide with the SQL
//! keyword in hand-written queries.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{GroupRepository, RepositoryError, SearchOrder, SearchQuery};
use crate::domain::Group;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::helpers::lower;
use super::models::{GroupRow, NewGroupRow};
use super::pool::DbPool;
use super::schema::{courses, study_groups};

/// Diesel-backed implementation of the `GroupRepository` port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn insert(&self, name: &str) -> Result<Group, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: GroupRow = diesel::insert_into(study_groups::table)
            .values(NewGroupRow { name })
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(study_groups::table.find(id))
            .set(study_groups::name.eq(name))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(courses::table.filter(courses::group_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(study_groups::table.find(id))
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GroupRow> = study_groups::table
            .find(id)
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GroupRow> = study_groups::table
            .filter(study_groups::name.eq(name))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            study_groups::table
                .filter(study_groups::id.ne(id))
                .filter(lower(study_groups::name).eq(name.trim().to_lowercase())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        study_groups::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn page(&self, page: PageRequest) -> Result<Vec<Group>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GroupRow> = study_groups::table
            .order(study_groups::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GroupRow> = study_groups::table
            .order(study_groups::name.asc())
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count and page in one transaction so the total matches the slice.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Group>, i64), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{}%", query.keyword);
        let order = query.order;
        let page = query.page;
        let (rows, total) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = study_groups::table
                        .filter(study_groups::name.ilike(pattern.clone()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let mut rows = study_groups::table
                        .filter(study_groups::name.ilike(pattern))
                        .select(GroupRow::as_select())
                        .into_boxed::<diesel::pg::Pg>();
                    rows = match order {
                        SearchOrder::IdAsc => rows.order(study_groups::id.asc()),
                        SearchOrder::NameAsc => rows.order(study_groups::name.asc()),
                        SearchOrder::NameDesc => rows.order(study_groups::name.desc()),
                    };
                    let rows: Vec<GroupRow> = rows
                        .limit(page.limit())
                        .offset(page.offset())
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((rows, total))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Group>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GroupRow> = study_groups::table
            .inner_join(courses::table)
            .filter(courses::professor_id.eq(professor_id))
            .select(GroupRow::as_select())
            .distinct()
            .order(study_groups::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
