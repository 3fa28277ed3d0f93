//! PostgreSQL-backed `SubjectRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{RepositoryError, SearchOrder, SearchQuery, SubjectRepository};
use crate::domain::Subject;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::helpers::lower;
use super::models::{NewSubjectRow, SubjectRow};
use super::pool::DbPool;
use super::schema::{courses, subjects};

/// Diesel-backed implementation of the `SubjectRepository` port.
#[derive(Clone)]
pub struct DieselSubjectRepository {
    pool: DbPool,
}

impl DieselSubjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubjectRepository for DieselSubjectRepository {
    async fn insert(&self, name: &str) -> Result<Subject, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SubjectRow = diesel::insert_into(subjects::table)
            .values(NewSubjectRow { name })
            .returning(SubjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(subjects::table.find(id))
            .set(subjects::name.eq(name))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(courses::table.filter(courses::subject_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(subjects::table.find(id)).execute(conn).await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subject>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubjectRow> = subjects::table
            .find(id)
            .select(SubjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubjectRow> = subjects::table
            .filter(subjects::name.eq(name))
            .select(SubjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            subjects::table
                .filter(subjects::id.ne(id))
                .filter(lower(subjects::name).eq(name.trim().to_lowercase())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        subjects::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn page(&self, page: PageRequest) -> Result<Vec<Subject>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SubjectRow> = subjects::table
            .order(subjects::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Subject>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SubjectRow> = subjects::table
            .order(subjects::name.asc())
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count and page in one transaction so the total matches the slice.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Subject>, i64), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{}%", query.keyword);
        let order = query.order;
        let page = query.page;
        let (rows, total) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = subjects::table
                        .filter(subjects::name.ilike(pattern.clone()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let mut rows = subjects::table
                        .filter(subjects::name.ilike(pattern))
                        .select(SubjectRow::as_select())
                        .into_boxed::<diesel::pg::Pg>();
                    rows = match order {
                        SearchOrder::IdAsc => rows.order(subjects::id.asc()),
                        SearchOrder::NameAsc => rows.order(subjects::name.asc()),
                        SearchOrder::NameDesc => rows.order(subjects::name.desc()),
                    };
                    let rows: Vec<SubjectRow> = rows
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

    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Subject>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SubjectRow> = subjects::table
            .inner_join(courses::table)
            .filter(courses::professor_id.eq(professor_id))
            .select(SubjectRow::as_select())
            .distinct()
            .order(subjects::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
