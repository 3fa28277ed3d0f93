//! PostgreSQL-backed `SemesterRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{RepositoryError, SearchOrder, SearchQuery, SemesterRepository};
use crate::domain::Semester;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::helpers::lower;
use super::models::{NewSemesterRow, SemesterRow};
use super::pool::DbPool;
use super::schema::{courses, semesters};

/// Diesel-backed implementation of the `SemesterRepository` port.
#[derive(Clone)]
pub struct DieselSemesterRepository {
    pool: DbPool,
}

impl DieselSemesterRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SemesterRepository for DieselSemesterRepository {
    async fn insert(&self, name: &str) -> Result<Semester, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SemesterRow = diesel::insert_into(semesters::table)
            .values(NewSemesterRow { name })
            .returning(SemesterRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(semesters::table.find(id))
            .set(semesters::name.eq(name))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(courses::table.filter(courses::semester_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(semesters::table.find(id))
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Semester>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SemesterRow> = semesters::table
            .find(id)
            .select(SemesterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Semester>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SemesterRow> = semesters::table
            .filter(semesters::name.eq(name))
            .select(SemesterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            semesters::table
                .filter(semesters::id.ne(id))
                .filter(lower(semesters::name).eq(name.trim().to_lowercase())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        semesters::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn page(&self, page: PageRequest) -> Result<Vec<Semester>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SemesterRow> = semesters::table
            .order(semesters::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(SemesterRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Semester>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SemesterRow> = semesters::table
            .order(semesters::name.asc())
            .select(SemesterRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count and page in one transaction so the total matches the slice.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Semester>, i64), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{}%", query.keyword);
        let order = query.order;
        let page = query.page;
        let (rows, total) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = semesters::table
                        .filter(semesters::name.ilike(pattern.clone()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let mut rows = semesters::table
                        .filter(semesters::name.ilike(pattern))
                        .select(SemesterRow::as_select())
                        .into_boxed::<diesel::pg::Pg>();
                    rows = match order {
                        SearchOrder::IdAsc => rows.order(semesters::id.asc()),
                        SearchOrder::NameAsc => rows.order(semesters::name.asc()),
                        SearchOrder::NameDesc => rows.order(semesters::name.desc()),
                    };
                    let rows: Vec<SemesterRow> = rows
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

    async fn list_for_professor(
        &self,
        professor_id: i64,
    ) -> Result<Vec<Semester>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SemesterRow> = semesters::table
            .inner_join(courses::table)
            .filter(courses::professor_id.eq(professor_id))
            .select(SemesterRow::as_select())
            .distinct()
            .order(semesters::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
