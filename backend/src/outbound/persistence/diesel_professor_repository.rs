//! PostgreSQL-backed `ProfessorRepository` implementation using Diesel ORM.
//!
//! Reads the professor slice of the platform's account table. "Active"
//! means `is_active = true`; "pending" means `prohibit_login = true`, the
//! state accounts start in until an administrator approves them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{ProfessorRepository, RepositoryError};
use crate::domain::Professor;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::ProfessorRow;
use super::pool::DbPool;
use super::schema::{courses, professors};

/// Diesel-backed implementation of the `ProfessorRepository` port.
#[derive(Clone)]
pub struct DieselProfessorRepository {
    pool: DbPool,
}

impl DieselProfessorRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfessorRepository for DieselProfessorRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Professor>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfessorRow> = professors::table
            .find(id)
            .select(ProfessorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn page_active(&self, page: PageRequest) -> Result<Vec<Professor>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfessorRow> = professors::table
            .filter(professors::is_active.eq(true))
            .order(professors::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(ProfessorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        professors::table
            .filter(professors::is_active.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn page_pending(&self, page: PageRequest) -> Result<Vec<Professor>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfessorRow> = professors::table
            .filter(professors::prohibit_login.eq(true))
            .order(professors::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(ProfessorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_pending(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        professors::table
            .filter(professors::prohibit_login.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn set_approval(
        &self,
        id: i64,
        is_active: bool,
        prohibit_login: bool,
    ) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(professors::table.find(id))
            .set((
                professors::is_active.eq(is_active),
                professors::prohibit_login.eq(prohibit_login),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(courses::table.filter(courses::professor_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(professors::table.find(id))
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
