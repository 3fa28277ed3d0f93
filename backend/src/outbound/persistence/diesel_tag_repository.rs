//! PostgreSQL-backed `TagRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{RepositoryError, SearchOrder, SearchQuery, TagRepository};
use crate::domain::Tag;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::helpers::lower;
use super::models::{NewTagRow, TagRow};
use super::pool::DbPool;
use super::schema::{repo_tags, tags};

/// Diesel-backed implementation of the `TagRepository` port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn insert(&self, label: &str) -> Result<Tag, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TagRow = diesel::insert_into(tags::table)
            .values(NewTagRow { label })
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, label: &str) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(tags::table.find(id))
            .set(tags::label.eq(label))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_with_links(&self, id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(repo_tags::table.filter(repo_tags::tag_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(tags::table.find(id)).execute(conn).await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id)
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_label(&self, label: &str) -> Result<Option<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .filter(tags::label.eq(label))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn exists_excluding(&self, id: i64, label: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            tags::table
                .filter(tags::id.ne(id))
                .filter(lower(tags::label).eq(label.trim().to_lowercase())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        tags::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn page(&self, page: PageRequest) -> Result<Vec<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order(tags::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order(tags::label.asc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count and page in one transaction so the total matches the slice.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Tag>, i64), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{}%", query.keyword);
        let order = query.order;
        let page = query.page;
        let (rows, total) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = tags::table
                        .filter(tags::label.ilike(pattern.clone()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let mut rows = tags::table
                        .filter(tags::label.ilike(pattern))
                        .select(TagRow::as_select())
                        .into_boxed::<diesel::pg::Pg>();
                    rows = match order {
                        SearchOrder::IdAsc => rows.order(tags::id.asc()),
                        SearchOrder::NameAsc => rows.order(tags::label.asc()),
                        SearchOrder::NameDesc => rows.order(tags::label.desc()),
                    };
                    let rows: Vec<TagRow> = rows
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
}
