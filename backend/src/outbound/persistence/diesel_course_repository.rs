//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::course::{Course, NewCourse};
use crate::domain::ports::{CourseRepository, RepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CourseRow, NewCourseRow};
use super::pool::DbPool;
use super::schema::courses;

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn insert(&self, new: &NewCourse) -> Result<Course, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CourseRow = diesel::insert_into(courses::table)
            .values(NewCourseRow {
                professor_id: new.professor_id,
                subject_id: new.subject_id,
                semester_id: new.semester_id,
                group_id: new.group_id,
                is_active: new.is_active,
            })
            .returning(CourseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn tuple_exists(&self, new: &NewCourse) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            courses::table
                .filter(courses::professor_id.eq(new.professor_id))
                .filter(courses::subject_id.eq(new.subject_id))
                .filter(courses::semester_id.eq(new.semester_id))
                .filter(courses::group_id.eq(new.group_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Course>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CourseRow> = courses::table
            .filter(courses::professor_id.eq(professor_id))
            .order(courses::id.asc())
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_professor_and_subject(
        &self,
        professor_id: i64,
        subject_id: i64,
    ) -> Result<Option<Course>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CourseRow> = courses::table
            .filter(courses::professor_id.eq(professor_id))
            .filter(courses::subject_id.eq(subject_id))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_for_professor(
        &self,
        professor_id: i64,
        course_id: i64,
    ) -> Result<Option<Course>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CourseRow> = courses::table
            .find(course_id)
            .filter(courses::professor_id.eq(professor_id))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn set_active(&self, course_id: i64, active: bool) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(courses::table.find(course_id))
            .set(courses::is_active.eq(active))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, course_id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(courses::table.find(course_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
