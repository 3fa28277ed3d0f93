//! Repository ports the domain services drive.
//!
//! Each trait is implemented by a Diesel adapter in `outbound::persistence`
//! and by in-memory stubs in tests. Repositories only run queries; the
//! validate → uniqueness-check → write sequence lives in the services.

use async_trait::async_trait;
use pagination::PageRequest;
use thiserror::Error;

use crate::domain::course::{Course, NewCourse};
use crate::domain::group::Group;
use crate::domain::professor::Professor;
use crate::domain::semester::Semester;
use crate::domain::subject::Subject;
use crate::domain::tag::Tag;

/// Failures surfaced by any repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The database could not be reached or the pool timed out.
    #[error("failed to reach the database: {message}")]
    Connection {
        /// Adapter-provided description of the connection failure.
        message: String,
    },
    /// A query failed for reasons other than a constraint conflict.
    #[error("database query failed: {message}")]
    Query {
        /// Adapter-provided description of the query failure.
        message: String,
    },
    /// A unique index rejected the write; the loser of a create race ends
    /// up here rather than in the service-level existence check.
    #[error("unique constraint violated: {message}")]
    UniqueViolation {
        /// Constraint description reported by the database.
        message: String,
    },
}

impl RepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a unique-violation error with the given message.
    pub fn unique_violation(message: impl Into<String>) -> Self {
        Self::UniqueViolation {
            message: message.into(),
        }
    }
}

/// Sort order accepted by keyword search.
///
/// A closed enum rather than a raw column string; the caller's order-by
/// fragment never reaches the query builder as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Ascending by primary key.
    IdAsc,
    /// Ascending by name.
    NameAsc,
    /// Descending by name (the public API default).
    #[default]
    NameDesc,
}

/// A keyword search with clamped pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Lower-cased, trimmed keyword; matched as a substring.
    pub keyword: String,
    /// Sort order for the result page.
    pub order: SearchOrder,
    /// Clamped page/limit to apply after counting.
    pub page: PageRequest,
}

/// Persistence port for subjects.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Insert a new subject and return the stored row.
    async fn insert(&self, name: &str) -> Result<Subject, RepositoryError>;
    /// Update the subject's columns; returns the number of rows affected.
    async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError>;
    /// Delete the subject and its dependent course rows in one transaction.
    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError>;
    /// Fetch a subject by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Subject>, RepositoryError>;
    /// Fetch a subject by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, RepositoryError>;
    /// Whether a row with this name exists, excluding the given id.
    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError>;
    /// Total number of subjects.
    async fn count(&self) -> Result<i64, RepositoryError>;
    /// One id-ascending page of subjects.
    async fn page(&self, page: PageRequest) -> Result<Vec<Subject>, RepositoryError>;
    /// Every subject, name ascending.
    async fn list_all(&self) -> Result<Vec<Subject>, RepositoryError>;
    /// Keyword search; returns the page plus the total match count.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Subject>, i64), RepositoryError>;
    /// Distinct subjects taught by the professor, name ascending.
    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Subject>, RepositoryError>;
}

/// Persistence port for semesters.
#[async_trait]
pub trait SemesterRepository: Send + Sync {
    /// Insert a new semester and return the stored row.
    async fn insert(&self, name: &str) -> Result<Semester, RepositoryError>;
    /// Update the semester's columns; returns the number of rows affected.
    async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError>;
    /// Delete the semester and its dependent course rows in one transaction.
    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError>;
    /// Fetch a semester by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Semester>, RepositoryError>;
    /// Fetch a semester by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Semester>, RepositoryError>;
    /// Whether a row with this name exists, excluding the given id.
    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError>;
    /// Total number of semesters.
    async fn count(&self) -> Result<i64, RepositoryError>;
    /// One id-ascending page of semesters.
    async fn page(&self, page: PageRequest) -> Result<Vec<Semester>, RepositoryError>;
    /// Every semester, name ascending.
    async fn list_all(&self) -> Result<Vec<Semester>, RepositoryError>;
    /// Keyword search; returns the page plus the total match count.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Semester>, i64), RepositoryError>;
    /// Distinct semesters the professor teaches in, name ascending.
    async fn list_for_professor(
        &self,
        professor_id: i64,
    ) -> Result<Vec<Semester>, RepositoryError>;
}

/// Persistence port for groups.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Insert a new group and return the stored row.
    async fn insert(&self, name: &str) -> Result<Group, RepositoryError>;
    /// Update the group's columns; returns the number of rows affected.
    async fn update(&self, id: i64, name: &str) -> Result<usize, RepositoryError>;
    /// Delete the group and its dependent course rows in one transaction.
    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError>;
    /// Fetch a group by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepositoryError>;
    /// Fetch a group by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, RepositoryError>;
    /// Whether a row with this name exists, excluding the given id.
    async fn exists_excluding(&self, id: i64, name: &str) -> Result<bool, RepositoryError>;
    /// Total number of groups.
    async fn count(&self) -> Result<i64, RepositoryError>;
    /// One id-ascending page of groups.
    async fn page(&self, page: PageRequest) -> Result<Vec<Group>, RepositoryError>;
    /// Every group, name ascending.
    async fn list_all(&self) -> Result<Vec<Group>, RepositoryError>;
    /// Keyword search; returns the page plus the total match count.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Group>, i64), RepositoryError>;
    /// Distinct groups the professor teaches, name ascending.
    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Group>, RepositoryError>;
}

/// Persistence port for tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a new tag and return the stored row.
    async fn insert(&self, label: &str) -> Result<Tag, RepositoryError>;
    /// Update the tag's columns; returns the number of rows affected.
    async fn update(&self, id: i64, label: &str) -> Result<usize, RepositoryError>;
    /// Delete the tag and its repository links in one transaction.
    async fn delete_with_links(&self, id: i64) -> Result<(), RepositoryError>;
    /// Fetch a tag by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, RepositoryError>;
    /// Fetch a tag by exact label.
    async fn find_by_label(&self, label: &str) -> Result<Option<Tag>, RepositoryError>;
    /// Whether a row with this label exists, excluding the given id.
    async fn exists_excluding(&self, id: i64, label: &str) -> Result<bool, RepositoryError>;
    /// Total number of tags.
    async fn count(&self) -> Result<i64, RepositoryError>;
    /// One id-ascending page of tags.
    async fn page(&self, page: PageRequest) -> Result<Vec<Tag>, RepositoryError>;
    /// Every tag, label ascending.
    async fn list_all(&self) -> Result<Vec<Tag>, RepositoryError>;
    /// Keyword search; returns the page plus the total match count.
    async fn search(&self, query: &SearchQuery) -> Result<(Vec<Tag>, i64), RepositoryError>;
}

/// Persistence port for course enrolments.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course row inside a transaction.
    async fn insert(&self, new: &NewCourse) -> Result<Course, RepositoryError>;
    /// Whether a row with the same (professor, subject, semester, group)
    /// tuple already exists.
    async fn tuple_exists(&self, new: &NewCourse) -> Result<bool, RepositoryError>;
    /// All course rows for the professor, id ascending.
    async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Course>, RepositoryError>;
    /// The professor's course for a subject, if any.
    async fn find_by_professor_and_subject(
        &self,
        professor_id: i64,
        subject_id: i64,
    ) -> Result<Option<Course>, RepositoryError>;
    /// The professor's course by course id, if it belongs to them.
    async fn find_for_professor(
        &self,
        professor_id: i64,
        course_id: i64,
    ) -> Result<Option<Course>, RepositoryError>;
    /// Set the active flag; returns the number of rows affected.
    async fn set_active(&self, course_id: i64, active: bool) -> Result<usize, RepositoryError>;
    /// Delete the course row inside a transaction.
    async fn delete(&self, course_id: i64) -> Result<(), RepositoryError>;
}

/// Persistence port for professor accounts.
#[async_trait]
pub trait ProfessorRepository: Send + Sync {
    /// Fetch a professor by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Professor>, RepositoryError>;
    /// One id-ascending page of active professors.
    async fn page_active(&self, page: PageRequest) -> Result<Vec<Professor>, RepositoryError>;
    /// Number of active professors.
    async fn count_active(&self) -> Result<i64, RepositoryError>;
    /// One id-ascending page of pending applications.
    async fn page_pending(&self, page: PageRequest) -> Result<Vec<Professor>, RepositoryError>;
    /// Number of pending applications.
    async fn count_pending(&self) -> Result<i64, RepositoryError>;
    /// Update the approval flags; returns the number of rows affected.
    async fn set_approval(
        &self,
        id: i64,
        is_active: bool,
        prohibit_login: bool,
    ) -> Result<usize, RepositoryError>;
    /// Delete the professor and their course rows in one transaction.
    async fn delete_with_courses(&self, id: i64) -> Result<(), RepositoryError>;
}
