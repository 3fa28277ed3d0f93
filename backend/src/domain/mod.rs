//! Domain entities, validation, and services.
//!
//! Purpose: hold the transport-agnostic business rules of the academic
//! catalogue. Every service follows the same validate → uniqueness-check →
//! write sequence the platform uses for its named entities; persistence
//! details stay behind the repository ports in [`ports`].

pub mod course;
pub mod error;
pub mod group;
pub mod name;
pub mod ports;
pub mod professor;
pub mod semester;
pub mod subject;
pub mod tag;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::course::{Course, CourseError, CourseInfo, CourseService, NewCourse};
pub use self::error::{Error, ErrorCode};
pub use self::group::{Group, GroupError, GroupService};
pub use self::name::NameError;
pub use self::professor::{Professor, ProfessorError, ProfessorService};
pub use self::semester::{Semester, SemesterError, SemesterService};
pub use self::subject::{Subject, SubjectError, SubjectService};
pub use self::tag::{Tag, TagError, TagService};

/// Page sizes applied by listing and search operations.
///
/// Admin listings use a fixed page size; keyword search clamps the
/// caller-supplied size against its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Rows per page on admin listings.
    pub admin_page_size: i64,
    /// Ceiling for caller-supplied search page sizes.
    pub search_page_size: i64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            admin_page_size: 50,
            search_page_size: 20,
        }
    }
}