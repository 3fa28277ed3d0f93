//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin implementations of the domain repository ports: each adapter only
//! translates between Diesel rows and domain types, with connections drawn
//! from a bb8 pool via `diesel-async`. Row structs and table definitions
//! stay private to this module; everything the database reports is mapped
//! into [`crate::domain::ports::RepositoryError`] before it crosses the
//! port boundary.

mod diesel_course_repository;
mod diesel_group_repository;
mod diesel_professor_repository;
mod diesel_semester_repository;
mod diesel_subject_repository;
mod diesel_tag_repository;
mod error_mapping;
mod helpers;
mod models;
mod pool;
mod schema;

pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_professor_repository::DieselProfessorRepository;
pub use diesel_semester_repository::DieselSemesterRepository;
pub use diesel_subject_repository::DieselSubjectRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
