//! Course enrolments: the (professor, subject, semester, group) tuple.
//!
//! A course links one professor to one subject taught during one semester
//! for one study group. The tuple is unique; the `is_active` flag marks
//! whether the enrolment is currently taught. The service composes the
//! course repository with the catalogue repositories so callers get fully
//! assembled views instead of raw foreign keys.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::group::Group;
use crate::domain::ports::{
    CourseRepository, GroupRepository, ProfessorRepository, RepositoryError, SemesterRepository,
    SubjectRepository,
};
use crate::domain::semester::Semester;
use crate::domain::subject::Subject;
use crate::domain::Error;

/// A stored course row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    /// Primary key.
    pub id: i64,
    /// Owning professor.
    pub professor_id: i64,
    /// Subject taught.
    pub subject_id: i64,
    /// Semester in which it is taught.
    pub semester_id: i64,
    /// Study group taught.
    pub group_id: i64,
    /// Whether the enrolment is currently taught.
    pub is_active: bool,
}

/// The tuple to insert when enrolling a professor on a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    /// Owning professor.
    pub professor_id: i64,
    /// Subject taught.
    pub subject_id: i64,
    /// Semester in which it is taught.
    pub semester_id: i64,
    /// Study group taught.
    pub group_id: i64,
    /// Initial active flag.
    pub is_active: bool,
}

/// A course row joined with the catalogue entities it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CourseInfo {
    /// The raw course row.
    pub course: Course,
    /// The referenced subject.
    pub subject: Subject,
    /// The referenced semester.
    pub semester: Semester,
    /// The referenced group.
    pub group: Group,
}

/// Failures produced by [`CourseService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CourseError {
    /// The same (professor, subject, semester, group) tuple is already
    /// enrolled.
    #[error("course already exists for this professor, subject, semester, and group")]
    AlreadyExists,
    /// The professor id does not resolve to an account.
    #[error("professor does not exist [id: {id}]")]
    ProfessorNotFound {
        /// The missing professor id.
        id: i64,
    },
    /// A referenced catalogue entity does not exist.
    #[error("{entity} does not exist [id: {id}]")]
    MissingReference {
        /// Which catalogue the lookup failed in.
        entity: &'static str,
        /// The missing id.
        id: i64,
    },
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CourseError> for Error {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::AlreadyExists => Self::conflict(
                "course already exists for this professor, subject, semester, and group",
            ),
            CourseError::ProfessorNotFound { id } => {
                Self::not_found("professor does not exist").with_details(json!({ "id": id }))
            }
            CourseError::MissingReference { entity, id } => {
                Self::not_found(format!("{entity} does not exist"))
                    .with_details(json!({ "entity": entity, "id": id }))
            }
            CourseError::Repository(RepositoryError::Connection { message }) => {
                Self::service_unavailable(format!("course repository unavailable: {message}"))
            }
            CourseError::Repository(e) => Self::internal(format!("course repository: {e}")),
        }
    }
}

/// Application service for a professor's course enrolments.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    subjects: Arc<dyn SubjectRepository>,
    semesters: Arc<dyn SemesterRepository>,
    groups: Arc<dyn GroupRepository>,
    professors: Arc<dyn ProfessorRepository>,
}

impl CourseService {
    /// Create a new service over the course and catalogue repositories.
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        subjects: Arc<dyn SubjectRepository>,
        semesters: Arc<dyn SemesterRepository>,
        groups: Arc<dyn GroupRepository>,
        professors: Arc<dyn ProfessorRepository>,
    ) -> Self {
        Self {
            courses,
            subjects,
            semesters,
            groups,
            professors,
        }
    }

    async fn check_references(&self, new: &NewCourse) -> Result<(), CourseError> {
        if self.professors.find_by_id(new.professor_id).await?.is_none() {
            return Err(CourseError::ProfessorNotFound {
                id: new.professor_id,
            });
        }
        if self.subjects.find_by_id(new.subject_id).await?.is_none() {
            return Err(CourseError::MissingReference {
                entity: "subject",
                id: new.subject_id,
            });
        }
        if self.semesters.find_by_id(new.semester_id).await?.is_none() {
            return Err(CourseError::MissingReference {
                entity: "semester",
                id: new.semester_id,
            });
        }
        if self.groups.find_by_id(new.group_id).await?.is_none() {
            return Err(CourseError::MissingReference {
                entity: "group",
                id: new.group_id,
            });
        }
        Ok(())
    }

    /// Enrol a professor on a course. The composite tuple must be new; a
    /// second enrolment of the same tuple is a conflict even when the
    /// active flags differ.
    pub async fn add(&self, new: NewCourse) -> Result<Course, CourseError> {
        self.check_references(&new).await?;
        if self.courses.tuple_exists(&new).await? {
            return Err(CourseError::AlreadyExists);
        }
        match self.courses.insert(&new).await {
            Ok(course) => Ok(course),
            Err(RepositoryError::UniqueViolation { .. }) => Err(CourseError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Flip the active flag on the professor's course for a subject.
    /// Succeeds as a no-op when no such course exists.
    pub async fn change_status(
        &self,
        professor_id: i64,
        subject_id: i64,
        active: bool,
    ) -> Result<(), CourseError> {
        let Some(course) = self
            .courses
            .find_by_professor_and_subject(professor_id, subject_id)
            .await?
        else {
            return Ok(());
        };
        self.courses.set_active(course.id, active).await?;
        Ok(())
    }

    /// Remove a course enrolment. Idempotent: an id that is absent, or
    /// that belongs to another professor, succeeds without deleting.
    pub async fn remove(&self, professor_id: i64, course_id: i64) -> Result<(), CourseError> {
        if self
            .courses
            .find_for_professor(professor_id, course_id)
            .await?
            .is_none()
        {
            return Ok(());
        }
        self.courses.delete(course_id).await?;
        Ok(())
    }

    /// Assemble the professor's courses with their referenced catalogue
    /// entities. The first failed lookup aborts the whole call; callers
    /// never see a partial list.
    pub async fn courses_info(&self, professor_id: i64) -> Result<Vec<CourseInfo>, CourseError> {
        if self.professors.find_by_id(professor_id).await?.is_none() {
            return Err(CourseError::ProfessorNotFound { id: professor_id });
        }
        let courses = self.courses.list_for_professor(professor_id).await?;
        let mut infos = Vec::with_capacity(courses.len());
        for course in courses {
            let subject = self
                .subjects
                .find_by_id(course.subject_id)
                .await?
                .ok_or(CourseError::MissingReference {
                    entity: "subject",
                    id: course.subject_id,
                })?;
            let semester = self
                .semesters
                .find_by_id(course.semester_id)
                .await?
                .ok_or(CourseError::MissingReference {
                    entity: "semester",
                    id: course.semester_id,
                })?;
            let group =
                self.groups
                    .find_by_id(course.group_id)
                    .await?
                    .ok_or(CourseError::MissingReference {
                        entity: "group",
                        id: course.group_id,
                    })?;
            infos.push(CourseInfo {
                course,
                subject,
                semester,
                group,
            });
        }
        Ok(infos)
    }
}
