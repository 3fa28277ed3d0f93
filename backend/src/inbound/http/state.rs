//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services and stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{
    CourseRepository, GroupRepository, ProfessorRepository, SemesterRepository, SubjectRepository,
    TagRepository,
};
use crate::domain::{
    CourseService, GroupService, PagingConfig, ProfessorService, SemesterService, SubjectService,
    TagService,
};

/// Parameter object bundling the repository implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Subject persistence.
    pub subjects: Arc<dyn SubjectRepository>,
    /// Semester persistence.
    pub semesters: Arc<dyn SemesterRepository>,
    /// Study-group persistence.
    pub groups: Arc<dyn GroupRepository>,
    /// Tag persistence.
    pub tags: Arc<dyn TagRepository>,
    /// Course persistence.
    pub courses: Arc<dyn CourseRepository>,
    /// Professor persistence.
    pub professors: Arc<dyn ProfessorRepository>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Subject use-cases.
    pub subjects: SubjectService,
    /// Semester use-cases.
    pub semesters: SemesterService,
    /// Study-group use-cases.
    pub groups: GroupService,
    /// Tag use-cases.
    pub tags: TagService,
    /// Course enrolment use-cases.
    pub courses: CourseService,
    /// Professor and application use-cases.
    pub professors: ProfessorService,
}

impl HttpState {
    /// Build the services over the given repositories.
    pub fn new(ports: HttpStatePorts, paging: PagingConfig) -> Self {
        Self {
            subjects: SubjectService::new(Arc::clone(&ports.subjects), paging),
            semesters: SemesterService::new(Arc::clone(&ports.semesters), paging),
            groups: GroupService::new(Arc::clone(&ports.groups), paging),
            tags: TagService::new(Arc::clone(&ports.tags), paging),
            courses: CourseService::new(
                Arc::clone(&ports.courses),
                Arc::clone(&ports.subjects),
                Arc::clone(&ports.semesters),
                Arc::clone(&ports.groups),
                Arc::clone(&ports.professors),
            ),
            professors: ProfessorService::new(Arc::clone(&ports.professors), paging),
        }
    }
}
