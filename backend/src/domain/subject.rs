//! Subjects and the service that manages them.
//!
//! A subject is a named catalogue entity referenced by course enrolments.
//! The service enforces the shared naming rules and the uniqueness check
//! before any write reaches the repository; deletion removes dependent
//! course rows in the same transaction.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::name::{self, NameError};
use crate::domain::ports::{RepositoryError, SearchOrder, SearchQuery, SubjectRepository};
use crate::domain::{Error, PagingConfig};

/// A subject row: numeric id plus a globally unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Subject {
    /// Primary key.
    pub id: i64,
    /// Unique display name.
    pub name: String,
}

/// Failures produced by [`SubjectService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SubjectError {
    /// The candidate name failed validation.
    #[error(transparent)]
    Name(#[from] NameError),
    /// A subject with this name already exists.
    #[error("subject \"{name}\" already exists")]
    AlreadyExists {
        /// The conflicting name.
        name: String,
    },
    /// No subject matched the id or name.
    #[error("subject does not exist [id: {id}, name: {name}]")]
    NotFound {
        /// Requested id (0 when looked up by name).
        id: i64,
        /// Requested name (empty when looked up by id).
        name: String,
    },
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SubjectError {
    fn not_found_id(id: i64) -> Self {
        Self::NotFound {
            id,
            name: String::new(),
        }
    }

    fn not_found_name(name: &str) -> Self {
        Self::NotFound {
            id: 0,
            name: name.to_owned(),
        }
    }
}

impl From<SubjectError> for Error {
    fn from(err: SubjectError) -> Self {
        match err {
            SubjectError::Name(e) => Self::from_name_error("name", &e),
            SubjectError::AlreadyExists { name } => {
                Self::conflict(format!("subject \"{name}\" already exists")).with_details(json!({
                    "field": "name",
                    "code": "subject_already_exists",
                    "value": name,
                }))
            }
            SubjectError::NotFound { id, name } => Self::not_found("subject does not exist")
                .with_details(json!({ "id": id, "name": name })),
            SubjectError::Repository(RepositoryError::Connection { message }) => {
                Self::service_unavailable(format!("subject repository unavailable: {message}"))
            }
            SubjectError::Repository(e) => Self::internal(format!("subject repository: {e}")),
        }
    }
}

/// Application service for subject CRUD, listing, and search.
#[derive(Clone)]
pub struct SubjectService {
    repo: Arc<dyn SubjectRepository>,
    paging: PagingConfig,
}

impl SubjectService {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<dyn SubjectRepository>, paging: PagingConfig) -> Self {
        Self { repo, paging }
    }

    /// Create a subject: validate the name, reject duplicates, insert.
    ///
    /// A concurrent create slipping past the existence check is caught by
    /// the unique index and reported as the same conflict.
    pub async fn create(&self, name: &str) -> Result<Subject, SubjectError> {
        name::validate(name)?;
        let name = name.trim();
        if self.repo.exists_excluding(0, name).await? {
            return Err(SubjectError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        match self.repo.insert(name).await {
            Ok(subject) => Ok(subject),
            Err(RepositoryError::UniqueViolation { .. }) => Err(SubjectError::AlreadyExists {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a subject; the uniqueness check excludes the row itself so a
    /// no-op rename succeeds.
    pub async fn update(&self, id: i64, name: &str) -> Result<Subject, SubjectError> {
        name::validate(name)?;
        let name = name.trim();
        if self.repo.exists_excluding(id, name).await? {
            return Err(SubjectError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        match self.repo.update(id, name).await {
            Ok(0) => Err(SubjectError::not_found_id(id)),
            Ok(_) => Ok(Subject {
                id,
                name: name.to_owned(),
            }),
            Err(RepositoryError::UniqueViolation { .. }) => Err(SubjectError::AlreadyExists {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a subject together with its dependent course rows.
    pub async fn delete(&self, id: i64) -> Result<(), SubjectError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(SubjectError::not_found_id(id));
        }
        self.repo.delete_with_courses(id).await?;
        Ok(())
    }

    /// Fetch a subject by id.
    pub async fn get(&self, id: i64) -> Result<Subject, SubjectError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| SubjectError::not_found_id(id))
    }

    /// Fetch a subject by name; an empty name short-circuits to not-found
    /// without touching the repository.
    pub async fn get_by_name(&self, name: &str) -> Result<Subject, SubjectError> {
        if name.trim().is_empty() {
            return Err(SubjectError::not_found_name(name));
        }
        self.repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| SubjectError::not_found_name(name))
    }

    /// Map names to ids, silently skipping names that do not resolve.
    pub async fn ids_by_names(&self, names: &[String]) -> Result<Vec<i64>, SubjectError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            if name.trim().is_empty() {
                continue;
            }
            if let Some(subject) = self.repo.find_by_name(name).await? {
                ids.push(subject.id);
            }
        }
        Ok(ids)
    }

    /// One admin page of subjects, id ascending, with the total count.
    pub async fn list(&self, page: i64) -> Result<Page<Subject>, SubjectError> {
        let request = PageRequest::clamped(
            page,
            self.paging.admin_page_size,
            self.paging.admin_page_size,
        );
        let total = self.repo.count().await?;
        let items = self.repo.page(request).await?;
        Ok(Page::new(items, total, request))
    }

    /// Every subject ordered by name, for selection lists.
    pub async fn list_all(&self) -> Result<Vec<Subject>, SubjectError> {
        Ok(self.repo.list_all().await?)
    }

    /// Keyword search. An empty keyword returns an empty page rather than
    /// the full table; page and page size are clamped first.
    pub async fn search(
        &self,
        keyword: &str,
        order: SearchOrder,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Subject>, SubjectError> {
        let request = PageRequest::clamped(page, page_size, self.paging.search_page_size);
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Ok(Page::empty(request));
        }
        let (items, total) = self
            .repo
            .search(&SearchQuery {
                keyword,
                order,
                page: request,
            })
            .await?;
        Ok(Page::new(items, total, request))
    }

    /// Total number of subjects.
    pub async fn count(&self) -> Result<i64, SubjectError> {
        Ok(self.repo.count().await?)
    }

    /// Distinct subjects taught by the professor, name ascending.
    pub async fn list_for_professor(
        &self,
        professor_id: i64,
    ) -> Result<Vec<Subject>, SubjectError> {
        Ok(self.repo.list_for_professor(professor_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::test_support::InMemorySubjects;

    fn service(repo: Arc<InMemorySubjects>) -> SubjectService {
        SubjectService::new(repo, PagingConfig::default())
    }

    #[tokio::test]
    async fn created_subject_is_found_by_name() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        let created = svc.create("Math").await.expect("create subject");
        let fetched = svc.get_by_name("Math").await.expect("fetch subject");
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn duplicate_create_fails_and_inserts_nothing() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(Arc::clone(&repo));

        svc.create("Math").await.expect("first create");
        let err = svc.create("math").await.expect_err("duplicate create");
        assert!(matches!(err, SubjectError::AlreadyExists { .. }));
        assert_eq!(repo.len(), 1);
    }

    #[rstest]
    #[case("admin")]
    #[case("   ")]
    #[case("deploy.keys")]
    #[tokio::test]
    async fn invalid_names_never_reach_the_repository(#[case] bad_name: &str) {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(Arc::clone(&repo));

        let err = svc.create(bad_name).await.expect_err("rejected name");
        assert!(matches!(err, SubjectError::Name(_)));
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn deleted_subject_is_gone() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        let subject = svc.create("Physics").await.expect("create");
        svc.delete(subject.id).await.expect("delete");
        let err = svc.get(subject.id).await.expect_err("lookup after delete");
        assert!(matches!(err, SubjectError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        let err = svc.delete(99).await.expect_err("missing id");
        assert!(matches!(err, SubjectError::NotFound { id: 99, .. }));
    }

    #[tokio::test]
    async fn rename_to_own_name_succeeds() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        let subject = svc.create("Chemistry").await.expect("create");
        let updated = svc
            .update(subject.id, "Chemistry")
            .await
            .expect("self-rename");
        assert_eq!(updated.name, "Chemistry");
    }

    #[tokio::test]
    async fn rename_onto_other_subject_conflicts() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        svc.create("Biology").await.expect("create first");
        let second = svc.create("Geology").await.expect("create second");
        let err = svc
            .update(second.id, "Biology")
            .await
            .expect_err("conflicting rename");
        assert!(matches!(err, SubjectError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn empty_keyword_search_returns_empty_page() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        svc.create("Math").await.expect("create");
        let page = svc
            .search("   ", SearchOrder::NameAsc, 1, 10)
            .await
            .expect("search");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn search_clamps_page_and_page_size() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        svc.create("Math").await.expect("create");
        let page = svc
            .search("ma", SearchOrder::NameAsc, 0, 0)
            .await
            .expect("search");
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, PagingConfig::default().search_page_size);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn search_total_counts_beyond_the_page() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        for name in ["Algebra I", "Algebra II", "Algebra III"] {
            svc.create(name).await.expect("create");
        }
        let page = svc
            .search("algebra", SearchOrder::IdAsc, 1, 2)
            .await
            .expect("search");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn professor_listing_yields_each_subject_once() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(Arc::clone(&repo));

        let subject = svc.create("Math").await.expect("create");
        repo.link_professor(7, subject.id);
        repo.link_professor(7, subject.id);
        let listed = svc.list_for_professor(7).await.expect("listing");
        assert_eq!(listed, vec![subject]);
    }

    #[tokio::test]
    async fn ids_by_names_skips_unknown_names() {
        let repo = Arc::new(InMemorySubjects::default());
        let svc = service(repo);

        let math = svc.create("Math").await.expect("create");
        let ids = svc
            .ids_by_names(&["Math".to_owned(), "Nope".to_owned(), String::new()])
            .await
            .expect("resolve ids");
        assert_eq!(ids, vec![math.id]);
    }

    #[tokio::test]
    async fn repository_connection_failure_maps_to_service_unavailable() {
        let repo = Arc::new(InMemorySubjects::default());
        repo.fail_with(RepositoryError::connection("pool exhausted"));
        let svc = service(repo);

        let err = svc.get(1).await.expect_err("failing repo");
        let api: Error = err.into();
        assert_eq!(api.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }
}
