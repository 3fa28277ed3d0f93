//! Semesters: named academic terms referenced by course enrolments.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::name::{self, NameError};
use crate::domain::ports::{RepositoryError, SearchOrder, SearchQuery, SemesterRepository};
use crate::domain::{Error, PagingConfig};

/// A semester row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Semester {
    /// Primary key.
    pub id: i64,
    /// Unique display name, e.g. "2026-1".
    pub name: String,
}

/// Failures produced by [`SemesterService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SemesterError {
    /// The candidate name failed validation.
    #[error(transparent)]
    Name(#[from] NameError),
    /// A semester with this name already exists.
    #[error("semester \"{name}\" already exists")]
    AlreadyExists {
        /// The conflicting name.
        name: String,
    },
    /// No semester matched the id or name.
    #[error("semester does not exist [id: {id}, name: {name}]")]
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

impl SemesterError {
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

impl From<SemesterError> for Error {
    fn from(err: SemesterError) -> Self {
        match err {
            SemesterError::Name(e) => Self::from_name_error("name", &e),
            SemesterError::AlreadyExists { name } => {
                Self::conflict(format!("semester \"{name}\" already exists")).with_details(json!({
                    "field": "name",
                    "code": "semester_already_exists",
                    "value": name,
                }))
            }
            SemesterError::NotFound { id, name } => Self::not_found("semester does not exist")
                .with_details(json!({ "id": id, "name": name })),
            SemesterError::Repository(RepositoryError::Connection { message }) => {
                Self::service_unavailable(format!("semester repository unavailable: {message}"))
            }
            SemesterError::Repository(e) => Self::internal(format!("semester repository: {e}")),
        }
    }
}

/// Application service for semester CRUD, listing, and search.
#[derive(Clone)]
pub struct SemesterService {
    repo: Arc<dyn SemesterRepository>,
    paging: PagingConfig,
}

impl SemesterService {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<dyn SemesterRepository>, paging: PagingConfig) -> Self {
        Self { repo, paging }
    }

    /// Create a semester after name validation and a duplicate check.
    pub async fn create(&self, name: &str) -> Result<Semester, SemesterError> {
        name::validate(name)?;
        let name = name.trim();
        if self.repo.exists_excluding(0, name).await? {
            return Err(SemesterError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        match self.repo.insert(name).await {
            Ok(semester) => Ok(semester),
            Err(RepositoryError::UniqueViolation { .. }) => Err(SemesterError::AlreadyExists {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a semester; the duplicate check excludes the row itself.
    pub async fn update(&self, id: i64, name: &str) -> Result<Semester, SemesterError> {
        name::validate(name)?;
        let name = name.trim();
        if self.repo.exists_excluding(id, name).await? {
            return Err(SemesterError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        match self.repo.update(id, name).await {
            Ok(0) => Err(SemesterError::not_found_id(id)),
            Ok(_) => Ok(Semester {
                id,
                name: name.to_owned(),
            }),
            Err(RepositoryError::UniqueViolation { .. }) => Err(SemesterError::AlreadyExists {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a semester together with its dependent course rows.
    pub async fn delete(&self, id: i64) -> Result<(), SemesterError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(SemesterError::not_found_id(id));
        }
        self.repo.delete_with_courses(id).await?;
        Ok(())
    }

    /// Fetch a semester by id.
    pub async fn get(&self, id: i64) -> Result<Semester, SemesterError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| SemesterError::not_found_id(id))
    }

    /// Fetch a semester by name; empty names short-circuit to not-found.
    pub async fn get_by_name(&self, name: &str) -> Result<Semester, SemesterError> {
        if name.trim().is_empty() {
            return Err(SemesterError::not_found_name(name));
        }
        self.repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| SemesterError::not_found_name(name))
    }

    /// Map names to ids, skipping names that do not resolve.
    pub async fn ids_by_names(&self, names: &[String]) -> Result<Vec<i64>, SemesterError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            if name.trim().is_empty() {
                continue;
            }
            if let Some(semester) = self.repo.find_by_name(name).await? {
                ids.push(semester.id);
            }
        }
        Ok(ids)
    }

    /// One admin page of semesters, id ascending, with the total count.
    pub async fn list(&self, page: i64) -> Result<Page<Semester>, SemesterError> {
        let request = PageRequest::clamped(
            page,
            self.paging.admin_page_size,
            self.paging.admin_page_size,
        );
        let total = self.repo.count().await?;
        let items = self.repo.page(request).await?;
        Ok(Page::new(items, total, request))
    }

    /// Every semester ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Semester>, SemesterError> {
        Ok(self.repo.list_all().await?)
    }

    /// Keyword search; empty keywords yield an empty page.
    pub async fn search(
        &self,
        keyword: &str,
        order: SearchOrder,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Semester>, SemesterError> {
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

    /// Total number of semesters.
    pub async fn count(&self) -> Result<i64, SemesterError> {
        Ok(self.repo.count().await?)
    }

    /// Distinct semesters in which the professor teaches, name ascending.
    pub async fn list_for_professor(
        &self,
        professor_id: i64,
    ) -> Result<Vec<Semester>, SemesterError> {
        Ok(self.repo.list_for_professor(professor_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::InMemorySemesters;

    fn service(repo: Arc<InMemorySemesters>) -> SemesterService {
        SemesterService::new(repo, PagingConfig::default())
    }

    #[tokio::test]
    async fn create_then_update_round_trips() {
        let repo = Arc::new(InMemorySemesters::default());
        let svc = service(repo);

        let created = svc.create("2026-1").await.expect("create");
        let updated = svc.update(created.id, "2026-2").await.expect("update");
        assert_eq!(updated.name, "2026-2");
        assert_eq!(svc.get(created.id).await.expect("get").name, "2026-2");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let repo = Arc::new(InMemorySemesters::default());
        let svc = service(repo);

        let err = svc.update(42, "2026-1").await.expect_err("missing id");
        assert!(matches!(err, SemesterError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_case_insensitively() {
        let repo = Arc::new(InMemorySemesters::default());
        let svc = service(repo);

        svc.create("Summer").await.expect("create");
        let err = svc.create("SUMMER").await.expect_err("duplicate");
        assert!(matches!(err, SemesterError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn list_reports_totals_across_pages() {
        let repo = Arc::new(InMemorySemesters::default());
        let svc = service(repo);

        for i in 0..3 {
            svc.create(&format!("term-{i}")).await.expect("create");
        }
        let page = svc.list(1).await.expect("list");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 3);
    }
}
