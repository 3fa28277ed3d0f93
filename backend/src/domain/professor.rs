//! Professor accounts and the application approval workflow.
//!
//! Accounts live in the host platform; this service only reads the fields
//! the academic module needs. A pending application is a professor row
//! with `prohibit_login = true`; approval clears the flag and marks the
//! account active, rejection deletes the row and its course enrolments.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::ports::{ProfessorRepository, RepositoryError};
use crate::domain::{Error, PagingConfig};

/// The slice of a professor account this module reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Professor {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Whether the account has been approved.
    pub is_active: bool,
    /// Whether the account is still waiting for approval.
    pub prohibit_login: bool,
}

/// Failures produced by [`ProfessorService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ProfessorError {
    /// No professor matched the id.
    #[error("professor does not exist [id: {id}]")]
    NotFound {
        /// The missing id.
        id: i64,
    },
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ProfessorError> for Error {
    fn from(err: ProfessorError) -> Self {
        match err {
            ProfessorError::NotFound { id } => {
                Self::not_found("professor does not exist").with_details(json!({ "id": id }))
            }
            ProfessorError::Repository(RepositoryError::Connection { message }) => {
                Self::service_unavailable(format!("professor repository unavailable: {message}"))
            }
            ProfessorError::Repository(e) => Self::internal(format!("professor repository: {e}")),
        }
    }
}

/// Application service for professor listings and approvals.
#[derive(Clone)]
pub struct ProfessorService {
    repo: Arc<dyn ProfessorRepository>,
    paging: PagingConfig,
}

impl ProfessorService {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<dyn ProfessorRepository>, paging: PagingConfig) -> Self {
        Self { repo, paging }
    }

    /// Fetch a professor by id.
    pub async fn get(&self, id: i64) -> Result<Professor, ProfessorError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ProfessorError::NotFound { id })
    }

    /// One admin page of active professors with the total count.
    pub async fn list(&self, page: i64) -> Result<Page<Professor>, ProfessorError> {
        let request = PageRequest::clamped(
            page,
            self.paging.admin_page_size,
            self.paging.admin_page_size,
        );
        let total = self.repo.count_active().await?;
        let items = self.repo.page_active(request).await?;
        Ok(Page::new(items, total, request))
    }

    /// One admin page of pending applications with the total count.
    pub async fn applications(&self, page: i64) -> Result<Page<Professor>, ProfessorError> {
        let request = PageRequest::clamped(
            page,
            self.paging.admin_page_size,
            self.paging.admin_page_size,
        );
        let total = self.repo.count_pending().await?;
        let items = self.repo.page_pending(request).await?;
        Ok(Page::new(items, total, request))
    }

    /// Approve a pending application: activate the account and let it
    /// log in.
    pub async fn activate(&self, id: i64) -> Result<(), ProfessorError> {
        match self.repo.set_approval(id, true, false).await? {
            0 => Err(ProfessorError::NotFound { id }),
            _ => Ok(()),
        }
    }

    /// Reject a pending application: delete the account together with any
    /// course rows it acquired.
    pub async fn reject(&self, id: i64) -> Result<(), ProfessorError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ProfessorError::NotFound { id });
        }
        self.repo.delete_with_courses(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::InMemoryProfessors;

    fn service(repo: Arc<InMemoryProfessors>) -> ProfessorService {
        ProfessorService::new(repo, PagingConfig::default())
    }

    #[tokio::test]
    async fn pending_and_active_listings_do_not_overlap() {
        let repo = Arc::new(InMemoryProfessors::default());
        repo.seed("Ada", true, false);
        repo.seed("Grace", false, true);
        let svc = service(repo);

        let active = svc.list(1).await.expect("active page");
        let pending = svc.applications(1).await.expect("pending page");
        assert_eq!(active.items.len(), 1);
        assert_eq!(active.items[0].name, "Ada");
        assert_eq!(pending.items.len(), 1);
        assert_eq!(pending.items[0].name, "Grace");
    }

    #[tokio::test]
    async fn activation_clears_the_login_prohibition() {
        let repo = Arc::new(InMemoryProfessors::default());
        let id = repo.seed("Grace", false, true);
        let svc = service(Arc::clone(&repo));

        svc.activate(id).await.expect("activate");
        let professor = svc.get(id).await.expect("reload");
        assert!(professor.is_active);
        assert!(!professor.prohibit_login);
    }

    #[tokio::test]
    async fn activating_an_unknown_id_is_not_found() {
        let repo = Arc::new(InMemoryProfessors::default());
        let svc = service(repo);

        let err = svc.activate(404).await.expect_err("missing id");
        assert!(matches!(err, ProfessorError::NotFound { id: 404 }));
    }

    #[tokio::test]
    async fn rejection_removes_the_account() {
        let repo = Arc::new(InMemoryProfessors::default());
        let id = repo.seed("Grace", false, true);
        let svc = service(Arc::clone(&repo));

        svc.reject(id).await.expect("reject");
        assert!(matches!(
            svc.get(id).await,
            Err(ProfessorError::NotFound { .. })
        ));
    }
}
