//! Tags: free-form labels attachable to repositories.
//!
//! Tags follow the same naming rules as the other catalogue entities but
//! carry a `label` field and, on deletion, shed their repository links
//! instead of course rows.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::name::{self, NameError};
use crate::domain::ports::{RepositoryError, SearchOrder, SearchQuery, TagRepository};
use crate::domain::{Error, PagingConfig};

/// A tag row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    /// Primary key.
    pub id: i64,
    /// Unique label text.
    pub label: String,
}

/// Failures produced by [`TagService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TagError {
    /// The candidate label failed validation.
    #[error(transparent)]
    Label(#[from] NameError),
    /// A tag with this label already exists.
    #[error("tag \"{label}\" already exists")]
    AlreadyExists {
        /// The conflicting label.
        label: String,
    },
    /// No tag matched the id or label.
    #[error("tag does not exist [id: {id}, label: {label}]")]
    NotFound {
        /// Requested id (0 when looked up by label).
        id: i64,
        /// Requested label (empty when looked up by id).
        label: String,
    },
    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TagError {
    fn not_found_id(id: i64) -> Self {
        Self::NotFound {
            id,
            label: String::new(),
        }
    }

    fn not_found_label(label: &str) -> Self {
        Self::NotFound {
            id: 0,
            label: label.to_owned(),
        }
    }
}

impl From<TagError> for Error {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Label(e) => Self::from_name_error("label", &e),
            TagError::AlreadyExists { label } => {
                Self::conflict(format!("tag \"{label}\" already exists")).with_details(json!({
                    "field": "label",
                    "code": "tag_already_exists",
                    "value": label,
                }))
            }
            TagError::NotFound { id, label } => Self::not_found("tag does not exist")
                .with_details(json!({ "id": id, "label": label })),
            TagError::Repository(RepositoryError::Connection { message }) => {
                Self::service_unavailable(format!("tag repository unavailable: {message}"))
            }
            TagError::Repository(e) => Self::internal(format!("tag repository: {e}")),
        }
    }
}

/// Application service for tag CRUD, listing, and search.
#[derive(Clone)]
pub struct TagService {
    repo: Arc<dyn TagRepository>,
    paging: PagingConfig,
}

impl TagService {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<dyn TagRepository>, paging: PagingConfig) -> Self {
        Self { repo, paging }
    }

    /// Create a tag after label validation and a duplicate check.
    pub async fn create(&self, label: &str) -> Result<Tag, TagError> {
        name::validate(label)?;
        let label = label.trim();
        if self.repo.exists_excluding(0, label).await? {
            return Err(TagError::AlreadyExists {
                label: label.to_owned(),
            });
        }
        match self.repo.insert(label).await {
            Ok(tag) => Ok(tag),
            Err(RepositoryError::UniqueViolation { .. }) => Err(TagError::AlreadyExists {
                label: label.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Relabel a tag; the duplicate check excludes the row itself.
    pub async fn update(&self, id: i64, label: &str) -> Result<Tag, TagError> {
        name::validate(label)?;
        let label = label.trim();
        if self.repo.exists_excluding(id, label).await? {
            return Err(TagError::AlreadyExists {
                label: label.to_owned(),
            });
        }
        match self.repo.update(id, label).await {
            Ok(0) => Err(TagError::not_found_id(id)),
            Ok(_) => Ok(Tag {
                id,
                label: label.to_owned(),
            }),
            Err(RepositoryError::UniqueViolation { .. }) => Err(TagError::AlreadyExists {
                label: label.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a tag together with its repository links.
    pub async fn delete(&self, id: i64) -> Result<(), TagError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(TagError::not_found_id(id));
        }
        self.repo.delete_with_links(id).await?;
        Ok(())
    }

    /// Fetch a tag by id.
    pub async fn get(&self, id: i64) -> Result<Tag, TagError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| TagError::not_found_id(id))
    }

    /// Fetch a tag by label; empty labels short-circuit to not-found.
    pub async fn get_by_label(&self, label: &str) -> Result<Tag, TagError> {
        if label.trim().is_empty() {
            return Err(TagError::not_found_label(label));
        }
        self.repo
            .find_by_label(label)
            .await?
            .ok_or_else(|| TagError::not_found_label(label))
    }

    /// Map labels to ids, silently skipping labels that do not resolve.
    pub async fn ids_by_labels(&self, labels: &[String]) -> Result<Vec<i64>, TagError> {
        let mut ids = Vec::with_capacity(labels.len());
        for label in labels {
            if label.trim().is_empty() {
                continue;
            }
            if let Some(tag) = self.repo.find_by_label(label).await? {
                ids.push(tag.id);
            }
        }
        Ok(ids)
    }

    /// One admin page of tags, id ascending, with the total count.
    pub async fn list(&self, page: i64) -> Result<Page<Tag>, TagError> {
        let request = PageRequest::clamped(
            page,
            self.paging.admin_page_size,
            self.paging.admin_page_size,
        );
        let total = self.repo.count().await?;
        let items = self.repo.page(request).await?;
        Ok(Page::new(items, total, request))
    }

    /// Every tag ordered by label.
    pub async fn list_all(&self) -> Result<Vec<Tag>, TagError> {
        Ok(self.repo.list_all().await?)
    }

    /// Keyword search; empty keywords yield an empty page.
    pub async fn search(
        &self,
        keyword: &str,
        order: SearchOrder,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Tag>, TagError> {
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

    /// Total number of tags.
    pub async fn count(&self) -> Result<i64, TagError> {
        Ok(self.repo.count().await?)
    }
}
