//! Study groups: named cohorts referenced by course enrolments.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::name::{self, NameError};
use crate::domain::ports::{GroupRepository, RepositoryError, SearchOrder, SearchQuery};
use crate::domain::{Error, PagingConfig};

/// A study-group row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Group {
    /// Primary key.
    pub id: i64,
    /// Unique display name.
    pub name: String,
}

/// Failures produced by [`GroupService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum GroupError {
    /// The candidate name failed validation.
    #[error(transparent)]
    Name(#[from] NameError),
    /// A group with this name already exists.
    #[error("group \"{name}\" already exists")]
    AlreadyExists {
        /// The conflicting name.
        name: String,
    },
    /// No group matched the id or name.
    #[error("group does not exist [id: {id}, name: {name}]")]
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

impl GroupError {
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

impl From<GroupError> for Error {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::Name(e) => Self::from_name_error("name", &e),
            GroupError::AlreadyExists { name } => {
                Self::conflict(format!("group \"{name}\" already exists")).with_details(json!({
                    "field": "name",
                    "code": "group_already_exists",
                    "value": name,
                }))
            }
            GroupError::NotFound { id, name } => Self::not_found("group does not exist")
                .with_details(json!({ "id": id, "name": name })),
            GroupError::Repository(RepositoryError::Connection { message }) => {
                Self::service_unavailable(format!("group repository unavailable: {message}"))
            }
            GroupError::Repository(e) => Self::internal(format!("group repository: {e}")),
        }
    }
}

/// Application service for study-group CRUD, listing, and search.
#[derive(Clone)]
pub struct GroupService {
    repo: Arc<dyn GroupRepository>,
    paging: PagingConfig,
}

impl GroupService {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<dyn GroupRepository>, paging: PagingConfig) -> Self {
        Self { repo, paging }
    }

    /// Create a group after name validation and a duplicate check.
    pub async fn create(&self, name: &str) -> Result<Group, GroupError> {
        name::validate(name)?;
        let name = name.trim();
        if self.repo.exists_excluding(0, name).await? {
            return Err(GroupError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        match self.repo.insert(name).await {
            Ok(group) => Ok(group),
            Err(RepositoryError::UniqueViolation { .. }) => Err(GroupError::AlreadyExists {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a group; the duplicate check excludes the row itself.
    pub async fn update(&self, id: i64, name: &str) -> Result<Group, GroupError> {
        name::validate(name)?;
        let name = name.trim();
        if self.repo.exists_excluding(id, name).await? {
            return Err(GroupError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        match self.repo.update(id, name).await {
            Ok(0) => Err(GroupError::not_found_id(id)),
            Ok(_) => Ok(Group {
                id,
                name: name.to_owned(),
            }),
            Err(RepositoryError::UniqueViolation { .. }) => Err(GroupError::AlreadyExists {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a group together with its dependent course rows.
    pub async fn delete(&self, id: i64) -> Result<(), GroupError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(GroupError::not_found_id(id));
        }
        self.repo.delete_with_courses(id).await?;
        Ok(())
    }

    /// Fetch a group by id.
    pub async fn get(&self, id: i64) -> Result<Group, GroupError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| GroupError::not_found_id(id))
    }

    /// Fetch a group by name; empty names short-circuit to not-found.
    pub async fn get_by_name(&self, name: &str) -> Result<Group, GroupError> {
        if name.trim().is_empty() {
            return Err(GroupError::not_found_name(name));
        }
        self.repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| GroupError::not_found_name(name))
    }

    /// Map names to ids, skipping names that do not resolve.
    pub async fn ids_by_names(&self, names: &[String]) -> Result<Vec<i64>, GroupError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            if name.trim().is_empty() {
                continue;
            }
            if let Some(group) = self.repo.find_by_name(name).await? {
                ids.push(group.id);
            }
        }
        Ok(ids)
    }

    /// One admin page of groups, id ascending, with the total count.
    pub async fn list(&self, page: i64) -> Result<Page<Group>, GroupError> {
        let request = PageRequest::clamped(
            page,
            self.paging.admin_page_size,
            self.paging.admin_page_size,
        );
        let total = self.repo.count().await?;
        let items = self.repo.page(request).await?;
        Ok(Page::new(items, total, request))
    }

    /// Every group ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Group>, GroupError> {
        Ok(self.repo.list_all().await?)
    }

    /// Keyword search; empty keywords yield an empty page.
    pub async fn search(
        &self,
        keyword: &str,
        order: SearchOrder,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Group>, GroupError> {
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

    /// Total number of groups.
    pub async fn count(&self) -> Result<i64, GroupError> {
        Ok(self.repo.count().await?)
    }

    /// Distinct groups the professor teaches, name ascending.
    pub async fn list_for_professor(&self, professor_id: i64) -> Result<Vec<Group>, GroupError> {
        Ok(self.repo.list_for_professor(professor_id).await?)
    }
}
