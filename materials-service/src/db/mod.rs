// Metadata table access

pub mod repository;

use async_trait::async_trait;
use shared::BackendResult;

use crate::models::Material;

pub use repository::PostgrestRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Insert a row and return it as stored
    async fn insert(&self, material: &Material) -> BackendResult<Material>;

    /// All rows, newest first
    async fn list(&self) -> BackendResult<Vec<Material>>;

    /// Exactly one row by id; no match is `BackendError::NotFound`
    async fn find_by_id(&self, id: &str) -> BackendResult<Material>;

    async fn delete(&self, id: &str) -> BackendResult<()>;
}
