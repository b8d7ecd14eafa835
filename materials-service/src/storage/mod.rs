// Object storage for material blobs

pub mod supabase_storage;

use async_trait::async_trait;
use bytes::Bytes;
use shared::BackendResult;

pub use supabase_storage::SupabaseStorage;

/// Blob operations the handlers need from the storage bucket
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` at `path`. Fails with `Conflict` if the object already exists.
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> BackendResult<()>;

    async fn remove(&self, paths: &[String]) -> BackendResult<()>;

    /// Mint a URL granting anonymous read access to `path` for `expires_in` seconds
    async fn create_signed_url(&self, path: &str, expires_in: u64) -> BackendResult<String>;
}
