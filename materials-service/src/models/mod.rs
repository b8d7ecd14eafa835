use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::{ApiError, ApiResult};

/// Metadata row describing one uploaded material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub file_path: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub uploaded_by: Option<i64>,
    pub uploaded_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything the upload handler knows about a file once its blob is stored
#[derive(Debug, Clone)]
pub struct CreateMaterialRequest {
    pub name: String,
    pub file_name: String,
    pub file_path: String,
    pub size: i64,
    pub mime_type: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub uploaded_by: Option<i64>,
    pub uploaded_by_name: Option<String>,
}

impl Material {
    /// Build a new row with a fresh id and the current time as `created_at`
    pub fn new(request: CreateMaterialRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            file_name: request.file_name,
            file_path: request.file_path,
            size: request.size,
            mime_type: request.mime_type,
            subject_id: request.subject_id,
            subject_name: request.subject_name,
            uploaded_by: request.uploaded_by,
            uploaded_by_name: request.uploaded_by_name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub material: Material,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_url: String,
    pub file_name: String,
    pub size: i64,
}

/// `?id=` query accepted by the delete and download endpoints
#[derive(Debug, Default, Deserialize)]
pub struct MaterialQuery {
    pub id: Option<String>,
}

impl MaterialQuery {
    /// The trimmed id, or `None` when absent or blank
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}
