use axum::{
    extract::{Query, State},
    Json,
};

use crate::models::{ApiError, ApiResult, DownloadResponse, MaterialQuery};
use crate::AppState;

/// GET: short-lived signed URL for a material's blob
pub async fn download_material(
    State(state): State<AppState>,
    Query(query): Query<MaterialQuery>,
) -> ApiResult<Json<DownloadResponse>> {
    let id = query.id().ok_or_else(ApiError::missing_id)?;

    // Any lookup failure is reported as not found
    let material = state.repository.find_by_id(id).await.map_err(|e| {
        tracing::warn!("Material {} not available for download: {}", id, e);
        ApiError::material_not_found()
    })?;

    let ttl = state.settings.signed_url_ttl_seconds;
    let download_url = state
        .storage
        .create_signed_url(&material.file_path, ttl)
        .await
        .map_err(|e| {
            tracing::error!(
                backend_status = e.http_status_code(),
                "Failed to sign URL for {}: {}",
                material.file_path,
                e
            );
            ApiError::Internal(e.to_string())
        })?;

    tracing::info!("Issued download URL for material {} (valid {}s)", id, ttl);

    Ok(Json(DownloadResponse {
        download_url,
        file_name: material.name,
        size: material.size,
    }))
}
