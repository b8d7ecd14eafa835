use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::StatusCode,
    Json,
};
use bytes::Bytes;

use crate::handlers::validation;
use crate::models::{
    ApiError, ApiResult, CreateMaterialRequest, DeleteResponse, Material, MaterialQuery,
    UploadResponse,
};
use crate::AppState;

const UPLOADED_MESSAGE: &str = "Arquivo enviado com sucesso!";
const REMOVED_MESSAGE: &str = "Material removido com sucesso!";

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Fields of the upload form. Only `file` is required.
#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    subject_id: Option<String>,
    subject_name: Option<String>,
    user_id: Option<String>,
    user_name: Option<String>,
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Invalid multipart: {}", err.body_text()))
    }
}

impl UploadForm {
    async fn read(mut multipart: Multipart, max_file_bytes: usize) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let field_name = field.name().unwrap_or_default().to_string();
            tracing::debug!("Processing field: {}", field_name);

            match field_name.as_str() {
                "file" => {
                    let name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(multipart_error)?;

                    // Browsers send an unnamed empty part when no file was picked
                    if name.is_empty() {
                        continue;
                    }
                    if data.len() > max_file_bytes {
                        return Err(ApiError::PayloadTooLarge(format!(
                            "File too large. Maximum size is {} bytes",
                            max_file_bytes
                        )));
                    }
                    if form.file.is_none() {
                        form.file = Some(UploadedFile {
                            name,
                            content_type,
                            data,
                        });
                    }
                }
                "subjectId" => form.subject_id = Some(field.text().await.map_err(multipart_error)?),
                "subjectName" => form.subject_name = Some(field.text().await.map_err(multipart_error)?),
                "userId" => form.user_id = Some(field.text().await.map_err(multipart_error)?),
                "userName" => form.user_name = Some(field.text().await.map_err(multipart_error)?),
                other => tracing::debug!("Ignoring unknown form field: {}", other),
            }
        }

        Ok(form)
    }
}

/// POST: store the uploaded file, then record its metadata
pub async fn upload_material(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    tracing::info!("Received material upload request");

    let multipart = multipart.map_err(|e| {
        tracing::warn!("Upload without a multipart body: {}", e);
        ApiError::no_file()
    })?;
    let form = UploadForm::read(multipart, state.settings.max_upload_bytes).await?;
    let file = form.file.ok_or_else(ApiError::no_file)?;

    let file_name = validation::object_name(&file.name);
    let file_path = validation::object_path(&state.settings.prefix, &file_name);
    let size = file.data.len();
    let content_type = file
        .content_type
        .clone()
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    tracing::info!(
        "File received: name={}, size={} bytes, content_type={}",
        file.name,
        size,
        content_type
    );

    state
        .storage
        .upload(&file_path, file.data, &content_type)
        .await
        .map_err(|e| {
            tracing::error!(
                backend_status = e.http_status_code(),
                "Failed to store {}: {}",
                file_path,
                e
            );
            ApiError::Internal(e.to_string())
        })?;

    let material = Material::new(CreateMaterialRequest {
        name: file.name,
        file_name,
        file_path: file_path.clone(),
        size: size as i64,
        mime_type: file.content_type,
        subject_id: form.subject_id.as_deref().and_then(validation::parse_int),
        subject_name: form.subject_name,
        uploaded_by: form.user_id.as_deref().and_then(validation::parse_int),
        uploaded_by_name: form.user_name,
    });

    let material = state.repository.insert(&material).await.map_err(|e| {
        tracing::error!(
            "Failed to create material record, blob {} is orphaned: {}",
            file_path,
            e
        );
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(UploadResponse {
        success: true,
        material,
        message: UPLOADED_MESSAGE.to_string(),
    }))
}

/// GET: every material, newest first
pub async fn list_materials(State(state): State<AppState>) -> ApiResult<Json<Vec<Material>>> {
    let materials = state.repository.list().await.map_err(|e| {
        tracing::error!("Failed to list materials: {}", e);
        ApiError::Backend(e.to_string())
    })?;

    tracing::debug!("Listing {} materials", materials.len());
    Ok(Json(materials))
}

/// DELETE: remove the blob first, and only then the metadata row
pub async fn delete_material(
    State(state): State<AppState>,
    Query(query): Query<MaterialQuery>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = query.id().ok_or_else(ApiError::missing_id)?;
    tracing::info!("Deleting material {}", id);

    let material = state.repository.find_by_id(id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::material_not_found()
        } else {
            tracing::error!("Failed to look up material {}: {}", id, e);
            ApiError::Backend(e.to_string())
        }
    })?;

    state
        .storage
        .remove(&[material.file_path.clone()])
        .await
        .map_err(|e| {
            tracing::error!(
                backend_status = e.http_status_code(),
                "Failed to remove blob {}: {}",
                material.file_path,
                e
            );
            ApiError::Backend(e.to_string())
        })?;

    state.repository.delete(id).await.map_err(|e| {
        tracing::error!(
            "Blob {} removed but material {} could not be deleted: {}",
            material.file_path,
            id,
            e
        );
        ApiError::Backend(e.to_string())
    })?;

    Ok(Json(DeleteResponse {
        success: true,
        message: REMOVED_MESSAGE.to_string(),
    }))
}
