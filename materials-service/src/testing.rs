//! Test support: an in-memory backend and request helpers

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use shared::{BackendError, BackendResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::config::MaterialsConfig;
use crate::db::MaterialRepository;
use crate::models::{CreateMaterialRequest, Material};
use crate::routes;
use crate::storage::ObjectStorage;
use crate::AppState;

pub const BOUNDARY: &str = "materials-test-boundary";

/// Bucket and table kept in memory, behaving like the hosted services do
#[derive(Default)]
pub struct InMemoryBackend {
    blobs: Mutex<HashMap<String, Bytes>>,
    rows: Mutex<Vec<Material>>,
    signed_urls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn blob_size(&self, path: &str) -> Option<usize> {
        self.blobs.lock().unwrap().get(path).map(Bytes::len)
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn signed_url_count(&self) -> usize {
        self.signed_urls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for InMemoryBackend {
    async fn upload(&self, path: &str, data: Bytes, _content_type: &str) -> BackendResult<()> {
        let mut blobs = self.blobs.lock().unwrap();
        if blobs.contains_key(path) {
            return Err(BackendError::Conflict("The resource already exists".to_string()));
        }
        blobs.insert(path.to_string(), data);
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> BackendResult<()> {
        let mut blobs = self.blobs.lock().unwrap();
        for path in paths {
            blobs.remove(path);
        }
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expires_in: u64) -> BackendResult<String> {
        if !self.blobs.lock().unwrap().contains_key(path) {
            return Err(BackendError::NotFound("Object not found".to_string()));
        }
        self.signed_urls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://storage.test/object/sign/eml-materials/{}?token=test&expires_in={}",
            path, expires_in
        ))
    }
}

#[async_trait]
impl MaterialRepository for InMemoryBackend {
    async fn insert(&self, material: &Material) -> BackendResult<Material> {
        self.rows.lock().unwrap().push(material.clone());
        Ok(material.clone())
    }

    async fn list(&self) -> BackendResult<Vec<Material>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> BackendResult<Material> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| {
                BackendError::NotFound("JSON object requested, multiple (or no) rows returned".to_string())
            })
    }

    async fn delete(&self, id: &str) -> BackendResult<()> {
        self.rows.lock().unwrap().retain(|row| row.id != id);
        Ok(())
    }
}

pub fn state_with(
    storage: Arc<dyn ObjectStorage>,
    repository: Arc<dyn MaterialRepository>,
) -> AppState {
    AppState {
        storage,
        repository,
        settings: Arc::new(MaterialsConfig::default()),
    }
}

pub fn in_memory_app() -> (Router, Arc<InMemoryBackend>) {
    in_memory_app_with(MaterialsConfig::default())
}

pub fn in_memory_app_with(settings: MaterialsConfig) -> (Router, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::default());
    let state = AppState {
        storage: backend.clone(),
        repository: backend.clone(),
        settings: Arc::new(settings),
    };
    (routes::router(state), backend)
}

pub fn sample_material() -> Material {
    Material::new(CreateMaterialRequest {
        name: "syllabus.pdf".to_string(),
        file_name: "0b7e.pdf".to_string(),
        file_path: "materials/0b7e.pdf".to_string(),
        size: 1024,
        mime_type: Some("application/pdf".to_string()),
        subject_id: Some(3),
        subject_name: Some("Math".to_string()),
        uploaded_by: Some(9),
        uploaded_by_name: Some("Ana".to_string()),
    })
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        filename: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        field, filename
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Drive one request through the router and decode the JSON body (`Null` when empty)
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
