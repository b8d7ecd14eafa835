/// Supabase Storage client for material blobs
///
/// Talks to the Storage REST API of the configured project:
/// - `POST   /storage/v1/object/{bucket}/{path}` to upload
/// - `DELETE /storage/v1/object/{bucket}` to remove a batch of objects
/// - `POST   /storage/v1/object/sign/{bucket}/{path}` to mint a signed URL

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use shared::{BackendError, BackendResult};
use tracing::{debug, info};

use super::ObjectStorage;
use crate::supabase::{check, SupabaseClient};

pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        info!("Initializing storage client for bucket: {}", bucket);
        Self { client, bucket }
    }

    fn object_segments<'a>(&'a self, action: &'a [&'a str], path: &'a str) -> Vec<&'a str> {
        let mut segments = vec!["storage", "v1"];
        segments.extend_from_slice(action);
        segments.push(&self.bucket);
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        segments
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> BackendResult<()> {
        debug!("Uploading object: {} ({} bytes)", path, data.len());

        let url = self.client.endpoint(self.object_segments(&["object"], path))?;
        let response = self
            .client
            .http()
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;
        check(response).await?;

        info!("Object uploaded successfully: {}", path);
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> BackendResult<()> {
        debug!("Removing objects: {:?}", paths);

        let url = self.client.endpoint(["storage", "v1", "object", self.bucket.as_str()])?;
        let response = self
            .client
            .http()
            .delete(url)
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await?;
        check(response).await?;

        info!("Removed {} object(s) from {}", paths.len(), self.bucket);
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expires_in: u64) -> BackendResult<String> {
        let url = self.client.endpoint(self.object_segments(&["object", "sign"], path))?;
        let response = self
            .client
            .http()
            .post(url)
            .json(&SignRequest { expires_in })
            .send()
            .await?;

        let signed: SignResponse = check(response).await?.json().await?;
        if signed.signed_url.is_empty() {
            return Err(BackendError::Decode("storage returned an empty signed URL".to_string()));
        }

        debug!("Signed URL created for {} (expires in {}s)", path, expires_in);
        Ok(self.client.storage_url(&signed.signed_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupabaseConfig;

    fn storage() -> SupabaseStorage {
        let client = SupabaseClient::new(&SupabaseConfig {
            url: "https://project.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            bucket: "eml-materials".to_string(),
            table: "materials".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        SupabaseStorage::new(client, "eml-materials")
    }

    #[test]
    fn test_object_segments() {
        let storage = storage();
        assert_eq!(
            storage.object_segments(&["object", "sign"], "materials/x.pdf"),
            vec!["storage", "v1", "object", "sign", "eml-materials", "materials", "x.pdf"]
        );
    }

    #[test]
    fn test_sign_request_shape() {
        let body = serde_json::to_value(SignRequest { expires_in: 300 }).unwrap();
        assert_eq!(body, serde_json::json!({"expiresIn": 300}));
    }

    #[test]
    fn test_sign_response_accepts_both_spellings() {
        let a: SignResponse = serde_json::from_str(r#"{"signedURL":"/object/sign/a"}"#).unwrap();
        let b: SignResponse = serde_json::from_str(r#"{"signedUrl":"/object/sign/b"}"#).unwrap();
        assert_eq!(a.signed_url, "/object/sign/a");
        assert_eq!(b.signed_url, "/object/sign/b");
    }
}
