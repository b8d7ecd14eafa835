//! Authenticated HTTP access to a Supabase project
//!
//! Storage and PostgREST both accept the project key twice: as `apikey`
//! and as a bearer token. The same `reqwest::Client` (and its connection
//! pool) is shared by every caller.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use shared::BackendError;
use std::time::Duration;
use tracing::debug;

use crate::config::SupabaseConfig;

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.anon_key)
            .context("SUPABASE_ANON_KEY contains invalid header characters")?;
        key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))
            .context("SUPABASE_ANON_KEY contains invalid header characters")?;
        bearer.set_sensitive(true);
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(config.url.trim_end_matches('/'))
            .with_context(|| format!("Invalid SUPABASE_URL: {}", config.url))?;

        Ok(Self { http, base_url })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `<project>/<segments...>` with every segment percent-encoded
    pub fn endpoint<'a, I>(&self, segments: I) -> Result<Url, BackendError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Absolute URL for a path the storage API returned relative to `/storage/v1`
    pub fn storage_url(&self, relative: &str) -> String {
        format!(
            "{}/storage/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

/// Pass successful responses through, turn everything else into a `BackendError`
pub async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Backend call failed: {} - {}", status, body);
    Err(BackendError::from_response(status.as_u16(), &body))
}
