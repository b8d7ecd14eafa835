/// Configuration for the materials service
///
/// Everything is read from environment variables (a `.env` file is loaded
/// first if present). Only the Supabase endpoint and key are required.

use anyhow::{bail, Context, Result};
use shared::observability::{LogFormat, LogLevel};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub materials: MaterialsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            supabase: SupabaseConfig::from_env()?,
            materials: MaterialsConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.supabase.validate()?;
        self.materials.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8888".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Connection settings for the hosted storage + database platform
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub bucket: String,
    pub table: String,
    pub timeout_seconds: u64,
}

impl SupabaseConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?,
            anon_key: env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY must be set")?,
            bucket: env::var("MATERIALS_BUCKET").unwrap_or_else(|_| "eml-materials".to_string()),
            table: env::var("MATERIALS_TABLE").unwrap_or_else(|_| "materials".to_string()),
            timeout_seconds: env::var("BACKEND_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid BACKEND_TIMEOUT_SECONDS")?,
        })
    }

    fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            bail!("SUPABASE_URL must be an http(s) URL, got '{}'", self.url);
        }
        if self.anon_key.trim().is_empty() {
            tracing::warn!("SUPABASE_ANON_KEY is empty; backend calls will be rejected");
        }
        if self.bucket.is_empty() || self.table.is_empty() {
            bail!("Bucket and table names must not be empty");
        }
        if self.timeout_seconds == 0 {
            bail!("BACKEND_TIMEOUT_SECONDS must be greater than zero");
        }
        Ok(())
    }
}

/// Settings the request handlers read on every call
#[derive(Debug, Clone)]
pub struct MaterialsConfig {
    /// Folder inside the bucket that receives uploads
    pub prefix: String,
    pub max_upload_bytes: usize,
    pub signed_url_ttl_seconds: u64,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            prefix: "materials".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            signed_url_ttl_seconds: 300,
        }
    }
}

impl MaterialsConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            prefix: env::var("MATERIALS_PREFIX").unwrap_or(defaults.prefix),
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v.parse().context("Invalid MAX_UPLOAD_BYTES")?,
                Err(_) => defaults.max_upload_bytes,
            },
            signed_url_ttl_seconds: match env::var("SIGNED_URL_TTL_SECONDS") {
                Ok(v) => v.parse().context("Invalid SIGNED_URL_TTL_SECONDS")?,
                Err(_) => defaults.signed_url_ttl_seconds,
            },
        })
    }

    fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() || self.prefix.contains('/') {
            bail!("MATERIALS_PREFIX must be a single non-empty path segment");
        }
        if self.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.signed_url_ttl_seconds == 0 {
            bail!("SIGNED_URL_TTL_SECONDS must be greater than zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LoggingConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()?,
            format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()?,
        })
    }
}
