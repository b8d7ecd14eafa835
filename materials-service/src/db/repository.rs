use async_trait::async_trait;
use reqwest::header::ACCEPT;
use shared::{BackendError, BackendResult};

use super::MaterialRepository;
use crate::models::Material;
use crate::supabase::{check, SupabaseClient};

/// Media type asking PostgREST for a single object instead of an array
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// PostgREST answers 406 with this code when a single-object request matches zero or many rows
const NO_SINGLE_ROW: &str = "PGRST116";

/// Metadata rows stored in a Supabase table, reached through PostgREST
pub struct PostgrestRepository {
    client: SupabaseClient,
    table: String,
}

impl PostgrestRepository {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn table_url(&self) -> BackendResult<reqwest::Url> {
        self.client.endpoint(["rest", "v1", self.table.as_str()])
    }
}

fn id_filter(id: &str) -> String {
    format!("eq.{}", id)
}

/// Only the "no single row" outcome counts as a missing material
fn single_row_error(err: BackendError) -> BackendError {
    match err {
        BackendError::Api { status: 406, message } => BackendError::NotFound(message),
        BackendError::Api { message, .. } if message.contains(NO_SINGLE_ROW) => {
            BackendError::NotFound(message)
        }
        other => other,
    }
}

#[async_trait]
impl MaterialRepository for PostgrestRepository {
    async fn insert(&self, material: &Material) -> BackendResult<Material> {
        let response = self
            .client
            .http()
            .post(self.table_url()?)
            .header("Prefer", "return=representation")
            .json(&[material])
            .send()
            .await?;

        let rows: Vec<Material> = check(response).await?.json().await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no rows".to_string()))?;

        tracing::info!("Created material record: id={}", row.id);
        Ok(row)
    }

    async fn list(&self) -> BackendResult<Vec<Material>> {
        let response = self
            .client
            .http()
            .get(self.table_url()?)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let rows: Vec<Material> = check(response).await?.json().await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> BackendResult<Material> {
        let response = self
            .client
            .http()
            .get(self.table_url()?)
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&[("select", "*".to_string()), ("id", id_filter(id))])
            .send()
            .await?;

        match check(response).await {
            Ok(response) => Ok(response.json().await?),
            Err(e) => Err(single_row_error(e)),
        }
    }

    async fn delete(&self, id: &str) -> BackendResult<()> {
        let response = self
            .client
            .http()
            .delete(self.table_url()?)
            .query(&[("id", id_filter(id))])
            .send()
            .await?;
        check(response).await?;

        tracing::info!("Deleted material record: id={}", id);
        Ok(())
    }
}
