use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::SupabaseConfig;
use crate::post::TelegramPost;

/// Append-only sink for ingested posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: &TelegramPost) -> Result<()>;
}

/// Writes rows through the Supabase PostgREST endpoint (`/rest/v1/<table>`).
pub struct SupabaseStore {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }
}

#[async_trait]
impl PostStore for SupabaseStore {
    async fn insert(&self, post: &TelegramPost) -> Result<()> {
        let url = self.table_url();

        debug!("Inserting into Supabase: {}", url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.service_role_key),
            )
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(post)
            .send()
            .await
            .context("Failed to send insert request to Supabase")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Supabase insert error ({}) on table {}: {}",
                status,
                self.config.table,
                error_body
            );
        }

        Ok(())
    }
}
