/// External pairing service client
///
/// Alternate `PairingResolver` selected via `PAIRING_SERVICE_URL`. Speaks the
/// pairing microservice's POST /pairing contract and falls back to the local
/// table on any failure, so resolution stays total.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::models::CocktailPairing;
use crate::services::pairing::{table, PairingResolver};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PairingEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    cocktail: Option<PairingRecord>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct PairingRecord {
    name: String,
    #[serde(default)]
    ingredients: Vec<String>,
}

impl PairingEnvelope {
    fn into_pairing(self) -> Option<CocktailPairing> {
        if !self.success {
            return None;
        }
        let record = self.cocktail?;
        Some(CocktailPairing {
            name: record.name,
            recipe: record.ingredients,
            why: self.explanation,
        })
    }
}

#[derive(Clone)]
pub struct RemotePairingResolver {
    http_client: HttpClient,
    base_url: String,
}

impl RemotePairingResolver {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    async fn fetch(&self, title: &str) -> Result<Option<CocktailPairing>, reqwest::Error> {
        let url = format!("{}/pairing", self.base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({ "movie": title }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: PairingEnvelope = response.json().await?;
        Ok(envelope.into_pairing())
    }
}

#[async_trait::async_trait]
impl PairingResolver for RemotePairingResolver {
    async fn resolve(&self, title: &str) -> CocktailPairing {
        match self.fetch(title).await {
            Ok(Some(pairing)) => pairing,
            Ok(None) => {
                tracing::debug!(
                    title = %title,
                    "Pairing service had no recommendation, using local table"
                );
                table::pairing_for_title(title)
            }
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    error = %e,
                    "Pairing service unavailable, using local table"
                );
                table::pairing_for_title(title)
            }
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
