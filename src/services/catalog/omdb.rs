/// OMDb catalog client
///
/// Both operations are plain GETs against one base URL, distinguished by
/// query parameters: `s` (plus `type=movie` and optional `y`) for search,
/// `i` (plus `plot=short`) for details. The envelope carries its own
/// success flag separate from the HTTP status.
use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{MovieDetails, MovieSummary, OmdbDetailsResponse, OmdbSearchResponse},
    services::catalog::CatalogProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct OmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    search_ttl: u64,
}

impl OmdbCatalog {
    pub fn new(cache: Cache, api_key: String, api_url: String, search_ttl: u64) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
            search_ttl,
        }
    }
}

/// A year is only forwarded upstream when it is plausibly one; anything
/// non-numeric is treated as if no year was supplied.
fn normalize_year(year: Option<&str>) -> Option<&str> {
    year.filter(|y| !y.is_empty() && y.chars().all(|c| c.is_ascii_digit()))
}

#[async_trait::async_trait]
impl CatalogProvider for OmdbCatalog {
    async fn search<'a>(&self, title: &str, year: Option<&'a str>) -> AppResult<Vec<MovieSummary>> {
        if title.trim().is_empty() {
            return Ok(Vec::new());
        }

        let year = normalize_year(year);
        let key = CacheKey::Search {
            title: title.to_string(),
            year: year.map(str::to_string),
        };

        cached!(self.cache, key, self.search_ttl, async move {
            let mut params = vec![("s", title), ("type", "movie"), ("apikey", self.api_key.as_str())];
            if let Some(y) = year {
                params.push(("y", y));
            }

            let response = self
                .http_client
                .get(&self.api_url)
                .timeout(REQUEST_TIMEOUT)
                .query(&params)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(AppError::CatalogUnavailable(format!(
                    "OMDb returned status {}",
                    status
                )));
            }

            let envelope: OmdbSearchResponse = response.json().await?;
            if !envelope.is_success() {
                // "False" with an error like "Movie not found!" is a genuine
                // zero-match search, not an outage
                return Ok(Vec::new());
            }

            let matches: Vec<MovieSummary> =
                envelope.search.into_iter().map(MovieSummary::from).collect();

            tracing::info!(
                title = %title,
                results = matches.len(),
                provider = "omdb",
                "Movie search completed"
            );

            Ok(matches)
        })
    }

    async fn get_details(&self, id: &str) -> AppResult<MovieDetails> {
        if id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Movie id cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("i", id), ("plot", "short"), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::CatalogUnavailable(format!(
                "OMDb returned status {}",
                status
            )));
        }

        let record: OmdbDetailsResponse = response.json().await?;
        if !record.is_success() {
            let reason = record
                .error
                .unwrap_or_else(|| format!("no catalog record for {}", id));
            return Err(AppError::NotFound(reason));
        }

        tracing::info!(id = %id, provider = "omdb", "Movie details fetched");

        Ok(MovieDetails::from(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> OmdbCatalog {
        // Unroutable URL: any attempted network call fails loudly
        OmdbCatalog::new(
            Cache::new(),
            "test_key".to_string(),
            "http://127.0.0.1:9/".to_string(),
            60,
        )
    }

    #[test]
    fn test_normalize_year_numeric() {
        assert_eq!(normalize_year(Some("1942")), Some("1942"));
    }

    #[test]
    fn test_normalize_year_non_numeric_ignored() {
        assert_eq!(normalize_year(Some("abc")), None);
        assert_eq!(normalize_year(Some("19x2")), None);
        assert_eq!(normalize_year(Some("")), None);
    }

    #[test]
    fn test_normalize_year_absent() {
        assert_eq!(normalize_year(None), None);
    }

    #[tokio::test]
    async fn test_empty_title_short_circuits_without_network() {
        let catalog = create_test_catalog();

        let matches = catalog.search("", Some("1999")).await.unwrap();
        assert!(matches.is_empty());

        let matches = catalog.search("   ", None).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_empty_id_is_invalid_input() {
        let catalog = create_test_catalog();

        let result = catalog.get_details("").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_non_numeric_year_shares_cache_key_with_no_year() {
        let with_junk_year = CacheKey::Search {
            title: "Inception".to_string(),
            year: normalize_year(Some("abc")).map(str::to_string),
        };
        let without_year = CacheKey::Search {
            title: "Inception".to_string(),
            year: None,
        };
        assert_eq!(with_junk_year.to_string(), without_year.to_string());
    }
}
