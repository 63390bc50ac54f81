use serde::Deserialize;

/// Secrets-file keys checked, in order, before the environment fallback.
const SECRETS_OMDB_KEY: &str = "omdb_api_key";
const SECRETS_OMDB_KEY_ALT: &str = "OMDB_API_KEY";
const SECRETS_SECTION: &str = "omdb";
const SECRETS_SECTION_KEY: &str = "api_key";
const ENV_OMDB_KEY: &str = "OMDB_API_KEY";

pub const MSG_API_KEY_MISSING: &str =
    "OMDb API key not configured. Add it to the secrets file as omdb_api_key or [omdb] api_key, \
     or set the OMDB_API_KEY environment variable.";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Path to the TOML secrets file holding the OMDb API key
    #[serde(default = "default_secrets_path")]
    pub secrets_path: String,

    /// Base URL of an external pairing service. When set, it takes precedence
    /// over the built-in pairing table (falling back to it on failure).
    pub pairing_service_url: Option<String>,

    /// TTL for memoized search results, in seconds
    #[serde(default = "default_search_cache_ttl_secs")]
    pub search_cache_ttl_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_secrets_path() -> String {
    "secrets.toml".to_string()
}

fn default_search_cache_ttl_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

/// Resolves the OMDb API key.
///
/// Order: `omdb_api_key` in the secrets file, then `OMDB_API_KEY` in the
/// secrets file, then `[omdb] api_key`, then the `OMDB_API_KEY` environment
/// variable. Returns `None` when no source provides a key; the search
/// endpoint reports that as a configuration error.
pub fn resolve_omdb_api_key(secrets_path: &str) -> Option<String> {
    if let Some(key) = key_from_secrets_file(secrets_path) {
        return Some(key);
    }
    std::env::var(ENV_OMDB_KEY).ok()
}

fn key_from_secrets_file(secrets_path: &str) -> Option<String> {
    let raw = std::fs::read_to_string(secrets_path).ok()?;
    let doc: toml::Table = match raw.parse() {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %secrets_path, error = %e, "Ignoring unparseable secrets file");
            return None;
        }
    };

    for key in [SECRETS_OMDB_KEY, SECRETS_OMDB_KEY_ALT] {
        if let Some(value) = doc.get(key).and_then(|v| v.as_str()) {
            return Some(value.to_string());
        }
    }

    doc.get(SECRETS_SECTION)
        .and_then(|section| section.get(SECRETS_SECTION_KEY))
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
}
