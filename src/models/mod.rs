use serde::{Deserialize, Serialize};

/// One search result from the catalog, as shown in the result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Catalog identifier (e.g., "tt0034583"), unique per title
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<String>,
}

/// Full record for a selected movie.
///
/// Produced by a details fetch, or degraded from a `MovieSummary` when the
/// fetch fails (title, year and poster carried over, everything else absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub plot: Option<String>,
    pub director: Option<String>,
    pub runtime: Option<String>,
    pub poster: Option<String>,
}

impl From<&MovieSummary> for MovieDetails {
    fn from(summary: &MovieSummary) -> Self {
        Self {
            title: summary.title.clone(),
            year: summary.year.clone(),
            genre: None,
            plot: None,
            director: None,
            runtime: None,
            poster: summary.poster.clone(),
        }
    }
}

/// A cocktail recommendation paired with a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocktailPairing {
    pub name: String,
    /// Ingredient lines, in pour order
    pub recipe: Vec<String>,
    /// Free-text rationale for the pairing
    pub why: String,
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// OMDb uses the literal string "N/A" (and occasionally the empty string) as
/// its missing-value sentinel.
fn clean(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

/// Raw search response envelope from OMDb
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchResult>,
}

impl OmdbSearchResponse {
    /// A non-success envelope means zero results, not an error
    pub fn is_success(&self) -> bool {
        self.response == "True"
    }
}

/// One raw search record from OMDb
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResult {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl From<OmdbSearchResult> for MovieSummary {
    fn from(result: OmdbSearchResult) -> Self {
        Self {
            id: result.imdb_id,
            title: result.title,
            year: clean(result.year),
            poster: clean(result.poster),
        }
    }
}

/// Raw by-ID response from OMDb
///
/// On `Response == "False"` the record fields are absent and `error` carries
/// the upstream message (e.g., "Movie not found!").
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbDetailsResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl OmdbDetailsResponse {
    pub fn is_success(&self) -> bool {
        self.response == "True"
    }
}

impl From<OmdbDetailsResponse> for MovieDetails {
    fn from(record: OmdbDetailsResponse) -> Self {
        Self {
            title: record.title.unwrap_or_default(),
            year: clean(record.year),
            genre: clean(record.genre),
            plot: clean(record.plot),
            director: clean(record.director),
            runtime: clean(record.runtime),
            poster: clean(record.poster),
        }
    }
}
