/// Session workflow
///
/// One `Session` per user, holding the `WorkflowState` the Presentation layer
/// renders from. State moves through `Idle → Searched → Selected → Paired`,
/// back to `Selected` when the dialog closes, and back to `Searched` on a new
/// search. All mutation goes through the transition methods here; the async
/// orchestrators below are the only suspension points and never hold the
/// session lock across an await. In-flight work is tied to a generation
/// ticket taken when it starts: a result whose ticket is no longer current is
/// discarded, so at most one selection is ever being resolved per session.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CocktailPairing, MovieDetails, MovieSummary};
use crate::services::catalog::CatalogProvider;
use crate::services::pairing::PairingResolver;

pub const MSG_SEARCH_FAILED: &str = "Search failed. Please try again.";

pub type SessionMap = Arc<RwLock<HashMap<Uuid, Session>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Searched,
    Selected,
    Paired,
}

/// Everything the Presentation layer needs to render one session
#[derive(Debug, Default)]
pub struct WorkflowState {
    pub last_query: Option<String>,
    pub last_year: Option<String>,
    pub last_matches: Vec<MovieSummary>,
    pub selected_movie: Option<MovieSummary>,
    pub selected_details: Option<MovieDetails>,
    pub pairing: Option<CocktailPairing>,
    pub dialog_open: bool,
}

pub struct Session {
    pub created_at: DateTime<Utc>,
    state: WorkflowState,
    /// Bumped by every transition that invalidates in-flight selection work
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            state: WorkflowState::default(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.dialog_open && self.state.pairing.is_some() {
            Phase::Paired
        } else if self.state.selected_movie.is_some() {
            Phase::Selected
        } else if self.state.last_query.is_some() {
            Phase::Searched
        } else {
            Phase::Idle
        }
    }

    /// True while the dialog is promised but its pairing has not resolved yet
    pub fn pairing_pending(&self) -> bool {
        self.state.dialog_open && self.state.pairing.is_none()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a completed search, including one with zero matches. Any prior
    /// selection belongs to the old result list and is dropped with it.
    pub fn record_search(&mut self, query: String, year: Option<String>, matches: Vec<MovieSummary>) {
        self.generation += 1;
        self.state.last_query = Some(query);
        self.state.last_year = year;
        self.state.last_matches = matches;
        self.state.selected_movie = None;
        self.state.selected_details = None;
        self.state.pairing = None;
        self.state.dialog_open = false;
    }

    /// A failed search degrades to an empty result set
    pub fn record_search_failure(&mut self, query: String, year: Option<String>) {
        self.record_search(query, year, Vec::new());
    }

    /// Starts a selection: the stale pairing is cleared here, before any
    /// fetch begins, and the dialog is promised. Returns the ticket that the
    /// eventual completion must present.
    pub fn begin_selection(&mut self, summary: MovieSummary) -> u64 {
        self.generation += 1;
        self.state.pairing = None;
        self.state.selected_details = None;
        self.state.selected_movie = Some(summary);
        self.state.dialog_open = true;
        self.generation
    }

    /// Applies fetched details and the resolved pairing. A stale ticket means
    /// the selection was superseded while the fetch was in flight; the late
    /// result is discarded and `false` returned.
    pub fn complete_selection(
        &mut self,
        ticket: u64,
        details: MovieDetails,
        pairing: CocktailPairing,
    ) -> bool {
        if ticket != self.generation {
            return false;
        }
        self.state.selected_details = Some(details);
        self.state.pairing = Some(pairing);
        self.state.dialog_open = true;
        true
    }

    /// Applies a standalone pairing resolution under the same ticket
    /// discipline, re-opening the dialog.
    pub fn apply_pairing(&mut self, ticket: u64, pairing: CocktailPairing) -> bool {
        if ticket != self.generation {
            return false;
        }
        self.state.pairing = Some(pairing);
        self.state.dialog_open = true;
        true
    }

    /// Valid only from `Paired`: clears the pairing and the dialog, keeps the
    /// selection so re-selecting re-runs fetch and resolution. Idempotent.
    pub fn close_dialog(&mut self) -> bool {
        if self.phase() != Phase::Paired {
            return false;
        }
        self.state.pairing = None;
        self.state.dialog_open = false;
        true
    }

    /// Title the pairing should be resolved from: fetched details when
    /// present, the selected summary otherwise.
    pub fn pairing_title(&self) -> Option<&str> {
        self.state
            .selected_details
            .as_ref()
            .map(|d| d.title.as_str())
            .or_else(|| self.state.selected_movie.as_ref().map(|m| m.title.as_str()))
    }
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("No session {}", session_id))
}

/// submitSearch: catalog search with explicit case analysis. An unavailable
/// catalog degrades to an empty result set plus a user-visible notice rather
/// than failing the transition.
pub async fn run_search(
    sessions: &SessionMap,
    session_id: Uuid,
    catalog: &dyn CatalogProvider,
    title: String,
    year: Option<String>,
) -> AppResult<Option<&'static str>> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search title cannot be empty".to_string(),
        ));
    }

    if !sessions.read().await.contains_key(&session_id) {
        return Err(session_not_found(session_id));
    }

    let result = catalog.search(&title, year.as_deref()).await;

    let mut sessions = sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    match result {
        Ok(matches) => {
            session.record_search(title, year, matches);
            Ok(None)
        }
        Err(e) if e.is_catalog_unavailable() => {
            tracing::warn!(error = %e, "Catalog search failed, degrading to empty result set");
            session.record_search_failure(title, year);
            Ok(Some(MSG_SEARCH_FAILED))
        }
        Err(e) => Err(e),
    }
}

/// selectMovie: begins the selection synchronously, then fetches details
/// (degrading to the summary's fields when the catalog fails) and resolves
/// the pairing. The completion is applied only if the selection is still the
/// current one.
pub async fn run_selection(
    sessions: &SessionMap,
    session_id: Uuid,
    catalog: &dyn CatalogProvider,
    resolver: &dyn PairingResolver,
    movie_id: &str,
) -> AppResult<()> {
    let (summary, ticket) = {
        let mut sessions = sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;

        let summary = session
            .state()
            .last_matches
            .iter()
            .find(|m| m.id == movie_id)
            .cloned()
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Movie {} is not in the current result list",
                    movie_id
                ))
            })?;

        let ticket = session.begin_selection(summary.clone());
        (summary, ticket)
    };

    let details = match catalog.get_details(&summary.id).await {
        Ok(details) => details,
        Err(e) if e.is_catalog_unavailable() => {
            tracing::warn!(
                movie_id = %summary.id,
                error = %e,
                "Details fetch failed, falling back to search summary"
            );
            MovieDetails::from(&summary)
        }
        Err(e) => return Err(e),
    };

    let pairing = resolver.resolve(&details.title).await;
    tracing::info!(
        movie = %details.title,
        cocktail = %pairing.name,
        resolver = resolver.name(),
        "Pairing resolved"
    );

    let mut sessions = sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    if !session.complete_selection(ticket, details, pairing) {
        tracing::debug!(movie_id = %movie_id, "Discarding superseded selection result");
    }

    Ok(())
}

/// resolvePairing: idempotent explicit resolution. A pairing that is already
/// set is returned as-is; nothing is re-fetched.
pub async fn run_resolve(
    sessions: &SessionMap,
    session_id: Uuid,
    resolver: &dyn PairingResolver,
) -> AppResult<()> {
    let (title, ticket) = {
        let sessions = sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;

        if session.state().pairing.is_some() {
            return Ok(());
        }

        let title = session
            .pairing_title()
            .ok_or_else(|| AppError::InvalidInput("No movie selected".to_string()))?
            .to_string();
        (title, session.generation())
    };

    let pairing = resolver.resolve(&title).await;

    let mut sessions = sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    session.apply_pairing(ticket, pairing);

    Ok(())
}

/// closeDialog
pub async fn run_close_dialog(sessions: &SessionMap, session_id: Uuid) -> AppResult<bool> {
    let mut sessions = sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(session.close_dialog())
}
