use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{CocktailPairing, MovieDetails, MovieSummary};
use crate::services::workflow::{self, Phase, Session};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Catalog ID of a movie from the current result list
    pub id: String,
}

/// Full session snapshot; every mutating endpoint returns it so the frontend
/// renders from one document.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    pub last_query: Option<String>,
    pub last_year: Option<String>,
    pub matches: Vec<MovieSummary>,
    pub selected_movie: Option<MovieSummary>,
    pub selected_details: Option<MovieDetails>,
    pub pairing: Option<CocktailPairing>,
    pub dialog_open: bool,
    pub pairing_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SessionView {
    fn render(session_id: Uuid, session: &Session, notice: Option<&str>) -> Self {
        let state = session.state();
        Self {
            session_id,
            created_at: session.created_at,
            phase: session.phase(),
            last_query: state.last_query.clone(),
            last_year: state.last_year.clone(),
            matches: state.last_matches.clone(),
            selected_movie: state.selected_movie.clone(),
            selected_details: state.selected_details.clone(),
            pairing: state.pairing.clone(),
            dialog_open: state.dialog_open,
            pairing_pending: session.pairing_pending(),
            notice: notice.map(str::to_string),
        }
    }
}

async fn view(
    state: &AppState,
    session_id: Uuid,
    notice: Option<&str>,
) -> AppResult<Json<SessionView>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("No session {}", session_id)))?;
    Ok(Json(SessionView::render(session_id, session, notice)))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Open a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session_id = Uuid::new_v4();
    let session = Session::new();
    let response = SessionView::render(session_id, &session, None);

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id, session);

    tracing::info!(session_id = %session_id, "Session created");

    (StatusCode::CREATED, Json(response))
}

/// Current session snapshot
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    view(&state, session_id, None).await
}

/// Discard a session and all of its state
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let removed = state.sessions.write().await.remove(&session_id);
    if removed.is_none() {
        return Err(AppError::NotFound(format!("No session {}", session_id)));
    }
    tracing::info!(session_id = %session_id, "Session discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// submitSearch
pub async fn submit_search(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SessionView>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        title = %request.title,
        "Processing search"
    );

    let catalog = state.catalog()?;
    let notice = workflow::run_search(
        &state.sessions,
        session_id,
        catalog.as_ref(),
        request.title,
        request.year,
    )
    .await?;

    view(&state, session_id, notice).await
}

/// selectMovie
pub async fn select_movie(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SelectRequest>,
) -> AppResult<Json<SessionView>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        movie_id = %request.id,
        "Processing selection"
    );

    let catalog = state.catalog()?;
    workflow::run_selection(
        &state.sessions,
        session_id,
        catalog.as_ref(),
        state.resolver().as_ref(),
        &request.id,
    )
    .await?;

    view(&state, session_id, None).await
}

/// resolvePairing (idempotent re-invoke)
pub async fn resolve_pairing(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    workflow::run_resolve(&state.sessions, session_id, state.resolver().as_ref()).await?;
    view(&state, session_id, None).await
}

/// closeDialog
pub async fn close_dialog(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    workflow::run_close_dialog(&state.sessions, session_id).await?;
    view(&state, session_id, None).await
}
