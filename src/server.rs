//! HTTP server: the browser page plus a small JSON API over sessions.

use crate::config::ServerConfig;
use crate::session::{
    COMPUTER_MARK, GameMode, GameSession, HUMAN_MARK, Scoreboard, SessionError, SessionManager,
};
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use noughts_rules::{Mark, Outcome, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    sessions: SessionManager,
    default_mode: GameMode,
    advisor_delay: Duration,
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Builds handler state from a config.
    #[instrument(skip(sessions))]
    pub fn new(sessions: SessionManager, config: &ServerConfig) -> Self {
        let rng = match config.advisor_seed() {
            Some(seed) => {
                info!(seed, "Advisor RNG seeded");
                StdRng::seed_from_u64(*seed)
            }
            None => StdRng::from_os_rng(),
        };
        Self {
            sessions,
            default_mode: *config.default_mode(),
            advisor_delay: config.advisor_delay(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

/// Request body for creating a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Mode for the new session; the configured default when absent.
    #[serde(default)]
    pub mode: Option<GameMode>,
}

/// Request body for a human move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Cell index, 0 = top-left through 8 = bottom-right.
    pub position: usize,
}

/// Request body for switching mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRequest {
    /// New mode.
    pub mode: GameMode,
}

/// Outcome as the browser sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeView {
    /// Round still running.
    InProgress,
    /// A mark completed a line.
    Win {
        /// Winning mark.
        mark: Mark,
        /// Indices of the winning cells.
        line: [usize; 3],
    },
    /// Board full, no line.
    Draw,
}

impl From<Outcome> for OutcomeView {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::InProgress => OutcomeView::InProgress,
            Outcome::Win { mark, line } => OutcomeView::Win {
                mark,
                line: line.indices(),
            },
            Outcome::Draw => OutcomeView::Draw,
        }
    }
}

/// Session snapshot returned by every API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Session ID.
    pub id: String,
    /// Cells in index order; `null` for empty.
    pub cells: Vec<Option<Mark>>,
    /// Mark to move next.
    pub to_move: Mark,
    /// Current mode.
    pub mode: GameMode,
    /// Human's mark in computer mode.
    pub human_mark: Option<Mark>,
    /// Computer's mark in computer mode.
    pub computer_mark: Option<Mark>,
    /// Scores since the last reset.
    pub scores: Scoreboard,
    /// Current round's outcome.
    pub outcome: OutcomeView,
    /// True while the computer's reply is scheduled.
    pub advisor_pending: bool,
    /// Round counter.
    pub round: u64,
}

impl From<&GameSession> for SessionView {
    fn from(session: &GameSession) -> Self {
        let computer_mark = session.mode().computer_mark();
        Self {
            id: session.id().clone(),
            cells: session.board().cells().iter().map(|c| c.mark()).collect(),
            to_move: *session.to_move(),
            mode: *session.mode(),
            human_mark: computer_mark.map(|_| HUMAN_MARK),
            computer_mark,
            scores: *session.scores(),
            outcome: (*session.outcome()).into(),
            advisor_pending: *session.advisor_pending(),
            round: *session.round(),
        }
    }
}

/// An error rendered as `{"error": "..."}` with a status code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}: {}", status, message)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    fn session_not_found(id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Session {} not found", id),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<noughts_rules::RulesError> for ApiError {
    fn from(err: noughts_rules::RulesError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

type ApiResult = Result<Json<SessionView>, ApiError>;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/moves", post(make_move))
        .route("/api/sessions/{id}/rounds", post(new_round))
        .route("/api/sessions/{id}/mode", put(set_mode))
        .route("/api/sessions/{id}/scores", delete(reset_scores))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl+C.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let sessions =
        SessionManager::with_limits(config.session_idle_timeout(), *config.max_sessions());
    let state = AppState::new(sessions, &config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/",
        config.host(),
        config.port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state, payload))]
async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let mode = req.mode.unwrap_or(state.default_mode);
    let id = state.sessions.create_session(mode);
    view(&state, &id)
}

#[instrument(skip(state))]
async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    view(&state, &id)
}

#[instrument(skip(state))]
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove_session(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::session_not_found(&id))
}

#[instrument(skip(state, payload))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let position = Position::try_from(req.position)?;

    let (outcome, pending, round) = state
        .sessions
        .with_session(&id, |session| {
            session
                .play(position)
                .map(|outcome| (outcome, *session.advisor_pending(), *session.round()))
        })
        .ok_or_else(|| ApiError::session_not_found(&id))??;

    info!(session_id = %id, %position, ?outcome, "Human move accepted");

    if pending {
        schedule_advisor(state.clone(), id.clone(), round);
    }
    view(&state, &id)
}

#[instrument(skip(state))]
async fn new_round(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .sessions
        .with_session(&id, GameSession::new_round)
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    view(&state, &id)
}

#[instrument(skip(state, payload))]
async fn set_mode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ModeRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    state
        .sessions
        .with_session(&id, |session| session.set_mode(req.mode))
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    view(&state, &id)
}

#[instrument(skip(state))]
async fn reset_scores(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .sessions
        .with_session(&id, GameSession::reset_scores)
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    view(&state, &id)
}

fn view(state: &AppState, id: &str) -> ApiResult {
    state
        .sessions
        .get_session(id)
        .map(|session| Json(SessionView::from(&session)))
        .ok_or_else(|| ApiError::session_not_found(id))
}

/// Plays the computer's reply after the display delay.
///
/// The move is dropped if the session moved on to another round meanwhile.
fn schedule_advisor(state: AppState, id: String, round: u64) {
    debug!(session_id = %id, round, delay = ?state.advisor_delay, "Scheduling computer move");
    tokio::spawn(async move {
        tokio::time::sleep(state.advisor_delay).await;

        let result = state.sessions.with_session(&id, |session| {
            if *session.round() != round || !*session.advisor_pending() {
                debug!(session_id = %id, round, "Dropping stale computer move");
                return None;
            }
            let mut rng = state.rng.lock().unwrap_or_else(PoisonError::into_inner);
            Some(session.play_advisor(&mut *rng))
        });

        match result {
            Some(Some(Ok(advice))) => info!(
                session_id = %id,
                mark = %COMPUTER_MARK,
                position = %advice.position,
                rule = %advice.rule,
                "Computer moved"
            ),
            Some(Some(Err(e))) => warn!(session_id = %id, error = %e, "Computer move failed"),
            Some(None) => {}
            None => debug!(session_id = %id, "Session gone before computer moved"),
        }
    });
}
