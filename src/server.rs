//! REST API over the game service.
//!
//! | Method | Path                  | Purpose                         |
//! |--------|-----------------------|---------------------------------|
//! | POST   | `/games`              | start a game                    |
//! | GET    | `/games`              | list game ids                   |
//! | GET    | `/games/{id}`         | game status                     |
//! | POST   | `/games/{id}/guesses` | submit a guess                  |
//! | GET    | `/games/{id}/guesses` | list scored guesses in order    |

use crate::presentation::outcome_message;
use crate::service::{GameService, GameSummary, ServiceError};
use crate::store::{GameId, SessionStore};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strictly_mastermind_rules::{Code, GuessOutcome};
use tracing::{debug, error, info, instrument, warn};

/// Service shared across request handlers.
pub type SharedService<S> = Arc<GameService<S>>;

/// Response for a newly created game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// Id of the new game.
    pub game_id: GameId,
}

/// Response listing every stored game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListResponse {
    /// Ids in creation order.
    pub game_ids: Vec<GameId>,
}

/// Request body for submitting a guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    /// Color names or ordinals, one per peg.
    pub code_guess: Vec<String>,
}

/// Response for a submitted guess.
#[derive(Debug, Clone, Serialize)]
pub struct GuessResponse {
    /// Machine-readable outcome (tagged as `outcome`).
    #[serde(flatten)]
    pub outcome: GuessOutcome,
    /// Human-readable phrasing of the outcome.
    pub message: String,
}

/// One entry of a game's guess log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessView {
    /// One-based turn.
    pub turn: usize,
    /// The guessed code.
    pub code_guess: Code,
    /// Black pegs.
    pub exact_matches: usize,
    /// White pegs.
    pub color_matches: usize,
}

/// HTTP-facing error.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Unknown game.
    #[display("{_0}")]
    NotFound(String),
    /// Malformed request.
    #[display("{_0}")]
    BadRequest(String),
    /// Anything else.
    #[display("{_0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            e if e.is_not_found() => Self::NotFound(err.to_string()),
            ServiceError::InvalidGuess(_) | ServiceError::Evaluate(_) => {
                Self::BadRequest(err.to_string())
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Builds the application router.
#[instrument(skip(service))]
pub fn router<S: SessionStore + 'static>(service: SharedService<S>) -> Router {
    info!("Building game router");
    Router::new()
        .route("/games", post(create_game::<S>).get(list_games::<S>))
        .route("/games/{id}", get(get_game::<S>))
        .route(
            "/games/{id}/guesses",
            post(submit_guess::<S>).get(list_guesses::<S>),
        )
        .with_state(service)
}

/// Runs a service call on the blocking pool; SQLite access is synchronous.
async fn run_blocking<S, T, F>(service: SharedService<S>, call: F) -> Result<T, ApiError>
where
    S: SessionStore + 'static,
    T: Send + 'static,
    F: FnOnce(&GameService<S>) -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|e| ApiError::Internal(format!("Worker task failed: {}", e)))?
        .map_err(ApiError::from)
}

#[instrument(skip(service))]
async fn create_game<S: SessionStore + 'static>(
    State(service): State<SharedService<S>>,
) -> Result<(StatusCode, Json<CreateGameResponse>), ApiError> {
    let game_id = run_blocking(service, |service| service.new_game()).await?;
    info!(game_id, "Game created via API");
    Ok((StatusCode::CREATED, Json(CreateGameResponse { game_id })))
}

#[instrument(skip(service))]
async fn list_games<S: SessionStore + 'static>(
    State(service): State<SharedService<S>>,
) -> Result<Json<GameListResponse>, ApiError> {
    let game_ids = run_blocking(service, |service| service.list_games()).await?;
    Ok(Json(GameListResponse { game_ids }))
}

#[instrument(skip(service, id))]
async fn get_game<S: SessionStore + 'static>(
    State(service): State<SharedService<S>>,
    id: Result<Path<GameId>, PathRejection>,
) -> Result<Json<GameSummary>, ApiError> {
    let Path(id) = id?;
    let summary = run_blocking(service, move |service| service.summary(id)).await?;
    Ok(Json(summary))
}

#[instrument(skip_all)]
async fn submit_guess<S: SessionStore + 'static>(
    State(service): State<SharedService<S>>,
    id: Result<Path<GameId>, PathRejection>,
    request: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessResponse>, ApiError> {
    let Path(id) = id?;
    let Json(request) = request?;
    debug!(game_id = id, code_guess = ?request.code_guess, "Guess received");
    let outcome = run_blocking(service, move |service| {
        service.submit_tokens(id, request.code_guess.as_slice())
    })
    .await?;

    let message = outcome_message(&outcome);
    debug!(game_id = id, %message, "Guess answered");
    Ok(Json(GuessResponse { outcome, message }))
}

#[instrument(skip(service, id))]
async fn list_guesses<S: SessionStore + 'static>(
    State(service): State<SharedService<S>>,
    id: Result<Path<GameId>, PathRejection>,
) -> Result<Json<Vec<GuessView>>, ApiError> {
    let Path(id) = id?;
    let guesses = run_blocking(service, move |service| service.guesses(id)).await?;
    let views = guesses
        .into_iter()
        .enumerate()
        .map(|(i, guess)| GuessView {
            turn: i + 1,
            exact_matches: guess.result().exact_matches(),
            color_matches: guess.result().color_matches(),
            code_guess: guess.code().clone(),
        })
        .collect();
    Ok(Json(views))
}
