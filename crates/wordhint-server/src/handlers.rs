//! Request handlers
//!
//! Each game request resolves the session id, runs its whole read-modify-write
//! inside one [`SessionStore::update`] call, then renders outside the lock.

use crate::error::{FormTooLarge, GuessRejected, InvalidHeader, RenderFailed};
use crate::render::{self, IndexPage};
use chrono::Utc;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::{InvalidHeaderValue, SET_COOKIE};
use warp::http::{HeaderValue, StatusCode};
use warp::reply::Response;
use warp::{Rejection, Reply};
use wordhint_core::{GameView, GuessError, ResolvedSessionId, SessionStore};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session_id";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<SessionStore>,
}

impl AppState {
    /// Create state over a session store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Session store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}

/// Body of `POST /game`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuessForm {
    #[serde(default)]
    pub guess: String,
}

/// `Set-Cookie` value for a newly assigned session id
#[must_use]
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/")
}

/// Resolve the session, optionally apply a guess, and build the view
///
/// The resolved id is returned even when the guess is rejected.
fn play(
    store: &SessionStore,
    cookie: Option<&str>,
    guess: Option<&str>,
) -> (ResolvedSessionId, Result<GameView, GuessError>) {
    let now = Utc::now();
    let mut rng = rand::rng();
    let resolved = store.resolve_session_id(cookie, now, &mut rng);
    let config = store.config();

    let view = store.update(&resolved.id, now, &mut rng, |session| {
        if let Some(guess) = guess {
            let outcome = session.submit_guess(guess, config)?;
            tracing::debug!(session_id = %resolved.id, ?outcome, "Guess applied");
        }
        session.mark_rendered();
        Ok::<_, GuessError>(session.view(config))
    });

    (resolved, view)
}

fn assigned_cookie(
    resolved: &ResolvedSessionId,
) -> Result<Option<HeaderValue>, InvalidHeaderValue> {
    if !resolved.assigned {
        return Ok(None);
    }
    HeaderValue::from_str(&session_cookie(resolved.id.as_str())).map(Some)
}

fn with_session_cookie(
    mut response: Response,
    resolved: &ResolvedSessionId,
) -> Result<Response, Rejection> {
    let cookie = assigned_cookie(resolved)
        .map_err(|e| warp::reject::custom(InvalidHeader(e.to_string())))?;
    if let Some(value) = cookie {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    Ok(response)
}

fn resolve_view(
    store: &SessionStore,
    cookie: Option<String>,
    guess: Option<&str>,
) -> Result<(ResolvedSessionId, GameView), Rejection> {
    let (resolved, view) = play(store, cookie.as_deref(), guess);
    match view {
        Ok(view) => Ok((resolved, view)),
        Err(error) => Err(warp::reject::custom(GuessRejected {
            error,
            session: resolved,
        })),
    }
}

fn game_response(
    store: &SessionStore,
    cookie: Option<String>,
    guess: Option<&str>,
) -> Result<Response, Rejection> {
    let (resolved, view) = resolve_view(store, cookie, guess)?;
    let html = render::game_page(&view).map_err(|e| warp::reject::custom(RenderFailed(e)))?;
    with_session_cookie(warp::reply::html(html).into_response(), &resolved)
}

/// `GET /`
pub async fn index() -> Result<Response, Rejection> {
    let html = render::index_page(&IndexPage::default())
        .map_err(|e| warp::reject::custom(RenderFailed(e)))?;
    Ok(warp::reply::html(html).into_response())
}

/// `GET /game`
pub async fn show_game(state: AppState, cookie: Option<String>) -> Result<Response, Rejection> {
    game_response(&state.store, cookie, None)
}

/// `POST /game`
pub async fn submit_guess(
    state: AppState,
    cookie: Option<String>,
    form: GuessForm,
) -> Result<Response, Rejection> {
    game_response(&state.store, cookie, Some(&form.guess))
}

/// `GET /api/game`
pub async fn game_json(state: AppState, cookie: Option<String>) -> Result<Response, Rejection> {
    let (resolved, view) = resolve_view(&state.store, cookie, None)?;
    with_session_cookie(warp::reply::json(&view).into_response(), &resolved)
}

/// Turn rejections into plain-text error responses
///
/// A session id assigned while handling a rejected guess is still set on the
/// response.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let mut session = None;
    let (status, message) = if let Some(rejected) = err.find::<GuessRejected>() {
        session = Some(&rejected.session);
        (StatusCode::BAD_REQUEST, rejected.error.to_string())
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        (StatusCode::BAD_REQUEST, "Failed to parse form".to_string())
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid request header".to_string())
    } else if err.find::<FormTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Form too large".to_string())
    } else if let Some(RenderFailed(e)) = err.find::<RenderFailed>() {
        tracing::error!("Rendering failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    } else if let Some(InvalidHeader(e)) = err.find::<InvalidHeader>() {
        tracing::error!("Invalid response header: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        tracing::warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    let mut response = warp::reply::with_status(message, status).into_response();
    if let Some(resolved) = session {
        match assigned_cookie(resolved) {
            Ok(Some(value)) => {
                response.headers_mut().insert(SET_COOKIE, value);
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Invalid response header: {}", e),
        }
    }
    Ok(response)
}
