//! warp filter tree
//!
//! | method | path          | handler |
//! |--------|---------------|---------|
//! | GET    | `/`           | landing page |
//! | GET    | `/game`       | game page |
//! | POST   | `/game`       | submit a guess, then game page |
//! | GET    | `/api/game`   | game view as JSON |
//! | GET    | `/public/*`   | static files |

use crate::error::FormTooLarge;
use crate::handlers::{self, AppState, GuessForm, SESSION_COOKIE};
use std::convert::Infallible;
use std::path::PathBuf;
use warp::{Filter, Rejection, Reply};

/// Largest accepted form body, in bytes
pub const MAX_FORM_BYTES: u64 = 4 * 1024;

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn session_cookie() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::cookie::optional(SESSION_COOKIE)
}

/// Reject bodies whose declared length exceeds `limit`
///
/// Chunked bodies carry no declared length and pass through.
fn body_limit(limit: u64) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(move |length: Option<u64>| async move {
            match length {
                Some(length) if length > limit => Err(warp::reject::custom(FormTooLarge)),
                _ => Ok(()),
            }
        })
        .untuple_one()
}

fn log_request(info: warp::log::Info<'_>) {
    tracing::info!(
        method = %info.method(),
        path = info.path(),
        status = info.status().as_u16(),
        elapsed_ms = info.elapsed().as_secs_f64() * 1000.0,
        "Request completed"
    );
}

/// Game routes without static files, recovery or logging
pub fn game_routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and_then(handlers::index);

    let show_game = warp::path!("game")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(session_cookie())
        .and_then(handlers::show_game);

    let submit_guess = warp::path!("game")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(session_cookie())
        .and(body_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<GuessForm>())
        .and_then(handlers::submit_guess);

    let game_json = warp::path!("api" / "game")
        .and(warp::get())
        .and(with_state(state))
        .and(session_cookie())
        .and_then(handlers::game_json);

    index.or(show_game).or(submit_guess).or(game_json)
}

/// Complete application: game routes, static files, error recovery and
/// request logging
pub fn routes(
    state: AppState,
    public_dir: impl Into<PathBuf>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let public = warp::path("public").and(warp::fs::dir(public_dir.into()));

    game_routes(state)
        .or(public)
        .recover(handlers::handle_rejection)
        .with(warp::log::custom(log_request))
}
