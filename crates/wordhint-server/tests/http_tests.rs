use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use wordhint_core::{ExtraHintKind, GameConfig, SessionId, SessionStore};
use wordhint_server::{routes, AppState};
use wordhint_test_utils::{fixed_now, ocean_store, sample_store, seeded_rng};

fn app(
    store: Arc<SessionStore>,
    public_dir: &std::path::Path,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
    routes(AppState::new(store), public_dir.to_path_buf())
}

fn set_cookie(response: &warp::http::Response<Bytes>) -> Option<String> {
    response
        .headers()
        .get("set-cookie")
        .map(|v| v.to_str().unwrap().to_string())
}

fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("session_id="))
        .unwrap()
        .to_string()
}

fn body(response: &warp::http::Response<Bytes>) -> String {
    String::from_utf8(response.body().to_vec()).unwrap()
}

async fn post_guess<F>(filter: &F, cookie: &str, form: &str) -> warp::http::Response<Bytes>
where
    F: warp::Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    warp::test::request()
        .method("POST")
        .path("/game")
        .header("cookie", format!("session_id={cookie}"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form.to_string())
        .reply(filter)
        .await
}

#[tokio::test]
async fn test_index_page() {
    let dir = tempfile::tempdir().unwrap();
    let filter = app(Arc::new(ocean_store(GameConfig::default())), dir.path());

    let response = warp::test::request().path("/").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(&response).contains("Welcome to the Word Guessing Game!"));
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn test_cookieless_get_assigns_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let filter = app(Arc::clone(&store), dir.path());

    let response = warp::test::request().path("/game").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::OK);

    let header = set_cookie(&response).expect("cookie should be set");
    assert!(header.ends_with("; Path=/"));
    let id = cookie_value(&header);
    assert!(id.parse::<u64>().is_ok());

    let html = body(&response);
    assert!(html.contains("Hint #1: <strong>Found on Earth</strong>"));
    assert_eq!(store.peek(&SessionId::new(id)).unwrap().hint_index(), 1);
}

#[tokio::test]
async fn test_existing_cookie_not_reassigned() {
    let dir = tempfile::tempdir().unwrap();
    let filter = app(Arc::new(ocean_store(GameConfig::default())), dir.path());

    let response = warp::test::request()
        .path("/game")
        .header("cookie", "session_id=12345")
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn test_preloaded_ids_then_random() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(sample_store(GameConfig::default()));
    store.preload(5, chrono::Utc::now(), &mut seeded_rng(3));
    let filter = app(Arc::clone(&store), dir.path());

    let mut ids = Vec::new();
    for _ in 0..6 {
        let response = warp::test::request().path("/game").reply(&filter).await;
        ids.push(cookie_value(&set_cookie(&response).unwrap()));
    }

    let preloaded: Vec<_> = (1..=5).map(|n| format!("preloaded-{n}")).collect();
    assert_eq!(&ids[..5], &preloaded[..]);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 6);
    assert!(ids[5].parse::<u64>().is_ok());
}

#[tokio::test]
async fn test_guess_flow_until_win() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let filter = app(Arc::clone(&store), dir.path());

    let response = post_guess(&filter, "player", "guess=river").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_guess(&filter, "player", "guess=lake").await;
    let html = body(&response);
    assert!(html.contains("Hint #2: <strong>Salty</strong>"));
    assert!(html.contains("Attempts: 2 / 5"));
    assert!(!html.contains("OCEAN"));

    let response = post_guess(&filter, "player", "guess=ocean").await;
    let html = body(&response);
    assert!(html.contains("The word was <strong>OCEAN</strong>"));
    assert!(store.peek(&SessionId::new("player")).unwrap().won());

    // next visit starts a new game
    let response = warp::test::request()
        .path("/game")
        .header("cookie", "session_id=player")
        .reply(&filter)
        .await;
    let html = body(&response);
    assert!(html.contains("Attempts: 0 / 5"));
    assert!(!store.peek(&SessionId::new("player")).unwrap().won());
}

#[tokio::test]
async fn test_empty_guess_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let filter = app(Arc::clone(&store), dir.path());
    post_guess(&filter, "player", "guess=river").await;

    for form in ["guess=", "guess=+++", "other=1"] {
        let response = post_guess(&filter, "player", form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response), "Guess cannot be empty");
    }

    let session = store.peek(&SessionId::new("player")).unwrap();
    assert_eq!(session.guesses(), ["river"]);
    assert_eq!(session.hint_index(), 1);
}

#[tokio::test]
async fn test_malformed_form_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let filter = app(Arc::new(ocean_store(GameConfig::default())), dir.path());

    let response = warp::test::request()
        .method("POST")
        .path("/game")
        .header("cookie", "session_id=player")
        .header("content-type", "application/json")
        .body(r#"{"guess":"ocean"}"#)
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&response), "Failed to parse form");
}

#[tokio::test]
async fn test_extra_hints_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::new()
        .with_max_attempts(20)
        .with_extra_hint(3, ExtraHintKind::Category)
        .with_extra_hint(5, ExtraHintKind::KeywordLength);
    let filter = app(Arc::new(ocean_store(config)), dir.path());

    let mut html = String::new();
    for _ in 0..5 {
        html = body(&post_guess(&filter, "player", "guess=nope").await);
    }
    assert!(html.contains("<li>The category is Nature</li>"));
    assert!(html.contains("<li>The word has 5 letters</li>"));
}

#[tokio::test]
async fn test_api_game_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let filter = app(Arc::clone(&store), dir.path());
    post_guess(&filter, "player", "guess=river").await;

    let response = warp::test::request()
        .path("/api/game")
        .header("cookie", "session_id=player")
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(json["current_hint"], "Found on Earth");
    assert_eq!(json["attempts"], 1);
    assert_eq!(json["max_attempts"], 5);
    assert_eq!(json["won"], false);
    assert!(json.get("keyword").is_none());

    let expected = store
        .peek(&SessionId::new("player"))
        .unwrap()
        .view(store.config());
    let view_json = serde_json::to_value(&expected).unwrap();
    assert_eq!(json, view_json);
}

#[tokio::test]
async fn test_static_files_and_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("style.css"), "body { margin: 0; }").unwrap();
    let filter = app(Arc::new(ocean_store(GameConfig::default())), dir.path());

    let response = warp::test::request()
        .path("/public/style.css")
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(&response), "body { margin: 0; }");

    let response = warp::test::request().path("/nowhere").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_session_replaced_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let mut rng = seeded_rng(5);
    let id = SessionId::new("old");
    let past = fixed_now() - chrono::Duration::days(1);
    store.update(&id, past, &mut rng, |s| {
        s.submit_guess("river", store.config()).unwrap();
    });
    let filter = app(Arc::clone(&store), dir.path());

    let response = warp::test::request()
        .path("/game")
        .header("cookie", "session_id=old")
        .reply(&filter)
        .await;
    assert!(body(&response).contains("Attempts: 0 / 5"));
}

#[tokio::test]
async fn test_rejected_guess_still_delivers_preloaded_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(sample_store(GameConfig::default()));
    store.preload(1, chrono::Utc::now(), &mut seeded_rng(4));
    let filter = app(Arc::clone(&store), dir.path());

    let response = warp::test::request()
        .method("POST")
        .path("/game")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("guess=")
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let header = set_cookie(&response).expect("cookie should be set on 400");
    assert_eq!(header, "session_id=preloaded-1; Path=/");

    let response = post_guess(&filter, "preloaded-1", "guess=nope").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    assert_eq!(
        store.peek(&SessionId::preloaded(1)).unwrap().guesses(),
        ["nope"]
    );

    let response = warp::test::request().path("/game").reply(&filter).await;
    let id = cookie_value(&set_cookie(&response).unwrap());
    assert!(id.parse::<u64>().is_ok());
}

#[tokio::test]
async fn test_oversized_form_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let filter = app(Arc::clone(&store), dir.path());

    let form = format!("guess={}", "a".repeat(5000));
    let response = post_guess(&filter, "player", &form).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!store.contains(&SessionId::new("player")));
}
