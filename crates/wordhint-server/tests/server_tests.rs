use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use warp::{Filter, Reply};
use wordhint_core::{GameConfig, SessionId};
use wordhint_server::server::bind;
use wordhint_server::{routes, AppState, Timeouts};
use wordhint_test_utils::ocean_store;

fn short_timeouts() -> Timeouts {
    Timeouts {
        read: Duration::from_millis(200),
        write: Duration::from_millis(100),
        idle: Duration::from_secs(15),
    }
}

fn start<F, R>(filter: F, timeouts: Timeouts) -> (SocketAddr, oneshot::Sender<()>)
where
    F: Filter<Extract = (R,), Error = Infallible> + Clone + Send + Sync + 'static,
    R: Reply + 'static,
{
    let (tx, rx) = oneshot::channel::<()>();
    let shutdown = async move {
        let _ = rx.await;
    };
    let (addr, server) = bind(filter, ([127, 0, 0, 1], 0).into(), timeouts, shutdown).unwrap();
    tokio::spawn(server);
    (addr, tx)
}

/// Send raw bytes and read until the server closes the connection
async fn exchange(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("server should close the connection")
        .unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_fast_response_served() {
    let filter = warp::any().map(|| "ok");
    let (addr, _shutdown) = start(filter, short_timeouts());

    let response = exchange(addr, "GET / HTTP/1.1\r\nHost: local\r\nConnection: close\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("ok"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let filter = warp::any().then(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    });
    let (addr, _shutdown) = start(filter, short_timeouts());

    let response = exchange(addr, "GET / HTTP/1.1\r\nHost: local\r\nConnection: close\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 503"));
    assert!(response.ends_with("Request timed out"));
}

#[tokio::test]
async fn test_incomplete_headers_close_connection() {
    let filter = warp::any().map(|| "ok");
    let (addr, _shutdown) = start(filter, short_timeouts());

    let response = exchange(addr, "GET / HTTP/1.1\r\nHost: loc").await;
    assert!(!response.contains("200 OK"));
}

#[tokio::test]
async fn test_chunked_guess_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ocean_store(GameConfig::default()));
    let filter = routes(AppState::new(Arc::clone(&store)), dir.path().to_path_buf());
    let (addr, _shutdown) = start(filter, Timeouts::default());

    let request = "POST /game HTTP/1.1\r\n\
                   Host: local\r\n\
                   Cookie: session_id=player\r\n\
                   Content-Type: application/x-www-form-urlencoded\r\n\
                   Transfer-Encoding: chunked\r\n\
                   Connection: close\r\n\
                   \r\n\
                   b\r\nguess=river\r\n0\r\n\r\n";
    let response = exchange(addr, request).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert_eq!(
        store.peek(&SessionId::new("player")).unwrap().guesses(),
        ["river"]
    );
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let filter = warp::any().map(|| "ok");
    let (tx, rx) = oneshot::channel::<()>();
    let shutdown = async move {
        let _ = rx.await;
    };
    let (_addr, server) = bind(filter, ([127, 0, 0, 1], 0).into(), short_timeouts(), shutdown).unwrap();
    let handle = tokio::spawn(server);

    tx.send(()).unwrap();
    let served = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(served.is_ok());
}
