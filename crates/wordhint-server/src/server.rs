//! HTTP listener with connection timeouts
//!
//! The warp filter runs as a hyper service on a hyper [`Server`] built over a
//! bound [`AddrIncoming`]:
//! - `read`: request headers must arrive within this time or the connection is closed
//! - `write`: a response not ready within this time is replaced by `503`
//! - `idle`: TCP keep-alive period on accepted connections

use crate::config::DEFAULT_TIMEOUT_SECS;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use warp::http::StatusCode;
use warp::hyper::server::conn::{AddrIncoming, AddrStream};
use warp::hyper::service::{make_service_fn, service_fn, Service};
use warp::hyper::{Body, Request, Response, Server};
use warp::{Filter, Reply};

/// Per-connection timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Time allowed to receive request headers
    pub read: Duration,
    /// Time allowed to produce a response
    pub write: Duration,
    /// TCP keep-alive period
    pub idle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        let secs = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            read: secs,
            write: secs,
            idle: secs,
        }
    }
}

fn timed_out() -> Response<Body> {
    let mut response = Response::new(Body::from("Request timed out"));
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    response
}

/// Bind `addr` and return the bound address with a future serving `filter`
/// until `shutdown` resolves
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub fn bind<F, R, S>(
    filter: F,
    addr: SocketAddr,
    timeouts: Timeouts,
    shutdown: S,
) -> Result<(SocketAddr, impl Future<Output = Result<(), warp::hyper::Error>>), warp::hyper::Error>
where
    F: Filter<Extract = (R,), Error = Infallible> + Clone + Send + Sync + 'static,
    R: Reply,
    S: Future<Output = ()> + Send + 'static,
{
    let mut incoming = AddrIncoming::bind(&addr)?;
    incoming.set_nodelay(true);
    incoming.set_keepalive(Some(timeouts.idle));
    let local_addr = incoming.local_addr();

    let service = warp::service(filter);
    let write_timeout = timeouts.write;
    let make_service = make_service_fn(move |_conn: &AddrStream| {
        let service = service.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let mut service = service.clone();
                async move {
                    match tokio::time::timeout(write_timeout, service.call(req)).await {
                        Ok(response) => response,
                        Err(_) => {
                            tracing::warn!(?write_timeout, "Response not ready in time");
                            Ok(timed_out())
                        }
                    }
                }
            }))
        }
    });

    let server = Server::builder(incoming)
        .http1_header_read_timeout(timeouts.read)
        .serve(make_service)
        .with_graceful_shutdown(shutdown);
    Ok((local_addr, server))
}
