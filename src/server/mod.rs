use std::convert::Infallible;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::pin;
use tracing::{debug, error, info, instrument};

mod error;
mod handlers;
mod listener;
mod response;
mod route;
mod router;
mod upstream;


pub use error::Error;
pub use listener::Listener;

use crate::configuration::{Configuration, IdentitySet};
use crate::github::PackagesClient;
use response::Body;
use route::Route;
use upstream::UpstreamProxy;

/// Per-request deadline, installed before any handler runs.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Extra time granted to a connection past its deadline before it is closed.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Shared, read-only state handed to every connection.
pub struct ServerContext {
    pub client: Arc<dyn PackagesClient>,
    pub identities: IdentitySet,
    pub upstream: UpstreamProxy,
    pub request_timeout: Duration,
}

impl ServerContext {
    pub fn new(
        client: Arc<dyn PackagesClient>,
        config: &Configuration,
    ) -> Result<Self, crate::configuration::Error> {
        Ok(Self {
            client,
            identities: config.identities.clone(),
            upstream: UpstreamProxy::new(&config.upstream_url)?,
            request_timeout: REQUEST_TIMEOUT,
        })
    }
}

async fn serve_request<S>(stream: TokioIo<S>, context: Arc<ServerContext>)
where
    S: Unpin + AsyncWrite + AsyncRead + Send + Debug + 'static,
{
    let request_timeout = context.request_timeout;
    let conn = http1::Builder::new().serve_connection(
        stream,
        service_fn(|request| handle_request(context.clone(), request)),
    );
    pin!(conn);

    for sleep_duration in [request_timeout, SHUTDOWN_GRACE_PERIOD] {
        tokio::select! {
            res = conn.as_mut() => {
                if let Err(err) = res {
                    debug!("error serving connection: {err:?}");
                }
                return;
            }
            () = tokio::time::sleep(sleep_duration) => {
                debug!("connection deadline reached, starting graceful shutdown");
                conn.as_mut().graceful_shutdown();
            }
        }
    }
}

#[instrument(skip(context, request))]
async fn handle_request(
    context: Arc<ServerContext>,
    request: Request<Incoming>,
) -> Result<Response<Body>, Infallible> {
    let start_time = std::time::Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let outcome =
        tokio::time::timeout(context.request_timeout, route_request(&context, request)).await;

    let (response, error_level) = match outcome {
        Ok(Ok(response)) => (response, false),
        Ok(Err(err)) => (error_response(&err), true),
        Err(_) => (timeout_response(), true),
    };

    let elapsed = start_time.elapsed();
    let status = response.status();
    if error_level {
        error!("{status} {elapsed:?} {method} {path}");
    } else {
        info!("{status} {elapsed:?} {method} {path}");
    }

    Ok(response)
}

async fn route_request(
    context: &ServerContext,
    request: Request<Incoming>,
) -> Result<Response<Body>, Error> {
    // The parsed route borrows the URI, and the pass-through arm consumes the
    // whole request, so the URI is cloned out first.
    let uri = request.uri().clone();

    match router::parse(request.method(), &uri) {
        Route::Catalog => handlers::handle_catalog(context).await,
        Route::ListTags { owner, name } => {
            handlers::handle_list_tags(context, owner, name).await
        }
        Route::Upstream => context.upstream.forward(request).await,
    }
}

pub(crate) fn error_response(error: &Error) -> Response<Body> {
    let body = serde_json::to_vec(&error.envelope()).unwrap_or_default();

    Response::builder()
        .status(error.status_code())
        .header(CONTENT_TYPE, "application/json")
        .body(Body::fixed(body))
        .unwrap()
}

/// Past the deadline the accumulated state is not trustworthy, so no error
/// envelope is synthesized.
fn timeout_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::GATEWAY_TIMEOUT)
        .body(Body::empty())
        .unwrap()
}
