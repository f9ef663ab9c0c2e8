use hyper::body::Incoming;
use hyper::header::HOST;
use hyper::http::uri::{Authority, Scheme};
use hyper::{Request, Response, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use tracing::info;

use super::error::Error;
use super::response::Body;
use crate::configuration;
use crate::github::client::build_https_client;

/// Verbatim reverse proxy to the upstream registry.
///
/// Forwarded requests keep their method, path, query, headers and body; only
/// the scheme, authority and the Host header follow the upstream. Responses
/// stream back uninterpreted.
pub struct UpstreamProxy {
    scheme: Scheme,
    authority: Authority,
    client: Client<HttpsConnector<HttpConnector>, Incoming>,
}

impl UpstreamProxy {
    pub fn new(upstream_url: &Uri) -> Result<Self, configuration::Error> {
        let scheme = upstream_url.scheme().cloned().ok_or_else(|| {
            configuration::Error::InvalidUpstreamUrl(format!("{upstream_url}: missing scheme"))
        })?;
        let authority = upstream_url.authority().cloned().ok_or_else(|| {
            configuration::Error::InvalidUpstreamUrl(format!("{upstream_url}: missing authority"))
        })?;

        Ok(Self {
            scheme,
            authority,
            client: build_https_client(),
        })
    }

    pub async fn forward(&self, request: Request<Incoming>) -> Result<Response<Body>, Error> {
        let (mut parts, body) = request.into_parts();

        info!(
            "forwarding {} {} -> {}://{}",
            parts.method, parts.uri, self.scheme, self.authority
        );

        parts.uri = rewrite_uri(&parts.uri, &self.scheme, &self.authority)?;
        // The client derives the outbound Host header from the rewritten URI.
        parts.headers.remove(HOST);

        let response = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|err| Error::Upstream(err.to_string()))?;

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::upstream(body)))
    }
}

fn rewrite_uri(
    uri: &Uri,
    scheme: &Scheme,
    authority: &Authority,
) -> Result<Uri, hyper::http::Error> {
    let mut builder = Uri::builder()
        .scheme(scheme.clone())
        .authority(authority.clone());

    if let Some(path_and_query) = uri.path_and_query() {
        builder = builder.path_and_query(path_and_query.clone());
    } else {
        builder = builder.path_and_query("/");
    }

    builder.build()
}
