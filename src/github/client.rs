use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use hyper::{Request, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rustls::RootCertStore;
use serde::de::DeserializeOwned;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use super::api::{Package, PackageVersion};
use super::Error;

const API_ROOT: &str = "https://api.github.com";
const PACKAGE_TYPE: &str = "container";
const PER_PAGE: u32 = 100;

/// Contract over the origin API consumed by the translation layer.
///
/// The empty namespace addresses the authenticated identity. Implementations
/// make exactly one attempt per call; retries are the caller's decision.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PackagesClient: Send + Sync {
    /// Lists the container packages visible in `namespace`.
    async fn list_packages(&self, namespace: &str) -> Result<Vec<Package>, Error>;

    /// Lists every version of the container package `name` in `namespace`.
    async fn list_package_versions(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<PackageVersion>, Error>;
}

/// HTTPS client over the platform trust store, shared by the origin-API
/// client and the upstream pass-through.
pub(crate) fn build_https_client<B>() -> Client<HttpsConnector<HttpConnector>, B>
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
{
    let mut root_store = RootCertStore::empty();
    root_store.add_parsable_certificates(rustls_native_certs::load_native_certs().certs);

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder(TokioExecutor::new()).build(connector)
}

/// GitHub Packages API client with bearer-token authentication.
pub struct GitHubClient {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    api_root: String,
    authorization: Option<String>,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Self {
        Self::with_api_root(API_ROOT, token)
    }

    /// Points the client at an alternate API root, e.g. a GitHub Enterprise
    /// instance or a local stub.
    pub fn with_api_root(api_root: &str, token: &str) -> Self {
        let authorization = (!token.is_empty()).then(|| format!("Bearer {token}"));

        Self {
            client: build_https_client(),
            api_root: api_root.trim_end_matches('/').to_string(),
            authorization,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }

    fn packages_uri(&self, namespace: &str) -> String {
        if namespace.is_empty() {
            format!(
                "{}/user/packages?package_type={PACKAGE_TYPE}&per_page={PER_PAGE}",
                self.api_root
            )
        } else {
            format!(
                "{}/users/{namespace}/packages?package_type={PACKAGE_TYPE}&per_page={PER_PAGE}",
                self.api_root
            )
        }
    }

    fn versions_uri(&self, namespace: &str, name: &str) -> String {
        if namespace.is_empty() {
            format!(
                "{}/user/packages/{PACKAGE_TYPE}/{name}/versions?per_page={PER_PAGE}",
                self.api_root
            )
        } else {
            format!(
                "{}/users/{namespace}/packages/{PACKAGE_TYPE}/{name}/versions?per_page={PER_PAGE}",
                self.api_root
            )
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, raw_uri: &str) -> Result<T, Error> {
        let uri = raw_uri
            .parse::<Uri>()
            .map_err(|err| Error::Transport(format!("invalid request URI {raw_uri}: {err}")))?;

        debug!("GET {uri}");

        let mut request = Request::get(uri)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization.as_str());
        }
        let request = request
            .body(Empty::new())
            .map_err(|err| Error::Transport(err.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|err| Error::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|err| Error::Transport(err.to_string()))?
            .to_bytes();

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body).into_owned();
            return Err(Error::Status(status, detail));
        }

        serde_json::from_slice(&body).map_err(|err| Error::Decode(err.to_string()))
    }
}

#[async_trait]
impl PackagesClient for GitHubClient {
    async fn list_packages(&self, namespace: &str) -> Result<Vec<Package>, Error> {
        self.get_json(&self.packages_uri(namespace)).await
    }

    async fn list_package_versions(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<PackageVersion>, Error> {
        self.get_json(&self.versions_uri(namespace, name)).await
    }
}
