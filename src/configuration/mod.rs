use std::env;
use std::net::{IpAddr, SocketAddr};

use hyper::Uri;

mod error;
mod identity;

pub use error::Error;
pub use identity::IdentitySet;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 10000;
const DEFAULT_UPSTREAM_URL: &str = "https://ghcr.io";

/// Runtime configuration, read from the environment.
///
/// Unset and empty variables are equivalent; every field except the token has
/// a default. Invalid values are fatal.
#[derive(Clone, Debug)]
pub struct Configuration {
    pub bind_address: IpAddr,
    pub port: u16,
    pub upstream_url: Uri,
    pub identities: IdentitySet,
    pub token: String,
}

impl Configuration {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let bind_address = host
            .parse::<IpAddr>()
            .map_err(|err| Error::InvalidBindAddress(format!("{host}: {err}")))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|err| Error::InvalidPort(format!("{raw}: {err}")))?,
            None => DEFAULT_PORT,
        };

        let raw_upstream =
            lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let upstream_url = parse_upstream_url(&raw_upstream)?;

        let identities = IdentitySet::parse(&lookup("GITHUB_USERS").unwrap_or_default());
        let token = lookup("GITHUB_TOKEN").unwrap_or_default();

        Ok(Configuration {
            bind_address,
            port,
            upstream_url,
            identities,
            token,
        })
    }

    pub fn binding_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_upstream_url(raw: &str) -> Result<Uri, Error> {
    let uri = raw
        .parse::<Uri>()
        .map_err(|err| Error::InvalidUpstreamUrl(format!("{raw}: {err}")))?;

    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::InvalidUpstreamUrl(format!(
            "{raw}: not an absolute URL"
        )));
    }

    Ok(uri)
}
