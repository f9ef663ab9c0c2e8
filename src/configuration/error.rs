use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidBindAddress(String),
    InvalidPort(String),
    InvalidUpstreamUrl(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidBindAddress(err) => write!(f, "Invalid bind address: {err}"),
            Error::InvalidPort(err) => write!(f, "Invalid port: {err}"),
            Error::InvalidUpstreamUrl(err) => write!(f, "Invalid upstream URL: {err}"),
        }
    }
}
