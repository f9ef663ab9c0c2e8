use std::fmt;

use hyper::StatusCode;

#[derive(Debug)]
pub enum Error {
    /// Connection, TLS or protocol failure before a response was read.
    Transport(String),
    /// The origin API answered with a non-2xx status.
    Status(StatusCode, String),
    /// The response body did not decode as the expected JSON shape.
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(err) => write!(f, "{err}"),
            Error::Status(status, body) => write!(f, "unexpected status {status}: {body}"),
            Error::Decode(err) => write!(f, "invalid response body: {err}"),
        }
    }
}
