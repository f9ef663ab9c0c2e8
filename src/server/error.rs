use std::fmt;

use hyper::StatusCode;
use serde::Serialize;

use crate::configuration;

/// The only code from the registry error vocabulary this proxy emits; every
/// request it could answer with a more precise code is forwarded upstream
/// instead of being refused here.
pub const CODE_UNKNOWN: &str = "UNKNOWN";

/// Registry-shaped error body: `{"errors":[{code,message,detail?},...]}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ApiError {
    pub fn unknown(message: String) -> Self {
        ApiError {
            code: CODE_UNKNOWN,
            message,
            detail: None,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Initialization(String),
    Execution(String),
    /// The origin API refused or failed a translated call.
    Origin(String),
    /// The upstream registry could not be reached for a pass-through request.
    Upstream(String),
    Http(hyper::http::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Initialization(err) | Error::Execution(err) | Error::Origin(err) => {
                write!(f, "{err}")
            }
            Error::Upstream(err) => write!(f, "upstream request failed: {err}"),
            Error::Http(err) => write!(f, "HTTP error: {err}"),
        }
    }
}

impl From<configuration::Error> for Error {
    fn from(error: configuration::Error) -> Self {
        Error::Initialization(error.to_string())
    }
}

impl From<hyper::http::Error> for Error {
    fn from(error: hyper::http::Error) -> Self {
        Error::Http(error)
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Origin(_) => StatusCode::BAD_REQUEST,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Initialization(_) | Error::Execution(_) | Error::Http(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            errors: vec![ApiError::unknown(self.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::Initialization("Could not bind".to_string());
        assert_eq!(format!("{error}"), "Could not bind");

        let error = Error::Origin("ListPackages: boom".to_string());
        assert_eq!(format!("{error}"), "ListPackages: boom");

        let error = Error::Upstream("connection refused".to_string());
        assert_eq!(
            format!("{error}"),
            "upstream request failed: connection refused"
        );
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            Error::Origin("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Upstream("x".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Initialization("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Execution("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_wire_shape() {
        let error = Error::Origin("PackageGetAllVersions: boom".to_string());
        let body = serde_json::to_string(&error.envelope()).unwrap();

        assert_eq!(
            body,
            r#"{"errors":[{"code":"UNKNOWN","message":"PackageGetAllVersions: boom"}]}"#
        );
    }

    #[test]
    fn test_envelope_with_detail() {
        let envelope = ErrorEnvelope {
            errors: vec![ApiError {
                code: CODE_UNKNOWN,
                message: "boom".to_string(),
                detail: Some(serde_json::json!({"identity": "org1"})),
            }],
        };
        let body = serde_json::to_string(&envelope).unwrap();

        assert_eq!(
            body,
            r#"{"errors":[{"code":"UNKNOWN","message":"boom","detail":{"identity":"org1"}}]}"#
        );
    }

    #[test]
    fn test_configuration_error_maps_to_initialization() {
        let error: Error = configuration::Error::InvalidPort("nope".to_string()).into();

        assert!(matches!(error, Error::Initialization(_)));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
