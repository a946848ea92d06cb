//! Error types for the CivForge agent client.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the agent client.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration was incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A request failed or the service answered with a non-2xx status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// An observation lacked a field the client needed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Startup configuration failures. Always raised before any network call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing {0}: set it via flag, environment or civforge.toml")]
    Missing(&'static str),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// A single request attempt that did not produce the expected JSON.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The service answered with a non-2xx status.
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// Connection refused, DNS failure, timeout and the like.
    #[error("{method} {url} failed")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response was 2xx but the body was not the expected JSON.
    #[error("invalid JSON from {method} {url}")]
    Decode {
        method: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    /// HTTP status code, when the service produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            HttpError::Decode { .. } => None,
        }
    }
}

/// An expected field was absent or had the wrong type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("observation is missing field `{path}`")]
    Missing { path: String },

    #[error("observation field `{path}` should be {expected}")]
    WrongType { path: String, expected: &'static str },
}

impl SchemaError {
    /// Dotted path of the offending field.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::Missing { path } | SchemaError::WrongType { path, .. } => path,
        }
    }
}

/// Result type for agent client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code_and_body() {
        let err = HttpError::Status {
            method: "GET",
            url: "http://localhost/agent/a1/observe?worldId=public".to_string(),
            status: 404,
            body: "no such agent".to_string(),
        };

        assert_eq!(err.status(), Some(404));
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("no such agent"));
    }

    #[test]
    fn test_schema_error_path() {
        let err = SchemaError::WrongType {
            path: "unit.id".to_string(),
            expected: "a string",
        };
        assert_eq!(err.path(), "unit.id");
        assert_eq!(err.to_string(), "observation field `unit.id` should be a string");
    }

    #[test]
    fn test_missing_config_message() {
        let err: Error = ConfigError::Missing("AGENT_KEY").into();
        assert!(err.to_string().starts_with("missing AGENT_KEY"));
    }
}
