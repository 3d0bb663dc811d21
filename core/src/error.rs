//! Error types for the organisation accounts client.
//!
//! # Design
//! Every failure stage gets its own variant so callers can tell a bad base URL
//! from a dead network from a server that said no. `ApiCall` carries the
//! whole response envelope, including the server's `error_message` and the
//! status code.

use thiserror::Error;

use crate::http::HttpMethod;
use crate::transport::BoxError;
use crate::types::AccountResponse;

/// Errors returned by `AccountClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL was empty or whitespace only.
    #[error("base URL can not be empty")]
    EmptyBaseUrl,

    /// The base URL could not be parsed or extended with the resource path.
    #[error("url malformed: {0}")]
    UrlConstruction(String),

    /// A well-formed URL that cannot be used for an HTTP request.
    #[error("{method} request malformed: {reason}")]
    RequestConstruction { method: HttpMethod, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("error marshalling account data")]
    Serialization(#[source] serde_json::Error),

    /// The transport failed before a response was received.
    #[error("{method} \"{url}\": {source}")]
    Transport {
        method: HttpMethod,
        url: String,
        #[source]
        source: BoxError,
    },

    /// The response body could not be deserialized into a response envelope.
    #[error("error unmarshalling response (status {status})")]
    Deserialization {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a status the operation treats as failure.
    #[error("error in API call: status {}{}", .0.status_code, ApiCallDetail(.0))]
    ApiCall(Box<AccountResponse>),
}

impl ApiError {
    /// The HTTP status behind this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Deserialization { status, .. } => Some(*status),
            ApiError::ApiCall(response) => Some(response.status_code),
            _ => None,
        }
    }

    /// The response envelope of an `ApiCall` error.
    pub fn response(&self) -> Option<&AccountResponse> {
        match self {
            ApiError::ApiCall(response) => Some(response),
            _ => None,
        }
    }
}

struct ApiCallDetail<'a>(&'a AccountResponse);

impl std::fmt::Display for ApiCallDetail<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.error_message.as_deref() {
            Some(message) => write!(f, ": {message}"),
            None => Ok(()),
        }
    }
}
