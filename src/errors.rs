use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by content client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required call argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request timed out after: {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("http error {status}: {status_text}")]
    Http {
        status: StatusCode,
        status_text: String,
        body: String,
    },

    /// The server answered 2xx but the body was not JSON.
    #[error("unparseable response body: {body}")]
    InvalidResponse { body: String },

    /// The method/body combination cannot be sent by the active transport.
    #[error("unsupported REST request: {0}")]
    UnsupportedRequest(String),

    /// The `before_send` hook failed.
    #[error("error in before_send() callback: {0}")]
    BeforeSend(String),

    /// The `before_send` hook asked for the call to be dropped.
    #[error("call aborted by before_send()")]
    Aborted,

    /// The operation is not offered by this client variant.
    #[error("{0}: not supported")]
    NotSupported(&'static str),

    /// The operation is declared by this client variant but not implemented.
    #[error("{0}: unimplemented")]
    Unimplemented(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
