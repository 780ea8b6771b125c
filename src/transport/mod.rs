//! One HTTP request per call, in either runtime.

mod args;
mod browser;
mod hook;
mod server;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

pub use args::RestCallArgs;
pub use browser::BrowserTransport;
pub use hook::{BeforeSend, HookError, OutgoingRequest};
pub use server::ServerTransport;

use crate::errors::Error;
use crate::telemetry::call::CallEvents;

pub(crate) use hook::run_before_send;

/// Issues a single request and yields the parsed JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call_rest_server(&self, url: &str, args: &RestCallArgs) -> Result<Value, Error>;
}

/// Send a prepared request. 2xx with a JSON body resolves; anything else is an error.
pub(crate) async fn dispatch(http: &Client, request: OutgoingRequest) -> Result<Value, Error> {
    let OutgoingRequest {
        method,
        url,
        headers,
        body,
        timeout,
    } = request;

    let events = CallEvents::begin(&method, url.path());
    let mut builder = http.request(method, url).headers(headers);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    let result = send(builder, timeout).await;
    match &result {
        Ok((status, _)) => events.finished(*status),
        Err(err) => events.failed(err),
    }
    result.map(|(_, json)| json)
}

async fn send(
    builder: RequestBuilder,
    timeout: Option<Duration>,
) -> Result<(StatusCode, Value), Error> {
    let map_send_err = |e: reqwest::Error| match timeout {
        Some(limit) if e.is_timeout() => Error::Timeout(limit),
        _ => Error::Request(e),
    };
    let resp = builder.send().await.map_err(map_send_err)?;
    let status = resp.status();
    let text = resp.text().await.map_err(map_send_err)?;

    if !status.is_success() {
        debug!("HTTP call failed: status={} body='{}'", status, text);
        return Err(Error::Http {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: text,
        });
    }

    match serde_json::from_str(&text) {
        Ok(json) => Ok((status, json)),
        Err(_) => Err(Error::InvalidResponse { body: text }),
    }
}

pub(crate) fn parse_url(url: &str) -> Result<reqwest::Url, Error> {
    reqwest::Url::parse(url)
        .map_err(|e| Error::InvalidArgument(format!("invalid request URL '{}': {}", url, e)))
}
