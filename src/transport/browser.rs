use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::api::ContentType;
use crate::errors::Error;

use super::server::X_REQUESTED_WITH;
use super::{OutgoingRequest, RestCallArgs, Transport, dispatch, parse_url, run_before_send};

const X_CSRF_TOKEN: HeaderName = HeaderName::from_static("x-csrf-token");
const DEFAULT_CSRF_TOKEN: &str = "CSRFToken";

/// Authorization values that mean "rely on the browser session".
const SESSION_AUTH: [&str; 2] = ["session", "anonymous"];

/// Transport with browser semantics: static authorization only, and a CSRF
/// token on mutating calls.
#[derive(Clone, Debug)]
pub struct BrowserTransport {
    http: Client,
    csrf_token: String,
}

impl Default for BrowserTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl BrowserTransport {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            csrf_token: DEFAULT_CSRF_TOKEN.to_string(),
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = token.into();
        self
    }

    fn csrf_header(&self) -> Result<HeaderValue, Error> {
        HeaderValue::from_str(&self.csrf_token)
            .map_err(|e| Error::InvalidArgument(format!("invalid CSRF token: {}", e)))
    }
}

#[async_trait]
impl Transport for BrowserTransport {
    async fn call_rest_server(&self, url: &str, args: &RestCallArgs) -> Result<Value, Error> {
        debug!(method = %args.method, url, "calling content server");
        let parsed = parse_url(url)?;
        let mut headers = HeaderMap::new();

        let skip_auth = args.content_type == ContentType::Published
            && args
                .authorization
                .as_deref()
                .is_some_and(|a| SESSION_AUTH.contains(&a));
        if let Some(value) = args.authorization.as_deref().filter(|v| !v.is_empty()) {
            if !skip_auth {
                let value = HeaderValue::from_str(value).map_err(|e| {
                    Error::InvalidArgument(format!("invalid Authorization value: {}", e))
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let method = &args.method;
        let body = if *method == Method::GET {
            None
        } else if *method == Method::DELETE {
            headers.insert(X_CSRF_TOKEN, self.csrf_header()?);
            None
        } else if let (true, Some(data)) = (
            *method == Method::POST || *method == Method::PUT,
            args.post_data.as_ref(),
        ) {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=UTF-8"),
            );
            headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
            let exempt = *method == Method::POST && args.no_csrf_token;
            if !exempt {
                headers.insert(X_CSRF_TOKEN, self.csrf_header()?);
            }
            Some(serde_json::to_string(data)?)
        } else {
            return Err(Error::UnsupportedRequest(format!("{} {}", method, url)));
        };

        let mut request = OutgoingRequest {
            method: method.clone(),
            url: parsed,
            headers,
            body,
            timeout: args.timeout,
        };
        run_before_send(args.before_send.as_ref(), &mut request).await?;
        dispatch(&self.http, request).await
    }
}
