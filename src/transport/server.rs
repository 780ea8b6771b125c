use async_trait::async_trait;
use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use reqwest::{Client, Method, Proxy};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ProxyConfig;
use crate::errors::Error;

use super::{OutgoingRequest, RestCallArgs, Transport, dispatch, parse_url, run_before_send};

pub(crate) const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const USER_AGENT_VALUE: &str = concat!("content-delivery-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Transport for server-side processes.
///
/// Takes the Authorization value from the call's token manager when one is
/// present. Only GET and CSRF-exempt POST with a body can be sent.
#[derive(Clone, Debug)]
pub struct ServerTransport {
    http: Client,
}

impl ServerTransport {
    /// Build a transport that routes through the given proxies, or connects
    /// directly when none are configured.
    pub fn new(proxy: &ProxyConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if proxy.http.is_none() && proxy.https.is_none() {
            builder = builder.no_proxy();
        }
        if let Some(url) = proxy.http.as_deref() {
            match Proxy::http(url) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => warn!("ignoring http proxy '{}': {}", url, e),
            }
        }
        if let Some(url) = proxy.https.as_deref() {
            match Proxy::https(url) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => warn!("ignoring https proxy '{}': {}", url, e),
            }
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    pub fn http_client(&self) -> &Client {
        &self.http
    }
}

#[async_trait]
impl Transport for ServerTransport {
    async fn call_rest_server(&self, url: &str, args: &RestCallArgs) -> Result<Value, Error> {
        debug!(method = %args.method, url, "calling content server");
        let parsed = parse_url(url)?;

        let auth_value = match args.token_manager.as_ref() {
            Some(manager) => manager.get_auth_value().await?,
            None => args.authorization.clone(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(value) = auth_value.filter(|v| !v.is_empty()) {
            let value = HeaderValue::from_str(&value)
                .map_err(|e| Error::InvalidArgument(format!("invalid Authorization value: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let body = match (&args.method, args.no_csrf_token, args.post_data.as_ref()) {
            (m, _, _) if *m == Method::GET => None,
            (m, true, Some(data)) if *m == Method::POST => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
                Some(serde_json::to_string(data)?)
            }
            _ => {
                return Err(Error::UnsupportedRequest(format!(
                    "{} {}",
                    args.method, url
                )));
            }
        };

        let mut request = OutgoingRequest {
            method: args.method.clone(),
            url: parsed,
            headers,
            body,
            timeout: args.timeout,
        };
        run_before_send(args.before_send.as_ref(), &mut request).await?;
        dispatch(&self.http, request).await
    }
}
