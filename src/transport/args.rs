use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::api::ContentType;
use crate::config::CacheBuster;
use crate::token::TokenManager;

use super::BeforeSend;

/// Everything one REST call needs: client-level settings plus call-specific values.
///
/// Built fresh per call and not shared afterwards.
#[derive(Clone)]
pub struct RestCallArgs {
    pub method: Method,
    pub content_server: String,
    pub content_type: ContentType,
    pub channel_token: Option<String>,
    pub cache_buster: Option<CacheBuster>,
    pub secure_content: bool,
    pub language: Option<String>,
    pub post_data: Option<Value>,
    /// Query string fragment placed ahead of the token and cache-buster parameters.
    pub search: String,
    pub use_aggregate: Option<String>,
    pub asset_version: Option<String>,
    pub format: Option<String>,
    pub download: Option<bool>,
    /// POST without a CSRF token; search, GraphQL and recommendation calls.
    pub no_csrf_token: bool,
    pub authorization: Option<String>,
    pub token_manager: Option<Arc<TokenManager>>,
    pub timeout: Option<Duration>,
    pub before_send: Option<Arc<dyn BeforeSend>>,
}

impl RestCallArgs {
    pub fn new(method: Method, content_server: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            method,
            content_server: content_server.into(),
            content_type,
            channel_token: None,
            cache_buster: None,
            secure_content: false,
            language: None,
            post_data: None,
            search: String::new(),
            use_aggregate: None,
            asset_version: None,
            format: None,
            download: None,
            no_csrf_token: false,
            authorization: None,
            token_manager: None,
            timeout: None,
            before_send: None,
        }
    }

    /// Cache-buster value applied to content URLs.
    pub fn cache_buster_value(&self) -> Option<&str> {
        self.cache_buster.as_ref().and_then(CacheBuster::content_key)
    }

    pub fn channel_token(&self) -> Option<&str> {
        self.channel_token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for RestCallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestCallArgs")
            .field("method", &self.method)
            .field("content_server", &self.content_server)
            .field("content_type", &self.content_type)
            .field("language", &self.language)
            .field("search", &self.search)
            .field("use_aggregate", &self.use_aggregate)
            .field("asset_version", &self.asset_version)
            .field("no_csrf_token", &self.no_csrf_token)
            .field("timeout", &self.timeout)
            .field("before_send", &self.before_send.is_some())
            .finish_non_exhaustive()
    }
}
