use std::sync::Arc;
use std::time::Duration;

use crate::api::{ContentType, ContentVersion};
use crate::config::{CacheBuster, Runtime};
use crate::token::TokenManager;
use crate::transport::BeforeSend;

use super::ClientKind;

/// Settings fixed at client creation. Every call starts from a copy.
#[derive(Clone)]
pub struct ClientInfo {
    pub client_type: ClientKind,
    /// `scheme://host[:port]`
    pub content_server: String,
    pub content_type: ContentType,
    /// Version reported to callers; v1 when v1 responses were requested.
    pub content_version: ContentVersion,
    pub channel_token: Option<String>,
    pub cache_buster: Option<CacheBuster>,
    pub secure_content: bool,
    pub timeout: Option<Duration>,
    pub authorization: Option<String>,
    pub token_manager: Arc<TokenManager>,
    pub runtime: Runtime,
    pub before_send: Option<Arc<dyn BeforeSend>>,
}

impl std::fmt::Debug for ClientInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInfo")
            .field("client_type", &self.client_type)
            .field("content_server", &self.content_server)
            .field("content_type", &self.content_type)
            .field("content_version", &self.content_version)
            .field("channel_token", &self.channel_token)
            .field("cache_buster", &self.cache_buster)
            .field("secure_content", &self.secure_content)
            .field("timeout", &self.timeout)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("token_manager", &self.token_manager)
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}
