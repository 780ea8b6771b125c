use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ContentApi, ContentType, QueryParams, build_search_params, extract_server};
use crate::config::{ClientConfig, PreviewClientApi, Runtime};
use crate::errors::Error;
use crate::token::TokenManager;
use crate::transport::{
    BeforeSend, BrowserTransport, RestCallArgs, ServerTransport, Transport,
};

use super::{CallOptions, ClientInfo, ClientKind, ContentClient, LayoutLoader, PageLinkResolver};

/// Client for published content.
pub fn create_delivery_client(config: &ClientConfig) -> Result<ContentClient, Error> {
    ContentClient::delivery(config)
}

/// Client for unpublished content, bound to the REST surface chosen by
/// `preview_client_api`.
pub fn create_preview_client(config: &ClientConfig) -> Result<ContentClient, Error> {
    match config.preview_client_api {
        PreviewClientApi::PreviewRest => ContentClient::preview(config),
        PreviewClientApi::ManagementRest => ContentClient::management(config),
    }
}

pub fn create_management_client(config: &ClientConfig) -> Result<ContentClient, Error> {
    ContentClient::management(config)
}

impl ContentClient {
    pub fn delivery(config: &ClientConfig) -> Result<Self, Error> {
        Self::build(ClientKind::Delivery, config)
    }

    pub fn preview(config: &ClientConfig) -> Result<Self, Error> {
        Self::build(ClientKind::Preview, config)
    }

    pub fn management(config: &ClientConfig) -> Result<Self, Error> {
        Self::build(ClientKind::Management, config)
    }

    fn build(kind: ClientKind, config: &ClientConfig) -> Result<Self, Error> {
        let api = ContentApi::create(config.content_version.as_deref());
        let content_server = extract_server(config.content_server.as_deref())?;

        let mut token_manager = TokenManager::new(
            config.authorization_params.clone(),
            config.authorization.clone(),
        );
        let transport: Arc<dyn Transport> = match config.runtime {
            Runtime::Server => {
                let server = ServerTransport::new(&config.proxy)?;
                token_manager = token_manager.with_http_client(server.http_client().clone());
                Arc::new(server)
            }
            Runtime::Browser => Arc::new(BrowserTransport::default()),
        };

        let info = ClientInfo {
            client_type: kind,
            content_server,
            content_type: kind.default_content_type(config.content_type.as_deref()),
            content_version: api.reported_version(),
            channel_token: config.channel_token.clone().filter(|t| !t.is_empty()),
            cache_buster: config.cache_buster.clone(),
            secure_content: config.secure_content,
            timeout: config.timeout(),
            authorization: config.authorization.clone(),
            token_manager: Arc::new(token_manager),
            runtime: config.runtime,
            before_send: None,
        };
        debug!(info = ?info, "content client created");

        Ok(Self {
            api,
            info,
            transport,
            compiler_mode: config.compiler_mode,
            layouts: None,
            page_links: None,
        })
    }

    /// Replace the transport, e.g. with a preconfigured or instrumented one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Use a prebuilt token manager, e.g. one sharing a clock with tests.
    pub fn with_token_manager(mut self, token_manager: Arc<TokenManager>) -> Self {
        self.info.token_manager = token_manager;
        self
    }

    /// Hook applied to every call that does not supply its own.
    pub fn with_before_send(mut self, hook: Arc<dyn BeforeSend>) -> Self {
        self.info.before_send = Some(hook);
        self
    }

    pub fn with_layout_loader(mut self, loader: Arc<dyn LayoutLoader>) -> Self {
        self.layouts = Some(loader);
        self
    }

    pub fn with_page_link_resolver(mut self, resolver: Arc<dyn PageLinkResolver>) -> Self {
        self.page_links = Some(resolver);
        self
    }

    pub fn with_compiler_mode(mut self, compiler_mode: bool) -> Self {
        self.compiler_mode = compiler_mode;
        self
    }

    /// A copy of the client's settings.
    pub fn get_info(&self) -> ClientInfo {
        self.info.clone()
    }

    pub fn kind(&self) -> ClientKind {
        self.info.client_type
    }

    pub fn api(&self) -> &ContentApi {
        &self.api
    }

    /// Current Authorization header value, fetching a token first when needed.
    pub async fn get_authorization_header_value(&self) -> Result<Option<String>, Error> {
        self.info.token_manager.get_auth_value().await
    }

    /// Validate a requested content type, falling back to the client's own.
    pub(crate) fn content_type(&self, requested: Option<&str>) -> ContentType {
        let Some(raw) = requested.filter(|r| !r.is_empty()) else {
            return self.info.content_type;
        };
        let valid = self.info.client_type.valid_content_types();
        match raw.parse::<ContentType>() {
            Ok(ct) if valid.contains(&ct) => ct,
            _ => {
                warn!(
                    "Invalid value for content type request: {}. Allowed values are: {:?}. Defaulting to: {}",
                    raw, valid, self.info.content_type
                );
                self.info.content_type
            }
        }
    }

    /// Build the per-call arguments from client settings and call values.
    pub(crate) fn resolve_rest_args(
        &self,
        method: Method,
        params: &QueryParams,
        options: &CallOptions,
    ) -> RestCallArgs {
        let search = build_search_params(params, options.search.as_deref());
        let info = &self.info;

        let mut args = RestCallArgs::new(
            method,
            info.content_server.clone(),
            self.content_type(options.content_type.as_deref()),
        );
        args.channel_token = info.channel_token.clone();
        args.cache_buster = info.cache_buster.clone();
        args.secure_content = info.secure_content;
        args.language = options.language.clone().filter(|lang| !lang.is_empty());
        args.post_data = Some(search.post_data);
        args.search = search.get_data;
        args.use_aggregate = search.use_aggregate;
        args.asset_version = search.asset_version;
        args.authorization = info.authorization.clone();
        args.token_manager = Some(info.token_manager.clone());
        args.timeout = options.timeout.or(info.timeout);
        args.before_send = options
            .before_send
            .clone()
            .or_else(|| info.before_send.clone());
        args
    }

    /// Issue one request and reshape the response for the requested version.
    pub(crate) async fn call(&self, url: &str, args: &RestCallArgs) -> Result<Value, Error> {
        let response = self.transport.call_rest_server(url, args).await?;
        Ok(self.api.coerce_data(response))
    }
}
