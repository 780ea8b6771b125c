//! read client configuration from a file, the environment or a stored secret

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use aws_config::BehaviorVersion;
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::token::OAuthCredentials;

pub enum ConfigLocation {
    File(String),
    Env,
    Secret,
}

/// Where requests are issued from. Chosen once per client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    #[default]
    Server,
    Browser,
}

/// Which REST surface `create_preview_client` binds to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewClientApi {
    #[serde(rename = "previewREST")]
    PreviewRest,
    #[default]
    #[serde(rename = "managementREST")]
    ManagementRest,
}

impl FromStr for PreviewClientApi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "previewREST" => Ok(PreviewClientApi::PreviewRest),
            "managementREST" => Ok(PreviewClientApi::ManagementRest),
            other => Err(Error::Config(format!(
                "preview_client_api '{}' is invalid. It may only be set to 'previewREST' or 'managementREST'",
                other
            ))),
        }
    }
}

/// Cache-busting token appended as `cb=` to generated URLs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheBuster {
    Key(String),
    Keys(CacheBusterKeys),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheBusterKeys {
    pub layout_key: Option<String>,
    pub system_key: Option<String>,
    pub content_key: Option<String>,
}

impl CacheBuster {
    /// Value used for content REST calls and renditions.
    pub fn content_key(&self) -> Option<&str> {
        match self {
            CacheBuster::Key(key) => non_empty(key),
            CacheBuster::Keys(keys) => keys.content_key.as_deref().and_then(non_empty),
        }
    }

    pub fn layout_key(&self) -> Option<&str> {
        match self {
            CacheBuster::Key(key) => non_empty(key),
            CacheBuster::Keys(keys) => keys.layout_key.as_deref().and_then(non_empty),
        }
    }

    pub fn system_key(&self) -> Option<&str> {
        match self {
            CacheBuster::Key(key) => non_empty(key),
            CacheBuster::Keys(keys) => keys.system_key.as_deref().and_then(non_empty),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, CacheBuster::Keys(_))
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// Proxies used by the server runtime, keyed by target scheme.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub content_server: Option<String>,
    pub content_version: Option<String>,
    pub channel_token: Option<String>,
    pub cache_buster: Option<CacheBuster>,
    pub secure_content: bool,
    pub timeout_ms: Option<u64>,
    pub authorization: Option<String>,
    pub authorization_params: Option<OAuthCredentials>,
    /// Only honoured by the management client (`published` or `draft`).
    pub content_type: Option<String>,
    pub runtime: Runtime,
    pub compiler_mode: bool,
    pub preview_client_api: PreviewClientApi,
    pub proxy: ProxyConfig,
}

impl ClientConfig {
    pub fn new(content_server: impl Into<String>) -> Self {
        Self {
            content_server: Some(content_server.into()),
            ..Self::default()
        }
    }

    pub fn with_channel_token(mut self, token: impl Into<String>) -> Self {
        self.channel_token = Some(token.into());
        self
    }

    pub fn with_content_version(mut self, version: impl Into<String>) -> Self {
        self.content_version = Some(version.into());
        self
    }

    pub fn with_cache_buster(mut self, cache_buster: CacheBuster) -> Self {
        self.cache_buster = Some(cache_buster);
        self
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn with_oauth(mut self, credentials: OAuthCredentials) -> Self {
        self.authorization_params = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = runtime;
        self
    }

    /// Default per-call timeout. Zero means no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            Some(ms) if ms > 0 => Some(Duration::from_millis(ms)),
            _ => None,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn from_env() -> Result<Self, Error> {
        let authorization_params = match optional_env("AUTH_PARAMS") {
            Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
                Error::Config(format!("AUTH_PARAMS is not valid credentials JSON: {}", e))
            })?),
            None => None,
        };
        let timeout_ms = match optional_env("TIMEOUT_MS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("TIMEOUT_MS must be a whole number, got '{}'", raw))
            })?),
            None => None,
        };
        let preview_client_api = match optional_env("PREVIEW_CLIENT_API") {
            Some(raw) => raw.parse()?,
            None => PreviewClientApi::default(),
        };
        Ok(ClientConfig {
            content_server: Some(
                std::env::var("CONTENT_SERVER")
                    .map_err(|_| Error::Config("Missing CONTENT_SERVER env var".to_string()))?,
            ),
            content_version: optional_env("CONTENT_VERSION"),
            channel_token: optional_env("CHANNEL_TOKEN"),
            cache_buster: optional_env("CACHE_BUSTER").map(CacheBuster::Key),
            secure_content: optional_env("SECURE_CONTENT").is_some_and(|v| v == "true"),
            timeout_ms,
            authorization: optional_env("AUTH"),
            authorization_params,
            content_type: optional_env("CONTENT_TYPE"),
            runtime: Runtime::Server,
            compiler_mode: false,
            preview_client_api,
            proxy: ProxyConfig {
                http: optional_env("oce_http_proxy"),
                https: optional_env("oce_https_proxy"),
            },
        })
    }

    pub async fn load(loc: ConfigLocation) -> Result<Self, Error> {
        let config = match loc {
            ConfigLocation::File(path) => Self::from_file(path)?,
            ConfigLocation::Env => Self::from_env()?,
            ConfigLocation::Secret => read_config_from_secret().await?,
        };
        Ok(config)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

async fn read_config_from_secret() -> Result<ClientConfig, Error> {
    let secret_arn = std::env::var("CONTENT_CONFIG_SECRET_ARN")
        .map_err(|_| Error::Config("Missing CONTENT_CONFIG_SECRET_ARN env var".to_string()))?;
    let client = aws_sdk_secretsmanager::Client::new(
        &aws_config::load_defaults(BehaviorVersion::latest()).await,
    );
    let resp = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Config(format!("Failed to get secret: {}", e)))?;
    let secret = resp
        .secret_string()
        .ok_or_else(|| Error::Config("Failed to get secret string, returned None".to_string()))?;
    Ok(serde_json::from_str(secret)?)
}
