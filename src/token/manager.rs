use std::fmt;
use std::sync::Arc;

use jiff::SignedDuration;
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::errors::Error;
use crate::telemetry::refresh::TokenRefreshEvents;

use super::{Clock, OAuthCredentials, SystemClock, TokenEnvelope, exchange};

/// A cached token is refreshed once "now" is this close to its expiry.
pub const REFRESH_WINDOW: SignedDuration = SignedDuration::from_millis(5000);

/// Owns the Authorization header value for a client.
///
/// Without OAuth credentials the manager is static: it hands back the token it
/// was built with and never touches the network. With credentials it performs
/// a client-credentials exchange on first use and again whenever the cached
/// token is within [`REFRESH_WINDOW`] of expiry.
pub struct TokenManager {
    credentials: Option<OAuthCredentials>,
    envelope: RwLock<TokenEnvelope>,
    refresh_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
    http_client: Client,
}

impl TokenManager {
    pub fn new(credentials: Option<OAuthCredentials>, token: Option<String>) -> Self {
        Self {
            credentials,
            envelope: RwLock::new(TokenEnvelope::new(token)),
            refresh_lock: Mutex::new(()),
            clock: Arc::new(SystemClock),
            http_client: Client::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a preconfigured client (proxies, TLS) for the token exchange.
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn envelope(&self) -> TokenEnvelope {
        self.envelope.read().await.clone()
    }

    /// Current Authorization header value, refreshing first when required.
    ///
    /// Value and expiry are only updated after a fully successful exchange.
    pub async fn get_auth_value(&self) -> Result<Option<String>, Error> {
        let Some(credentials) = self.credentials.as_ref() else {
            return Ok(self.envelope.read().await.value().map(str::to_owned));
        };

        {
            let envelope = self.envelope.read().await;
            if !envelope.needs_refresh(self.clock.now(), REFRESH_WINDOW) {
                return Ok(envelope.value().map(str::to_owned));
            }
        }

        // Only one exchange runs at a time; late arrivals reuse its result.
        let _lock = self.refresh_lock.lock().await;
        {
            let envelope = self.envelope.read().await;
            if !envelope.needs_refresh(self.clock.now(), REFRESH_WINDOW) {
                debug!("token refreshed by a concurrent caller");
                return Ok(envelope.value().map(str::to_owned));
            }
        }

        let events = TokenRefreshEvents::begin(&credentials.client_id, self.clock.now());
        let grant = match exchange::client_credentials(&self.http_client, credentials).await {
            Ok(grant) => grant,
            Err(err) => {
                events.failed(&err, self.clock.now());
                return Err(err);
            }
        };
        let expires_at = i64::try_from(grant.expires_in)
            .map_err(|e| Error::TokenExchange(format!("invalid expires_in: {}", e)))
            .and_then(|secs| {
                self.clock
                    .now()
                    .checked_add(SignedDuration::from_secs(secs))
                    .map_err(|e| Error::TokenExchange(format!("invalid expires_in: {}", e)))
            });
        let expires_at = match expires_at {
            Ok(expires_at) => expires_at,
            Err(err) => {
                events.failed(&err, self.clock.now());
                return Err(err);
            }
        };
        let value = grant.auth_header_value();
        self.envelope.write().await.replace(value.clone(), expires_at);
        events.granted(grant.expires_in, expires_at);
        Ok(Some(value))
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.credentials)
            .field("dynamic", &self.is_dynamic())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn static_manager_returns_supplied_token() {
        let manager = TokenManager::new(None, Some("Basic abc".into()));
        assert!(!manager.is_dynamic());
        for _ in 0..3 {
            assert_eq!(
                manager.get_auth_value().await.unwrap().as_deref(),
                Some("Basic abc")
            );
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn static_manager_without_token_yields_none() {
        let manager = TokenManager::new(None, None);
        assert_eq!(manager.get_auth_value().await.unwrap(), None);
    }
}
