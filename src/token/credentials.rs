use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

const TOKEN_PATH: &str = "/oauth2/v1/token";

/// Client-credentials grant inputs. All four values travel together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub client_scope_url: String,
    pub idp_url: String,
}

impl OAuthCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        client_scope_url: impl Into<String>,
        idp_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client_scope_url: client_scope_url.into(),
            idp_url: idp_url.into(),
        }
    }

    /// `{idp_url}/oauth2/v1/token`, replacing any path on the identity provider URL.
    pub fn token_endpoint(&self) -> Result<Url, Error> {
        let base = Url::parse(&self.idp_url)
            .map_err(|e| Error::Config(format!("Invalid idp URL '{}': {}", self.idp_url, e)))?;
        base.join(TOKEN_PATH)
            .map_err(|e| Error::Config(format!("Invalid token endpoint: {}", e)))
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("client_scope_url", &self.client_scope_url)
            .field("idp_url", &self.idp_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_endpoint_replaces_idp_path() {
        let creds = OAuthCredentials::new("id", "secret", "scope", "https://idp.example.com/some/path");
        assert_eq!(
            creds.token_endpoint().unwrap().as_str(),
            "https://idp.example.com/oauth2/v1/token"
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let creds = OAuthCredentials::new("id", "hunter2", "scope", "https://idp");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
