use base64::{Engine, engine::general_purpose};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, error};

use crate::errors::Error;

use super::OAuthCredentials;

/// Body returned by the identity provider token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn auth_header_value(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// POST a client-credentials grant to `{idp_url}/oauth2/v1/token`.
pub(crate) async fn client_credentials(
    http: &Client,
    credentials: &OAuthCredentials,
) -> Result<TokenResponse, Error> {
    let url = credentials.token_endpoint()?;
    let basic = general_purpose::STANDARD.encode(format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    ));
    let body = format!(
        "grant_type=client_credentials&scope={}",
        urlencoding::encode(&credentials.client_scope_url)
    );
    debug!(url = %url, client_id = %credentials.client_id, "token.exchange");

    let resp = http
        .post(url)
        .header(AUTHORIZATION, format!("Basic {}", basic))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        error!("token exchange failed: status={} body='{}'", status, text);
        return Err(Error::TokenExchange(format!(
            "token endpoint returned {}: {}",
            status, text
        )));
    }

    serde_json::from_str(&text)
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {}", e)))
}
