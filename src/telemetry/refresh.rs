use jiff::Timestamp;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

/// Events for one OAuth client-credentials exchange, tied together by `attempt_id`.
#[derive(Clone, Debug)]
pub struct TokenRefreshEvents {
    attempt_id: Uuid,
    client_id: String,
}

impl TokenRefreshEvents {
    pub fn begin(client_id: &str, at: Timestamp) -> Self {
        let events = Self {
            attempt_id: Uuid::new_v4(),
            client_id: client_id.to_string(),
        };
        event!(
            Level::INFO,
            attempt_id = %events.attempt_id,
            client_id = %events.client_id,
            timestamp = %at,
            "refresh.start"
        );
        events
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn granted(&self, expires_in: u64, expires_at: Timestamp) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            client_id = %self.client_id,
            expires_in,
            expires_at = %expires_at,
            "refresh.success"
        );
    }

    /// The cached token is left untouched after a failure.
    pub fn failed(&self, error: &Error, at: Timestamp) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            client_id = %self.client_id,
            timestamp = %at,
            error = %error,
            "refresh.failure"
        );
    }
}
