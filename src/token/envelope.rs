use jiff::{SignedDuration, Timestamp};

/// Last bearer value handed out plus the instant it stops being valid.
///
/// `expires_at` is `None` until the first successful exchange.
#[derive(Clone, Debug, Default)]
pub struct TokenEnvelope {
    value: Option<String>,
    expires_at: Option<Timestamp>,
}

impl TokenEnvelope {
    pub fn new(value: Option<String>) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// True once `now` is within `window` of expiry, inclusive.
    pub fn needs_refresh(&self, now: Timestamp, window: SignedDuration) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => now.duration_until(expires_at) <= window,
        }
    }

    /// Value and expiry are swapped together.
    pub fn replace(&mut self, value: String, expires_at: Timestamp) {
        self.value = Some(value);
        self.expires_at = Some(expires_at);
    }
}
