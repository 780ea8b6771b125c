#![allow(dead_code)]

use std::sync::{Mutex, Once};

use jiff::{SignedDuration, Timestamp};

use content_delivery_sdk::ClientConfig;
use content_delivery_sdk::token::Clock;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: SignedDuration) {
        let mut guard = self.now.lock().expect("clock poisoned");
        *guard = guard.checked_add(by).expect("clock advance overflowed");
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().expect("clock poisoned")
    }
}

pub fn config(server_uri: &str) -> ClientConfig {
    ClientConfig::new(server_uri).with_channel_token("tok")
}

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}
