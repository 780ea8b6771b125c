use std::time::Instant;

use reqwest::{Method, StatusCode};
use tracing::{Level, event};

use crate::errors::Error;

/// Timing and outcome of a single content REST call.
pub struct CallEvents {
    method: Method,
    path: String,
    started: Instant,
}

impl CallEvents {
    pub fn begin(method: &Method, path: &str) -> Self {
        event!(Level::DEBUG, method = %method, path, "call.start");
        Self {
            method: method.clone(),
            path: path.to_string(),
            started: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn finished(&self, status: StatusCode) {
        event!(
            Level::DEBUG,
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            elapsed_ms = self.elapsed_ms(),
            "call.success"
        );
    }

    pub fn failed(&self, error: &Error) {
        event!(
            Level::WARN,
            method = %self.method,
            path = %self.path,
            elapsed_ms = self.elapsed_ms(),
            error = %error,
            "call.failure"
        );
    }
}
