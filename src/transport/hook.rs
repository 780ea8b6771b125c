use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use tracing::debug;

use crate::errors::Error;

pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// The request as it will be sent, open to modification by a [`BeforeSend`] hook.
#[derive(Clone, Debug)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

/// Caller hook run immediately before dispatch.
///
/// Returning `Ok(false)` drops the call without touching the network;
/// an `Err` fails the call as a hook error.
#[async_trait]
pub trait BeforeSend: Send + Sync {
    async fn before_send(&self, request: &mut OutgoingRequest) -> Result<bool, HookError>;
}

#[async_trait]
impl<F> BeforeSend for F
where
    F: Fn(&mut OutgoingRequest) -> Result<bool, HookError> + Send + Sync,
{
    async fn before_send(&self, request: &mut OutgoingRequest) -> Result<bool, HookError> {
        self(request)
    }
}

pub(crate) async fn run_before_send(
    hook: Option<&std::sync::Arc<dyn BeforeSend>>,
    request: &mut OutgoingRequest,
) -> Result<(), Error> {
    let Some(hook) = hook else {
        return Ok(());
    };
    match hook.before_send(request).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            debug!(url = %request.url, "call aborted by before_send");
            Err(Error::Aborted)
        }
        Err(e) => Err(Error::BeforeSend(e.to_string())),
    }
}
