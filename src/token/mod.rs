mod clock;
mod credentials;
mod envelope;
mod exchange;
mod manager;

pub use clock::{Clock, SystemClock};
pub use credentials::OAuthCredentials;
pub use envelope::TokenEnvelope;
pub use exchange::TokenResponse;
pub use manager::{REFRESH_WINDOW, TokenManager};
