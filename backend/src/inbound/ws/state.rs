//! Shared WebSocket adapter state.

use std::sync::Arc;

use tracing::warn;
use url::{Origin, Url};

use crate::domain::ports::Authenticator;
use crate::outbound::realtime::RoomRegistry;

/// Origin accepted when no client URL is configured.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Browser origins allowed to open the realtime channel.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Vec<Origin>);

impl AllowedOrigins {
    /// Parse each entry as a URL and keep its origin. Unparsable entries are
    /// logged and skipped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = origins
            .into_iter()
            .filter_map(|raw| match Url::parse(raw.as_ref()) {
                Ok(url) => Some(url.origin()),
                Err(error) => {
                    warn!(origin = raw.as_ref(), %error, "ignoring unparsable allowed origin");
                    None
                }
            })
            .filter(Origin::is_tuple)
            .collect();
        Self(parsed)
    }

    pub fn allows(&self, origin: &Url) -> bool {
        let origin = origin.origin();
        self.0.iter().any(|allowed| *allowed == origin)
    }
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        Self::new([DEFAULT_ALLOWED_ORIGIN])
    }
}

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    pub authenticator: Arc<dyn Authenticator>,
    pub rooms: Arc<RoomRegistry>,
    pub allowed_origins: Arc<AllowedOrigins>,
}

impl WsState {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        rooms: Arc<RoomRegistry>,
        allowed_origins: AllowedOrigins,
    ) -> Self {
        Self {
            authenticator,
            rooms,
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}
