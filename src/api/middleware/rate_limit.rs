//! Rate limiting middleware using token bucket algorithm.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::config::MAX_RATE_LIMIT_PER_MINUTE;

/// Per-IP key taken from the socket peer, or from proxy headers when the
/// service sits behind a trusted reverse proxy.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    pub behind_proxy: bool,
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

pub type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Milliseconds between refills for a quota of `per_minute` requests.
///
/// Never below one millisecond; governor rejects a zero period.
fn replenish_interval_ms(per_minute: u32) -> u64 {
    60_000 / u64::from(per_minute.clamp(1, MAX_RATE_LIMIT_PER_MINUTE))
}

/// Creates a per-IP limiter allowing `per_minute` requests per minute.
///
/// The bucket holds a full minute of quota, so a client may burst up to
/// `per_minute` requests and then refills one request every
/// `60 / per_minute` seconds. Requests exceeding the limit receive
/// `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let auth = Router::new()
///     .route("/login", post(login_handler))
///     .layer(rate_limit::layer(5, false));
/// ```
pub fn layer(per_minute: u32, behind_proxy: bool) -> RateLimitLayer {
    let burst = per_minute.clamp(1, MAX_RATE_LIMIT_PER_MINUTE);

    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { behind_proxy })
        .per_millisecond(replenish_interval_ms(burst))
        .burst_size(burst)
        .finish()
        .expect("quota period and burst are non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}
