use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::warn;

struct Window {
    opened: Instant,
    admitted: u32,
}

/// Request budget over a fixed one-second window.
///
/// Each router surface (open, session, management) carries its own limiter,
/// so a burst against the unauthenticated endpoints cannot starve the
/// authenticated ones.
#[derive(Clone)]
pub struct RateLimiter {
    surface: &'static str,
    budget: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(surface: &'static str, rps: u32) -> Self {
        Self {
            surface,
            budget: rps.max(1),
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                admitted: 0,
            })),
        }
    }

    fn try_admit(&self, now: Instant) -> bool {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        if now.duration_since(window.opened) >= Duration::from_secs(1) {
            window.opened = now;
            window.admitted = 0;
        }
        if window.admitted >= self.budget {
            return false;
        }
        window.admitted += 1;
        true
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_admit(Instant::now()) {
        warn!("Rate limit exceeded on the {} surface", limiter.surface);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "rate_limit_exceeded"})),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_caps_within_one_window() {
        let limiter = RateLimiter::new("session", 2);
        let t0 = Instant::now();
        assert!(limiter.try_admit(t0));
        assert!(limiter.try_admit(t0));
        assert!(!limiter.try_admit(t0));
    }

    #[test]
    fn window_resets_after_one_second() {
        let limiter = RateLimiter::new("open", 1);
        let t0 = Instant::now();
        assert!(limiter.try_admit(t0));
        assert!(!limiter.try_admit(t0 + Duration::from_millis(999)));
        assert!(limiter.try_admit(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn surfaces_do_not_share_a_window() {
        let open = RateLimiter::new("open", 1);
        let session = RateLimiter::new("session", 1);
        let t0 = Instant::now();
        assert!(open.try_admit(t0));
        assert!(!open.try_admit(t0));
        assert!(session.try_admit(t0));
    }

    #[test]
    fn zero_config_still_admits_one_per_window() {
        let limiter = RateLimiter::new("open", 0);
        let t0 = Instant::now();
        assert!(limiter.try_admit(t0));
        assert!(!limiter.try_admit(t0));
    }
}
