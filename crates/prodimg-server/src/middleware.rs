use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is echoed back unchanged.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id for one HTTP request, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    admitted: usize,
}

/// Fixed-window limiter in front of `/convert` and `/api/search-product`.
///
/// Each admitted request costs one download or one scrape upstream, so the
/// budget is counted per request rather than per client.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: usize, window: Duration) -> Self {
        Self {
            budget,
            window,
            current: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(budget: usize) -> Self {
        Self::new(budget, Duration::from_secs(60))
    }

    /// Admit one request, or return how long until the window reopens.
    async fn try_admit(&self) -> Result<(), Duration> {
        let mut window = self.current.lock().await;
        let age = window.opened_at.elapsed();
        if age >= self.window {
            *window = Window {
                opened_at: Instant::now(),
                admitted: 0,
            };
        } else if window.admitted >= self.budget {
            return Err(self.window - age);
        }
        window.admitted += 1;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    error: Rejection,
}

#[derive(Debug, Serialize)]
struct Rejection {
    code: &'static str,
    message: String,
}

/// Reuse a usable inbound `x-request-id`, otherwise mint a `UUIDv4`.
fn inbound_request_id(req: &Request) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Tag the request with a [`RequestId`] and echo it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = inbound_request_id(&req);
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Reject work requests over budget with 429 and a `Retry-After` hint.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let retry_after = match limiter.try_admit().await {
        Ok(()) => return next.run(req).await,
        Err(wait) => wait.as_secs().max(1),
    };

    let req_id = req
        .extensions()
        .get::<RequestId>()
        .map_or("-", |id| id.0.as_str());
    tracing::warn!(
        request_id = req_id,
        route = req.uri().path(),
        budget = limiter.budget,
        retry_after_secs = retry_after,
        "work request rejected by rate limit"
    );

    let mut res = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RejectionBody {
            error: Rejection {
                code: "rate_limited",
                message: format!("rate limit exceeded, retry in {retry_after}s"),
            },
        }),
    )
        .into_response();
    res.headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    res
}
