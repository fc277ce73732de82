mod convert;
mod search;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prodimg_convert::ImageConverter;
use prodimg_core::BrandRegistry;
use prodimg_scraper::ScrapeClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BrandRegistry>,
    pub scraper: Arc<ScrapeClient>,
    pub converter: Arc<ImageConverter>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
struct EndpointInfo {
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

/// `{ "error": message }` with the given status.
pub(super) fn plain_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Map a body that failed to parse as JSON to a 400.
pub(super) fn bad_json(rejection: &JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "rejected request body");
    plain_error(
        StatusCode::BAD_REQUEST,
        format!("invalid JSON body: {}", rejection.body_text()),
    )
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn work_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert::convert_image))
        .route("/api/search-product", post(search::search_product))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(work_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "healthy" })
}

async fn index() -> impl IntoResponse {
    Json(ServiceInfo {
        service: "prodimg",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            EndpointInfo {
                method: "POST",
                path: "/convert",
                description: "Convert an image URL to WebP; body { imageUrl, quality }",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/search-product",
                description: "Find a product image URL; body { itemNumber, brand }",
            },
            EndpointInfo {
                method: "GET",
                path: "/health",
                description: "Liveness check",
            },
        ],
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
