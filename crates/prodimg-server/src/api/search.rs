use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use prodimg_scraper::{extract_image_url, locate};
use serde::{Deserialize, Serialize};

use super::{bad_json, AppState};
use crate::middleware::RequestId;

/// Item numbers arrive as strings or bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ItemNumber {
    Text(String),
    Number(u64),
}

impl ItemNumber {
    fn into_string(self) -> String {
        match self {
            ItemNumber::Text(s) => s.trim().to_string(),
            ItemNumber::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchRequest {
    #[serde(default)]
    item_number: Option<ItemNumber>,
    #[serde(default)]
    brand: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    success: bool,
    item_number: String,
    brand: String,
    product_url: String,
    image_url: String,
}

#[derive(Debug, Serialize)]
struct SearchFailure {
    success: bool,
    error: String,
}

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(SearchFailure {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

pub(super) async fn search_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_json(&rejection),
    };

    let Some(item_number) = body
        .item_number
        .map(ItemNumber::into_string)
        .filter(|s| !s.is_empty())
    else {
        return failure(StatusCode::BAD_REQUEST, "Item number is required");
    };

    let requested_brand = body
        .brand
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());
    let Some(profile) = state.registry.resolve(requested_brand) else {
        return failure(
            StatusCode::BAD_REQUEST,
            format!("Unsupported brand: {}", requested_brand.unwrap_or_default()),
        );
    };

    let page = match locate(&state.scraper, &item_number, profile).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(
                request_id = %req_id.0,
                item = %item_number,
                brand = profile.key(),
                error_kind = %e.kind(),
                error = %e,
                "product page lookup failed"
            );
            return failure(StatusCode::NOT_FOUND, "Failed to scrape product page");
        }
    };

    let image_url = match extract_image_url(&page.content, profile) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(
                request_id = %req_id.0,
                item = %item_number,
                brand = profile.key(),
                url = %page.product_url,
                error = %e,
                "no image on product page"
            );
            return failure(StatusCode::NOT_FOUND, "Product image not found");
        }
    };

    tracing::info!(
        request_id = %req_id.0,
        item = %item_number,
        brand = profile.key(),
        image_url = %image_url,
        "product image found"
    );
    (
        StatusCode::OK,
        Json(SearchResponse {
            success: true,
            item_number,
            brand: profile.key().to_string(),
            product_url: page.product_url,
            image_url,
        }),
    )
        .into_response()
}
