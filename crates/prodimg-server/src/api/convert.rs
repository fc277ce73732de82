use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use prodimg_convert::{validate_quality, ConvertErrorBody, ConvertRequest, ConvertResponse};

use super::{bad_json, plain_error, AppState};
use crate::middleware::RequestId;

pub(super) async fn convert_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ConvertRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_json(&rejection),
    };

    let Some(image_url) = body
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        return plain_error(StatusCode::BAD_REQUEST, "imageUrl is required");
    };

    let quality = match validate_quality(body.quality) {
        Ok(quality) => quality,
        Err(e) => return plain_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.converter.convert(image_url, quality).await {
        Ok(encoded) => {
            tracing::info!(
                request_id = %req_id.0,
                url = image_url,
                quality,
                size_bytes = encoded.size_bytes(),
                "image converted"
            );
            (StatusCode::OK, Json(ConvertResponse::from(&encoded))).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                url = image_url,
                error_kind = %e.kind(),
                error = %e,
                "conversion failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConvertErrorBody {
                    error: "Conversion failed".to_string(),
                    message: Some(e.to_string()),
                    kind: Some(e.kind()),
                }),
            )
                .into_response()
        }
    }
}
