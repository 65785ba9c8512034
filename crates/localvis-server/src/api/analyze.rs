use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use localvis_core::ScoreResult;
use localvis_engine::{EngineError, RawFields};
use serde::Deserialize;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    country: String,
    #[serde(default)]
    weight_table: Option<String>,
    fields: RawFields,
}

/// `POST /api/v1/analyze`: score one listing.
///
/// Validation failures return 422 naming the offending field; an unknown
/// weight table or malformed body returns 400.
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ScoreResult>>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            req_id.0.clone(),
            "bad_request",
            rejection.body_text(),
        )
    })?;

    if request.country.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            req_id.0,
            "missing_required_field",
            "country is required",
        )
        .with_field("country"));
    }

    let result = state
        .engine
        .analyze_with_table(
            &request.fields,
            &request.country,
            request.weight_table.as_deref(),
        )
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::Validation(e) => {
            tracing::debug!(field = e.field(), code = e.code(), "analysis input rejected");
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                request_id,
                e.code(),
                e.to_string(),
            )
            .with_field(e.field())
        }
        EngineError::UnknownWeightTable(_) => ApiError::new(
            StatusCode::BAD_REQUEST,
            request_id,
            "unknown_weight_table",
            error.to_string(),
        )
        .with_field("weight_table"),
    }
}
