//! HTTP surface. Returns a composable `Router` that can be mounted on any
//! axum server; the core stays transport-agnostic behind `BillAnalyzer`.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::analyzer::{AnalyzeError, AnalyzeRequest, BillAnalyzer};
use crate::config::APP_VERSION;
use crate::document::RawDocument;

use super::projection::{project, AnalyzeResponse};

/// Build the API router.
pub fn api_router(analyzer: Arc<BillAnalyzer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/bill/analyze", post(analyze))
        .with_state(analyzer)
        // The upload surface is a separate origin in development.
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": APP_VERSION }))
}

async fn analyze(
    State(analyzer): State<Arc<BillAnalyzer>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut bill: Option<RawDocument> = None;
    let mut summary: Option<RawDocument> = None;
    let mut insurance_plan: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "bill" | "summary" => {
                let media_type = field
                    .content_type()
                    .ok_or_else(|| {
                        ApiError::bad_request(format!("'{name}' part has no declared content type"))
                    })?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read '{name}': {e}")))?;
                let slot = if name == "bill" { &mut bill } else { &mut summary };
                *slot = Some(RawDocument::new(bytes.to_vec(), media_type));
            }
            "insurance_plan" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid insurance_plan: {e}")))?;
                insurance_plan = Some(value).filter(|v| !v.trim().is_empty());
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let bill = bill.ok_or_else(|| ApiError::bad_request("missing 'bill' document".into()))?;
    let summary =
        summary.ok_or_else(|| ApiError::bad_request("missing 'summary' document".into()))?;

    let request = AnalyzeRequest::new(bill, summary, insurance_plan.clone());
    let result = analyzer.analyze(request).await?;

    Ok(Json(project(&result, insurance_plan)))
}

/// Uniform `{ "error": message }` failure body. Any failure means no
/// analysis was produced; partial results are never rendered.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        let status = if err.is_unsupported_format() {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        } else {
            match err {
                AnalyzeError::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                AnalyzeError::Adjudication(_) => StatusCode::BAD_GATEWAY,
            }
        };
        tracing::warn!(error = %err, status = status.as_u16(), "Analysis request failed");
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
