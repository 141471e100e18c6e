use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the pageviews endpoint.
///
/// Every failure — provider rejection, transport error, malformed provider
/// response — collapses to the same HTTP 500 envelope with the underlying
/// message attached. Nothing is recovered or retried internally.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Provider(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Provider(e) = self;
        // Alternate formatting renders the whole context chain; plain
        // Display would show only the outermost context and drop the
        // underlying cause text.
        let message = format!("{e:#}");
        tracing::error!(error = %message, "Error fetching pageviews");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "Failed to fetch pageviews",
                "message": message,
            })),
        )
            .into_response()
    }
}
