use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use pagepulse_core::report::{format_rows, ReportQuery};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct PageviewsQuery {
    pub site: Option<String>,
    pub page: Option<String>,
}

/// `GET /api/v1?site=<hostname>&page=<path>` — pageviews and sessions per
/// page over the trailing 60 days.
///
/// An unresolved `site` is forwarded with an empty property id: the
/// resulting `properties/` path is rejected by the provider and surfaces
/// through the uniform 500 envelope. That passthrough is the historical
/// contract of this endpoint.
pub async fn pageviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageviewsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let property_id = params
        .site
        .as_deref()
        .and_then(|site| state.sites.resolve(site))
        .unwrap_or("");
    let property = format!("properties/{property_id}");

    let query = ReportQuery::build(params.page.as_deref());
    let raw = state.reporter.run_report(&property, &query).await?;
    let data = format_rows(raw)?;

    Ok(Json(json!({ "success": true, "data": data })))
}
