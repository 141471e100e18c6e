//! GA Data API `runReport` wire types and the response reshape.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const PAGE_PATH_DIMENSION: &str = "pagePath";

/// A `runReport` request body. Built fresh per inbound request and
/// immutable once built: the trailing-60-day range, the two fixed metrics,
/// the page-path dimension, and an optional exact-match page filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub date_ranges: Vec<DateRange>,
    pub metrics: Vec<Metric>,
    pub dimensions: Vec<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<FilterExpression>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dimension {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterExpression {
    pub filter: Filter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_name: String,
    pub string_filter: StringFilter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    pub value: String,
    pub match_type: String,
}

impl ReportQuery {
    /// Build the fixed pageviews query. A present, non-empty `page_filter`
    /// attaches an exact-match filter on the page path; filter content is
    /// passed through verbatim, unvalidated.
    pub fn build(page_filter: Option<&str>) -> Self {
        let dimension_filter = page_filter
            .filter(|page| !page.is_empty())
            .map(|page| FilterExpression {
                filter: Filter {
                    field_name: PAGE_PATH_DIMENSION.to_string(),
                    string_filter: StringFilter {
                        value: page.to_string(),
                        match_type: "EXACT".to_string(),
                    },
                },
            });

        Self {
            date_ranges: vec![DateRange {
                start_date: "60daysAgo".to_string(),
                end_date: "today".to_string(),
            }],
            metrics: vec![
                Metric {
                    name: "screenPageViews".to_string(),
                },
                Metric {
                    name: "sessions".to_string(),
                },
            ],
            dimensions: vec![Dimension {
                name: PAGE_PATH_DIMENSION.to_string(),
            }],
            dimension_filter,
        }
    }
}

/// Raw `runReport` result. The provider omits `rows` entirely when the
/// report is empty, and row cells are positional, so every field defaults
/// and [`format_rows`] validates the shape before indexing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub rows: Option<Vec<Row>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub dimension_values: Vec<CellValue>,
    #[serde(default)]
    pub metric_values: Vec<CellValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellValue {
    #[serde(default)]
    pub value: String,
}

/// One formatted output record: `{page, pageviews, sessions}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub page: String,
    pub pageviews: i64,
    pub sessions: i64,
}

/// Reshape a raw report into `PageStats` records.
///
/// Absent or empty rows produce an empty vector; that is success, not
/// failure. Malformed rows (missing cells, non-numeric metric text) are an
/// error rather than a panic or a silent zero.
pub fn format_rows(raw: RunReportResponse) -> Result<Vec<PageStats>> {
    raw.rows.unwrap_or_default().into_iter().map(format_row).collect()
}

fn format_row(row: Row) -> Result<PageStats> {
    let page = row
        .dimension_values
        .first()
        .ok_or_else(|| anyhow!("report row is missing the pagePath dimension value"))?
        .value
        .clone();
    let pageviews = parse_metric(&row, 0, "screenPageViews")?;
    let sessions = parse_metric(&row, 1, "sessions")?;
    Ok(PageStats {
        page,
        pageviews,
        sessions,
    })
}

fn parse_metric(row: &Row, index: usize, name: &str) -> Result<i64> {
    let cell = row
        .metric_values
        .get(index)
        .ok_or_else(|| anyhow!("report row is missing the {name} metric value"))?;
    cell.value
        .parse()
        .map_err(|_| anyhow!("non-numeric {name} metric value '{}'", cell.value))
}

/// Executes one report-run call against the analytics provider.
///
/// `property` is the full resource path (`properties/<id>`). The production
/// implementation lives in the server crate; tests substitute mocks.
#[async_trait]
pub trait ReportRunner: Send + Sync {
    async fn run_report(&self, property: &str, query: &ReportQuery) -> Result<RunReportResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(page: &str, metrics: &[&str]) -> Row {
        Row {
            dimension_values: vec![CellValue {
                value: page.to_string(),
            }],
            metric_values: metrics
                .iter()
                .map(|v| CellValue {
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn unfiltered_query_shape() {
        let query = ReportQuery::build(None);
        let value = serde_json::to_value(&query).expect("serialize");

        assert_eq!(value["dateRanges"][0]["startDate"], "60daysAgo");
        assert_eq!(value["dateRanges"][0]["endDate"], "today");
        assert_eq!(value["metrics"][0]["name"], "screenPageViews");
        assert_eq!(value["metrics"][1]["name"], "sessions");
        assert_eq!(value["dimensions"][0]["name"], "pagePath");
        assert!(value.get("dimensionFilter").is_none());
    }

    #[test]
    fn page_filter_attaches_exact_match() {
        let query = ReportQuery::build(Some("/blog/intro"));
        let value = serde_json::to_value(&query).expect("serialize");

        let filter = &value["dimensionFilter"]["filter"];
        assert_eq!(filter["fieldName"], "pagePath");
        assert_eq!(filter["stringFilter"]["value"], "/blog/intro");
        assert_eq!(filter["stringFilter"]["matchType"], "EXACT");
    }

    #[test]
    fn empty_page_filter_is_unfiltered() {
        let query = ReportQuery::build(Some(""));
        assert!(query.dimension_filter.is_none());
    }

    #[test]
    fn absent_rows_format_to_empty() {
        let raw: RunReportResponse = serde_json::from_value(json!({})).expect("deserialize");
        assert!(raw.rows.is_none());
        assert!(format_rows(raw).expect("format").is_empty());
    }

    #[test]
    fn zero_rows_format_to_empty() {
        let raw = RunReportResponse {
            rows: Some(vec![]),
        };
        assert!(format_rows(raw).expect("format").is_empty());
    }

    #[test]
    fn one_row_maps_positionally() {
        let raw = RunReportResponse {
            rows: Some(vec![row("/blog", &["42", "7"])]),
        };
        assert_eq!(
            format_rows(raw).expect("format"),
            vec![PageStats {
                page: "/blog".to_string(),
                pageviews: 42,
                sessions: 7,
            }]
        );
    }

    #[test]
    fn missing_metric_cell_is_an_error() {
        let raw = RunReportResponse {
            rows: Some(vec![row("/blog", &["42"])]),
        };
        let err = format_rows(raw).expect_err("missing sessions cell");
        assert!(err.to_string().contains("missing the sessions metric"));
    }

    #[test]
    fn missing_dimension_cell_is_an_error() {
        let raw = RunReportResponse {
            rows: Some(vec![Row {
                dimension_values: vec![],
                metric_values: vec![],
            }]),
        };
        let err = format_rows(raw).expect_err("missing dimension cell");
        assert!(err.to_string().contains("pagePath dimension"));
    }

    #[test]
    fn non_numeric_metric_is_an_error() {
        let raw = RunReportResponse {
            rows: Some(vec![row("/blog", &["(not set)", "7"])]),
        };
        let err = format_rows(raw).expect_err("non-numeric pageviews");
        assert!(err.to_string().contains("non-numeric screenPageViews"));
        assert!(err.to_string().contains("(not set)"));
    }

    #[test]
    fn partial_provider_rows_deserialize_leniently() {
        let raw: RunReportResponse =
            serde_json::from_value(json!({ "rows": [{ "dimensionValues": [{}] }] }))
                .expect("deserialize");
        let rows = raw.rows.expect("rows");
        assert_eq!(rows[0].dimension_values[0].value, "");
        assert!(rows[0].metric_values.is_empty());
    }
}
