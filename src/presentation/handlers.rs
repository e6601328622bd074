// HTTP request handlers
use crate::application::chart_service::{ChartError, ChartView};
use crate::domain::farm::FarmOverview;
use crate::domain::metric::MetricKind;
use crate::domain::period::Period;
use crate::infrastructure::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct ChartQuery {
    pub period: Option<String>,
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

#[derive(Debug)]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn upstream(err: anyhow::Error) -> Self {
        tracing::error!("Backend request failed: {:#}", err);

        match err.downcast_ref::<ApiError>() {
            Some(api_err) => {
                let status = match api_err.status() {
                    Some(401) => StatusCode::UNAUTHORIZED,
                    Some(403) => StatusCode::FORBIDDEN,
                    Some(404) => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_GATEWAY,
                };
                Self {
                    status,
                    message: api_err.user_message(),
                }
            }
            None => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "An unexpected error occurred.".to_string(),
            },
        }
    }
}

impl From<ChartError> for HandlerError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::WrongSource { .. } => Self::bad_request(err.to_string()),
            ChartError::Upstream(e) => Self::upstream(e),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "message": self.message }));
        (self.status, body).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/farms", get(list_farms))
        .route("/farms/:id/analytics", get(analytics_chart))
        .route("/farms/:id/monitoring", get(monitoring_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Farms of the logged-in owner with recent activity
pub async fn list_farms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FarmOverview>, HandlerError> {
    let overview = state
        .chart_service
        .farms()
        .await
        .map_err(HandlerError::upstream)?;
    Ok(Json(overview))
}

/// Manual-report chart (mortality, weight, feed, water)
pub async fn analytics_chart(
    path: Result<Path<i64>, PathRejection>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartView>, HandlerError> {
    let id = farm_id(path)?;
    let (period, primary, secondary) = parse_chart_query(&query, MetricKind::Mortality)?;
    let chart = state
        .chart_service
        .analytics_chart(id, period, primary, secondary)
        .await?;
    Ok(Json(chart))
}

/// Sensor chart (temperature, humidity, ammonia)
pub async fn monitoring_chart(
    path: Result<Path<i64>, PathRejection>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartView>, HandlerError> {
    let id = farm_id(path)?;
    let (period, primary, secondary) = parse_chart_query(&query, MetricKind::Temperature)?;
    let chart = state
        .chart_service
        .monitoring_chart(id, period, primary, secondary)
        .await?;
    Ok(Json(chart))
}

fn farm_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, HandlerError> {
    let Path(id) = path.map_err(|e| HandlerError::bad_request(e.body_text()))?;
    Ok(id)
}

fn parse_chart_query(
    query: &ChartQuery,
    default_primary: MetricKind,
) -> Result<(Period, MetricKind, Option<MetricKind>), HandlerError> {
    let period = match query.period.as_deref() {
        Some(p) => p
            .parse::<Period>()
            .map_err(|e| HandlerError::bad_request(e.to_string()))?,
        None => Period::default(),
    };

    let primary = match query.primary.as_deref() {
        Some(tag) => parse_kind(tag)?,
        None => default_primary,
    };

    // "none" mirrors the dashboard's empty second-series option.
    let secondary = match query.secondary.as_deref().map(str::trim) {
        None | Some("") | Some("none") => None,
        Some(tag) => Some(parse_kind(tag)?),
    };

    Ok((period, primary, secondary))
}

fn parse_kind(tag: &str) -> Result<MetricKind, HandlerError> {
    tag.parse::<MetricKind>()
        .map_err(|e| HandlerError::bad_request(e.to_string()))
}
