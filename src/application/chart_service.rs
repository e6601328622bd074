// Chart service - Use case for turning aggregate payloads into chart view-models
use crate::application::dashboard_api::DashboardApi;
use crate::domain::axis::{bar_fraction, scale_dual, AxisScale};
use crate::domain::envelope::{lookup, unwrap, unwrap_owned};
use crate::domain::farm::FarmOverview;
use crate::domain::format::{format_reading, format_tick};
use crate::domain::metric::{as_number, MetricKind, MetricSeries, Source};
use crate::domain::period::Period;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("{kind} is not available from {expected:?} data")]
    WrongSource { kind: MetricKind, expected: Source },
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSettings {
    /// Floor for the height of non-zero bars, as a fraction of the track.
    pub min_bar_fraction: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            min_bar_fraction: 0.05,
        }
    }
}

/// One axis of a chart, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisView {
    pub kind: MetricKind,
    pub unit: &'static str,
    pub samples: Vec<f64>,
    pub ceiling: f64,
    pub ticks: [f64; 5],
    pub tick_labels: Vec<String>,
    pub bar_fractions: Vec<f64>,
}

impl AxisView {
    fn new(kind: MetricKind, samples: Vec<f64>, scale: AxisScale, settings: &ChartSettings) -> Self {
        let rounding = kind.profile().rounding;
        let tick_labels = scale.ticks.iter().map(|t| format_tick(*t, rounding)).collect();
        let bar_fractions = samples
            .iter()
            .map(|v| bar_fraction(*v, scale.ceiling, settings.min_bar_fraction))
            .collect();

        Self {
            kind,
            unit: kind.unit(),
            samples,
            ceiling: scale.ceiling,
            ticks: scale.ticks,
            tick_labels,
            bar_fractions,
        }
    }
}

/// Latest single sensor value, not an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub kind: MetricKind,
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub farm_id: i64,
    pub period: Period,
    pub labels: Vec<String>,
    pub primary: AxisView,
    pub secondary: Option<AxisView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub readings: Vec<Reading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Clone)]
pub struct ChartService {
    api: Arc<dyn DashboardApi>,
    settings: ChartSettings,
}

impl ChartService {
    pub fn new(api: Arc<dyn DashboardApi>, settings: ChartSettings) -> Self {
        Self { api, settings }
    }

    pub async fn farms(&self) -> anyhow::Result<FarmOverview> {
        let payload = unwrap_owned(self.api.get_dashboard().await?);
        let overview = FarmOverview::from_payload(&payload);

        if overview.farms.is_empty() {
            tracing::warn!("Dashboard response contained no farms");
        }
        Ok(overview)
    }

    pub async fn analytics_chart(
        &self,
        farm_id: i64,
        period: Period,
        primary: MetricKind,
        secondary: Option<MetricKind>,
    ) -> Result<ChartView, ChartError> {
        self.chart(Source::Analysis, farm_id, period, primary, secondary)
            .await
    }

    pub async fn monitoring_chart(
        &self,
        farm_id: i64,
        period: Period,
        primary: MetricKind,
        secondary: Option<MetricKind>,
    ) -> Result<ChartView, ChartError> {
        self.chart(Source::Monitoring, farm_id, period, primary, secondary)
            .await
    }

    async fn chart(
        &self,
        source: Source,
        farm_id: i64,
        period: Period,
        primary: MetricKind,
        secondary: Option<MetricKind>,
    ) -> Result<ChartView, ChartError> {
        for kind in std::iter::once(primary).chain(secondary) {
            if kind.source() != source {
                return Err(ChartError::WrongSource {
                    kind,
                    expected: source,
                });
            }
        }

        let body = match source {
            Source::Analysis => self.api.get_analytics(farm_id, period).await?,
            Source::Monitoring => self.api.get_monitoring(farm_id, period).await?,
        };
        let payload = unwrap(&body);

        let primary_series = MetricSeries::from_aggregate(payload, primary);
        let secondary_series = secondary.map(|kind| (kind, MetricSeries::from_aggregate(payload, kind)));

        if primary_series.is_empty() {
            tracing::warn!("Farm {} {:?} response has no labels", farm_id, source);
        }

        tracing::debug!(
            "Farm {} {:?} chart: {} points of {}{}",
            farm_id,
            source,
            primary_series.len(),
            primary,
            secondary.map(|k| format!(" + {}", k)).unwrap_or_default()
        );

        let axes = scale_dual(
            (primary_series.samples.as_slice(), primary),
            secondary_series
                .as_ref()
                .map(|(kind, series)| (series.samples.as_slice(), *kind)),
        );

        let secondary_view = match (secondary_series, axes.secondary) {
            (Some((kind, series)), Some(scale)) => {
                Some(AxisView::new(kind, series.samples, scale, &self.settings))
            }
            _ => None,
        };

        let (readings, status) = match source {
            Source::Monitoring => sensor_readings(payload),
            Source::Analysis => (Vec::new(), None),
        };

        Ok(ChartView {
            farm_id,
            period,
            labels: primary_series.labels,
            primary: AxisView::new(primary, primary_series.samples, axes.primary, &self.settings),
            secondary: secondary_view,
            readings,
            status,
            meta: payload.get("meta").cloned(),
        })
    }
}

/// Latest readings from `overview`, or the older `current` block.
fn sensor_readings(payload: &Value) -> (Vec<Reading>, Option<String>) {
    let Some(overview) = lookup(payload, &["overview", "current"]) else {
        tracing::warn!("No overview data in monitoring response");
        return (Vec::new(), None);
    };

    let readings = MetricKind::ALL
        .into_iter()
        .filter(|kind| kind.source() == Source::Monitoring)
        .map(|kind| {
            let value = overview.get(kind.profile().field).and_then(as_number);
            Reading {
                kind,
                value,
                display: format_reading(value, kind),
            }
        })
        .collect();

    let status = overview
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("normal")
        .to_string();

    (readings, Some(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeApi {
        dashboard: Value,
        analytics: Value,
        monitoring: Value,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new(dashboard: Value, analytics: Value, monitoring: Value) -> Self {
            Self {
                dashboard,
                analytics,
                monitoring,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn get_dashboard(&self) -> anyhow::Result<Value> {
            self.calls.lock().unwrap().push("dashboard".to_string());
            Ok(self.dashboard.clone())
        }

        async fn get_analytics(&self, farm_id: i64, period: Period) -> anyhow::Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("analytics {} {}", farm_id, period.range()));
            Ok(self.analytics.clone())
        }

        async fn get_monitoring(&self, farm_id: i64, period: Period) -> anyhow::Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("monitoring {} {}", farm_id, period.range()));
            Ok(self.monitoring.clone())
        }
    }

    struct FailingApi;

    #[async_trait]
    impl DashboardApi for FailingApi {
        async fn get_dashboard(&self) -> anyhow::Result<Value> {
            anyhow::bail!("connection refused")
        }

        async fn get_analytics(&self, _: i64, _: Period) -> anyhow::Result<Value> {
            anyhow::bail!("connection refused")
        }

        async fn get_monitoring(&self, _: i64, _: Period) -> anyhow::Result<Value> {
            anyhow::bail!("connection refused")
        }
    }

    fn service(api: FakeApi) -> (ChartService, Arc<FakeApi>) {
        let api = Arc::new(api);
        (ChartService::new(api.clone(), ChartSettings::default()), api)
    }

    fn analytics_body() -> Value {
        json!({"data": {"data": {
            "labels": ["00:00", "04:00", "08:00", "12:00"],
            "mortality": [2, 3, 1, 2],
            "avg_weight": [800, 820, 850, 870],
            "feed": [0, 0, 0, 0],
            "meta": {"range": "1_day", "farm_id": 1}
        }}})
    }

    #[tokio::test]
    async fn test_analytics_chart_with_secondary_axis() {
        let (service, api) = service(FakeApi::new(Value::Null, analytics_body(), Value::Null));

        let chart = service
            .analytics_chart(1, Period::OneDay, MetricKind::Mortality, Some(MetricKind::AverageWeight))
            .await
            .unwrap();

        assert_eq!(chart.labels.len(), 4);
        assert_eq!(chart.primary.ceiling, 5.0);
        assert_eq!(chart.primary.tick_labels, vec!["5", "4", "3", "1", "0"]);
        assert_eq!(chart.primary.unit, "ekor");
        assert_eq!(chart.primary.bar_fractions, vec![0.4, 0.6, 0.2, 0.4]);

        let secondary = chart.secondary.unwrap();
        assert_eq!(secondary.ceiling, 1000.0);
        assert_eq!(secondary.tick_labels, vec!["1000", "750", "500", "250", "0"]);

        assert!(chart.readings.is_empty());
        assert_eq!(chart.meta, Some(json!({"range": "1_day", "farm_id": 1})));
        assert_eq!(*api.calls.lock().unwrap(), vec!["analytics 1 1_day"]);
    }

    #[tokio::test]
    async fn test_all_zero_series_uses_default_axis() {
        let (service, _) = service(FakeApi::new(Value::Null, analytics_body(), Value::Null));

        let chart = service
            .analytics_chart(1, Period::OneWeek, MetricKind::Feed, None)
            .await
            .unwrap();

        assert_eq!(chart.primary.ceiling, 100.0);
        assert_eq!(chart.primary.bar_fractions, vec![0.0; 4]);
        assert!(chart.secondary.is_none());
    }

    #[tokio::test]
    async fn test_monitoring_chart_includes_readings() {
        let monitoring = json!({
            "labels": ["Senin", "Selasa"],
            "temperature": [28.4, null],
            "humidity": [61.0, 64.5],
            "overview": {"temperature": 29.6, "humidity": 63.0, "status": "normal"}
        });
        let (service, api) = service(FakeApi::new(Value::Null, Value::Null, monitoring));

        let chart = service
            .monitoring_chart(3, Period::OneWeek, MetricKind::Temperature, Some(MetricKind::Humidity))
            .await
            .unwrap();

        assert_eq!(chart.primary.samples, vec![28.4, 0.0]);
        assert_eq!(chart.primary.ceiling, 50.0);
        assert_eq!(chart.secondary.as_ref().map(|s| s.ceiling), Some(100.0));
        assert_eq!(chart.status.as_deref(), Some("normal"));
        assert_eq!(chart.readings.len(), 3);
        assert_eq!(chart.readings[0].display, "29.6°C");
        assert_eq!(chart.readings[2].value, None);
        assert_eq!(chart.readings[2].display, "-");
        assert_eq!(*api.calls.lock().unwrap(), vec!["monitoring 3 1_week"]);
    }

    #[test]
    fn test_sensor_readings_parse_numeric_strings() {
        let (readings, status) = sensor_readings(&json!({"overview": {"temperature": "29.6"}}));

        let kinds: Vec<MetricKind> = readings.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![MetricKind::Temperature, MetricKind::Humidity, MetricKind::Ammonia]
        );
        assert_eq!(readings[0].value, Some(29.6));
        assert_eq!(readings[0].display, "29.6°C");
        assert_eq!(readings[1].value, None);
        assert_eq!(status.as_deref(), Some("normal"));
    }

    #[test]
    fn test_sensor_readings_fall_back_to_current() {
        let (readings, status) =
            sensor_readings(&json!({"current": {"ammonia": 12, "status": "bahaya"}}));
        assert_eq!(readings[2].value, Some(12.0));
        assert_eq!(status.as_deref(), Some("bahaya"));

        let (readings, status) = sensor_readings(&json!({"labels": []}));
        assert!(readings.is_empty());
        assert_eq!(status, None);
    }

    #[tokio::test]
    async fn test_wrong_source_is_rejected_before_fetching() {
        let (service, api) = service(FakeApi::new(Value::Null, analytics_body(), Value::Null));

        let err = service
            .analytics_chart(1, Period::OneDay, MetricKind::Feed, Some(MetricKind::Ammonia))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ChartError::WrongSource {
                kind: MetricKind::Ammonia,
                expected: Source::Analysis
            }
        ));
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_farms_from_double_envelope() {
        let dashboard = json!({"data": {"data": {
            "farms": [{"farm_id": "5", "farm_name": "Kandang E", "temperature": "30.2"}]
        }}});
        let (service, api) = service(FakeApi::new(dashboard, Value::Null, Value::Null));

        let overview = service.farms().await.unwrap();
        assert_eq!(overview.farms[0].farm_id, 5);
        assert_eq!(overview.farms[0].temperature, Some(30.2));
        assert_eq!(*api.calls.lock().unwrap(), vec!["dashboard"]);
    }

    #[tokio::test]
    async fn test_farms_from_single_envelope() {
        let dashboard = json!({"data": {
            "farms": [{"farm_id": 1, "farm_name": "Kandang A"}],
            "activities": []
        }});
        let (service, _) = service(FakeApi::new(dashboard, Value::Null, Value::Null));

        let overview = service.farms().await.unwrap();
        assert_eq!(overview.farms.len(), 1);
        assert_eq!(overview.farms[0].farm_name, "Kandang A");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let service = ChartService::new(Arc::new(FailingApi), ChartSettings::default());

        let err = service
            .monitoring_chart(1, Period::OneDay, MetricKind::Ammonia, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ChartError::Upstream(_)));
        assert!(service.farms().await.is_err());
    }
}
