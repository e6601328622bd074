// Data-fetching seam to the BroiLink REST API
use crate::domain::period::Period;
use async_trait::async_trait;
use serde_json::Value;

/// Each call returns the raw, still enveloped JSON body.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Owner dashboard: farms and recent activity
    async fn get_dashboard(&self) -> anyhow::Result<Value>;

    /// Aggregated manual reports (feed, water, weight, mortality)
    async fn get_analytics(&self, farm_id: i64, period: Period) -> anyhow::Result<Value>;

    /// Aggregated sensor readings (temperature, humidity, ammonia)
    async fn get_monitoring(&self, farm_id: i64, period: Period) -> anyhow::Result<Value>;
}
