// REST client for the BroiLink backend
use crate::application::dashboard_api::DashboardApi;
use crate::domain::period::Period;
use crate::infrastructure::api_error::ApiError;
use crate::infrastructure::config::ApiSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDashboardApi {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.build_url(path, params);
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            let err = ApiError::from_status(status.as_u16(), &body);
            tracing::warn!("GET {} failed: {}", path, err);
            return Err(err.into());
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        Ok(body)
    }
}

/// Query parameters of both aggregate endpoints.
fn aggregate_params(farm_id: i64, period: Period, date: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("farm_id", farm_id.to_string()),
        ("date", date.format("%Y-%m-%d").to_string()),
        ("range", period.range().to_string()),
    ]
}

/// Aggregates are anchored on the local calendar day, not UTC.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn get_dashboard(&self) -> Result<Value> {
        self.get_json("/owner/dashboard", &[]).await
    }

    async fn get_analytics(&self, farm_id: i64, period: Period) -> Result<Value> {
        let params = aggregate_params(farm_id, period, today());
        self.get_json("/analysis/aggregate", &params).await
    }

    async fn get_monitoring(&self, farm_id: i64, period: Period) -> Result<Value> {
        let params = aggregate_params(farm_id, period, today());
        self.get_json("/monitoring/aggregate", &params).await
    }
}
