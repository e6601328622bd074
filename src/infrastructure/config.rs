use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub min_bar_fraction: f64,
}

/// Load `config/dashboard.*` (optional) with `BROILINK_` environment overrides,
/// e.g. `BROILINK_API__TOKEN`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("BROILINK")
                .prefix_separator("_")
                .separator("__"),
        );

    finish(builder)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("api.base_url", DEFAULT_API_BASE_URL)?
        .set_default("api.timeout_secs", 30)?
        .set_default("chart.min_bar_fraction", 0.05)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<AppConfig> {
    let settings: AppConfig = builder.build()?.try_deserialize()?;

    let fraction = settings.chart.min_bar_fraction;
    if !(0.0..=0.5).contains(&fraction) {
        anyhow::bail!(
            "chart.min_bar_fraction must be between 0 and 0.5, got {}",
            fraction
        );
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load_str(toml: &str) -> anyhow::Result<AppConfig> {
        let builder = with_defaults(config::Config::builder())?
            .add_source(File::from_str(toml, FileFormat::Toml));
        finish(builder)
    }

    #[test]
    fn test_defaults() {
        let config = load_str("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.token, None);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.chart.min_bar_fraction, 0.05);
    }

    #[test]
    fn test_file_overrides() {
        let config = load_str(
            r#"
            [api]
            base_url = "https://broilink.example/api"
            token = "secret"

            [chart]
            min_bar_fraction = 0.08
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://broilink.example/api");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.chart.min_bar_fraction, 0.08);
    }

    #[test]
    fn test_rejects_oversized_bar_floor() {
        let err = load_str("[chart]\nmin_bar_fraction = 0.9").unwrap_err();
        assert!(err.to_string().contains("min_bar_fraction"));
    }
}
