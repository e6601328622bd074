// Metric kinds and the series the aggregate endpoints return
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("unknown metric kind: {0}")]
    UnknownKind(String),
}

/// Which aggregate endpoint a metric comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Manually reported by farmers (`/analysis/aggregate`).
    Analysis,
    /// IoT sensor readings (`/monitoring/aggregate`).
    Monitoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    Integer,
    OneDecimal,
}

/// Per-kind axis and display data.
#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    pub unit: &'static str,
    pub rounding: Rounding,
    /// Ceiling used when a series has no positive sample.
    pub zero_ceiling: f64,
    /// Key of the series in the aggregate payload.
    pub field: &'static str,
    pub source: Source,
}

const MORTALITY: KindProfile = KindProfile {
    unit: "ekor",
    rounding: Rounding::Integer,
    zero_ceiling: 10.0,
    field: "mortality",
    source: Source::Analysis,
};

const AVERAGE_WEIGHT: KindProfile = KindProfile {
    unit: "g",
    rounding: Rounding::OneDecimal,
    zero_ceiling: 100.0,
    field: "avg_weight",
    source: Source::Analysis,
};

const FEED: KindProfile = KindProfile {
    unit: "kg",
    rounding: Rounding::OneDecimal,
    zero_ceiling: 100.0,
    field: "feed",
    source: Source::Analysis,
};

const WATER: KindProfile = KindProfile {
    unit: "L",
    rounding: Rounding::OneDecimal,
    zero_ceiling: 100.0,
    field: "water",
    source: Source::Analysis,
};

const TEMPERATURE: KindProfile = KindProfile {
    unit: "°C",
    rounding: Rounding::OneDecimal,
    zero_ceiling: 100.0,
    field: "temperature",
    source: Source::Monitoring,
};

const HUMIDITY: KindProfile = KindProfile {
    unit: "%",
    rounding: Rounding::OneDecimal,
    zero_ceiling: 100.0,
    field: "humidity",
    source: Source::Monitoring,
};

const AMMONIA: KindProfile = KindProfile {
    unit: "ppm",
    rounding: Rounding::OneDecimal,
    zero_ceiling: 100.0,
    field: "ammonia",
    source: Source::Monitoring,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    Mortality,
    AverageWeight,
    Feed,
    Water,
    Temperature,
    Humidity,
    Ammonia,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::Mortality,
        MetricKind::AverageWeight,
        MetricKind::Feed,
        MetricKind::Water,
        MetricKind::Temperature,
        MetricKind::Humidity,
        MetricKind::Ammonia,
    ];

    pub fn profile(self) -> &'static KindProfile {
        match self {
            MetricKind::Mortality => &MORTALITY,
            MetricKind::AverageWeight => &AVERAGE_WEIGHT,
            MetricKind::Feed => &FEED,
            MetricKind::Water => &WATER,
            MetricKind::Temperature => &TEMPERATURE,
            MetricKind::Humidity => &HUMIDITY,
            MetricKind::Ammonia => &AMMONIA,
        }
    }

    pub fn unit(self) -> &'static str {
        self.profile().unit
    }

    pub fn source(self) -> Source {
        self.profile().source
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Mortality => "mortality",
            MetricKind::AverageWeight => "average-weight",
            MetricKind::Feed => "feed",
            MetricKind::Water => "water",
            MetricKind::Temperature => "temperature",
            MetricKind::Humidity => "humidity",
            MetricKind::Ammonia => "ammonia",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = MetricError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let kind = match tag.trim().to_ascii_lowercase().as_str() {
            "mortality" | "mortalitas" | "kematian" => MetricKind::Mortality,
            "average-weight" | "avg_weight" | "avg-weight" | "weight" | "bobot" => {
                MetricKind::AverageWeight
            }
            "feed" | "pakan" => MetricKind::Feed,
            "water" | "minum" => MetricKind::Water,
            "temperature" | "suhu" => MetricKind::Temperature,
            "humidity" | "kelembapan" => MetricKind::Humidity,
            "ammonia" | "amonia" => MetricKind::Ammonia,
            _ => return Err(MetricError::UnknownKind(tag.to_string())),
        };
        Ok(kind)
    }
}

/// Labels and samples of one metric, always the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub labels: Vec<String>,
    pub samples: Vec<f64>,
}

impl MetricSeries {
    /// Read `labels` and the kind's field from an unwrapped aggregate payload.
    ///
    /// Samples are aligned to the labels: missing entries become 0 and
    /// extra entries are dropped.
    pub fn from_aggregate(payload: &Value, kind: MetricKind) -> Self {
        let labels: Vec<String> = payload
            .get("labels")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(label_text).collect())
            .unwrap_or_default();

        let raw = payload
            .get(kind.profile().field)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if raw.len() != labels.len() {
            tracing::debug!(
                "{} series has {} samples for {} labels, aligning",
                kind,
                raw.len(),
                labels.len()
            );
        }

        let samples = (0..labels.len())
            .map(|i| raw.get(i).map(sample_value).unwrap_or(0.0))
            .collect();

        Self { labels, samples }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Finite number from a JSON number or numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Numeric value of a raw sample; anything unusable is 0.
fn sample_value(value: &Value) -> f64 {
    as_number(value).unwrap_or(0.0)
}
