// Farm list and activity feed from the owner dashboard
use super::envelope::lookup_array;
use super::metric::as_number;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmSummary {
    pub farm_id: i64,
    pub farm_name: String,
    pub status: String,
    pub temperature: Option<f64>,
}

impl FarmSummary {
    /// Read one entry of the `farms` list; entries without an id are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let farm_id = value
            .get("farm_id")
            .or_else(|| value.get("id"))
            .and_then(as_id)?;

        let farm_name = value
            .get("farm_name")
            .or_else(|| value.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Kandang {}", farm_id));

        let status = value
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("normal")
            .to_string();

        let temperature = value.get("temperature").and_then(as_number);

        Some(Self {
            farm_id,
            farm_name,
            status,
            temperature,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Sensor,
    Report,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub time: String,
    pub kind: ActivityKind,
    pub message: String,
}

impl Activity {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("-")
                .to_string()
        };

        let kind = match value.get("type").and_then(Value::as_str) {
            Some("sensor") => ActivityKind::Sensor,
            _ => ActivityKind::Report,
        };

        Self {
            time: text("time"),
            kind,
            message: text("message"),
        }
    }
}

/// Farms and recent activity of an owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmOverview {
    pub farms: Vec<FarmSummary>,
    pub activities: Vec<Activity>,
}

impl FarmOverview {
    /// Build from an already unwrapped dashboard payload.
    pub fn from_payload(payload: &Value) -> Self {
        let farms = lookup_array(payload, &["farms"])
            .iter()
            .filter_map(FarmSummary::from_value)
            .collect();

        let activities = lookup_array(payload, &["activities", "recent"])
            .iter()
            .map(Activity::from_value)
            .collect();

        Self { farms, activities }
    }
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
