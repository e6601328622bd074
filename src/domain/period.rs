// Aggregation window of the analysis/monitoring endpoints
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown period: {0}")]
pub struct UnknownPeriod(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Period {
    #[default]
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "6months")]
    SixMonths,
}

impl Period {
    /// Value of the backend `range` query parameter.
    pub fn range(self) -> &'static str {
        match self {
            Period::OneDay => "1_day",
            Period::OneWeek => "1_week",
            Period::OneMonth => "1_month",
            Period::SixMonths => "6_months",
        }
    }
}

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1day" | "1_day" => Ok(Period::OneDay),
            "1week" | "1_week" => Ok(Period::OneWeek),
            "1month" | "1_month" => Ok(Period::OneMonth),
            "6months" | "6_months" => Ok(Period::SixMonths),
            other => Err(UnknownPeriod(other.to_string())),
        }
    }
}
