// Number formatting for axis labels and sensor cards
use super::metric::{MetricKind, Rounding};

/// Axis label for a tick value. One-decimal values drop a trailing `.0`.
pub fn format_tick(value: f64, rounding: Rounding) -> String {
    match rounding {
        Rounding::Integer => format!("{:.0}", value.round()),
        Rounding::OneDecimal => {
            let text = format!("{:.1}", value);
            match text.strip_suffix(".0") {
                Some(whole) => whole.to_string(),
                None => text,
            }
        }
    }
}

/// A reading with its unit, e.g. `28°C` or `12.5 ppm`; `-` when absent.
pub fn format_reading(value: Option<f64>, kind: MetricKind) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return "-".to_string();
    };

    let number = format_tick(value, kind.profile().rounding);
    let unit = kind.unit();
    // Symbol units hug the number, word units get a space.
    if unit.starts_with(|c: char| c.is_alphabetic()) {
        format!("{} {}", number, unit)
    } else {
        format!("{}{}", number, unit)
    }
}
