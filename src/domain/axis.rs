// Chart axis scaling: readable ceilings and tick marks for a series
use super::metric::{KindProfile, MetricKind, Rounding};
use serde::Serialize;

/// Ascending "nice" ceilings; past the last one we round up to a multiple of
/// `STEP_BEYOND_LADDER`.
const LADDER: [f64; 8] = [5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0];
const STEP_BEYOND_LADDER: f64 = 500.0;

/// Tick positions as fractions of the ceiling, top to bottom.
const TICK_FRACTIONS: [f64; 5] = [1.0, 0.75, 0.5, 0.25, 0.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisScale {
    pub ceiling: f64,
    pub ticks: [f64; 5],
}

/// Independently scaled axes of a bar + line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualAxis {
    pub primary: AxisScale,
    pub secondary: Option<AxisScale>,
}

pub fn scale(samples: &[f64], kind: MetricKind) -> AxisScale {
    scale_with_profile(samples, kind.profile())
}

pub fn scale_with_profile(samples: &[f64], profile: &KindProfile) -> AxisScale {
    let max = samples
        .iter()
        .copied()
        .map(clamp_sample)
        .fold(0.0_f64, f64::max);

    let ceiling = if max == 0.0 {
        profile.zero_ceiling
    } else {
        nice_ceiling(max)
    };

    AxisScale {
        ceiling,
        ticks: TICK_FRACTIONS.map(|f| round_tick(ceiling * f, profile.rounding)),
    }
}

pub fn scale_dual(
    primary: (&[f64], MetricKind),
    secondary: Option<(&[f64], MetricKind)>,
) -> DualAxis {
    DualAxis {
        primary: scale(primary.0, primary.1),
        secondary: secondary.map(|(samples, kind)| scale(samples, kind)),
    }
}

/// Smallest ladder value (or multiple of 500) that is `>= max`.
pub fn nice_ceiling(max: f64) -> f64 {
    LADDER
        .iter()
        .copied()
        .find(|&c| c >= max)
        .unwrap_or_else(|| (max / STEP_BEYOND_LADDER).ceil() * STEP_BEYOND_LADDER)
}

/// Height of a bar as a fraction of the track.
///
/// Positive values never drop below `min_visible`; zero stays at zero.
pub fn bar_fraction(value: f64, ceiling: f64, min_visible: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 || ceiling <= 0.0 {
        return 0.0;
    }
    (value / ceiling).min(1.0).max(min_visible.clamp(0.0, 1.0))
}

fn clamp_sample(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn round_tick(v: f64, rounding: Rounding) -> f64 {
    match rounding {
        Rounding::Integer => v.round(),
        Rounding::OneDecimal => {
            let tenths = v * 10.0;
            // Past 2^53 there is no fractional part left to round, and near
            // f64::MAX the scaled value would overflow.
            if !tenths.is_finite() || v.abs() >= 1e15 {
                v
            } else {
                tenths.round() / 10.0
            }
        }
    }
}
