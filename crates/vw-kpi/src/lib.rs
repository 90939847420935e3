pub mod alerts;
pub mod apy;
pub mod earnings;

pub use alerts::{
    Alert, AlertKind, AlertLevel, AlertMetrics, AlertThresholds, SnapshotReading,
    evaluate_vault_alerts,
};
pub use apy::{BlendedApyInput, calculate_blended_apy};
pub use earnings::{
    EarningsProjections, ProjectionHorizon, build_earnings_projections,
    calculate_daily_earnings, calculate_earnings_projection,
};

pub(crate) const DAYS_IN_YEAR: f64 = 365.0;
pub(crate) const WEEKS_IN_YEAR: f64 = 52.0;

/// Convert an APY expressed in percent into a decimal rate, non-finite inputs count as zero.
pub(crate) fn to_decimal_rate(apy_percent: f64) -> f64 {
    if apy_percent.is_finite() {
        apy_percent / 100.0
    } else {
        0.0
    }
}
