// Domain layer - Pure chart and payload logic
pub mod axis;
pub mod envelope;
pub mod farm;
pub mod format;
pub mod metric;
pub mod period;
