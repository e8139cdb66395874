/// Rendering layer: consumes pipeline outputs, never computes them.
///
/// Every chart and the table draw from `Dataset` + visible indices or from
/// the precomputed aggregates in `AppState`, so swapping the charting
/// approach means replacing this module only.
pub mod charts;
pub mod dashboard;
pub mod panels;
pub mod table;
