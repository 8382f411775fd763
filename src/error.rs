/// Errors raised while turning external identifiers into engine types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// Metric name not present in the closed metric set
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Stage name outside junior..principal
    #[error("unknown career stage: {0}")]
    UnknownStage(String),
}
