//! Evaluation metrics and the printable classification report.
pub mod classification;

pub use classification::{accuracy, AverageMetrics, ClassMetrics, ClassificationReport};
