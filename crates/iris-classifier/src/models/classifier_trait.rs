use ndarray::{ArrayView1, ArrayView2};

use crate::error::Result;
use crate::models::fitted::FittedModel;

/// A small trait abstraction over the multi-class learners the crate can
/// train. Implementations hold hyper-parameters only; fitting returns a
/// self-contained, serializable `FittedModel`.
pub trait ClassifierModel {
    /// Fit on `x` (one sample per row) and class indices `y`. Callers
    /// guarantee `x.nrows() == y.len()`.
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<FittedModel>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
