//! Feature standardization shared by the model implementations.
//!
//! A `Scaler` is fitted on the training matrix, applied to every matrix the
//! classifier later predicts on, and saved alongside the model.

use ndarray::{Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};
use serde::{Deserialize, Serialize};

/// Simple standard scaler (per-column mean/std).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-6;

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize all rows. `x` must have `n_features()` columns.
    pub fn transform<S>(&self, x: &ArrayBase<S, Ix2>) -> Array2<f64>
    where
        S: Data<Elem = f64>,
    {
        let mean = ArrayView1::from(&self.mean[..]);
        let std = ArrayView1::from(&self.std[..]);
        (x - &mean) / &std
    }
}

/// Fit a `Scaler` from a matrix where rows are samples and columns are
/// features. Returns `None` for an empty matrix.
pub fn fit_scaler<S>(x: &ArrayBase<S, Ix2>) -> Option<Scaler>
where
    S: Data<Elem = f64>,
{
    if x.nrows() == 0 || x.ncols() == 0 {
        return None;
    }
    let mean = x.mean_axis(Axis(0))?;
    let std = x
        .std_axis(Axis(0), 0.0)
        .mapv(|s| s.max(Scaler::MIN_STD));

    Some(Scaler {
        mean: mean.to_vec(),
        std: std.to_vec(),
    })
}

/// Convenience: fit a scaler and return the transformed matrix with it.
pub fn fit_transform<S>(x: &ArrayBase<S, Ix2>) -> Option<(Scaler, Array2<f64>)>
where
    S: Data<Elem = f64>,
{
    let scaler = fit_scaler(x)?;
    let transformed = scaler.transform(x);
    Some((scaler, transformed))
}
