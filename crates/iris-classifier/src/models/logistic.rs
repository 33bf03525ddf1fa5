use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::MultiLogisticRegression;
use ndarray::{ArrayView1, ArrayView2};

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::fitted::FittedModel;

/// Multinomial logistic regression backed by `linfa-logistic`.
pub struct LogisticModel {
    max_iterations: u64,
    gradient_tolerance: f64,
    alpha: f64,
}

impl LogisticModel {
    pub fn new(max_iterations: u64, gradient_tolerance: f64, alpha: f64) -> Self {
        LogisticModel {
            max_iterations,
            gradient_tolerance,
            alpha,
        }
    }
}

impl ClassifierModel for LogisticModel {
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<FittedModel> {
        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        let model = MultiLogisticRegression::<f64>::default()
            .max_iterations(self.max_iterations)
            .gradient_tolerance(self.gradient_tolerance)
            .alpha(self.alpha)
            .fit(&dataset)
            .map_err(|e| ClassifierError::Fit(e.to_string()))?;

        log::debug!(
            "Fitted logistic regression on {} samples ({} max iterations, alpha {})",
            x.nrows(),
            self.max_iterations,
            self.alpha
        );
        Ok(FittedModel::Logistic(model))
    }

    fn name(&self) -> &str {
        "logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_logistic_separates_three_blobs() {
        let x: Array2<f64> = array![
            [0.0, 0.1],
            [0.1, 0.0],
            [0.2, 0.1],
            [5.0, 5.1],
            [5.1, 5.0],
            [4.9, 5.2],
            [-5.0, 5.0],
            [-5.1, 4.9],
            [-4.9, 5.1],
        ];
        let y = array![0usize, 0, 0, 1, 1, 1, 2, 2, 2];

        let model = LogisticModel::new(200, 1e-6, 0.01);
        let fitted = model.fit(x.view(), y.view()).unwrap();
        assert_eq!(fitted.name(), "logistic");

        let predictions = fitted.predict(&x);
        assert_eq!(predictions, y);
    }
}
