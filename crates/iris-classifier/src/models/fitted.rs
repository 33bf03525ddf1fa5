use linfa::traits::Predict;
use linfa_logistic::MultiFittedLogisticRegression;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// A trained model, owned by the classifier and written verbatim to model files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittedModel {
    Logistic(MultiFittedLogisticRegression<f64, usize>),
    DecisionTree(DecisionTree<f64, usize>),
}

impl FittedModel {
    /// Predict one class index per row. The width of `x` must match the
    /// width the model was fitted on.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        match self {
            FittedModel::Logistic(model) => model.predict(x),
            FittedModel::DecisionTree(tree) => tree.predict(x),
        }
    }

    /// Check that the model can be applied to rows of `n_features` columns:
    /// a logistic model needs one coefficient row per feature, a tree may
    /// only split on columns below `n_features`.
    pub fn check_feature_width(&self, n_features: usize) -> Result<()> {
        match self {
            FittedModel::Logistic(model) => {
                let found = model.params().nrows();
                if found != n_features {
                    return Err(ClassifierError::ShapeMismatch {
                        context: "logistic coefficient rows",
                        expected: n_features,
                        found,
                    });
                }
            }
            FittedModel::DecisionTree(tree) => {
                if let Some(highest) = tree.features().into_iter().max() {
                    if highest >= n_features {
                        return Err(ClassifierError::ShapeMismatch {
                            context: "decision tree split features",
                            expected: n_features,
                            found: highest + 1,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            FittedModel::Logistic(_) => "logistic",
            FittedModel::DecisionTree(_) => "decision_tree",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decision_tree::DecisionTreeModel;
    use crate::models::logistic::LogisticModel;
    use crate::models::ClassifierModel;
    use ndarray::array;

    fn three_blobs() -> (Array2<f64>, Array1<usize>) {
        let x = array![
            [0.0, 0.1, 0.0],
            [0.1, 0.0, 0.1],
            [5.0, 5.1, 0.0],
            [5.1, 5.0, 0.1],
            [-5.0, 5.0, 0.0],
            [-5.1, 4.9, 0.1],
        ];
        let y = array![0usize, 0, 1, 1, 2, 2];
        (x, y)
    }

    #[test]
    fn logistic_width_must_match_exactly() {
        let (x, y) = three_blobs();
        let model = LogisticModel::new(100, 1e-4, 1.0)
            .fit(x.view(), y.view())
            .unwrap();
        assert!(model.check_feature_width(3).is_ok());
        assert!(matches!(
            model.check_feature_width(5),
            Err(ClassifierError::ShapeMismatch {
                expected: 5,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn tree_rejects_width_below_its_split_features() {
        let (x, y) = three_blobs();
        let model = DecisionTreeModel::new(None, 2.0)
            .fit(x.view(), y.view())
            .unwrap();
        assert!(model.check_feature_width(3).is_ok());
        assert!(model.check_feature_width(0).is_err());
    }
}
