use linfa::traits::Fit;
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{ArrayView1, ArrayView2};

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::fitted::FittedModel;

/// CART decision tree backed by `linfa-trees`.
pub struct DecisionTreeModel {
    max_depth: Option<usize>,
    min_weight_split: f32,
}

impl DecisionTreeModel {
    pub fn new(max_depth: Option<usize>, min_weight_split: f32) -> Self {
        DecisionTreeModel {
            max_depth,
            min_weight_split,
        }
    }
}

impl ClassifierModel for DecisionTreeModel {
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<FittedModel> {
        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        let tree = DecisionTree::<f64, usize>::params()
            .max_depth(self.max_depth)
            .min_weight_split(self.min_weight_split)
            .fit(&dataset)
            .map_err(|e| ClassifierError::Fit(e.to_string()))?;

        log::debug!(
            "Fitted decision tree on {} samples (max depth {:?})",
            x.nrows(),
            self.max_depth
        );
        Ok(FittedModel::DecisionTree(tree))
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}
