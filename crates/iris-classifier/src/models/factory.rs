use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::DecisionTreeModel;
use crate::models::logistic::LogisticModel;

/// Build a boxed classifier model from a `ModelConfig`.
pub fn build_model(config: &ModelConfig) -> Box<dyn ClassifierModel> {
    match &config.model_type {
        ModelType::Logistic {
            max_iterations,
            gradient_tolerance,
            alpha,
        } => Box::new(LogisticModel::new(
            *max_iterations,
            *gradient_tolerance,
            *alpha,
        )),
        ModelType::DecisionTree {
            max_depth,
            min_weight_split,
        } => Box::new(DecisionTreeModel::new(*max_depth, *min_weight_split)),
    }
}
