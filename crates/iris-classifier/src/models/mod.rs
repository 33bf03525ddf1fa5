pub mod classifier_trait;
pub mod decision_tree;
pub mod factory;
pub mod fitted;
pub mod logistic;

pub use classifier_trait::ClassifierModel;
pub use factory::build_model;
pub use fitted::FittedModel;
