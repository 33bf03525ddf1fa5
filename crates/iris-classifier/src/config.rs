use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Standardize features (per-column mean/std) before fitting and predicting.
    #[serde(default)]
    pub scale_features: bool,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Multinomial logistic regression (linfa-logistic).
    Logistic {
        max_iterations: u64,
        gradient_tolerance: f64,
        alpha: f64,
    },
    /// CART decision tree (linfa-trees).
    DecisionTree {
        max_depth: Option<usize>,
        min_weight_split: f32,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Logistic {
            max_iterations: 100,
            gradient_tolerance: 1e-4,
            alpha: 1.0,
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Logistic { .. } => "logistic",
            ModelType::DecisionTree { .. } => "decision_tree",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logistic" | "logreg" => Ok(ModelType::default()),
            "decision_tree" | "tree" => Ok(ModelType::DecisionTree {
                max_depth: Some(8),
                min_weight_split: 2.0,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: logistic, decision_tree",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self {
            scale_features: false,
            model_type,
        }
    }

    pub fn with_scaling(mut self, scale_features: bool) -> Self {
        self.scale_features = scale_features;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(ModelType::default())
    }
}

/// Train/test split parameters.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    /// Fraction of samples placed in the test subset, in (0, 1).
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Read a JSON `ModelConfig` from disk.
pub fn load_model_config<P: AsRef<Path>>(path: P) -> Result<ModelConfig> {
    let content = std::fs::read_to_string(&path)?;
    let config: ModelConfig = serde_json::from_str(&content)?;
    log::debug!(
        "Loaded {} model config from {}",
        config.model_type.name(),
        path.as_ref().display()
    );
    Ok(config)
}
