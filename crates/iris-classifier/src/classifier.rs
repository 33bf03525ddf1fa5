//! The stateful classifier wrapper: train, predict, evaluate, save and load.
use std::path::Path;

use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

use crate::config::ModelConfig;
use crate::data_handling::IRIS_CLASS_NAMES;
use crate::error::{ClassifierError, Result};
use crate::io::{read_model, write_model, SavedModel, MODEL_FORMAT_VERSION};
use crate::models::{build_model, FittedModel};
use crate::preprocessing::{fit_transform, Scaler};
use crate::report::ClassificationReport;

/// A fitted model together with what is needed to apply it to new rows.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    model: FittedModel,
    scaler: Option<Scaler>,
    n_features: usize,
    n_train_samples: usize,
    trained_at: String,
}

impl TrainedModel {
    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    pub fn scaler(&self) -> Option<&Scaler> {
        self.scaler.as_ref()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_train_samples(&self) -> usize {
        self.n_train_samples
    }

    pub fn trained_at(&self) -> &str {
        &self.trained_at
    }
}

#[derive(Debug, Clone)]
pub enum ClassifierState {
    Untrained,
    Trained(TrainedModel),
}

/// Multi-class classifier for the Iris dataset.
///
/// Starts `Untrained`; `train` or `load` move it to `Trained`. Operations
/// that fail leave the current state untouched.
#[derive(Debug, Clone)]
pub struct IrisClassifier {
    config: ModelConfig,
    class_names: Vec<String>,
    state: ClassifierState,
}

impl Default for IrisClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IrisClassifier {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        IrisClassifier {
            config,
            class_names: IRIS_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            state: ClassifierState::Untrained,
        }
    }

    /// Names used for the rows of the evaluation report, indexed by label.
    pub fn with_class_names(mut self, class_names: Vec<String>) -> Self {
        self.class_names = class_names;
        self
    }

    /// Build a trained classifier directly from a model file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut classifier = Self::new();
        classifier.load(path)?;
        Ok(classifier)
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ClassifierState::Trained(_))
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Feature width the model was trained on, if trained.
    pub fn n_features(&self) -> Option<usize> {
        self.trained().ok().map(TrainedModel::n_features)
    }

    fn trained(&self) -> Result<&TrainedModel> {
        match &self.state {
            ClassifierState::Trained(trained) => Ok(trained),
            ClassifierState::Untrained => Err(ClassifierError::NotTrained),
        }
    }

    /// Fit the configured model on `x` (one sample per row) and labels `y`.
    pub fn train<S1, S2>(&mut self, x: &ArrayBase<S1, Ix2>, y: &ArrayBase<S2, Ix1>) -> Result<()>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = usize>,
    {
        if x.nrows() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                context: "training labels",
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClassifierError::InvalidInput(
                "training data must contain at least one sample and one feature".to_string(),
            ));
        }
        ensure_finite(x, "training data")?;

        let (scaler, features) = if self.config.scale_features {
            let (scaler, transformed) = fit_transform(x).ok_or_else(|| {
                ClassifierError::InvalidInput("could not fit feature scaler".to_string())
            })?;
            (Some(scaler), transformed)
        } else {
            (None, x.to_owned())
        };

        let learner = build_model(&self.config);
        let model = learner.fit(features.view(), y.view())?;

        log::info!(
            "Trained {} model on {} samples with {} features",
            learner.name(),
            x.nrows(),
            x.ncols()
        );

        self.state = ClassifierState::Trained(TrainedModel {
            model,
            scaler,
            n_features: x.ncols(),
            n_train_samples: x.nrows(),
            trained_at: chrono::Utc::now().to_rfc3339(),
        });
        Ok(())
    }

    /// Predict one class index per row of `x`, in row order.
    pub fn predict<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array1<usize>>
    where
        S: Data<Elem = f64>,
    {
        let trained = self.trained()?;
        if x.ncols() != trained.n_features {
            return Err(ClassifierError::ShapeMismatch {
                context: "prediction feature width",
                expected: trained.n_features,
                found: x.ncols(),
            });
        }
        ensure_finite(x, "prediction data")?;
        if x.nrows() == 0 {
            return Ok(Array1::zeros(0));
        }

        let features = match &trained.scaler {
            Some(scaler) => scaler.transform(x),
            None => x.to_owned(),
        };
        Ok(trained.model.predict(&features))
    }

    /// Accuracy on `(x, y)` and the rendered classification report.
    pub fn evaluate<S1, S2>(
        &self,
        x: &ArrayBase<S1, Ix2>,
        y: &ArrayBase<S2, Ix1>,
    ) -> Result<(f64, String)>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = usize>,
    {
        let report = self.evaluate_detailed(x, y)?;
        Ok((report.accuracy, report.to_string()))
    }

    /// Structured form of `evaluate`.
    pub fn evaluate_detailed<S1, S2>(
        &self,
        x: &ArrayBase<S1, Ix2>,
        y: &ArrayBase<S2, Ix1>,
    ) -> Result<ClassificationReport>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = usize>,
    {
        self.trained()?;
        if x.nrows() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                context: "evaluation labels",
                expected: x.nrows(),
                found: y.len(),
            });
        }

        let predictions = self.predict(x)?;
        let report =
            ClassificationReport::from_predictions(y.view(), predictions.view(), &self.class_names)?;
        log::info!(
            "Evaluated on {} samples: accuracy {:.4}",
            y.len(),
            report.accuracy
        );
        Ok(report)
    }

    /// Write the trained model to `path`, overwriting any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let trained = self.trained()?;
        let saved = SavedModel {
            format_version: MODEL_FORMAT_VERSION,
            model_name: trained.model.name().to_string(),
            n_features: trained.n_features,
            n_train_samples: trained.n_train_samples,
            trained_at: trained.trained_at.clone(),
            class_names: self.class_names.clone(),
            scaler: trained.scaler.clone(),
            model: trained.model.clone(),
        };
        write_model(&path, &saved)?;
        log::info!("Saved {} model to {}", saved.model_name, path.as_ref().display());
        Ok(())
    }

    /// Replace the current state with the model stored at `path`.
    ///
    /// Only the model is restored; `config()` keeps describing how the next
    /// `train` call will fit.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let saved = read_model(&path)?;
        log::info!(
            "Loaded {} model ({} features, trained {}) from {}",
            saved.model_name,
            saved.n_features,
            saved.trained_at,
            path.as_ref().display()
        );

        self.class_names = saved.class_names;
        self.state = ClassifierState::Trained(TrainedModel {
            model: saved.model,
            scaler: saved.scaler,
            n_features: saved.n_features,
            n_train_samples: saved.n_train_samples,
            trained_at: saved.trained_at,
        });
        Ok(())
    }
}

/// Reject NaN and infinite features before they reach a learner.
fn ensure_finite<S>(x: &ArrayBase<S, Ix2>, context: &str) -> Result<()>
where
    S: Data<Elem = f64>,
{
    match x.indexed_iter().find(|(_, value)| !value.is_finite()) {
        Some(((row, col), value)) => Err(ClassifierError::InvalidInput(format!(
            "{} contains non-finite value {} at row {}, column {}",
            context, value, row, col
        ))),
        None => Ok(()),
    }
}
