use std::error::Error;
use std::fmt;

/// Errors raised while loading data, training, predicting or persisting a classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Row, label or feature counts disagree.
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    /// predict/evaluate/save called before a successful train or load.
    NotTrained,
    InvalidInput(String),
    /// The underlying model library refused to fit.
    Fit(String),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Csv(csv::Error),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::ShapeMismatch {
                context,
                expected,
                found,
            } => write!(
                f,
                "Shape mismatch in {}: expected {}, found {}",
                context, expected, found
            ),
            ClassifierError::NotTrained => {
                write!(f, "Model is not trained; call train() or load() first")
            }
            ClassifierError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ClassifierError::Fit(msg) => write!(f, "Model fitting failed: {}", msg),
            ClassifierError::Io(err) => write!(f, "I/O error: {}", err),
            ClassifierError::Serialization(err) => write!(f, "Serialization error: {}", err),
            ClassifierError::Csv(err) => write!(f, "CSV error: {}", err),
        }
    }
}

impl Error for ClassifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClassifierError::Io(err) => Some(err),
            ClassifierError::Serialization(err) => Some(err),
            ClassifierError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClassifierError {
    fn from(err: std::io::Error) -> Self {
        ClassifierError::Io(err)
    }
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::Serialization(err)
    }
}

impl From<csv::Error> for ClassifierError {
    fn from(err: csv::Error) -> Self {
        ClassifierError::Csv(err)
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
