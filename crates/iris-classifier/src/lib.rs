//! iris-classifier: train, evaluate and persist a classifier on the Iris dataset.
//!
//! This crate provides a seeded, stratified train/test split of the bundled
//! Iris data, a small `IrisClassifier` wrapper around linfa models (logistic
//! regression or a decision tree), a classification report, and a JSON model
//! file so a trained classifier can be restored with identical predictions.
pub mod classifier;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod report;

pub use classifier::{ClassifierState, IrisClassifier};
pub use data_handling::{load_iris_data, IrisData, TrainTestSplit};
pub use error::ClassifierError;
