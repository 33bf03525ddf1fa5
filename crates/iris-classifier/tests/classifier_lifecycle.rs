//! Integration tests for the IrisClassifier train/predict/evaluate lifecycle.

use iris_classifier::config::{ModelConfig, ModelType};
use iris_classifier::{load_iris_data, ClassifierError, IrisClassifier, TrainTestSplit};
use ndarray::{array, s, Array1};

fn split() -> TrainTestSplit {
    load_iris_data(0.3, 42).expect("bundled iris split")
}

fn tree_config() -> ModelConfig {
    ModelConfig::new(ModelType::DecisionTree {
        max_depth: Some(6),
        min_weight_split: 2.0,
    })
}

// ---------------------------------------------------------------------------
// Construction and training
// ---------------------------------------------------------------------------

#[test]
fn classifier_starts_untrained() {
    let classifier = IrisClassifier::new();
    assert!(!classifier.is_trained());
    assert_eq!(*classifier.config(), ModelConfig::default());
}

#[test]
fn training_marks_classifier_trained() {
    let data = split();
    let mut classifier = IrisClassifier::new();
    classifier.train(&data.x_train, &data.y_train).unwrap();
    assert!(classifier.is_trained());
    assert_eq!(classifier.n_features(), Some(4));
}

#[test]
fn training_with_mismatched_shapes_fails() {
    let data = split();
    let mut classifier = IrisClassifier::new();

    let err = classifier
        .train(&data.x_train, &data.y_test.slice(s![..10]))
        .unwrap_err();
    match err {
        ClassifierError::ShapeMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, 105);
            assert_eq!(found, 10);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
    assert!(!classifier.is_trained());
}

#[test]
fn training_on_empty_data_fails() {
    let mut classifier = IrisClassifier::new();
    let x = ndarray::Array2::<f64>::zeros((0, 4));
    let y = Array1::<usize>::zeros(0);
    let err = classifier.train(&x, &y).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidInput(_)));
    assert!(!classifier.is_trained());
}

#[test]
fn training_rejects_non_finite_features_for_every_family() {
    let data = split();
    for config in [ModelConfig::default(), tree_config()] {
        let mut x = data.x_train.clone();
        x[(3, 1)] = f64::NAN;
        let mut classifier = IrisClassifier::with_config(config);
        let err = classifier.train(&x, &data.y_train).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(_)), "{:?}", err);
        assert!(!classifier.is_trained());

        x[(3, 1)] = f64::INFINITY;
        assert!(classifier.train(&x, &data.y_train).is_err());
        assert!(!classifier.is_trained());
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[test]
fn predict_rejects_non_finite_features() {
    let data = split();
    for config in [ModelConfig::default(), tree_config()] {
        let mut classifier = IrisClassifier::with_config(config);
        classifier.train(&data.x_train, &data.y_train).unwrap();

        let mut x = data.x_test.clone();
        x[(0, 2)] = f64::NEG_INFINITY;
        let err = classifier.predict(&x).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(_)), "{:?}", err);

        x[(0, 2)] = f64::NAN;
        assert!(classifier.evaluate(&x, &data.y_test).is_err());
        assert!(classifier.predict(&data.x_test).is_ok());
    }
}

#[test]
fn predict_before_training_fails() {
    let data = split();
    let classifier = IrisClassifier::new();
    let err = classifier.predict(&data.x_test).unwrap_err();
    assert!(matches!(err, ClassifierError::NotTrained));
}

#[test]
fn predict_returns_one_label_per_row() {
    let data = split();
    let mut classifier = IrisClassifier::new();
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let predictions = classifier.predict(&data.x_test.slice(s![..5, ..])).unwrap();
    assert_eq!(predictions.len(), 5);
    assert!(predictions.iter().all(|&p| p < 3));
}

#[test]
fn predict_with_wrong_width_fails() {
    let data = split();
    let mut classifier = IrisClassifier::new();
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let invalid = array![[1.0, 2.0, 3.0, 4.0, 5.0], [6.0, 7.0, 8.0, 9.0, 10.0]];
    let err = classifier.predict(&invalid).unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::ShapeMismatch {
            expected: 4,
            found: 5,
            ..
        }
    ));
}

#[test]
fn predict_on_zero_rows_is_empty() {
    let data = split();
    let mut classifier = IrisClassifier::new();
    classifier.train(&data.x_train, &data.y_train).unwrap();
    let predictions = classifier.predict(&data.x_test.slice(s![..0, ..])).unwrap();
    assert!(predictions.is_empty());
}

#[test]
fn predictions_preserve_row_order() {
    let data = split();
    let mut classifier = IrisClassifier::with_config(tree_config());
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let all = classifier.predict(&data.x_test).unwrap();
    for i in 0..5 {
        let single = classifier.predict(&data.x_test.slice(s![i..i + 1, ..])).unwrap();
        assert_eq!(single[0], all[i]);
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn evaluate_returns_accuracy_and_report() {
    let data = split();
    let mut classifier = IrisClassifier::new();
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let (accuracy, report) = classifier.evaluate(&data.x_test, &data.y_test).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
    assert!(report.to_lowercase().contains("precision"));
    assert!(report.contains("setosa"));
}

#[test]
fn evaluate_before_training_fails() {
    let data = split();
    let classifier = IrisClassifier::new();
    let err = classifier.evaluate(&data.x_test, &data.y_test).unwrap_err();
    assert!(matches!(err, ClassifierError::NotTrained));
}

#[test]
fn decision_tree_learns_iris() {
    let data = split();
    let mut classifier = IrisClassifier::with_config(tree_config());
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let report = classifier
        .evaluate_detailed(&data.x_test, &data.y_test)
        .unwrap();
    assert!(report.accuracy > 0.7, "accuracy {}", report.accuracy);
    assert_eq!(report.total_support, 45);
    assert_eq!(report.classes.len(), 3);
}

#[test]
fn scaled_features_still_train_and_predict() {
    let data = split();
    let mut classifier = IrisClassifier::with_config(ModelConfig::default().with_scaling(true));
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let predictions = classifier.predict(&data.x_test).unwrap();
    assert_eq!(predictions.len(), data.x_test.nrows());
}

#[test]
fn retraining_replaces_the_model() {
    let data = split();
    let mut classifier = IrisClassifier::with_config(tree_config());
    classifier.train(&data.x_train, &data.y_train).unwrap();

    let two_features = data.x_train.slice(s![.., ..2]).to_owned();
    classifier.train(&two_features, &data.y_train).unwrap();
    assert_eq!(classifier.n_features(), Some(2));
    assert!(classifier.predict(&data.x_test).is_err());
}
