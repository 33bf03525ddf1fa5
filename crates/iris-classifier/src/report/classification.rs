use std::collections::{BTreeSet, HashMap};
use std::fmt;

use linfa::dataset::{AsTargets, Labels};
use linfa::metrics::{ConfusionMatrix, ToConfusionMatrix};
use ndarray::{Array1, ArrayView1, Ix1};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Precision, recall and F1 for a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: usize,
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of true samples of this class.
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Per-class metrics plus accuracy, macro and support-weighted averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub total_support: usize,
}

/// Ground-truth labels with a fixed member order.
///
/// linfa orders confusion-matrix members by iterating a `HashSet`, so the
/// order changes between calls. Overriding `labels` pins member `i` to
/// `labels[i]`, which lets `split_one_vs_all()[i]` be matched to its class.
/// Labels that only occur in the predictions are listed too, so no sample
/// is dropped from the matrix.
struct OrderedTargets {
    targets: Array1<usize>,
    labels: Vec<usize>,
}

impl AsTargets for OrderedTargets {
    type Elem = usize;
    type Ix = Ix1;

    fn as_targets(&self) -> ArrayView1<'_, usize> {
        self.targets.view()
    }
}

impl Labels for OrderedTargets {
    type Elem = usize;

    fn label_count(&self) -> Vec<HashMap<usize, usize>> {
        self.targets.label_count()
    }

    fn labels(&self) -> Vec<usize> {
        self.labels.clone()
    }
}

fn sorted_labels(y_true: ArrayView1<'_, usize>, y_pred: ArrayView1<'_, usize>) -> Vec<usize> {
    let labels: BTreeSet<usize> = y_true.iter().chain(y_pred.iter()).copied().collect();
    labels.into_iter().collect()
}

/// Confusion matrix with ground truth on the rows, so the binary
/// `precision`/`recall` of each one-vs-all split are per predicted and per
/// true count respectively.
fn confusion_matrix(
    y_true: ArrayView1<'_, usize>,
    y_pred: ArrayView1<'_, usize>,
    labels: &[usize],
) -> Result<ConfusionMatrix<usize>> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifierError::ShapeMismatch {
            context: "predicted labels",
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    // linfa reads both sides through `as_slice`, so both must be contiguous.
    let truth = OrderedTargets {
        targets: Array1::from(y_true.to_vec()),
        labels: labels.to_vec(),
    };
    let predicted = Array1::from(y_pred.to_vec());
    truth.confusion_matrix(&predicted).map_err(|e| {
        ClassifierError::InvalidInput(format!("could not build confusion matrix: {}", e))
    })
}

/// linfa reports 0/0 as NaN; the report uses 0 for undefined scores.
fn finite_or_zero(value: f32) -> f64 {
    if value.is_finite() {
        value as f64
    } else {
        0.0
    }
}

/// Fraction of positions where `y_pred` equals `y_true`. Empty input scores 0.
pub fn accuracy(y_true: ArrayView1<'_, usize>, y_pred: ArrayView1<'_, usize>) -> Result<f64> {
    let labels = sorted_labels(y_true, y_pred);
    let cm = confusion_matrix(y_true, y_pred, &labels)?;
    Ok(finite_or_zero(cm.accuracy()))
}

fn support_weighted(
    classes: &[ClassMetrics],
    total_support: usize,
    metric: impl Fn(&ClassMetrics) -> f64,
) -> f64 {
    if total_support == 0 {
        return 0.0;
    }
    classes
        .iter()
        .map(|c| metric(c) * c.support as f64)
        .sum::<f64>()
        / total_support as f64
}

impl ClassificationReport {
    /// Build the report for labels present in either `y_true` or `y_pred`.
    ///
    /// `class_names[label]` is used as the row name when available. Metrics
    /// that are undefined (no predicted or no true samples) are reported as 0.
    pub fn from_predictions(
        y_true: ArrayView1<'_, usize>,
        y_pred: ArrayView1<'_, usize>,
        class_names: &[String],
    ) -> Result<Self> {
        let labels = sorted_labels(y_true, y_pred);
        let cm = confusion_matrix(y_true, y_pred, &labels)?;
        let supports = y_true.label_count().into_iter().next().unwrap_or_default();

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .zip(cm.split_one_vs_all())
            .map(|(&label, one_vs_all)| {
                let precision = one_vs_all.precision();
                if precision.is_nan() {
                    log::warn!("No samples predicted as class {}; precision set to 0", label);
                }
                ClassMetrics {
                    label,
                    name: class_names
                        .get(label)
                        .cloned()
                        .unwrap_or_else(|| label.to_string()),
                    precision: finite_or_zero(precision),
                    recall: finite_or_zero(one_vs_all.recall()),
                    f1_score: finite_or_zero(one_vs_all.f1_score()),
                    support: supports.get(&label).copied().unwrap_or(0),
                }
            })
            .collect();

        let total_support = y_true.len();
        let n_classes = classes.len().max(1) as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n_classes,
        };
        let weighted_avg = AverageMetrics {
            precision: support_weighted(&classes, total_support, |c| c.precision),
            recall: support_weighted(&classes, total_support, |c| c.recall),
            f1_score: support_weighted(&classes, total_support, |c| c.f1_score),
        };

        Ok(ClassificationReport {
            accuracy: finite_or_zero(cm.accuracy()),
            classes,
            macro_avg,
            weighted_avg,
            total_support,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.name, c.precision, c.recall, c.f1_score, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1_score, self.total_support
            )?;
        }
        Ok(())
    }
}
