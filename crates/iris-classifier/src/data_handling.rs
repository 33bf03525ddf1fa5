//! Data structures and helpers for loading and splitting the Iris dataset.
//!
//! This module defines `IrisData` (feature matrix, integer labels and the
//! names that go with them) and the stratified, seeded train/test split used
//! by the classifier tests and examples.
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use linfa::DatasetBase;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitConfig;
use crate::error::{ClassifierError, Result};

pub const IRIS_FEATURE_NAMES: [&str; 4] = [
    "sepal length",
    "sepal width",
    "petal length",
    "petal width",
];

pub const IRIS_CLASS_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Labeled samples: one row of `records` per entry of `targets`.
#[derive(Debug, Clone)]
pub struct IrisData {
    pub records: Array2<f64>,
    pub targets: Array1<usize>,
    pub feature_names: Vec<String>,
    pub class_names: Vec<String>,
}

/// The four arrays produced by a train/test split.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<usize>,
    pub y_test: Array1<usize>,
}

impl TrainTestSplit {
    pub fn n_train(&self) -> usize {
        self.y_train.len()
    }

    pub fn n_test(&self) -> usize {
        self.y_test.len()
    }

    /// Destructure into `(x_train, x_test, y_train, y_test)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>, Array1<usize>, Array1<usize>) {
        (self.x_train, self.x_test, self.y_train, self.y_test)
    }
}

/// Load the bundled Iris dataset and split it.
///
/// # Arguments
///
/// * `test_fraction` - Fraction of samples placed in the test subset, in (0, 1).
/// * `seed` - Seed for the shuffling; the same seed always yields the same subsets.
pub fn load_iris_data(test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    IrisData::bundled().stratified_split(test_fraction, seed)
}

/// `load_iris_data` with the default split parameters.
pub fn load_iris_data_default() -> Result<TrainTestSplit> {
    let SplitConfig {
        test_fraction,
        seed,
    } = SplitConfig::default();
    load_iris_data(test_fraction, seed)
}

impl IrisData {
    pub fn new(
        records: Array2<f64>,
        targets: Array1<usize>,
        feature_names: Vec<String>,
        class_names: Vec<String>,
    ) -> Result<Self> {
        if records.nrows() != targets.len() {
            return Err(ClassifierError::ShapeMismatch {
                context: "dataset labels",
                expected: records.nrows(),
                found: targets.len(),
            });
        }
        if records.nrows() == 0 || records.ncols() == 0 {
            return Err(ClassifierError::InvalidInput(
                "dataset must contain at least one sample and one feature".to_string(),
            ));
        }
        Ok(IrisData {
            records,
            targets,
            feature_names,
            class_names,
        })
    }

    /// The classic 150-sample Iris dataset shipped with `linfa-datasets`.
    pub fn bundled() -> Self {
        let DatasetBase {
            records, targets, ..
        } = linfa_datasets::iris();

        IrisData {
            records,
            targets,
            feature_names: IRIS_FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            class_names: IRIS_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Read a headered CSV whose last column is the label.
    ///
    /// Labels may be integer class indices or class names. Names are mapped
    /// to indices in order of first appearance.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(ClassifierError::InvalidInput(format!(
                "{} needs at least one feature column and a label column",
                path.as_ref().display()
            )));
        }
        let n_features = headers.len() - 1;
        let feature_names: Vec<String> =
            headers.iter().take(n_features).map(|h| h.to_string()).collect();

        let mut features = Vec::new();
        let mut raw_labels = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            for col in 0..n_features {
                let value = record.get(col).unwrap_or_default();
                let parsed = value.parse::<f64>().map_err(|_| {
                    ClassifierError::InvalidInput(format!(
                        "invalid value '{}' in column '{}' at row {}",
                        value,
                        feature_names[col],
                        row_idx + 1
                    ))
                })?;
                features.push(parsed);
            }
            raw_labels.push(record.get(n_features).unwrap_or_default().to_string());
        }

        let n_rows = raw_labels.len();
        let (targets, class_names) = encode_labels(&raw_labels);
        let records = Array2::from_shape_vec((n_rows, n_features), features).map_err(|e| {
            ClassifierError::InvalidInput(format!("could not build feature matrix: {}", e))
        })?;

        log::debug!(
            "Read {} rows with {} features and {} classes from {}",
            n_rows,
            n_features,
            class_names.len(),
            path.as_ref().display()
        );

        IrisData::new(records, Array1::from_vec(targets), feature_names, class_names)
    }

    pub fn n_samples(&self) -> usize {
        self.records.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.records.ncols()
    }

    /// Row indices grouped by label, in ascending label order.
    fn class_indices(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in self.targets.iter().enumerate() {
            groups.entry(label).or_default().push(idx);
        }
        groups
    }

    pub fn log_input_data_summary(&self) {
        log::info!("----- Input Data Summary -----");
        for (label, rows) in self.class_indices() {
            let name = self
                .class_names
                .get(label)
                .map(String::as_str)
                .unwrap_or("unknown");
            log::info!("Class {} ({}): {} samples", label, name, rows.len());
        }
        log::info!("{} feature columns", self.n_features());
        log::info!("-------------------------------");
    }

    /// Split into train and test subsets, preserving class proportions.
    ///
    /// The test subset holds `ceil(test_fraction * n)` samples. Each class
    /// contributes its proportional share (largest remainders get the
    /// leftover seats). Rows are shuffled with a `StdRng` seeded from `seed`,
    /// so the result is fully determined by `(self, test_fraction, seed)`.
    ///
    /// `rand` does not promise that `StdRng` produces the same stream across
    /// releases. A given seed reproduces a given split only while the
    /// resolved `rand` version stays fixed; commit `Cargo.lock` when splits
    /// must be reproducible between builds.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
        if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
            return Err(ClassifierError::InvalidInput(format!(
                "test_fraction must be in (0, 1), got {}",
                test_fraction
            )));
        }

        let n = self.n_samples();
        // The epsilon keeps e.g. 0.4 * 150 from rounding up to 61.
        let n_test = ((test_fraction * n as f64) - 1e-9).ceil().max(0.0) as usize;
        let n_train = n.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(ClassifierError::InvalidInput(format!(
                "test_fraction {} leaves an empty subset for {} samples",
                test_fraction, n
            )));
        }

        let groups = self.class_indices();
        let class_sizes: Vec<usize> = groups.values().map(Vec::len).collect();
        let test_counts = allocate_test_counts(&class_sizes, n_test);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut train_idx = Vec::with_capacity(n_train);
        let mut test_idx = Vec::with_capacity(n_test);
        for (rows, &k) in groups.values().zip(test_counts.iter()) {
            let mut rows = rows.clone();
            rows.shuffle(&mut rng);
            test_idx.extend_from_slice(&rows[..k]);
            train_idx.extend_from_slice(&rows[k..]);
        }
        train_idx.shuffle(&mut rng);
        test_idx.shuffle(&mut rng);

        log::debug!(
            "Stratified split (fraction {}, seed {}): {} train / {} test, per-class test counts {:?}",
            test_fraction,
            seed,
            train_idx.len(),
            test_idx.len(),
            test_counts
        );

        Ok(TrainTestSplit {
            x_train: self.records.select(Axis(0), &train_idx),
            x_test: self.records.select(Axis(0), &test_idx),
            y_train: self.targets.select(Axis(0), &train_idx),
            y_test: self.targets.select(Axis(0), &test_idx),
        })
    }
}

/// Distribute `n_test` seats over classes proportionally to their sizes.
fn allocate_test_counts(class_sizes: &[usize], n_test: usize) -> Vec<usize> {
    let total: usize = class_sizes.iter().sum();
    if total == 0 {
        return vec![0; class_sizes.len()];
    }

    let exact: Vec<f64> = class_sizes
        .iter()
        .map(|&size| size as f64 * n_test as f64 / total as f64)
        .collect();
    let mut counts: Vec<usize> = exact
        .iter()
        .zip(class_sizes)
        .map(|(&e, &size)| (e.floor() as usize).min(size))
        .collect();

    let mut order: Vec<usize> = (0..class_sizes.len()).collect();
    // Stable sort keeps class order for equal remainders.
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut remaining = n_test.saturating_sub(counts.iter().sum());
    while remaining > 0 {
        let mut placed = false;
        for &class in &order {
            if remaining == 0 {
                break;
            }
            if counts[class] < class_sizes[class] {
                counts[class] += 1;
                remaining -= 1;
                placed = true;
            }
        }
        if !placed {
            break;
        }
    }

    counts
}

/// Map raw label strings to class indices.
fn encode_labels(raw: &[String]) -> (Vec<usize>, Vec<String>) {
    let numeric: Option<Vec<usize>> = raw.iter().map(|s| s.parse::<usize>().ok()).collect();
    if let Some(labels) = numeric {
        let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
        let names = (0..n_classes).map(|i| i.to_string()).collect();
        return (labels, names);
    }

    let mut names: Vec<String> = Vec::new();
    let mut lookup: HashMap<&str, usize> = HashMap::new();
    let labels = raw
        .iter()
        .map(|s| {
            *lookup.entry(s.as_str()).or_insert_with(|| {
                names.push(s.clone());
                names.len() - 1
            })
        })
        .collect();
    (labels, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_exact_for_balanced_classes() {
        assert_eq!(allocate_test_counts(&[50, 50, 50], 60), vec![20, 20, 20]);
        assert_eq!(allocate_test_counts(&[50, 50, 50], 45), vec![15, 15, 15]);
    }

    #[test]
    fn allocation_hands_leftovers_to_largest_remainders() {
        // exact shares: 3.5, 2.1, 1.4 -> floors 3, 2, 1 plus one leftover seat
        let counts = allocate_test_counts(&[50, 30, 20], 7);
        assert_eq!(counts.iter().sum::<usize>(), 7);
        assert_eq!(counts, vec![4, 2, 1]);
    }

    #[test]
    fn allocation_breaks_ties_in_class_order() {
        assert_eq!(allocate_test_counts(&[1, 1, 1], 2), vec![1, 1, 0]);
    }

    #[test]
    fn numeric_labels_are_used_verbatim() {
        let raw: Vec<String> = ["2", "0", "1"].iter().map(|s| s.to_string()).collect();
        let (labels, names) = encode_labels(&raw);
        assert_eq!(labels, vec![2, 0, 1]);
        assert_eq!(names, vec!["0", "1", "2"]);
    }

    #[test]
    fn named_labels_follow_first_appearance() {
        let raw: Vec<String> = ["virginica", "setosa", "virginica"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (labels, names) = encode_labels(&raw);
        assert_eq!(labels, vec![0, 1, 0]);
        assert_eq!(names, vec!["virginica", "setosa"]);
    }

    #[test]
    fn bundled_dataset_is_balanced() {
        let data = IrisData::bundled();
        assert_eq!(data.n_samples(), 150);
        assert_eq!(data.n_features(), 4);
        let sizes: Vec<usize> = data.class_indices().values().map(Vec::len).collect();
        assert_eq!(sizes, vec![50, 50, 50]);
    }
}
