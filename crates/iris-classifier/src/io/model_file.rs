//! On-disk model format.
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::models::FittedModel;
use crate::preprocessing::Scaler;

/// Bumped whenever `SavedModel` changes incompatibly.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Everything needed to rebuild a trained classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    pub format_version: u32,
    pub model_name: String,
    /// Feature width seen at training time.
    pub n_features: usize,
    pub n_train_samples: usize,
    /// RFC 3339 timestamp of the training run.
    pub trained_at: String,
    pub class_names: Vec<String>,
    pub scaler: Option<Scaler>,
    pub model: FittedModel,
}

/// Write `saved` as JSON, replacing any existing file at `path`.
///
/// The JSON is written to a sibling `<name>.tmp` file and renamed over `path`
/// once complete; on failure the previous file at `path` is left as it was.
pub fn write_model<P: AsRef<Path>>(path: P, saved: &SavedModel) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = sibling_tmp_path(path);

    let written = write_json(&tmp_path, saved).and_then(|()| Ok(fs::rename(&tmp_path, path)?));
    if written.is_err() && tmp_path.is_file() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            log::warn!("Could not remove {}: {}", tmp_path.display(), e);
        }
    }
    written
}

fn write_json(path: &Path, saved: &SavedModel) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, saved)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("model"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a model file written by `write_model`.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<SavedModel> {
    let file = File::open(path.as_ref())?;
    let saved: SavedModel = serde_json::from_reader(BufReader::new(file))?;

    if saved.format_version != MODEL_FORMAT_VERSION {
        return Err(ClassifierError::InvalidInput(format!(
            "unsupported model format version {} in {} (expected {})",
            saved.format_version,
            path.as_ref().display(),
            MODEL_FORMAT_VERSION
        )));
    }
    if let Some(scaler) = &saved.scaler {
        if scaler.n_features() != saved.n_features || scaler.std.len() != saved.n_features {
            return Err(ClassifierError::ShapeMismatch {
                context: "saved scaler width",
                expected: saved.n_features,
                found: scaler.n_features(),
            });
        }
    }
    saved.model.check_feature_width(saved.n_features)?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_sits_next_to_target() {
        let path = Path::new("/data/models/iris.json");
        assert_eq!(
            sibling_tmp_path(path),
            PathBuf::from("/data/models/iris.json.tmp")
        );
    }
}
