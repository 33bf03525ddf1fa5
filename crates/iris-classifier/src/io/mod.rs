pub mod model_file;

pub use model_file::{read_model, write_model, SavedModel, MODEL_FORMAT_VERSION};
