use anyhow::Result;
use log::LevelFilter;

use iris_classifier::config::{ModelConfig, SplitConfig};
use iris_classifier::data_handling::IrisData;
use iris_classifier::IrisClassifier;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("IRIS_LOG", "info"))
        .init();

    let split_config = SplitConfig::default();
    let data = IrisData::bundled();
    data.log_input_data_summary();

    let split = data.stratified_split(split_config.test_fraction, split_config.seed)?;
    println!(
        "Train samples: {}, test samples: {}",
        split.n_train(),
        split.n_test()
    );

    let mut classifier = IrisClassifier::with_config(ModelConfig::default().with_scaling(true));
    classifier.train(&split.x_train, &split.y_train)?;

    let (accuracy, report) = classifier.evaluate(&split.x_test, &split.y_test)?;
    println!("Accuracy: {:.3}\n\n{}", accuracy, report);

    let model_path = std::env::temp_dir().join("iris_model.json");
    classifier.save(&model_path)?;

    let restored = IrisClassifier::from_file(&model_path)?;
    let same = restored.predict(&split.x_test)? == classifier.predict(&split.x_test)?;
    println!("Restored model from {} (predictions match: {})", model_path.display(), same);

    Ok(())
}
