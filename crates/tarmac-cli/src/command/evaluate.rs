use std::path::PathBuf;

use anyhow::Context as _;
use tarmac_data::{frame::Frame, sample::StratifiedSampler};
use tarmac_learn::family::ModelFamily;
use tarmac_pipeline::{
    artifact::{ArtifactStore as _, FsArtifactStore},
    split::stratified_split,
};
use tarmac_stats::{
    classification::{ClassificationMetrics, classification_report},
    confusion::ConfusionMatrix,
};

use crate::util::load_flights;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Historical flight data (carrier CSV extract)
    #[arg(long)]
    data: PathBuf,
    /// Model family key
    #[arg(long, default_value = "random_forest")]
    family: String,
    /// Artifact store directory
    #[arg(long, default_value = "models")]
    models: PathBuf,
    /// Fraction of the historical data sampled for evaluation
    #[arg(long, default_value_t = 0.1)]
    fraction: f64,
    /// Fraction of the sample held out for scoring
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
    /// Seed for sampling and splitting
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Keep rows marked cancelled instead of dropping them
    #[arg(long)]
    keep_cancelled: bool,
}

/// Scores a stored artifact pair on freshly sampled held-out rows.
///
/// The stored encoder is used as-is — never re-fit — so the evaluation
/// sees exactly the column layout the model was trained on.
pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let family: ModelFamily = arg
        .family
        .parse()
        .with_context(|| format!("Invalid model family '{}'", arg.family))?;

    let store = FsArtifactStore::new(&arg.models);
    let pair = store
        .load(family)
        .with_context(|| format!("Failed to load artifact pair for '{family}'"))?;
    eprintln!(
        "Loaded {family} pair trained at {} (held-out f1 {:.4} at training time)",
        pair.trained_at, pair.metrics.f1
    );

    let records = load_flights(&arg.data, arg.keep_cancelled)?;
    let sampler = StratifiedSampler::new(arg.fraction).with_seed(arg.seed);
    let outcome = sampler.sample(&records);
    anyhow::ensure!(
        !outcome.records.is_empty(),
        "no usable rows in {}",
        arg.data.display()
    );

    let frame = Frame::from_records(&outcome.records);
    let matrix = pair.encoder.transform(&frame)?;
    let labels: Vec<u8> = outcome
        .records
        .iter()
        .filter_map(tarmac_data::record::FlightRecord::label)
        .collect();

    let split = stratified_split(&matrix, &labels, arg.test_fraction, arg.seed);
    let predicted = pair.model.predict(&split.test_x).to_vec();

    let confusion = ConfusionMatrix::from_labels(&split.test_y, &predicted);
    let metrics = ClassificationMetrics::from_confusion(&confusion);
    eprintln!(
        "accuracy {:.4}  precision {:.4}  recall {:.4}  f1 {:.4}",
        metrics.accuracy, metrics.precision, metrics.recall, metrics.f1
    );
    eprintln!("{}", classification_report(&confusion));
    Ok(())
}
