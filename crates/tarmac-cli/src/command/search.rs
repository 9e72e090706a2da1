use std::path::PathBuf;

use anyhow::Context as _;
use tarmac_learn::family::ModelFamily;
use tarmac_pipeline::{
    artifact::FsArtifactStore,
    search::{self, SearchSpace},
    trainer::TrainerConfig,
};

use crate::util::{Output, load_flights};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Historical flight data (carrier CSV extract)
    #[arg(long)]
    data: PathBuf,
    /// Model family key
    #[arg(long, default_value = "random_forest")]
    family: String,
    /// Artifact store directory
    #[arg(long, default_value = "models")]
    models: PathBuf,
    /// Number of search trials
    #[arg(long, default_value_t = 20)]
    trials: usize,
    /// Fraction of the historical data sampled per trial
    #[arg(long, default_value_t = 0.1)]
    fraction: f64,
    /// Seed for candidate sampling and every trial's pipeline
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Keep rows marked cancelled instead of dropping them
    #[arg(long)]
    keep_cancelled: bool,
    /// Outcome file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SearchArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.trials > 0, "search needs at least one trial");
    let family: ModelFamily = arg
        .family
        .parse()
        .with_context(|| format!("Invalid model family '{}'", arg.family))?;

    let records = load_flights(&arg.data, arg.keep_cancelled)?;
    let store = FsArtifactStore::new(&arg.models);
    let config = TrainerConfig {
        sample_fraction: arg.fraction,
        seed: arg.seed,
        ..TrainerConfig::default()
    };
    let space = SearchSpace::for_family(family);

    eprintln!("Searching {} over {} trials...", family, arg.trials);
    let outcome = search::search(&records, family.key(), &space, arg.trials, &config, &store)?;
    eprintln!(
        "Best trial #{}: f1 {:.4}",
        outcome.best.trial, outcome.best.metrics.f1
    );

    Output::save_json(&outcome, arg.output.clone())
}
