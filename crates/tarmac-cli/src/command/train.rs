use std::path::PathBuf;

use anyhow::Context as _;
use tarmac_learn::{
    family::ModelFamily,
    params::{ClassWeight, Hyperparameters},
};
use tarmac_pipeline::{
    artifact::FsArtifactStore,
    trainer::{self, TrainerConfig},
};

use crate::util::load_flights;

fn parse_class_weight(value: &str) -> Result<ClassWeight, String> {
    match value {
        "uniform" => Ok(ClassWeight::Uniform),
        "balanced" => Ok(ClassWeight::Balanced),
        other => Err(format!(
            "unknown class weight '{other}' (expected 'uniform' or 'balanced')"
        )),
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Historical flight data (carrier CSV extract)
    #[arg(long)]
    data: PathBuf,
    /// Model family key, or "all" to train and compare every family
    #[arg(long, default_value = "random_forest")]
    family: String,
    /// Artifact store directory
    #[arg(long, default_value = "models")]
    models: PathBuf,
    /// Fraction of the historical data sampled for the run
    #[arg(long, default_value_t = 0.1)]
    fraction: f64,
    /// Fraction of the sample held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
    /// Seed for sampling, splitting and fitting
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Keep rows marked cancelled instead of dropping them
    #[arg(long)]
    keep_cancelled: bool,
    /// Ensemble size (forest and boosting)
    #[arg(long)]
    n_estimators: Option<usize>,
    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<usize>,
    /// Boosting shrinkage
    #[arg(long)]
    learning_rate: Option<f64>,
    /// Inverse regularization strength (logistic regression)
    #[arg(long)]
    c: Option<f64>,
    /// Gradient-descent iteration cap (logistic regression)
    #[arg(long)]
    max_iter: Option<usize>,
    /// Class reweighting: "balanced" (default) or "uniform"
    #[arg(long, value_parser = parse_class_weight)]
    class_weight: Option<ClassWeight>,
}

impl TrainArg {
    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            learning_rate: self.learning_rate,
            c: self.c,
            max_iter: self.max_iter,
            class_weight: self.class_weight,
            seed: Some(self.seed),
        }
    }

    fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            sample_fraction: self.fraction,
            test_fraction: self.test_fraction,
            seed: self.seed,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    // Validate the family before the data is read; the trainer checks the
    // key too, but only sees it after the CSV load.
    let families: Vec<&'static str> = if arg.family == "all" {
        ModelFamily::ALL.iter().map(|f| f.key()).collect()
    } else {
        let family: ModelFamily = arg
            .family
            .parse()
            .with_context(|| format!("Invalid model family '{}'", arg.family))?;
        vec![family.key()]
    };

    let records = load_flights(&arg.data, arg.keep_cancelled)?;
    let store = FsArtifactStore::new(&arg.models);
    let config = arg.trainer_config();

    for family in families {
        eprintln!("Training {family}...");
        let run = trainer::train(&records, family, arg.hyperparameters(), &config, &store)?;
        if !run.stratified_sample {
            eprintln!("  note: sample was NOT stratified (minority class too rare)");
        }
        eprintln!(
            "  rows: {} train / {} test",
            run.train_rows, run.test_rows
        );
        eprintln!(
            "  accuracy {:.4}  precision {:.4}  recall {:.4}  f1 {:.4}",
            run.metrics.accuracy, run.metrics.precision, run.metrics.recall, run.metrics.f1
        );
        eprintln!("{}", run.report);
    }

    Ok(())
}
