use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tarmac_learn::family::ModelFamily;
use tarmac_pipeline::artifact::FsArtifactStore;
use tarmac_serve::{request::PredictionRequest, service::PredictionService};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Model family key
    #[arg(long, default_value = "random_forest")]
    family: String,
    /// Artifact store directory
    #[arg(long, default_value = "models")]
    models: PathBuf,
    /// Prediction request JSON; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Response file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn read_request(input: Option<&Path>) -> anyhow::Result<PredictionRequest> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open request file: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse request file: {}", path.display()))
        }
        None => serde_json::from_reader(std::io::stdin().lock())
            .context("Failed to parse prediction request from stdin"),
    }
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let family: ModelFamily = arg
        .family
        .parse()
        .with_context(|| format!("Invalid model family '{}'", arg.family))?;

    let store = FsArtifactStore::new(&arg.models);
    let service = PredictionService::load_from(&store, family);
    anyhow::ensure!(
        service.is_ready(),
        "no usable artifact pair for '{family}' under {}",
        arg.models.display()
    );

    let request = read_request(arg.input.as_deref())?;
    let response = service.predict(&request)?;
    Output::save_json(&response, arg.output.clone())
}
