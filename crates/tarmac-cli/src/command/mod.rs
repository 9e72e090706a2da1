use clap::{Parser, Subcommand};

use self::{
    evaluate::EvaluateArg, predict::PredictArg, search::SearchArg, train::TrainArg,
};

mod evaluate;
mod predict;
mod search;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a model family on historical flight data
    Train(#[clap(flatten)] TrainArg),
    /// Re-evaluate a stored model on fresh held-out data
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Score one flight against a stored model
    Predict(#[clap(flatten)] PredictArg),
    /// Random hyperparameter search over repeated training runs
    Search(#[clap(flatten)] SearchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Predict(arg) => predict::run(&arg)?,
        Mode::Search(arg) => search::run(&arg)?,
    }
    Ok(())
}
