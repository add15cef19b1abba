use std::path::PathBuf;

use clap::{Parser, Subcommand};
use labelmatch_core::DEFAULT_SEED;

use self::{match_labels::MatchArg, summarize::SummarizeArg, view::ViewArg};

mod match_labels;
mod summarize;
mod view;

const DEFAULT_LABEL_COLUMN: &str = "gold_label";
const DEFAULT_CANDIDATE_FILE: &str = "testing_data.csv";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Sample the testing data to the label distribution of the training data
    Match(#[clap(flatten)] MatchArg),
    /// Write the label distribution of a CSV file as JSON
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Compare distributions interactively and save the matched data
    View(#[clap(flatten)] ViewArg),
}

/// Inputs shared by the commands that perform matching
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MatchInputArg {
    /// Training data CSV whose label proportions are the target
    reference: PathBuf,
    /// Testing data CSV to sample rows from
    #[arg(long, default_value = DEFAULT_CANDIDATE_FILE)]
    candidate: PathBuf,
    /// Name of the categorical label column
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    label_column: String,
    /// Seed for reproducible sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Match(arg) => match_labels::run(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::View(arg) => view::run(&arg)?,
    }
    Ok(())
}
