use std::path::PathBuf;

use anyhow::Context as _;
use labelmatch_core::{DistributionMatcher, LabeledTable};

use crate::{
    command::MatchInputArg,
    schema::report::{self, MatchReport},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MatchArg {
    #[clap(flatten)]
    pub(crate) input: MatchInputArg,
    /// Matched CSV output path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
}

pub(crate) fn run(arg: &MatchArg) -> anyhow::Result<()> {
    let MatchArg {
        input,
        output,
        report,
    } = arg;

    let (reference, candidate) = load_inputs(input)?;
    let matcher = DistributionMatcher::new(&input.label_column).with_seed(input.seed);

    let distribution = matcher
        .compute_distribution(&reference)
        .context("Cannot compute training data distribution")?;
    let sampled = matcher
        .match_distribution(&reference, &candidate)
        .context("Cannot match testing data distribution")?;

    for allocation in sampled.allocations().iter().filter(|a| a.is_capped()) {
        log::warn!(
            "Label '{}' needs {} rows but testing data has only {}",
            allocation.label,
            allocation.target,
            allocation.available
        );
    }
    if sampled.is_empty() {
        log::warn!("No testing rows share a label with the training data");
    }
    log::info!(
        "Sampled {} of {} testing rows (seed {})",
        sampled.len(),
        candidate.len(),
        input.seed
    );

    util::print_shares("Training data distribution", &distribution.shares());
    if let Some(matched) = report::matched_distribution(&sampled, &input.label_column) {
        eprintln!();
        util::print_shares(
            "Matched data distribution",
            &matched.shares_by_frequency(),
        );
    }

    if let Some(path) = report {
        let match_report = MatchReport::new(
            &input.label_column,
            input.seed,
            &distribution,
            candidate.len(),
            &sampled,
        );
        Output::save_json(&match_report, Some(path.clone()))?;
        log::info!("Report saved to {}", path.display());
    }

    Output::save_csv(sampled.table(), output.clone())?;

    Ok(())
}

/// Load the training (reference) and testing (candidate) tables
pub(crate) fn load_inputs(input: &MatchInputArg) -> anyhow::Result<(LabeledTable, LabeledTable)> {
    let reference = util::read_labeled_csv_file("training", &input.reference, &input.label_column)?;
    let candidate = util::read_labeled_csv_file("testing", &input.candidate, &input.label_column)?;
    Ok((reference, candidate))
}
