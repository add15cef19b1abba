use std::path::PathBuf;

use anyhow::Context as _;
use labelmatch_core::compute_distribution;

use crate::{
    command::DEFAULT_LABEL_COLUMN,
    schema::report::DistributionReport,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    /// CSV file to summarize
    table: PathBuf,
    /// Name of the categorical label column
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    label_column: String,
    /// JSON output path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let SummarizeArg {
        table,
        label_column,
        output,
    } = arg;

    let data = util::read_labeled_csv_file("input", table, label_column)?;
    let distribution = compute_distribution(&data, label_column)
        .with_context(|| format!("Cannot summarize {}", table.display()))?;

    util::print_shares("Label distribution", &distribution.shares());

    let report = DistributionReport::new(table.display().to_string(), label_column, &distribution);
    Output::save_json(&report, output.clone())?;

    Ok(())
}
