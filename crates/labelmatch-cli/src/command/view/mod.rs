use std::path::PathBuf;

use crate::{
    command::{MatchInputArg, match_labels},
    tui,
};

use self::app::MatchViewApp;

mod app;

const DEFAULT_OUTPUT_FILE: &str = "matched_data.csv";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ViewArg {
    #[clap(flatten)]
    pub(crate) input: MatchInputArg,
    /// Where `s` saves the matched CSV
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub(crate) output: PathBuf,
}

pub(crate) fn run(arg: &ViewArg) -> anyhow::Result<()> {
    let ViewArg { input, output } = arg;

    let (reference, candidate) = match_labels::load_inputs(input)?;
    let mut app = MatchViewApp::new(
        reference,
        candidate,
        &input.label_column,
        input.seed,
        output.clone(),
    )?;
    tui::run(&mut app)?;

    if let Some(saved) = app.last_saved() {
        log::info!("Matched data saved to {}", saved.display());
    }
    Ok(())
}
