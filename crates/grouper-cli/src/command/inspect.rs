use std::path::PathBuf;

use grouper_engine::DatasetSummary;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Dataset JSON file
    #[arg(long)]
    dataset: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { dataset, output } = arg;

    let (roster, _attributes) = util::read_dataset_file(dataset)?;
    eprintln!("Loaded {} participants", roster.len());

    let summary = DatasetSummary::new(&roster);
    let ratios = summary.participant_ratios;
    eprintln!(
        "male: {} ({} leaders), female: {} ({} leaders), unknown: {} ({} leaders)",
        ratios.male.all,
        ratios.male.leaders,
        ratios.female.all,
        ratios.female.leaders,
        ratios.unknown.all,
        ratios.unknown.leaders
    );

    Output::save_json(&summary, output.clone())?;
    Ok(())
}
