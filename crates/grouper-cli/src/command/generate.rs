use std::path::PathBuf;

use anyhow::Context as _;
use grouper_engine::{
    AssignmentTable, GenerationSeed, GroupSettings, ShufflePolicy, generate_with_seed,
};
use rand::Rng as _;

use crate::{
    schema::report::GenerationReport,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Dataset JSON file
    #[arg(long)]
    dataset: PathBuf,
    /// Settings JSON file; the flags below override its fields
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Participants per group
    #[arg(long)]
    group_size: Option<usize>,
    /// Number of rounds to generate
    #[arg(long)]
    rounds: Option<usize>,
    /// Leaders seeded into every group
    #[arg(long)]
    min_leaders: Option<usize>,
    /// Promote random participants until every group can get its leaders
    #[arg(long)]
    compulsory_group_leader: bool,
    /// Steer groups towards the dataset's gender ratio
    #[arg(long)]
    balance_genders: bool,
    /// Prefer participants whose target age matches the group
    #[arg(long)]
    split_by_target_age: bool,
    /// How to pick among equally suitable candidates (unique, random)
    #[arg(long)]
    shuffle_policy: Option<ShufflePolicy>,
    /// 32-digit hex seed; random if omitted
    #[arg(long)]
    seed: Option<GenerationSeed>,
    /// Session state of an earlier run to continue from
    #[arg(long)]
    previous_state: Option<PathBuf>,
    /// Where to save the session state after this run
    #[arg(long)]
    state_output: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl GenerateArg {
    fn load_settings(&self) -> anyhow::Result<GroupSettings> {
        let mut settings = match &self.settings {
            Some(path) => util::read_settings_file(path)?,
            None => GroupSettings::default(),
        };
        if let Some(group_size) = self.group_size {
            settings.group_size = group_size;
        }
        if let Some(rounds) = self.rounds {
            settings.rounds = rounds;
        }
        if let Some(min_leaders) = self.min_leaders {
            settings.min_leaders = min_leaders;
        }
        if let Some(shuffle_policy) = self.shuffle_policy {
            settings.shuffle_policy = shuffle_policy;
        }
        settings.compulsory_group_leader |= self.compulsory_group_leader;
        settings.balance_genders |= self.balance_genders;
        settings.split_by_target_age |= self.split_by_target_age;
        Ok(settings)
    }
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let settings = arg.load_settings()?;
    log::debug!("effective settings: {settings:?}");
    let (roster, attributes) = util::read_dataset_file(&arg.dataset)?;
    let previous = arg
        .previous_state
        .as_ref()
        .map(util::read_state_file)
        .transpose()?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());

    eprintln!("Loaded {} participants", roster.len());
    if let Some(previous) = &previous {
        eprintln!(
            "Continuing session after round {}",
            previous.completed_rounds
        );
    }
    eprintln!("Seed: {seed}");

    let generation = generate_with_seed(&roster, &settings, previous, seed)
        .context("Failed to generate groups")?;
    for round in &generation.rounds {
        eprintln!(
            "Round {}: {} groups, {} participants placed",
            round.number,
            round.groups.len(),
            round.participant_count()
        );
        if !round.unplaced.is_empty() {
            eprintln!("  {} participants could not be placed", round.unplaced.len());
        }
    }

    let assignments = AssignmentTable::new(
        &generation.participants,
        &generation.rounds,
        &generation.state,
    );
    let report = GenerationReport::new(seed, &settings, &generation, &assignments, &attributes);
    if let Some(scores) = &report.scores {
        eprintln!(
            "Total score: mean {:.3} (std dev {:.3}), worst group {:.3}, best group {:.3}",
            scores.total.mean, scores.total.std_dev, scores.total.min, scores.total.max
        );
    }
    Output::save_json(&report, arg.output.clone())?;

    if let Some(path) = &arg.state_output {
        Output::save_json(&generation.state, Some(path.clone()))?;
        eprintln!("Session state saved to {}", path.display());
    }
    Ok(())
}
