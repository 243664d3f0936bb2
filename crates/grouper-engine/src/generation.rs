use std::{fmt, num::ParseIntError, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    allocation::{RoundAllocator, promote_compulsory_leaders, reapply_promotions},
    history::GenerationRunState,
    model::{Participant, Roster, Round},
    settings::{GroupSettings, SettingsError},
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GenerateError {
    #[display("invalid settings: {_0}")]
    InvalidSettings(SettingsError),
}

/// Output of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Participants as the allocator saw them, i.e. with promoted leaders
    /// flagged.
    pub participants: Vec<Participant>,
    pub rounds: Vec<Round>,
    /// Session state after the last round; pass it back into [`generate`] to
    /// continue the session.
    pub state: GenerationRunState,
}

/// Runs `settings.rounds` allocation rounds over `roster`.
///
/// A fresh session starts from `previous = None`. When a previous state is
/// given, its pairing history, totals and round numbering carry on and the
/// leaders it promoted are promoted again before any new shortfall is drawn.
///
/// # Example
///
/// ```
/// use grouper_engine::{
///     GenderValues, GroupSettings, Participant, Roster, TargetAgeRanges, generate,
/// };
///
/// let participants = (1..=6)
///     .map(|i| Participant::new(i.to_string(), if i % 2 == 0 { "m" } else { "f" }, Some(30)))
///     .collect();
/// let roster = Roster::new(
///     participants,
///     GenderValues::new(["m"], ["f"]),
///     TargetAgeRanges::default(),
/// )
/// .unwrap();
/// let settings = GroupSettings {
///     rounds: 2,
///     ..GroupSettings::with_group_size(3)
/// };
///
/// let generation = generate(&roster, &settings, None, &mut rand::rng()).unwrap();
/// assert_eq!(generation.rounds.len(), 2);
/// assert_eq!(generation.state.completed_rounds, 2);
/// ```
pub fn generate<R>(
    roster: &Roster,
    settings: &GroupSettings,
    previous: Option<GenerationRunState>,
    rng: &mut R,
) -> Result<Generation, GenerateError>
where
    R: Rng + ?Sized,
{
    settings.validate()?;

    let mut state = previous.unwrap_or_default();
    let mut participants = roster.participants().to_vec();
    reapply_promotions(&mut participants, &state.promoted_leaders);
    let promoted = promote_compulsory_leaders(&mut participants, settings, rng);
    if !promoted.is_empty() {
        log::info!("promoted {} participants to group leader", promoted.len());
    }
    state.promoted_leaders.extend(promoted);

    log::info!(
        "generating {} rounds for {} participants (group size {}, {} policy)",
        settings.rounds,
        participants.len(),
        settings.group_size,
        settings.shuffle_policy
    );
    let allocator = RoundAllocator::new(
        &participants,
        settings,
        roster.gender_values(),
        roster.target_age_ranges(),
    )?;
    let mut rounds = Vec::with_capacity(settings.rounds);
    for _ in 0..settings.rounds {
        rounds.push(allocator.allocate(&mut state, rng));
    }
    log::info!(
        "finished at round {} with {} known pairs",
        state.completed_rounds,
        state.history.pair_count()
    );

    Ok(Generation {
        participants,
        rounds,
        state,
    })
}

/// Like [`generate`], but driven by a PCG32 generator seeded with `seed`.
/// The same roster, settings, previous state and seed always produce the same
/// generation.
pub fn generate_with_seed(
    roster: &Roster,
    settings: &GroupSettings,
    previous: Option<GenerationRunState>,
    seed: GenerationSeed,
) -> Result<Generation, GenerateError> {
    let mut rng = Pcg32::from_seed(seed.0);
    generate(roster, settings, previous, &mut rng)
}

/// 128-bit seed for reproducible generation runs.
///
/// Serialized and parsed as a 32-character hex string, so a seed printed in a
/// report can be fed back on the command line.
///
/// ```
/// use grouper_engine::GenerationSeed;
/// use rand::Rng as _;
///
/// let seed: GenerationSeed = rand::rng().random();
/// let parsed: GenerationSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSeed([u8; 16]);

impl GenerationSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for GenerationSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid seed: expected 32 hex characters, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid seed: {source}")]
    InvalidDigits { source: ParseIntError },
}

impl FromStr for GenerationSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::InvalidLength { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|source| SeedParseError::InvalidDigits { source })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GenerationSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenerationSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<GenerationSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GenerationSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GenerationSeed(seed)
    }
}
