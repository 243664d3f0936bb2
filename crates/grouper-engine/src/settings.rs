use serde::{Deserialize, Serialize};

/// How the candidate selector breaks ties after filtering.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ShufflePolicy {
    /// Prefer the candidate who met the fewest current group members before.
    #[default]
    #[display("unique")]
    Unique,
    /// Pick uniformly at random among the remaining candidates.
    #[display("random")]
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SettingsError {
    #[display("group size must be positive")]
    ZeroGroupSize,
    #[display("number of rounds must be positive")]
    ZeroRounds,
}

/// Options controlling a generation run.
///
/// Every field except `group_size` has a default, so a settings file only
/// needs to name what it changes.
///
/// # Example
///
/// ```
/// use grouper_engine::{GroupSettings, ShufflePolicy};
///
/// let settings = GroupSettings {
///     rounds: 3,
///     balance_genders: true,
///     ..GroupSettings::with_group_size(4)
/// };
/// assert_eq!(settings.num_groups(10), 3);
/// assert_eq!(settings.shuffle_policy, ShufflePolicy::Unique);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Target size of every group except possibly the last.
    pub group_size: usize,
    pub rounds: usize,
    /// Leaders seeded into every group before the others are placed.
    pub min_leaders: usize,
    /// Promote random non-leaders until `min_leaders` can be met in every group.
    pub compulsory_group_leader: bool,
    pub balance_genders: bool,
    pub split_by_target_age: bool,
    pub shuffle_policy: ShufflePolicy,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            group_size: 0,
            rounds: 1,
            min_leaders: 0,
            compulsory_group_leader: false,
            balance_genders: false,
            split_by_target_age: false,
            shuffle_policy: ShufflePolicy::default(),
        }
    }
}

impl GroupSettings {
    #[must_use]
    pub fn with_group_size(group_size: usize) -> Self {
        Self {
            group_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.group_size == 0 {
            return Err(SettingsError::ZeroGroupSize);
        }
        if self.rounds == 0 {
            return Err(SettingsError::ZeroRounds);
        }
        Ok(())
    }

    /// Number of groups needed to seat `participant_count` people.
    ///
    /// # Panics
    ///
    /// Panics if `group_size` is zero; call [`Self::validate`] first.
    #[must_use]
    pub fn num_groups(&self, participant_count: usize) -> usize {
        assert!(self.group_size > 0, "group size must be validated first");
        participant_count.div_ceil(self.group_size)
    }
}
