//! Session state carried from one round to the next.
//!
//! - [`PairingHistory`] - Who has already been grouped with whom
//! - [`AccumulatedCounts`] - Per-participant running totals
//! - [`GenerationRunState`] - Everything above, owned by one session

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{Participant, ParticipantId};

/// For every participant, the set of participants it has shared a group with
/// in any earlier round.
///
/// The relation is symmetric and only ever grows during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingHistory {
    past_groupmates: BTreeMap<ParticipantId, BTreeSet<ParticipantId>>,
}

impl PairingHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn groupmates_of(&self, id: &ParticipantId) -> Option<&BTreeSet<ParticipantId>> {
        self.past_groupmates.get(id)
    }

    #[must_use]
    pub fn have_met(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        self.past_groupmates
            .get(a)
            .is_some_and(|mates| mates.contains(b))
    }

    /// Counts how many of `others` the participant `id` has met before.
    /// The participant itself is skipped if it appears in `others`.
    #[must_use]
    pub fn count_met<'a, I>(&self, id: &ParticipantId, others: I) -> usize
    where
        I: IntoIterator<Item = &'a Participant>,
    {
        let Some(mates) = self.past_groupmates.get(id) else {
            return 0;
        };
        others
            .into_iter()
            .filter(|other| &other.id != id && mates.contains(&other.id))
            .count()
    }

    /// Records every pair within one group, in both directions.
    pub fn record_group<'a, I>(&mut self, members: I)
    where
        I: IntoIterator<Item = &'a Participant>,
        I::IntoIter: Clone,
    {
        let members = members.into_iter();
        for p in members.clone() {
            for other in members.clone() {
                if p.id != other.id {
                    self.past_groupmates
                        .entry(p.id.clone())
                        .or_default()
                        .insert(other.id.clone());
                }
            }
        }
    }

    /// Total number of unordered pairs recorded so far.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.past_groupmates.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.past_groupmates.is_empty()
    }
}

/// Running totals of per-round statistics for one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatedCounts {
    pub repeated_groupmate_count: usize,
    pub unmet_target_age_groupmate_count: usize,
}

impl AccumulatedCounts {
    pub fn add(&mut self, repeated: usize, unmet: usize) {
        self.repeated_groupmate_count += repeated;
        self.unmet_target_age_groupmate_count += unmet;
    }
}

/// State of one grouping session.
///
/// Created empty for a fresh run, updated after every round and handed back
/// to the caller, who can pass it into the next run to continue the session.
/// Nothing here is shared between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRunState {
    pub history: PairingHistory,
    pub totals: BTreeMap<ParticipantId, AccumulatedCounts>,
    /// Participants promoted to leader by the compulsory-leader step.
    pub promoted_leaders: BTreeSet<ParticipantId>,
    pub completed_rounds: usize,
}

impl GenerationRunState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn totals_of(&self, id: &ParticipantId) -> AccumulatedCounts {
        self.totals.get(id).copied().unwrap_or_default()
    }
}
