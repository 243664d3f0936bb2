use serde::{Deserialize, Serialize};

use super::participant::{Participant, ParticipantId};

/// One-based group number within a round.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct GroupId(usize);

impl GroupId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Statistics attached to a participant after a round has been scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRoundStats {
    /// Groupmates this round that the participant already met earlier.
    pub repeated_groupmate_count: usize,
    /// Groupmates this round whose age lies outside the participant's target range.
    pub unmet_target_age_groupmate_count: usize,
    pub accumulated_repeated_groupmate_count: usize,
    pub accumulated_unmet_target_age_groupmate_count: usize,
}

/// Quality scores of a single group, each in `[0, 1]` with 1 being best.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupScores {
    pub gender_ratio: f64,
    pub target_age: f64,
    pub groupmate_redundancy: f64,
    /// Unweighted mean of the three scores above.
    pub total: f64,
}

impl GroupScores {
    #[must_use]
    pub fn new(gender_ratio: f64, target_age: f64, groupmate_redundancy: f64) -> Self {
        Self {
            gender_ratio,
            target_age,
            groupmate_redundancy,
            total: (gender_ratio + target_age + groupmate_redundancy) / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub participant: Participant,
    pub stats: ParticipantRoundStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub members: Vec<GroupMember>,
    pub scores: GroupScores,
}

impl Group {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.members.iter().map(|m| &m.participant)
    }

    #[must_use]
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants().any(|p| &p.id == id)
    }
}

/// Result of one allocation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// One-based round number within the session.
    pub number: usize,
    pub groups: Vec<Group>,
    /// Participants the allocator could not place. Empty unless placement
    /// stalled because no group had capacity left.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<ParticipantId>,
}

impl Round {
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    #[must_use]
    pub fn group_of(&self, id: &ParticipantId) -> Option<GroupId> {
        self.groups.iter().find(|g| g.contains(id)).map(|g| g.id)
    }
}
