use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    history::{AccumulatedCounts, GenerationRunState},
    model::{GroupId, Participant, ParticipantId, Round},
};

/// Where one participant was placed in every round of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub id: ParticipantId,
    pub is_group_leader: bool,
    /// Group per round, in round order. `None` if the participant was left
    /// unplaced in that round.
    pub groups: Vec<Option<GroupId>>,
    /// Totals at the end of the session.
    pub totals: AccumulatedCounts,
}

/// Per-participant view of a generation: one row per participant, one
/// column per round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentTable {
    rows: Vec<AssignmentRow>,
}

impl AssignmentTable {
    /// Builds the table in `participants` order.
    #[must_use]
    pub fn new(participants: &[Participant], rounds: &[Round], state: &GenerationRunState) -> Self {
        let placements = rounds
            .iter()
            .map(|round| {
                round
                    .groups
                    .iter()
                    .flat_map(|g| g.participants().map(move |p| (&p.id, g.id)))
                    .collect::<HashMap<_, _>>()
            })
            .collect::<Vec<_>>();

        let rows = participants
            .iter()
            .map(|p| AssignmentRow {
                id: p.id.clone(),
                is_group_leader: p.is_group_leader,
                groups: placements
                    .iter()
                    .map(|round| round.get(&p.id).copied())
                    .collect(),
                totals: state.totals_of(&p.id),
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[AssignmentRow] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, id: &ParticipantId) -> Option<&AssignmentRow> {
        self.rows.iter().find(|row| &row.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
