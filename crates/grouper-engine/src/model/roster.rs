use std::collections::BTreeSet;

use super::{
    age_range::TargetAgeRanges,
    gender::{GenderCounts, GenderValues},
    participant::{Participant, ParticipantId},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RosterError {
    #[display("duplicate participant id '{id}'")]
    DuplicateParticipantId { id: ParticipantId },
}

/// A dataset ready for group generation.
///
/// Holds the participants in input order together with the classification
/// values and age ranges they are interpreted against. Participant ids are
/// guaranteed unique.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    gender_values: GenderValues,
    target_age_ranges: TargetAgeRanges,
}

impl Roster {
    pub fn new(
        participants: Vec<Participant>,
        gender_values: GenderValues,
        target_age_ranges: TargetAgeRanges,
    ) -> Result<Self, RosterError> {
        let mut seen = BTreeSet::new();
        for p in &participants {
            if !seen.insert(&p.id) {
                return Err(RosterError::DuplicateParticipantId { id: p.id.clone() });
            }
        }
        Ok(Self {
            participants,
            gender_values,
            target_age_ranges,
        })
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn gender_values(&self) -> &GenderValues {
        &self.gender_values
    }

    #[must_use]
    pub fn target_age_ranges(&self) -> &TargetAgeRanges {
        &self.target_age_ranges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    #[must_use]
    pub fn gender_counts(&self) -> GenderCounts {
        GenderCounts::from_participants(&self.gender_values, &self.participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_ids() {
        let participants = vec![
            Participant::new("1", "m", Some(20)),
            Participant::new("2", "f", Some(21)),
            Participant::new("1", "f", Some(22)),
        ];
        let err = Roster::new(
            participants,
            GenderValues::default(),
            TargetAgeRanges::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "duplicate participant id '1'");
    }

    #[test]
    fn test_keeps_input_order() {
        let participants = vec![
            Participant::new("b", "m", Some(20)),
            Participant::new("a", "f", Some(21)),
        ];
        let roster = Roster::new(
            participants,
            GenderValues::new(["m"], ["f"]),
            TargetAgeRanges::default(),
        )
        .unwrap();
        let ids = roster
            .participants()
            .iter()
            .map(|p| p.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(roster.gender_counts().classified(), 2);
    }
}
