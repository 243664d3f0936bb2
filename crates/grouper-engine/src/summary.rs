use serde::{Deserialize, Serialize};

use crate::model::{Gender, Roster};

/// Head count split into everybody and the leaders among them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderSplit {
    pub all: usize,
    pub leaders: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRatios {
    pub male: LeaderSplit,
    pub female: LeaderSplit,
    pub unknown: LeaderSplit,
}

impl ParticipantRatios {
    fn entry_mut(&mut self, gender: Gender) -> &mut LeaderSplit {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
            Gender::Unknown => &mut self.unknown,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.male.all + self.female.all + self.unknown.all
    }
}

/// Male and female participants whose age falls inside one target range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupCount {
    pub name: String,
    pub male: usize,
    pub female: usize,
}

/// Overview of a dataset before any group is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub participant_ratios: ParticipantRatios,
    /// One entry per configured range, in configuration order.
    pub age_groups: Vec<AgeGroupCount>,
}

impl DatasetSummary {
    #[must_use]
    pub fn new(roster: &Roster) -> Self {
        let values = roster.gender_values();
        let mut participant_ratios = ParticipantRatios::default();
        for p in roster.participants() {
            let entry = participant_ratios.entry_mut(values.classify_participant(p));
            entry.all += 1;
            if p.is_group_leader {
                entry.leaders += 1;
            }
        }

        let age_groups = roster
            .target_age_ranges()
            .iter()
            .map(|range| {
                let mut count = AgeGroupCount {
                    name: range.name.clone(),
                    male: 0,
                    female: 0,
                };
                for p in roster.participants().iter().filter(|p| range.contains(p.age)) {
                    match values.classify_participant(p) {
                        Gender::Male => count.male += 1,
                        Gender::Female => count.female += 1,
                        Gender::Unknown => {}
                    }
                }
                count
            })
            .collect();

        Self {
            participant_ratios,
            age_groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenderValues, Participant, TargetAgeRange, TargetAgeRanges};

    fn ranges() -> TargetAgeRanges {
        [
            TargetAgeRange::new(18, 25, "young"),
            TargetAgeRange::new(20, 40, "adult"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_ratios_partition_participants() {
        let roster = Roster::new(
            vec![
                Participant::new("1", "M", Some(22)).leader(),
                Participant::new("2", "F", Some(35)),
                Participant::new("3", "F", Some(19)).leader(),
                Participant::new("4", "?", Some(21)).leader(),
                Participant::new("5", "M", None),
            ],
            GenderValues::new(["M"], ["F"]),
            ranges(),
        )
        .unwrap();
        let summary = DatasetSummary::new(&roster);
        let ratios = summary.participant_ratios;
        assert_eq!(ratios.male, LeaderSplit { all: 2, leaders: 1 });
        assert_eq!(ratios.female, LeaderSplit { all: 2, leaders: 1 });
        assert_eq!(ratios.unknown, LeaderSplit { all: 1, leaders: 1 });
        assert_eq!(ratios.total(), roster.len());

        // Overlapping ranges count a participant in each; unknown gender and
        // missing ages are left out.
        assert_eq!(
            summary.age_groups,
            [
                AgeGroupCount {
                    name: "young".to_owned(),
                    male: 1,
                    female: 1,
                },
                AgeGroupCount {
                    name: "adult".to_owned(),
                    male: 1,
                    female: 1,
                },
            ]
        );
    }

    #[test]
    fn test_all_unknown_genders() {
        let participants = (0..6)
            .map(|i| Participant::new(i.to_string(), "X", Some(30)))
            .collect();
        let roster = Roster::new(
            participants,
            GenderValues::new(["M"], ["F"]),
            TargetAgeRanges::default(),
        )
        .unwrap();
        let summary = DatasetSummary::new(&roster);
        assert_eq!(summary.participant_ratios.unknown.all, 6);
        assert_eq!(summary.participant_ratios.male.all, 0);
        assert!(summary.age_groups.is_empty());
    }
}
