use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use grouper_engine::{
    AssignmentRow, AssignmentTable, DisplayAttributes, Generation, GenerationSeed, Group,
    GroupSettings, Round,
};
use grouper_stats::aggregate::ScoreAggregate;
use serde::Serialize;

/// Everything `grouper generate` writes out for one run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub seed: GenerationSeed,
    pub settings: &'a GroupSettings,
    /// Aggregates over every group of every round in this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreSummary>,
    pub rounds: Vec<RoundReport<'a>>,
    pub assignments: Vec<AssignmentReportRow<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundReport<'a> {
    #[serde(flatten)]
    pub round: &'a Round,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReportRow<'a> {
    #[serde(flatten)]
    pub row: &'a AssignmentRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<&'a BTreeMap<String, String>>,
}

/// Per-score aggregates (mean, median, worst, best, spread) over groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub gender_ratio: ScoreAggregate,
    pub target_age: ScoreAggregate,
    pub groupmate_redundancy: ScoreAggregate,
    pub total: ScoreAggregate,
}

impl ScoreSummary {
    /// Returns `None` when there are no groups.
    pub fn from_groups<'g, I>(groups: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'g Group>,
    {
        let scores = groups.into_iter().map(|g| g.scores).collect::<Vec<_>>();
        Some(Self {
            gender_ratio: ScoreAggregate::new(scores.iter().map(|s| s.gender_ratio))?,
            target_age: ScoreAggregate::new(scores.iter().map(|s| s.target_age))?,
            groupmate_redundancy: ScoreAggregate::new(
                scores.iter().map(|s| s.groupmate_redundancy),
            )?,
            total: ScoreAggregate::new(scores.iter().map(|s| s.total))?,
        })
    }
}

impl<'a> GenerationReport<'a> {
    pub fn new(
        seed: GenerationSeed,
        settings: &'a GroupSettings,
        generation: &'a Generation,
        assignments: &'a AssignmentTable,
        attributes: &'a DisplayAttributes,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            seed,
            settings,
            scores: ScoreSummary::from_groups(generation.rounds.iter().flat_map(|r| &r.groups)),
            rounds: generation
                .rounds
                .iter()
                .map(|round| RoundReport {
                    round,
                    scores: ScoreSummary::from_groups(&round.groups),
                })
                .collect(),
            assignments: assignments
                .rows()
                .iter()
                .map(|row| AssignmentReportRow {
                    row,
                    attributes: attributes.get(&row.id),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use grouper_engine::{
        GenderValues, Participant, Roster, TargetAgeRanges, generate_with_seed,
    };

    use super::*;

    #[test]
    fn test_report_aggregates_and_serializes() {
        let participants = (0..8)
            .map(|i| Participant::new(i.to_string(), if i < 4 { "m" } else { "f" }, Some(30)))
            .collect();
        let roster = Roster::new(
            participants,
            GenderValues::new(["m"], ["f"]),
            TargetAgeRanges::default(),
        )
        .unwrap();
        let settings = GroupSettings {
            rounds: 2,
            balance_genders: true,
            ..GroupSettings::with_group_size(4)
        };
        let seed = GenerationSeed::from_bytes([3; 16]);
        let generation = generate_with_seed(&roster, &settings, None, seed).unwrap();
        let table = AssignmentTable::new(
            &generation.participants,
            &generation.rounds,
            &generation.state,
        );
        let mut attributes = DisplayAttributes::new();
        attributes.insert(
            "0".into(),
            BTreeMap::from([("email".to_owned(), "zero@example.com".to_owned())]),
        );

        let report = GenerationReport::new(seed, &settings, &generation, &table, &attributes);
        let run_scores = report.scores.unwrap();
        let first_round = report.rounds[0].scores.unwrap();
        let second_round = report.rounds[1].scores.unwrap();
        assert_eq!(first_round.groupmate_redundancy.mean, 1.0);
        // Round one is all new pairs, so the worst group of the run is in round two.
        assert_eq!(
            run_scores.groupmate_redundancy.min,
            second_round.groupmate_redundancy.min
        );
        assert_eq!(first_round.groupmate_redundancy.max, 1.0);
        assert_eq!(first_round.groupmate_redundancy.std_dev, 0.0);
        assert_eq!(run_scores.groupmate_redundancy.max, 1.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], "03".repeat(16));
        assert_eq!(json["rounds"][0]["number"], 1);
        assert_eq!(json["rounds"][0]["scores"]["groupmate_redundancy"]["max"], 1.0);
        assert!(json["scores"]["total"]["std_dev"].is_f64());
        assert_eq!(json["rounds"][1]["groups"].as_array().unwrap().len(), 2);
        assert_eq!(json["assignments"][0]["attributes"]["email"], "zero@example.com");
        assert!(json["assignments"][1].get("attributes").is_none());
        assert_eq!(json["assignments"][0]["groups"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_no_groups_no_summary() {
        assert!(ScoreSummary::from_groups(std::iter::empty()).is_none());
    }
}
