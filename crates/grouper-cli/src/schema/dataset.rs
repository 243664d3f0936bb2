use std::collections::BTreeMap;

use grouper_engine::{
    DisplayAttributes, GenderValues, Participant, Roster, TargetAgeRange, TargetAgeRanges,
};
use serde::{Deserialize, Serialize};

/// Dataset file: classification config plus the participant table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub male_values: Vec<String>,
    #[serde(default)]
    pub female_values: Vec<String>,
    #[serde(default)]
    pub target_age_ranges: Vec<TargetAgeRange>,
    pub participants: Vec<ParticipantRecord>,
}

/// One row of the participant table. Columns the engine does not know are
/// kept as display attributes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParticipantRecord {
    #[serde(flatten)]
    pub participant: Participant,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Dataset {
    pub fn into_roster(self) -> anyhow::Result<(Roster, DisplayAttributes)> {
        let mut attributes = DisplayAttributes::new();
        let participants = self
            .participants
            .into_iter()
            .map(|record| {
                if !record.attributes.is_empty() {
                    let columns = record
                        .attributes
                        .into_iter()
                        .map(|(key, value)| (key, display_value(value)))
                        .collect();
                    attributes.insert(record.participant.id.clone(), columns);
                }
                record.participant
            })
            .collect();

        let roster = Roster::new(
            participants,
            GenderValues::new(self.male_values, self.female_values),
            self.target_age_ranges.into_iter().collect::<TargetAgeRanges>(),
        )?;
        Ok((roster, attributes))
    }
}

fn display_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
