use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Identity of a participant, unique within one dataset.
///
/// Ids are kept as the raw strings found in the source table. Numeric ids are
/// accepted when deserializing and converted to their decimal representation.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match TextOrNumber::deserialize(deserializer)? {
            TextOrNumber::Text(s) => Ok(Self(s)),
            TextOrNumber::Integer(n) => Ok(Self(n.to_string())),
            TextOrNumber::Float(f) => Ok(Self(f.to_string())),
        }
    }
}

/// Age in whole years.
pub type Age = i64;

/// Parses an age the way the upstream table importer does: leading
/// whitespace is skipped, then an optional sign and the leading base-10
/// digits are read. Anything after the digits is ignored.
///
/// Input without leading digits (or too large for [`Age`]) yields `None`,
/// which every age-range check treats as "outside".
///
/// # Example
///
/// ```
/// use grouper_engine::parse_age;
///
/// assert_eq!(parse_age("42"), Some(42));
/// assert_eq!(parse_age(" 7 "), Some(7));
/// assert_eq!(parse_age("25.0"), Some(25));
/// assert_eq!(parse_age("30 years"), Some(30));
/// assert_eq!(parse_age("n/a"), None);
/// ```
#[must_use]
pub fn parse_age(raw: &str) -> Option<Age> {
    let raw = raw.trim_start();
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let sign_len = raw.len() - unsigned.len();
    let digit_len = unsigned.len()
        - unsigned
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .len();
    if digit_len == 0 {
        return None;
    }
    raw[..sign_len + digit_len].parse().ok()
}

/// A single participant as seen by the assignment engine.
///
/// Only the fields the algorithm reads live here. Display-only columns from
/// the source table are kept apart in [`DisplayAttributes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Raw gender value, classified through [`crate::GenderValues`].
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<Age>,
    #[serde(default)]
    pub is_group_leader: bool,
    /// Label of the participant's preferred target-age range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age: Option<String>,
}

impl Participant {
    #[must_use]
    pub fn new(id: impl Into<ParticipantId>, gender: impl Into<String>, age: Option<Age>) -> Self {
        Self {
            id: id.into(),
            gender: gender.into(),
            age,
            is_group_leader: false,
            target_age: None,
        }
    }

    #[must_use]
    pub fn leader(mut self) -> Self {
        self.is_group_leader = true;
        self
    }

    #[must_use]
    pub fn with_target_age(mut self, label: impl Into<String>) -> Self {
        self.target_age = Some(label.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<Age>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<TextOrNumber>::deserialize(deserializer)?;
    #[expect(clippy::cast_possible_truncation)]
    let age = match raw {
        None => None,
        Some(TextOrNumber::Integer(n)) => Some(n),
        Some(TextOrNumber::Float(f)) if f.is_finite() => Some(f.trunc() as Age),
        Some(TextOrNumber::Float(_)) => None,
        Some(TextOrNumber::Text(s)) => parse_age(&s),
    };
    Ok(age)
}

/// Display-only columns of the source table, keyed by participant id.
///
/// Scoring and selection never look at these values; they only travel along
/// so reports can show the original columns next to the assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayAttributes {
    by_participant: BTreeMap<ParticipantId, BTreeMap<String, String>>,
}

impl DisplayAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ParticipantId, attributes: BTreeMap<String, String>) {
        self.by_participant.insert(id, attributes);
    }

    #[must_use]
    pub fn get(&self, id: &ParticipantId) -> Option<&BTreeMap<String, String>> {
        self.by_participant.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_participant.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_participant.is_empty()
    }
}
