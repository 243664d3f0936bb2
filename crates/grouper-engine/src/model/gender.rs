use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::participant::Participant;

/// Gender class of a participant after matching its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// Raw values recognized as male or female.
///
/// A raw value listed in neither set classifies as [`Gender::Unknown`]. When a
/// value is listed in both sets the male set wins.
///
/// # Example
///
/// ```
/// use grouper_engine::{Gender, GenderValues};
///
/// let values = GenderValues::new(["m", "male"], ["f", "female"]);
/// assert_eq!(values.classify("male"), Gender::Male);
/// assert_eq!(values.classify("f"), Gender::Female);
/// assert_eq!(values.classify("x"), Gender::Unknown);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderValues {
    #[serde(default)]
    pub male: BTreeSet<String>,
    #[serde(default)]
    pub female: BTreeSet<String>,
}

impl GenderValues {
    #[must_use]
    pub fn new<M, F>(male: M, female: F) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            male: male.into_iter().map(Into::into).collect(),
            female: female.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn classify(&self, raw: &str) -> Gender {
        if self.male.contains(raw) {
            Gender::Male
        } else if self.female.contains(raw) {
            Gender::Female
        } else {
            Gender::Unknown
        }
    }

    #[must_use]
    pub fn classify_participant(&self, participant: &Participant) -> Gender {
        self.classify(&participant.gender)
    }
}

/// Per-class head counts for a set of participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
}

impl GenderCounts {
    #[must_use]
    pub fn from_participants<'a, I>(values: &GenderValues, participants: I) -> Self
    where
        I: IntoIterator<Item = &'a Participant>,
    {
        let mut counts = Self::default();
        for p in participants {
            counts.add(values.classify_participant(p));
        }
        counts
    }

    pub fn add(&mut self, gender: Gender) {
        match gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
            Gender::Unknown => self.unknown += 1,
        }
    }

    #[must_use]
    pub fn get(&self, gender: Gender) -> usize {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Unknown => self.unknown,
        }
    }

    /// Number of participants with a known gender.
    #[must_use]
    pub fn classified(&self) -> usize {
        self.male + self.female
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.classified() + self.unknown
    }

    /// Male and female shares among classified participants.
    ///
    /// Returns `None` when nobody is classified.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ratios(&self) -> Option<(f64, f64)> {
        let classified = self.classified();
        if classified == 0 {
            return None;
        }
        let n = classified as f64;
        Some((self.male as f64 / n, self.female as f64 / n))
    }
}
