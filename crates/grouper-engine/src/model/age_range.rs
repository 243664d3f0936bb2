use serde::{Deserialize, Serialize};

use super::participant::{Age, Participant};

/// Inclusive age interval identified by a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAgeRange {
    pub from: Age,
    pub to: Age,
    pub name: String,
}

impl TargetAgeRange {
    #[must_use]
    pub fn new(from: Age, to: Age, name: impl Into<String>) -> Self {
        Self {
            from,
            to,
            name: name.into(),
        }
    }

    /// Returns `true` if `age` lies inside the range. A missing age is never inside.
    #[must_use]
    pub fn contains(&self, age: Option<Age>) -> bool {
        age.is_some_and(|age| self.from <= age && age <= self.to)
    }

    /// Like [`Self::contains`], for fractional values such as a group's mean age.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn contains_mean(&self, mean: f64) -> bool {
        self.from as f64 <= mean && mean <= self.to as f64
    }
}

/// The configured target-age ranges, in configuration order.
///
/// Ranges may overlap. A label resolves to the first range with that name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetAgeRanges(Vec<TargetAgeRange>);

impl TargetAgeRanges {
    #[must_use]
    pub fn new(ranges: Vec<TargetAgeRange>) -> Self {
        Self(ranges)
    }

    #[must_use]
    pub fn resolve(&self, label: Option<&str>) -> Option<&TargetAgeRange> {
        let label = label?;
        self.0.iter().find(|range| range.name == label)
    }

    /// Resolves the participant's own target range, if it has a known label.
    #[must_use]
    pub fn for_participant(&self, participant: &Participant) -> Option<&TargetAgeRange> {
        self.resolve(participant.target_age.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetAgeRange> + '_ {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TargetAgeRange> for TargetAgeRanges {
    fn from_iter<T: IntoIterator<Item = TargetAgeRange>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive_and_rejects_missing_age() {
        let range = TargetAgeRange::new(20, 29, "20s");
        assert!(range.contains(Some(20)));
        assert!(range.contains(Some(29)));
        assert!(!range.contains(Some(30)));
        assert!(!range.contains(None));
        assert!(range.contains_mean(24.5));
        assert!(!range.contains_mean(f64::NAN));
    }

    #[test]
    fn test_resolve_uses_first_matching_label() {
        let ranges: TargetAgeRanges = [
            TargetAgeRange::new(18, 25, "young"),
            TargetAgeRange::new(0, 99, "young"),
            TargetAgeRange::new(40, 60, "older"),
        ]
        .into_iter()
        .collect();
        assert_eq!(ranges.resolve(Some("young")).unwrap().to, 25);
        assert_eq!(ranges.resolve(Some("older")).unwrap().from, 40);
        assert!(ranges.resolve(Some("teen")).is_none());
        assert!(ranges.resolve(None).is_none());
    }
}
