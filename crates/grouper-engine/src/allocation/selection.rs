use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    history::PairingHistory,
    model::{Gender, GenderCounts, GenderValues, Participant, TargetAgeRanges},
    settings::{GroupSettings, ShufflePolicy},
};

/// Picks the next participant for a partially filled group.
///
/// Candidates are narrowed in a fixed order, and a stage that would leave no
/// candidate is skipped so the previous, wider set is kept:
///
/// 1. **Target age** (`split_by_target_age`): keep candidates whose own target
///    range contains the group's current mean age.
/// 2. **Gender balance** (`balance_genders`): keep the gender the group is
///    short of relative to its proportional ideal.
/// 3. **Tie-break**: [`ShufflePolicy::Unique`] takes the first candidate with
///    the fewest earlier pairings with the group, [`ShufflePolicy::Random`]
///    draws uniformly.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector<'a> {
    settings: &'a GroupSettings,
    gender_values: &'a GenderValues,
    target_age_ranges: &'a TargetAgeRanges,
    history: &'a PairingHistory,
    /// Ideal (male, female) head count per group; `None` if nobody in the
    /// dataset has a classified gender.
    ideal_genders: Option<(usize, usize)>,
}

impl<'a> CandidateSelector<'a> {
    #[must_use]
    pub fn new(
        settings: &'a GroupSettings,
        gender_values: &'a GenderValues,
        target_age_ranges: &'a TargetAgeRanges,
        history: &'a PairingHistory,
        overall_genders: GenderCounts,
    ) -> Self {
        Self {
            settings,
            gender_values,
            target_age_ranges,
            history,
            ideal_genders: ideal_gender_counts(settings.group_size, overall_genders),
        }
    }

    /// Returns the index into `pool` of the chosen candidate, or `None` if the
    /// pool is empty.
    pub fn select<R>(
        &self,
        group: &[&Participant],
        pool: &[&Participant],
        rng: &mut R,
    ) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        if pool.is_empty() {
            return None;
        }
        let mut candidates = (0..pool.len()).collect::<Vec<_>>();

        if self.settings.split_by_target_age {
            let mean_age = mean_age(group);
            let suitable = candidates
                .iter()
                .copied()
                .filter(|&i| {
                    self.target_age_ranges
                        .for_participant(pool[i])
                        .is_some_and(|range| range.contains_mean(mean_age))
                })
                .collect::<Vec<_>>();
            if !suitable.is_empty() {
                candidates = suitable;
            }
        }

        if self.settings.balance_genders
            && let Some(preferred) = self.preferred_gender(group, pool, &candidates)
        {
            let matching = candidates
                .iter()
                .copied()
                .filter(|&i| self.gender_values.classify_participant(pool[i]) == preferred)
                .collect::<Vec<_>>();
            if !matching.is_empty() {
                candidates = matching;
            }
        }

        match self.settings.shuffle_policy {
            ShufflePolicy::Unique => candidates
                .iter()
                .copied()
                .min_by_key(|&i| self.history.count_met(&pool[i].id, group.iter().copied())),
            ShufflePolicy::Random => candidates.choose(rng).copied(),
        }
    }

    fn preferred_gender(
        &self,
        group: &[&Participant],
        pool: &[&Participant],
        candidates: &[usize],
    ) -> Option<Gender> {
        let (ideal_male, ideal_female) = self.ideal_genders?;
        let current = GenderCounts::from_participants(self.gender_values, group.iter().copied());
        let male_short = current.male < ideal_male;
        let female_short = current.female < ideal_female;

        match (male_short, female_short) {
            (true, true) => {
                let available = GenderCounts::from_participants(
                    self.gender_values,
                    candidates.iter().map(|&i| pool[i]),
                );
                match (available.male, available.female) {
                    (0, 0) => None,
                    (0, _) => Some(Gender::Female),
                    (male, female) if female == 0 || male <= female => Some(Gender::Male),
                    _ => Some(Gender::Female),
                }
            }
            (true, false) => Some(Gender::Male),
            (false, true) => Some(Gender::Female),
            (false, false) => None,
        }
    }
}

/// Mean age of the members with a known age, or 0 for a group without any.
///
/// Summed in `f64` so that no age, however large, can overflow.
#[expect(clippy::cast_precision_loss)]
fn mean_age(group: &[&Participant]) -> f64 {
    let (sum, count) = group
        .iter()
        .filter_map(|p| p.age)
        .fold((0.0_f64, 0_usize), |(sum, count), age| {
            (sum + age as f64, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Splits `group_size` proportionally to the dataset's male share.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn ideal_gender_counts(group_size: usize, overall: GenderCounts) -> Option<(usize, usize)> {
    let (male_ratio, _) = overall.ratios()?;
    let ideal_male = ((group_size as f64 * male_ratio).round() as usize).min(group_size);
    Some((ideal_male, group_size - ideal_male))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::model::TargetAgeRange;

    fn values() -> GenderValues {
        GenderValues::new(["m"], ["f"])
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_empty_pool_yields_none() {
        let settings = GroupSettings::with_group_size(4);
        let values = values();
        let ranges = TargetAgeRanges::default();
        let history = PairingHistory::new();
        let selector =
            CandidateSelector::new(&settings, &values, &ranges, &history, GenderCounts::default());
        assert_eq!(selector.select(&[], &[], &mut rng()), None);
    }

    #[test]
    fn test_unique_prefers_strangers_then_pool_order() {
        let people = [
            Participant::new("leader", "m", Some(30)),
            Participant::new("old-friend", "m", Some(30)),
            Participant::new("stranger-1", "m", Some(30)),
            Participant::new("stranger-2", "m", Some(30)),
        ];
        let mut history = PairingHistory::new();
        history.record_group(&people[..2]);

        let settings = GroupSettings::with_group_size(4);
        let values = values();
        let ranges = TargetAgeRanges::default();
        let selector = CandidateSelector::new(
            &settings,
            &values,
            &ranges,
            &history,
            GenderCounts::from_participants(&values, &people),
        );
        let group = [&people[0]];
        let pool = [&people[1], &people[2], &people[3]];
        assert_eq!(selector.select(&group, &pool, &mut rng()), Some(1));
    }

    #[test]
    fn test_gender_balance_restricts_to_missing_gender() {
        let people = [
            Participant::new("1", "m", Some(30)),
            Participant::new("2", "m", Some(30)),
            Participant::new("3", "m", Some(30)),
            Participant::new("4", "f", Some(30)),
            Participant::new("5", "x", Some(30)),
        ];
        let settings = GroupSettings {
            balance_genders: true,
            ..GroupSettings::with_group_size(2)
        };
        let values = values();
        let ranges = TargetAgeRanges::default();
        let history = PairingHistory::new();
        // Dataset is half male, half female -> ideal 1 male and 1 female.
        let overall = GenderCounts {
            male: 2,
            female: 2,
            unknown: 1,
        };
        let selector = CandidateSelector::new(&settings, &values, &ranges, &history, overall);

        let group = [&people[0]];
        let pool = [&people[1], &people[2], &people[4], &people[3]];
        assert_eq!(selector.select(&group, &pool, &mut rng()), Some(3));

        // No female left: the filter is skipped and pool order decides.
        let pool = [&people[1], &people[4]];
        assert_eq!(selector.select(&group, &pool, &mut rng()), Some(0));
    }

    #[test]
    fn test_gender_balance_prefers_scarcer_gender_when_both_short() {
        let people = [
            Participant::new("1", "m", Some(30)),
            Participant::new("2", "m", Some(30)),
            Participant::new("3", "f", Some(30)),
        ];
        let settings = GroupSettings {
            balance_genders: true,
            ..GroupSettings::with_group_size(4)
        };
        let values = values();
        let ranges = TargetAgeRanges::default();
        let history = PairingHistory::new();
        let overall = GenderCounts {
            male: 1,
            female: 1,
            unknown: 0,
        };
        let selector = CandidateSelector::new(&settings, &values, &ranges, &history, overall);
        let pool = [&people[0], &people[1], &people[2]];
        assert_eq!(selector.select(&[], &pool, &mut rng()), Some(2));
    }

    #[test]
    fn test_target_age_filter_matches_group_mean() {
        let people = [
            Participant::new("a", "m", Some(24)),
            Participant::new("b", "f", Some(26)),
            Participant::new("c", "m", Some(60)).with_target_age("seniors"),
            Participant::new("d", "f", Some(22)).with_target_age("twenties"),
            Participant::new("e", "f", Some(22)),
        ];
        let settings = GroupSettings {
            split_by_target_age: true,
            ..GroupSettings::with_group_size(4)
        };
        let values = values();
        let ranges: TargetAgeRanges = [
            TargetAgeRange::new(20, 29, "twenties"),
            TargetAgeRange::new(60, 99, "seniors"),
        ]
        .into_iter()
        .collect();
        let history = PairingHistory::new();
        let selector = CandidateSelector::new(
            &settings,
            &values,
            &ranges,
            &history,
            GenderCounts::from_participants(&values, &people),
        );

        let group = [&people[0], &people[1]];
        let pool = [&people[2], &people[4], &people[3]];
        assert_eq!(selector.select(&group, &pool, &mut rng()), Some(2));

        // Nobody targets a mean age of 0: filter skipped, first candidate wins.
        assert_eq!(selector.select(&[], &pool, &mut rng()), Some(0));
    }

    #[test]
    fn test_random_policy_stays_within_filtered_candidates() {
        let people = [
            Participant::new("1", "m", Some(30)),
            Participant::new("2", "f", Some(30)),
            Participant::new("3", "m", Some(30)),
            Participant::new("4", "m", Some(30)),
        ];
        let settings = GroupSettings {
            balance_genders: true,
            shuffle_policy: ShufflePolicy::Random,
            ..GroupSettings::with_group_size(2)
        };
        let values = values();
        let ranges = TargetAgeRanges::default();
        let history = PairingHistory::new();
        let overall = GenderCounts {
            male: 1,
            female: 1,
            unknown: 0,
        };
        let selector = CandidateSelector::new(&settings, &values, &ranges, &history, overall);
        let group = [&people[0]];
        let pool = [&people[2], &people[1], &people[3]];
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(selector.select(&group, &pool, &mut rng), Some(1));
        }
    }

    #[test]
    fn test_ideal_gender_counts_are_proportional() {
        let overall = GenderCounts {
            male: 1,
            female: 3,
            unknown: 5,
        };
        assert_eq!(ideal_gender_counts(4, overall), Some((1, 3)));
        assert_eq!(ideal_gender_counts(5, overall), Some((1, 4)));
        assert_eq!(ideal_gender_counts(4, GenderCounts::default()), None);
    }

    #[test]
    fn test_mean_age_ignores_missing_ages() {
        let people = [
            Participant::new("1", "m", Some(20)),
            Participant::new("2", "m", None),
            Participant::new("3", "m", Some(30)),
        ];
        let group = people.iter().collect::<Vec<_>>();
        assert!((mean_age(&group) - 25.0).abs() < 1e-9);
        assert_eq!(mean_age(&[]), 0.0);
    }

    #[test]
    fn test_mean_age_survives_extreme_ages() {
        let people = [
            Participant::new("huge", "m", Some(i64::MAX)),
            Participant::new("tiny", "m", Some(i64::MIN)),
            Participant::new("ten", "f", Some(10)),
            Participant::new("candidate", "f", Some(40)).with_target_age("anything"),
        ];
        let group = [&people[0], &people[2]];
        let mean = mean_age(&group);
        assert!(mean.is_finite());
        assert!(mean > 4.0e18);
        assert!(mean_age(&[&people[0], &people[1]]).is_finite());

        let settings = GroupSettings {
            split_by_target_age: true,
            ..GroupSettings::with_group_size(4)
        };
        let values = values();
        let ranges: TargetAgeRanges = [TargetAgeRange::new(0, i64::MAX, "anything")]
            .into_iter()
            .collect();
        let history = PairingHistory::new();
        let selector = CandidateSelector::new(
            &settings,
            &values,
            &ranges,
            &history,
            GenderCounts::from_participants(&values, &people),
        );
        let pool = [&people[3]];
        assert_eq!(selector.select(&group, &pool, &mut rng()), Some(0));
    }

    #[test]
    fn test_gender_balance_takes_only_available_gender_when_both_short() {
        let people = [
            Participant::new("1", "m", Some(30)),
            Participant::new("2", "m", Some(30)),
            Participant::new("3", "x", Some(30)),
            Participant::new("4", "f", Some(30)),
        ];
        let settings = GroupSettings {
            balance_genders: true,
            ..GroupSettings::with_group_size(4)
        };
        let values = values();
        let ranges = TargetAgeRanges::default();
        let history = PairingHistory::new();
        let overall = GenderCounts {
            male: 1,
            female: 1,
            unknown: 0,
        };
        let selector = CandidateSelector::new(&settings, &values, &ranges, &history, overall);

        // Only males are available: male is picked over the unknown candidate.
        let pool = [&people[2], &people[0], &people[1]];
        assert_eq!(selector.select(&[], &pool, &mut rng()), Some(1));

        // Only a female is available.
        let pool = [&people[2], &people[3]];
        assert_eq!(selector.select(&[], &pool, &mut rng()), Some(1));
    }
}
