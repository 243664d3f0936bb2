//! Per-participant and per-group quality metrics.
//!
//! All functions here are pure: they read a group's members and the session
//! history and never mutate anything, so scoring the same snapshot twice gives
//! the same numbers.
//!
//! # Participant metrics
//!
//! - [`repeated_groupmate_count`] - Groupmates already met in an earlier round
//! - [`unmet_target_age_groupmate_count`] - Groupmates outside the participant's target range
//!
//! # Group scores
//!
//! Each score lies in `[0, 1]`, higher is better:
//!
//! - [`gender_ratio_score`] - Closeness of the group's gender mix to the dataset's
//! - [`target_age_score`] - Share of members with at least one groupmate in their target range
//! - [`groupmate_redundancy_score`] - Share of ordered in-group pairs that are new

use crate::{
    history::PairingHistory,
    model::{GenderCounts, GenderValues, GroupScores, Participant, TargetAgeRanges},
};

/// Everything outside the group itself that scoring depends on.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub gender_values: &'a GenderValues,
    pub target_age_ranges: &'a TargetAgeRanges,
    /// Gender counts over the whole dataset.
    pub overall_genders: GenderCounts,
    /// Whether unmet-target-age counts are tracked for this run.
    pub track_target_age: bool,
}

/// Per-round counts for one member, before accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberCounts {
    pub repeated_groupmate_count: usize,
    pub unmet_target_age_groupmate_count: usize,
}

#[must_use]
pub fn repeated_groupmate_count(
    participant: &Participant,
    members: &[&Participant],
    history: &PairingHistory,
) -> usize {
    history.count_met(&participant.id, members.iter().copied())
}

/// Counts groupmates whose age falls outside `participant`'s target range.
///
/// Returns 0 when the participant has no target label or the label matches no
/// configured range. Groupmates without a known age are never counted.
#[must_use]
pub fn unmet_target_age_groupmate_count(
    participant: &Participant,
    members: &[&Participant],
    ranges: &TargetAgeRanges,
) -> usize {
    let Some(range) = ranges.for_participant(participant) else {
        return 0;
    };
    members
        .iter()
        .filter(|other| other.id != participant.id)
        .filter(|other| {
            other
                .age
                .is_some_and(|age| age < range.from || age > range.to)
        })
        .count()
}

/// Scores how closely the group's male/female mix matches the dataset's.
///
/// `1 - (|gM - oM| + |gF - oF|) / 2`, computed over classified members only.
/// A dataset with nobody classified scores 1; a group with nobody classified
/// (including an empty group) scores 0.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn gender_ratio_score(
    members: &[&Participant],
    values: &GenderValues,
    overall: GenderCounts,
) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let Some((overall_male, overall_female)) = overall.ratios() else {
        return 1.0;
    };
    let group = GenderCounts::from_participants(values, members.iter().copied());
    let classified = group.classified();
    if classified == 0 {
        return 0.0;
    }
    let group_male = group.male as f64 / classified as f64;
    let group_female = group.female as f64 / classified as f64;
    let difference = (group_male - overall_male).abs() + (group_female - overall_female).abs();
    1.0 - difference / 2.0
}

/// Share of members who have at least one groupmate inside their target range.
///
/// The denominator is the full member count, so members without a resolvable
/// range pull the score down.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn target_age_score(members: &[&Participant], ranges: &TargetAgeRanges) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let achieved = members
        .iter()
        .filter(|p| {
            ranges.for_participant(p).is_some_and(|range| {
                members
                    .iter()
                    .any(|other| other.id != p.id && range.contains(other.age))
            })
        })
        .count();
    achieved as f64 / members.len() as f64
}

/// `1 - repeats / (n * (n - 1))` where `repeats` sums every member's
/// repeated-groupmate count and `n` is the member count.
///
/// Groups with fewer than two members have no pairs and score 1.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn groupmate_redundancy_score<I>(member_count: usize, repeated_counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    if member_count <= 1 {
        return 1.0;
    }
    let repeats = repeated_counts.into_iter().sum::<usize>();
    let ordered_pairs = member_count * (member_count - 1);
    (1.0 - repeats as f64 / ordered_pairs as f64).clamp(0.0, 1.0)
}

/// Computes member counts and group scores for one group against the history
/// as it stood before the group was formed.
#[must_use]
pub fn score_group(
    members: &[&Participant],
    history: &PairingHistory,
    ctx: &ScoringContext<'_>,
) -> (Vec<MemberCounts>, GroupScores) {
    let counts = members
        .iter()
        .map(|p| MemberCounts {
            repeated_groupmate_count: repeated_groupmate_count(p, members, history),
            unmet_target_age_groupmate_count: if ctx.track_target_age {
                unmet_target_age_groupmate_count(p, members, ctx.target_age_ranges)
            } else {
                0
            },
        })
        .collect::<Vec<_>>();

    let scores = GroupScores::new(
        gender_ratio_score(members, ctx.gender_values, ctx.overall_genders),
        target_age_score(members, ctx.target_age_ranges),
        groupmate_redundancy_score(
            members.len(),
            counts.iter().map(|c| c.repeated_groupmate_count),
        ),
    );
    (counts, scores)
}
