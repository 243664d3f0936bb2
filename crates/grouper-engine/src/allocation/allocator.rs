use rand::Rng;

use crate::{
    history::GenerationRunState,
    model::{
        GenderCounts, GenderValues, Group, GroupId, GroupMember, Participant,
        ParticipantRoundStats, Round, TargetAgeRanges,
    },
    scoring::{self, ScoringContext},
    settings::{GroupSettings, SettingsError},
};

use super::selection::CandidateSelector;

/// Group under construction: an id plus borrowed members.
#[derive(Debug, Clone)]
struct DraftGroup<'p> {
    id: GroupId,
    members: Vec<&'p Participant>,
}

/// Runs single allocation passes over a fixed participant set.
///
/// One pass goes through four phases:
///
/// 1. **Seed leaders** - `ceil(n / group_size)` empty groups are created and
///    leaders are dealt round-robin in input order, so a leader lands in the
///    same group every round.
/// 2. **Place non-leaders** - groups are scanned in id order and every group
///    with spare capacity receives one candidate from [`CandidateSelector`].
///    Scans repeat until the pool is empty or a scan places nobody.
/// 3. **Score** - member statistics and group scores are computed against the
///    history of earlier rounds.
/// 4. **Record** - this round's pairs and counts are folded into the session
///    state.
#[derive(Debug, Clone)]
pub struct RoundAllocator<'a> {
    participants: &'a [Participant],
    settings: &'a GroupSettings,
    gender_values: &'a GenderValues,
    target_age_ranges: &'a TargetAgeRanges,
    overall_genders: GenderCounts,
}

impl<'a> RoundAllocator<'a> {
    /// Fails if `settings` does not pass [`GroupSettings::validate`].
    pub fn new(
        participants: &'a [Participant],
        settings: &'a GroupSettings,
        gender_values: &'a GenderValues,
        target_age_ranges: &'a TargetAgeRanges,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            participants,
            settings,
            gender_values,
            target_age_ranges,
            overall_genders: GenderCounts::from_participants(gender_values, participants),
        })
    }

    /// Allocates and scores one round, then records it in `state`.
    pub fn allocate<R>(&self, state: &mut GenerationRunState, rng: &mut R) -> Round
    where
        R: Rng + ?Sized,
    {
        let number = state.completed_rounds + 1;
        let mut groups = self.seed_leaders();
        let unplaced = self.place_non_leaders(&mut groups, state, rng);
        if !unplaced.is_empty() {
            log::warn!(
                "round {number}: placement stalled with {} participants left unplaced",
                unplaced.len()
            );
        }
        let round = Round {
            number,
            groups: self.score(&groups, state),
            unplaced: unplaced.iter().map(|p| p.id.clone()).collect(),
        };

        for group in &groups {
            state.history.record_group(group.members.iter().copied());
        }
        state.completed_rounds = number;
        log::debug!(
            "round {number}: {} groups, {} pairs known",
            round.groups.len(),
            state.history.pair_count()
        );
        round
    }

    fn seed_leaders(&self) -> Vec<DraftGroup<'a>> {
        let num_groups = self.settings.num_groups(self.participants.len());
        let mut groups = (1..=num_groups)
            .map(|id| DraftGroup {
                id: GroupId::new(id),
                members: Vec::with_capacity(self.settings.group_size),
            })
            .collect::<Vec<_>>();
        if groups.is_empty() {
            return groups;
        }
        // Filling the `min_leaders` quota and spreading the surplus both deal
        // one leader per group in id order, so a single pass covers both.
        for (i, leader) in self.participants.iter().filter(|p| p.is_group_leader).enumerate() {
            groups[i % num_groups].members.push(leader);
        }
        groups
    }

    fn place_non_leaders<R>(
        &self,
        groups: &mut [DraftGroup<'a>],
        state: &GenerationRunState,
        rng: &mut R,
    ) -> Vec<&'a Participant>
    where
        R: Rng + ?Sized,
    {
        let selector = CandidateSelector::new(
            self.settings,
            self.gender_values,
            self.target_age_ranges,
            &state.history,
            self.overall_genders,
        );
        let mut pool = self
            .participants
            .iter()
            .filter(|p| !p.is_group_leader)
            .collect::<Vec<_>>();

        let mut scans = 0;
        while !pool.is_empty() {
            scans += 1;
            let mut placed_any = false;
            for group in groups.iter_mut() {
                if group.members.len() >= self.settings.group_size {
                    continue;
                }
                if let Some(i) = selector.select(&group.members, &pool, rng) {
                    group.members.push(pool.remove(i));
                    placed_any = true;
                }
            }
            if !placed_any {
                break;
            }
        }
        log::debug!("placement finished after {scans} scans");
        pool
    }

    fn score(&self, groups: &[DraftGroup<'a>], state: &mut GenerationRunState) -> Vec<Group> {
        let ctx = ScoringContext {
            gender_values: self.gender_values,
            target_age_ranges: self.target_age_ranges,
            overall_genders: self.overall_genders,
            track_target_age: self.settings.split_by_target_age,
        };

        let scored = groups
            .iter()
            .map(|group| scoring::score_group(&group.members, &state.history, &ctx))
            .collect::<Vec<_>>();

        groups
            .iter()
            .zip(scored)
            .map(|(group, (counts, scores))| {
                let members = group
                    .members
                    .iter()
                    .zip(counts)
                    .map(|(participant, counts)| {
                        let totals = state.totals.entry(participant.id.clone()).or_default();
                        totals.add(
                            counts.repeated_groupmate_count,
                            counts.unmet_target_age_groupmate_count,
                        );
                        GroupMember {
                            participant: (*participant).clone(),
                            stats: ParticipantRoundStats {
                                repeated_groupmate_count: counts.repeated_groupmate_count,
                                unmet_target_age_groupmate_count: counts
                                    .unmet_target_age_groupmate_count,
                                accumulated_repeated_groupmate_count: totals
                                    .repeated_groupmate_count,
                                accumulated_unmet_target_age_groupmate_count: totals
                                    .unmet_target_age_groupmate_count,
                            },
                        }
                    })
                    .collect();
                Group {
                    id: group.id,
                    members,
                    scores,
                }
            })
            .collect()
    }
}
