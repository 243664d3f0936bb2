use std::collections::BTreeSet;

use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    model::{Participant, ParticipantId},
    settings::GroupSettings,
};

/// Promotes random non-leaders until every group can get `min_leaders` leaders.
///
/// Does nothing unless `compulsory_group_leader` is set. The quota is
/// `num_groups * min_leaders`; if there are not enough non-leaders the quota is
/// simply left unmet. Participants are drawn without replacement.
///
/// Returns the ids of the newly promoted participants.
pub fn promote_compulsory_leaders<R>(
    participants: &mut [Participant],
    settings: &GroupSettings,
    rng: &mut R,
) -> Vec<ParticipantId>
where
    R: Rng + ?Sized,
{
    if !settings.compulsory_group_leader || settings.group_size == 0 {
        return vec![];
    }
    let required = settings.num_groups(participants.len()) * settings.min_leaders;
    let existing = participants.iter().filter(|p| p.is_group_leader).count();
    let needed = required.saturating_sub(existing);
    if needed == 0 {
        return vec![];
    }

    let non_leaders = participants
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_group_leader)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let chosen = non_leaders
        .choose_multiple(rng, needed)
        .copied()
        .collect::<Vec<_>>();
    if chosen.len() < needed {
        log::info!(
            "leader quota of {required} cannot be met: only {} participants available for promotion",
            chosen.len()
        );
    }

    chosen
        .into_iter()
        .map(|i| {
            let p = &mut participants[i];
            p.is_group_leader = true;
            p.id.clone()
        })
        .collect()
}

/// Marks the given ids as leaders again, e.g. when continuing a session whose
/// first run promoted them. Unknown ids are ignored.
pub fn reapply_promotions(participants: &mut [Participant], promoted: &BTreeSet<ParticipantId>) {
    for p in participants.iter_mut().filter(|p| promoted.contains(&p.id)) {
        p.is_group_leader = true;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn people(count: usize) -> Vec<Participant> {
        (0..count)
            .map(|i| Participant::new(i.to_string(), "m", Some(30)))
            .collect()
    }

    fn compulsory(group_size: usize, min_leaders: usize) -> GroupSettings {
        GroupSettings {
            min_leaders,
            compulsory_group_leader: true,
            ..GroupSettings::with_group_size(group_size)
        }
    }

    #[test]
    fn test_promotes_exactly_the_shortfall() {
        let mut participants = people(12);
        participants[5].is_group_leader = true;
        let mut rng = Pcg32::seed_from_u64(1);
        let promoted = promote_compulsory_leaders(&mut participants, &compulsory(4, 1), &mut rng);
        assert_eq!(promoted.len(), 2);
        assert_eq!(participants.iter().filter(|p| p.is_group_leader).count(), 3);
        assert!(!promoted.contains(&ParticipantId::from("5")));
    }

    #[test]
    fn test_disabled_or_satisfied_quota_promotes_nobody() {
        let mut participants = people(8);
        let mut rng = Pcg32::seed_from_u64(1);
        let settings = GroupSettings {
            compulsory_group_leader: false,
            ..compulsory(4, 1)
        };
        assert!(promote_compulsory_leaders(&mut participants, &settings, &mut rng).is_empty());

        participants[0].is_group_leader = true;
        participants[1].is_group_leader = true;
        assert!(
            promote_compulsory_leaders(&mut participants, &compulsory(4, 1), &mut rng).is_empty()
        );
    }

    #[test]
    fn test_best_effort_when_non_leaders_run_out() {
        let mut participants = people(3);
        let mut rng = Pcg32::seed_from_u64(1);
        // 1 group, quota 5, only 3 people.
        let promoted = promote_compulsory_leaders(&mut participants, &compulsory(4, 5), &mut rng);
        assert_eq!(promoted.len(), 3);
        assert!(participants.iter().all(|p| p.is_group_leader));
    }

    #[test]
    fn test_same_seed_promotes_same_participants() {
        let settings = compulsory(3, 1);
        let mut a = people(9);
        let mut b = people(9);
        let promoted_a =
            promote_compulsory_leaders(&mut a, &settings, &mut Pcg32::seed_from_u64(42));
        let promoted_b =
            promote_compulsory_leaders(&mut b, &settings, &mut Pcg32::seed_from_u64(42));
        assert_eq!(promoted_a, promoted_b);
    }

    #[test]
    fn test_reapply_promotions() {
        let mut participants = people(3);
        let promoted = BTreeSet::from([ParticipantId::from("2"), ParticipantId::from("9")]);
        reapply_promotions(&mut participants, &promoted);
        assert!(participants[2].is_group_leader);
        assert!(!participants[0].is_group_leader);
    }
}
