// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! Tie-breaking: who wins (or loses) when two or more candidates share the
//! extreme tally in a round.
//!
//! On ties, the contender who was strongest (electing) or weakest
//! (eliminating) in the most recent prior round prevails. If every prior
//! round agrees, a single seeded random draw decides.

use crate::history::RoundSummary;
use log::warn;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Resolve a tie among `group` (all candidates sharing the same extreme
/// `total` this round). `round_index` is the index into `history` of the
/// round immediately prior to the current one, negative once there is no
/// earlier round left to consult. `win` selects the direction: `true` means
/// "prefer the larger historical total" (electing), `false` means "prefer
/// the smaller" (eliminating).
pub fn break_tie<C: Clone + Ord>(
    group: &[C],
    history: &[RoundSummary<C>],
    round_index: isize,
    win: bool,
    rng: &mut ChaCha8Rng,
) -> C {
    if group.len() == 1 {
        return group[0].clone();
    }
    if round_index < 0 {
        warn!(
            "tie-break exhausted all prior rounds for {} tied candidates; falling back to the seeded RNG",
            group.len()
        );
        let pick = rng.gen_range(0..group.len());
        return group[pick].clone();
    }

    let round = &history[round_index as usize];
    let keyed: Vec<(&C, crate::decimal::FixedDecimal)> = group
        .iter()
        .map(|c| {
            let stat = round
                .0
                .get(c)
                .expect("tied candidate must appear in every earlier round it was remaining for");
            (c, stat.total)
        })
        .collect();

    let best = if win {
        keyed.iter().map(|(_, t)| *t).max()
    } else {
        keyed.iter().map(|(_, t)| *t).min()
    }
    .expect("group is non-empty");

    let next_group: Vec<C> = keyed
        .into_iter()
        .filter(|(_, t)| *t == best)
        .map(|(c, _)| (*c).clone())
        .collect();

    break_tie(&next_group, history, round_index - 1, win, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CandidateRoundStat;
    use crate::decimal::FixedDecimal;
    use rand::SeedableRng;

    fn summary(pairs: &[(&str, u64)]) -> RoundSummary<String> {
        let mut map = std::collections::BTreeMap::new();
        for (c, total) in pairs {
            map.insert(
                c.to_string(),
                CandidateRoundStat {
                    total: FixedDecimal::from_u64(*total),
                    transfer_total: FixedDecimal::ZERO,
                },
            );
        }
        RoundSummary(map)
    }

    #[test]
    fn single_candidate_needs_no_rng() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let winner = break_tie(&["A".to_string()], &[], -1, true, &mut rng);
        assert_eq!(winner, "A");
    }

    #[test]
    fn resolved_by_prior_round_for_electing() {
        let history = vec![summary(&[("A", 3), ("B", 1)])];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let winner = break_tie(
            &["A".to_string(), "B".to_string()],
            &history,
            0,
            true,
            &mut rng,
        );
        assert_eq!(winner, "A");
    }

    #[test]
    fn resolved_by_prior_round_for_eliminating_prefers_weakest() {
        let history = vec![summary(&[("A", 3), ("B", 1)])];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let loser = break_tie(
            &["A".to_string(), "B".to_string()],
            &history,
            0,
            false,
            &mut rng,
        );
        assert_eq!(loser, "B");
    }

    #[test]
    fn falls_back_to_rng_when_never_distinguished() {
        let history = vec![summary(&[("A", 1), ("B", 1)])];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let picked = break_tie(
            &["A".to_string(), "B".to_string()],
            &history,
            -1,
            true,
            &mut rng,
        );
        assert!(picked == "A" || picked == "B");
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let history = vec![summary(&[("A", 1), ("B", 1)])];
        let a = break_tie(
            &["A".to_string(), "B".to_string()],
            &history,
            -1,
            true,
            &mut ChaCha8Rng::seed_from_u64(7),
        );
        let b = break_tie(
            &["A".to_string(), "B".to_string()],
            &history,
            -1,
            true,
            &mut ChaCha8Rng::seed_from_u64(7),
        );
        assert_eq!(a, b);
    }
}
