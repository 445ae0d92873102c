// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! The STV election state machine: quota, remaining candidates, winners, and
//! the append-only round history.

use crate::ballot::Ballot;
use crate::decimal::FixedDecimal;
use crate::error::{InvalidInputReason, TabulationError};
use crate::history::{CandidateRoundStat, RoundSummary};
use crate::tally::CandidateTally;
use crate::tie_break::break_tie;
use log::{debug, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

/// The outcome of a single [`Tabulator::step`] call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome<C> {
    /// A candidate was elected this round (with any surplus already
    /// transferred).
    Elected(C),
    /// A candidate was eliminated this round (their ballots already
    /// transferred at full value).
    Eliminated(C),
    /// The tabulation had already terminated before this call; nothing
    /// happened.
    AlreadyTerminated,
}

/// Owns the election state for the lifetime of one tabulation.
///
/// `C` is the caller's opaque candidate identifier type. The core never
/// interprets it beyond equality, hashing, and the total order `Ord` gives
/// for deterministic iteration.
pub struct Tabulator<C: Clone + Eq + Hash + Ord> {
    remaining: BTreeSet<C>,
    winners: Vec<C>,
    num_winners: usize,
    ballots: Vec<Ballot<C>>,
    quota: u64,
    quota_decimal: FixedDecimal,
    history: Vec<RoundSummary<C>>,
    rng: ChaCha8Rng,
}

impl<C: Clone + Eq + Hash + Ord> Tabulator<C> {
    /// Construct a tabulator for an election.
    ///
    /// `candidates` must be non-empty and `num_winners` must be in
    /// `[1, candidates.len()]`. Each preference list in `preference_lists`
    /// must draw only from `candidates` and must not repeat a candidate.
    /// Empty preference lists are permitted and simply never contribute.
    pub fn new(
        candidates: &BTreeSet<C>,
        num_winners: usize,
        preference_lists: &[Vec<C>],
        rng_seed: u64,
    ) -> Result<Self, TabulationError> {
        if num_winners == 0 {
            return Err(InvalidInputReason::NumWinnersZero.into());
        }
        if num_winners > candidates.len() {
            return Err(InvalidInputReason::NumWinnersExceedsCandidates {
                num_winners,
                num_candidates: candidates.len(),
            }
            .into());
        }
        for list in preference_lists {
            let mut seen = BTreeSet::new();
            for c in list {
                if !candidates.contains(c) {
                    return Err(InvalidInputReason::UnknownCandidate.into());
                }
                if !seen.insert(c) {
                    return Err(InvalidInputReason::DuplicateCandidateOnBallot.into());
                }
            }
        }

        let ballots: Vec<Ballot<C>> = preference_lists.iter().map(|list| Ballot::new(list)).collect();
        let quota = (ballots.len() as u64) / (num_winners as u64 + 1) + 1;
        let quota_decimal = FixedDecimal::from_u64(quota);
        debug!(
            "tabulator constructed: {} candidates, {} seats, {} ballots, quota={}",
            candidates.len(),
            num_winners,
            ballots.len(),
            quota
        );

        Ok(Tabulator {
            remaining: candidates.clone(),
            winners: Vec::new(),
            num_winners,
            ballots,
            quota,
            quota_decimal,
            history: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        })
    }

    /// The Droop quota, computed once at construction:
    /// `floor(total_ballots / (num_winners + 1)) + 1`.
    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// The audit trail so far. Fully populated once [`Tabulator::run`]
    /// returns; also readable incrementally between [`Tabulator::step`]
    /// calls.
    pub fn history(&self) -> &[RoundSummary<C>] {
        &self.history
    }

    pub fn winners(&self) -> &[C] {
        &self.winners
    }

    /// Run the round loop to termination and return the winners. Idempotent:
    /// once terminated, calling this again returns the same winners without
    /// mutating any state, since `step` becomes a no-op at that point.
    pub fn run(&mut self) -> Result<&[C], TabulationError> {
        loop {
            match self.step()? {
                StepOutcome::AlreadyTerminated => break,
                StepOutcome::Elected(_) | StepOutcome::Eliminated(_) => {}
            }
        }
        Ok(&self.winners)
    }

    /// Execute exactly one round: elect a candidate (with surplus transfer)
    /// or eliminate one (with full-value transfer). Returns
    /// [`StepOutcome::AlreadyTerminated`] without mutating state if the
    /// tabulation has already reached `num_winners` winners or run out of
    /// remaining candidates.
    pub fn step(&mut self) -> Result<StepOutcome<C>, TabulationError> {
        if self.winners.len() == self.num_winners || self.remaining.is_empty() {
            return Ok(StepOutcome::AlreadyTerminated);
        }

        if cfg!(debug_assertions) {
            self.check_top_preferences_are_remaining()?;
        }

        let mut tallies: BTreeMap<C, CandidateTally<C>> = self
            .remaining
            .iter()
            .map(|c| (c.clone(), CandidateTally::new(c.clone())))
            .collect();

        for (index, ballot) in self.ballots.iter().enumerate() {
            if ballot.is_exhausted() || ballot.weight.is_zero() {
                continue;
            }
            let top = ballot.top().expect("checked non-exhausted above").clone();
            let tally = tallies
                .get_mut(&top)
                .ok_or_else(|| {
                    TabulationError::InternalInvariantViolation(
                        "ballot's top preference was not in remaining".to_string(),
                    )
                })?;
            tally.total = tally.total + ballot.weight;
            if ballot.weight < FixedDecimal::ONE {
                tally.transfer_total = tally.transfer_total + ballot.weight;
            }
            tally.ballots.push(index);
        }

        let round_summary = RoundSummary(
            tallies
                .iter()
                .map(|(c, t)| {
                    (
                        c.clone(),
                        CandidateRoundStat {
                            total: t.total,
                            transfer_total: t.transfer_total,
                        },
                    )
                })
                .collect(),
        );
        trace!(
            "round {} tallies: {:?}",
            self.history.len() + 1,
            round_summary
                .0
                .iter()
                .map(|(_, s)| s.total.to_fixed_string())
                .collect::<Vec<_>>()
        );
        self.history.push(round_summary);
        let current_round_index = self.history.len() as isize - 1;

        let mut sorted: Vec<CandidateTally<C>> = tallies.into_values().collect();
        sorted.sort_by(|a, b| b.total.cmp(&a.total));

        let top_total = sorted.first().expect("remaining is non-empty").total;
        let bottom_total = sorted.last().expect("remaining is non-empty").total;

        let elect_branch =
            top_total >= self.quota_decimal || self.remaining.len() <= self.num_winners - self.winners.len();

        if elect_branch {
            let round_winners: Vec<C> = sorted
                .iter()
                .filter(|t| t.total == top_total)
                .map(|t| t.candidate.clone())
                .collect();
            let winner = break_tie(
                &round_winners,
                &self.history,
                current_round_index - 1,
                true,
                &mut self.rng,
            );
            let winner_tally = sorted
                .iter()
                .find(|t| t.candidate == winner)
                .expect("winner came from sorted tallies");

            let transfer_weight = if winner_tally.total > self.quota_decimal {
                (winner_tally.total - self.quota_decimal).div_quantized(winner_tally.total)
            } else {
                FixedDecimal::ZERO
            };

            self.winners.push(winner.clone());
            self.remaining.remove(&winner);
            debug!(
                "round {}: elected a candidate (total={}, transfer_weight={})",
                current_round_index + 1,
                winner_tally.total,
                transfer_weight
            );
            for &idx in &winner_tally.ballots {
                self.ballots[idx].transfer(transfer_weight, &self.remaining);
            }
            Ok(StepOutcome::Elected(winner))
        } else {
            let round_losers: Vec<C> = sorted
                .iter()
                .filter(|t| t.total == bottom_total)
                .map(|t| t.candidate.clone())
                .collect();
            let loser = break_tie(
                &round_losers,
                &self.history,
                current_round_index - 1,
                false,
                &mut self.rng,
            );
            let loser_tally = sorted
                .iter()
                .find(|t| t.candidate == loser)
                .expect("loser came from sorted tallies");

            self.remaining.remove(&loser);
            debug!(
                "round {}: eliminated candidate (total={})",
                current_round_index + 1,
                loser_tally.total
            );
            for &idx in &loser_tally.ballots {
                self.ballots[idx].transfer(FixedDecimal::ONE, &self.remaining);
            }
            Ok(StepOutcome::Eliminated(loser))
        }
    }

    fn check_top_preferences_are_remaining(&self) -> Result<(), TabulationError> {
        for ballot in &self.ballots {
            if let Some(top) = ballot.top() {
                if !self.remaining.contains(top) {
                    return Err(TabulationError::InternalInvariantViolation(
                        "a non-exhausted ballot's top preference is not in remaining at round start"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
