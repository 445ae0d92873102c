// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! The append-only audit trail produced by a tabulation.

use crate::decimal::FixedDecimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A candidate's tallies as of one round, exactly as they were observed
/// before that round's elect/eliminate decision.
#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CandidateRoundStat {
    pub total: FixedDecimal,
    pub transfer_total: FixedDecimal,
}

/// A snapshot of every candidate still `remaining` at the start of one
/// round, keyed by candidate identifier. Candidates elected or eliminated in
/// earlier rounds are absent. `total`/`transfer_total` serialize as fixed
/// 5-decimal strings (see [`FixedDecimal::to_fixed_string`]) so downstream
/// JSON transport does not lose precision.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RoundSummary<C: Ord>(pub BTreeMap<C, CandidateRoundStat>);

impl<C: Ord> RoundSummary<C> {
    pub fn new() -> Self {
        RoundSummary(BTreeMap::new())
    }
}

impl<C: Ord> Default for RoundSummary<C> {
    fn default() -> Self {
        Self::new()
    }
}
