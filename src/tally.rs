// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! Per-round candidate aggregation.

use crate::decimal::FixedDecimal;

/// A pure per-round aggregator for one candidate.
///
/// Reconstructed fresh at the start of every round (see
/// [`crate::tabulator::Tabulator::step`]). `ballots` holds indices into the
/// tabulator's owned ballot vector rather than owned or borrowed
/// [`crate::ballot::Ballot`] values.
#[derive(Clone, Debug)]
pub struct CandidateTally<C> {
    pub candidate: C,
    pub total: FixedDecimal,
    pub transfer_total: FixedDecimal,
    pub ballots: Vec<usize>,
}

impl<C> CandidateTally<C> {
    pub fn new(candidate: C) -> Self {
        CandidateTally {
            candidate,
            total: FixedDecimal::ZERO,
            transfer_total: FixedDecimal::ZERO,
            ballots: Vec::new(),
        }
    }
}
