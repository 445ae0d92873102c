// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! Error taxonomy for the tabulation core.
//!
//! There are no retryable errors here. `InvalidInput` is surfaced
//! synchronously from `Tabulator::new` before any tabulation starts.
//! `InternalInvariantViolation` is fatal and terminates a tabulation in
//! progress with no partial results. Both are programmer-facing; the
//! administration layer is expected to translate either into an opaque
//! "tabulation failed" message for end users.

use thiserror::Error;

/// Why `Tabulator::new` rejected its input.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum InvalidInputReason {
    #[error("num_winners must be at least 1")]
    NumWinnersZero,
    #[error("num_winners ({num_winners}) exceeds the number of candidates ({num_candidates})")]
    NumWinnersExceedsCandidates {
        num_winners: usize,
        num_candidates: usize,
    },
    #[error("a preference list referenced a candidate outside the declared candidate set")]
    UnknownCandidate,
    #[error("a preference list contained the same candidate more than once")]
    DuplicateCandidateOnBallot,
}

/// Top-level error returned by this crate.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TabulationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputReason),

    /// A pre- or post-condition that should be impossible by construction
    /// failed. Only ever raised by the debug-build invariant checks.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}
