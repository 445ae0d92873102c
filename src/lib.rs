// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! A deterministic, multi-winner Single Transferable Vote tabulation core.
//!
//! Given a candidate set, a number of seats to fill, and a collection of
//! ranked-preference ballots, [`Tabulator`] elects winners using the Droop
//! quota, fractional surplus transfer, and a history-backed tie-break rule.
//! The crate has no knowledge of where ballots come from or where results go.

pub mod ballot;
pub mod decimal;
pub mod error;
pub mod history;
pub mod tabulator;
pub mod tally;
pub mod tie_break;

pub use ballot::Ballot;
pub use decimal::FixedDecimal;
pub use error::{InvalidInputReason, TabulationError};
pub use history::{CandidateRoundStat, RoundSummary};
pub use tabulator::{StepOutcome, Tabulator};
pub use tally::CandidateTally;
