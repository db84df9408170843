// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Expected-sender arithmetic for the scoreboard barrier.
//!
//! No unit waits on a clock. Each one counts distinct senders per link
//! category and advances once the count reaches the number derived here.
//! Everything is computed from the partition plan and the tree layout, so
//! [`Scoreboard::audit`] can check it against the wiring independently.

mod audit;
mod expected;

pub use audit::ScoreboardMismatch;
pub use expected::{Scoreboard, SumExpectations};
