// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five kinds of traffic between units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// Activations, one tick at a time.
    Forward,
    /// Error derivatives, one tick at a time.
    Backprop,
    /// Weight-delta partials up the reduction tree, scale back down.
    LinkDeltaSum,
    /// Scoreboard pulses between Sum and Weight units.
    SyncGen,
    /// Convergence decision and stop broadcast.
    Stop,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 5] = [
        LinkCategory::Forward,
        LinkCategory::Backprop,
        LinkCategory::LinkDeltaSum,
        LinkCategory::SyncGen,
        LinkCategory::Stop,
    ];

    /// Order of routing keys in a unit's Routing region.
    pub const ROUTING_ORDER: [LinkCategory; 5] = [
        LinkCategory::Forward,
        LinkCategory::Backprop,
        LinkCategory::SyncGen,
        LinkCategory::Stop,
        LinkCategory::LinkDeltaSum,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Forward => "fwd",
            Self::Backprop => "bkp",
            Self::LinkDeltaSum => "lds",
            Self::SyncGen => "fsg",
            Self::Stop => "stp",
        }
    }

    pub fn routing_slot(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backprop => 1,
            Self::SyncGen => 2,
            Self::Stop => 3,
            Self::LinkDeltaSum => 4,
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_slots_match_order() {
        for (slot, category) in LinkCategory::ROUTING_ORDER.iter().enumerate() {
            assert_eq!(category.routing_slot(), slot);
        }
    }
}
