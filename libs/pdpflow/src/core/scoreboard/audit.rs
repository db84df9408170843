// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::Scoreboard;
use crate::core::graph::{LinkCategory, MachineGraph, UnitId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A unit whose declared count differs from what is wired into it.
/// Left in place, such a unit would wait forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardMismatch {
    pub unit: UnitId,
    pub category: LinkCategory,
    /// `true` when packets were compared rather than senders.
    pub packets: bool,
    pub expected: u32,
    pub wired: u32,
}

impl fmt::Display for ScoreboardMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expects {} {} {} but {} are wired",
            self.unit,
            self.expected,
            self.category,
            if self.packets { "packets" } else { "senders" },
            self.wired
        )
    }
}

impl Scoreboard<'_> {
    /// Compare every unit's expected counts with the edges wired into it.
    pub fn audit(&self, graph: &MachineGraph) -> Vec<ScoreboardMismatch> {
        let mut mismatches = Vec::new();

        for unit in graph.units() {
            for category in LinkCategory::ALL {
                let incoming = graph.in_edges(&unit.id, category);
                let senders: HashSet<&UnitId> = incoming.iter().map(|(u, _)| &u.id).collect();

                let expected = self.expected_senders(unit, category);
                let wired = senders.len() as u32;
                if expected != wired {
                    mismatches.push(ScoreboardMismatch {
                        unit: unit.id.clone(),
                        category,
                        packets: false,
                        expected,
                        wired,
                    });
                    continue;
                }

                let expected = self.expected_packets(unit, category);
                let wired: u32 = incoming.iter().map(|(_, e)| e.packets).sum();
                if expected != wired {
                    mismatches.push(ScoreboardMismatch {
                        unit: unit.id.clone(),
                        category,
                        packets: true,
                        expected,
                        wired,
                    });
                }
            }
        }

        mismatches
    }
}
