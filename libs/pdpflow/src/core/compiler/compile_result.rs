// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::Serialize;
use std::fmt;

/// Counts from one graph compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileResult {
    /// Subgroups across all groups.
    pub subgroups: usize,
    /// Weight units (one per subgroup pair).
    pub weight_units: usize,
    /// Sum units, counting every reduction-tree node.
    pub sum_units: usize,
    /// Input plus Threshold units.
    pub io_units: usize,
    /// Edges wired, all categories.
    pub edges_wired: usize,
    /// Length of the stop chain in Threshold units.
    pub stop_chain_len: usize,
}

impl CompileResult {
    pub fn total_units(&self) -> usize {
        self.weight_units + self.sum_units + self.io_units
    }

    /// Check if anything was built.
    pub fn has_units(&self) -> bool {
        self.total_units() > 0
    }
}

impl fmt::Display for CompileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompileResult {{ {} subgroups, {} weight + {} sum + {} i/o units, {} edges, stop chain {} }}",
            self.subgroups,
            self.weight_units,
            self.sum_units,
            self.io_units,
            self.edges_wired,
            self.stop_chain_len
        )
    }
}
