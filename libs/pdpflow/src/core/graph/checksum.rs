// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::MachineGraph;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GraphChecksum(pub u64);

impl fmt::Display for GraphChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Deterministic checksum of graph structure.
pub(super) fn compute_checksum(graph: &MachineGraph) -> GraphChecksum {
    let mut hasher = DefaultHasher::new();

    // Units sorted by id
    let mut units: Vec<_> = graph.units().collect();
    units.sort_by(|a, b| a.id.cmp(&b.id));
    for unit in units {
        unit.id.hash(&mut hasher);
        unit.role.hash(&mut hasher);
        unit.units.hash(&mut hasher);
    }

    // Edges sorted by (source, target, category)
    let mut edges: Vec<_> = graph
        .edges()
        .map(|(from, to, edge)| (&from.id, &to.id, edge))
        .collect();
    edges.sort_by(|a, b| (a.0, a.1, a.2.category).cmp(&(b.0, b.1, b.2.category)));
    for (from, to, edge) in edges {
        from.hash(&mut hasher);
        to.hash(&mut hasher);
        edge.category.hash(&mut hasher);
        edge.partition.hash(&mut hasher);
        edge.packets.hash(&mut hasher);
    }

    GraphChecksum(hasher.finish())
}
