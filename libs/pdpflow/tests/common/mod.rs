// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use pdpflow::{
    CompiledGraph, GraphCompiler, GroupId, GroupRole, Limits, Topology, LENS_WEIGHT_MAGIC_COOKIE,
};
use std::path::{Path, PathBuf};

pub fn limits(max_subgroup_units: u32, max_sum_links: u32) -> Limits {
    Limits {
        max_subgroup_units,
        max_sum_links,
        ..Default::default()
    }
}

/// Groups linked in sequence: each group feeds the next.
pub fn layered(max_subgroup_units: u32, layers: &[(u32, GroupRole)]) -> (Topology, Vec<GroupId>) {
    let mut topology = Topology::new(max_subgroup_units).unwrap();
    let mut ids = Vec::new();
    for (n, (units, role)) in layers.iter().enumerate() {
        let label = format!("g{}", n);
        let id = topology
            .add_group(*units, (*role).into(), None, None, Some(&label))
            .unwrap();
        if let Some(prev) = ids.last() {
            topology.add_link(*prev, id, None).unwrap();
        }
        ids.push(id);
    }
    (topology, ids)
}

pub fn compile(topology: &Topology, limits: Limits) -> CompiledGraph {
    GraphCompiler::new(limits).compile(topology).unwrap()
}

/// Weights text with `count` deterministic values.
pub fn weights_text(count: u64) -> String {
    let mut out = format!("{}\n{}\n1\n0\n", LENS_WEIGHT_MAGIC_COOKIE, count);
    for n in 0..count {
        out.push_str(&format!("{}\n", ((n % 7) as f64 - 3.0) * 0.25));
    }
    out
}

pub fn write_weights(dir: &Path, name: &str, topology: &Topology) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, weights_text(topology.expected_link_count())).unwrap();
    path
}

/// Lens examples with one-hot inputs and shifted one-hot targets.
pub fn examples_text(examples: usize, width: usize) -> String {
    let mut out = String::from("max: 1 ;\n");
    for e in 0..examples {
        let hot = |at: usize| {
            (0..width)
                .map(|u| if u == at % width { "1" } else { "0" })
                .collect::<Vec<_>>()
                .join(" ")
        };
        out.push_str(&format!("name: e{} I: {} T: {} ;\n", e, hot(e), hot(e + 1)));
    }
    out
}

pub fn write_examples(dir: &Path, name: &str, examples: usize, width: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, examples_text(examples, width)).unwrap();
    path
}
