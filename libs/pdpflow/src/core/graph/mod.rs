// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod checksum;
mod link_category;
mod machine_graph;
mod unit;

pub use checksum::GraphChecksum;
pub use link_category::LinkCategory;
pub use machine_graph::{GraphStats, MachineEdge, MachineGraph, Partition};
pub use unit::{Unit, UnitId, UnitRole};
