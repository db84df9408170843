// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Boundary to the hardware placement and execution service.
//!
//! The compiler hands over a graph and payloads and gets routing keys and
//! stage reports back. [`LoopbackPlacement`] runs nothing but records every
//! call, which is what tests and the CLI use.

mod loopback;
mod report;
mod routing_table;
mod service;

pub use loopback::{LoopbackPlacement, RegionUpdate};
pub use report::{RecordedOutputs, StageReport, SubgroupOutputs, TestResults, TickRecord};
pub use routing_table::RoutingTable;
pub use service::PlacementService;
