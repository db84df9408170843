// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::{RoutingTable, StageReport};
use crate::core::error::Result;
use crate::core::graph::{MachineGraph, UnitId};
use crate::core::network::StageDescriptor;
use crate::core::payload::{Region, UnitPayload};

/// Places, loads and runs a compiled unit graph.
///
/// Calls arrive in a fixed order: `place` and `load` once per graph build,
/// then any number of `update_region`/`run` rounds, and `stop` last. A
/// blanket implementation is provided for `Box<dyn PlacementService>`.
pub trait PlacementService {
    /// Map the graph onto hardware and allocate one routing key per
    /// multicast partition.
    fn place(&mut self, graph: &MachineGraph) -> Result<RoutingTable>;

    /// Write every unit's initial regions.
    fn load(&mut self, payloads: &[UnitPayload]) -> Result<()>;

    /// Overwrite one region of a loaded unit.
    fn update_region(&mut self, unit: &UnitId, region: Region, data: &[u8]) -> Result<()>;

    /// Execute one stage and block until every unit has finished.
    fn run(&mut self, stage: &StageDescriptor) -> Result<StageReport>;

    /// Release the hardware.
    fn stop(&mut self) -> Result<()>;
}

impl PlacementService for Box<dyn PlacementService> {
    fn place(&mut self, graph: &MachineGraph) -> Result<RoutingTable> {
        (**self).place(graph)
    }

    fn load(&mut self, payloads: &[UnitPayload]) -> Result<()> {
        (**self).load(payloads)
    }

    fn update_region(&mut self, unit: &UnitId, region: Region, data: &[u8]) -> Result<()> {
        (**self).update_region(unit, region, data)
    }

    fn run(&mut self, stage: &StageDescriptor) -> Result<StageReport> {
        (**self).run(stage)
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }
}
