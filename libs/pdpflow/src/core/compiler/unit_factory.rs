// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::CompileResult;
use crate::core::graph::{MachineGraph, Unit};
use crate::core::partition::PartitionPlan;
use crate::core::Result;

/// Create every unit of the plan.
///
/// Per subgroup: one Input, one Threshold, one Sum per tree node, and one
/// Weight per source subgroup in the network. Pairs without a declared link
/// still get a Weight unit; its block stays all zero.
pub(super) fn create_units(
    plan: &PartitionPlan,
    graph: &mut MachineGraph,
    result: &mut CompileResult,
) -> Result<()> {
    let nodes = plan.tree().nodes();

    for sg in plan.subgroups() {
        graph.add_unit(Unit::input(sg))?;
        graph.add_unit(Unit::threshold(sg))?;
        result.io_units += 2;

        for node in 0..nodes {
            graph.add_unit(Unit::sum(sg, node))?;
            result.sum_units += 1;
        }

        for from in plan.subgroups() {
            graph.add_unit(Unit::weight(sg, from))?;
            result.weight_units += 1;
        }
    }

    result.subgroups = plan.subgroups().len();
    tracing::debug!(
        "Created {} units ({} weight, {} sum, {} input/threshold)",
        result.total_units(),
        result.weight_units,
        result.sum_units,
        result.io_units
    );
    Ok(())
}
