// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::unit_factory::create_units;
use super::wiring::Wiring;
use super::{CompilePhase, CompileResult};
use crate::core::config::Limits;
use crate::core::graph::MachineGraph;
use crate::core::partition::PartitionPlan;
use crate::core::scoreboard::Scoreboard;
use crate::core::topology::Topology;
use crate::core::{PdpError, Result};

/// A partitioned, wired and audited unit graph.
#[derive(Debug, Clone)]
pub struct CompiledGraph {
    pub plan: PartitionPlan,
    pub graph: MachineGraph,
    pub result: CompileResult,
}

impl CompiledGraph {
    pub fn scoreboard(&self) -> Scoreboard<'_> {
        Scoreboard::new(&self.plan)
    }
}

/// Turns a topology into a [`CompiledGraph`].
///
/// Runs [`CompilePhase::ALL`] in order. The result is a pure function of
/// the topology and limits, so compiling twice yields identical graphs.
pub struct GraphCompiler {
    limits: Limits,
}

impl GraphCompiler {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn compile(&self, topology: &Topology) -> Result<CompiledGraph> {
        tracing::info!(
            "Compiling graph for {} groups, {} links",
            topology.groups().len(),
            topology.links().len()
        );

        let mut result = CompileResult::default();
        let mut graph = MachineGraph::new();
        let mut plan = None;

        let mut phase = Some(CompilePhase::Partition);
        while let Some(current) = phase {
            tracing::debug!("{}", current);
            match current {
                CompilePhase::Partition => {
                    plan = Some(PartitionPlan::new(topology, &self.limits)?);
                }
                CompilePhase::Create => {
                    let plan = planned(&plan)?;
                    create_units(plan, &mut graph, &mut result)?;
                }
                CompilePhase::Wire => {
                    let plan = planned(&plan)?;
                    result.edges_wired = Wiring::new(plan, &mut graph).wire_all()?;
                    result.stop_chain_len = plan.stop_chain().len();
                }
                CompilePhase::Audit => {
                    let plan = planned(&plan)?;
                    let mismatches = Scoreboard::new(plan).audit(&graph);
                    if let Some(first) = mismatches.first() {
                        for m in &mismatches {
                            tracing::error!("Scoreboard mismatch: {}", m);
                        }
                        return Err(PdpError::Protocol(format!(
                            "{} scoreboard mismatch(es), first: {}",
                            mismatches.len(),
                            first
                        )));
                    }
                }
            }
            phase = current.next();
        }

        let plan = plan.ok_or_else(|| PdpError::Graph("partition phase did not run".into()))?;
        tracing::info!("{}", result);
        Ok(CompiledGraph {
            plan,
            graph,
            result,
        })
    }
}

fn planned(plan: &Option<PartitionPlan>) -> Result<&PartitionPlan> {
    plan.as_ref()
        .ok_or_else(|| PdpError::Graph("partition phase did not run".into()))
}
