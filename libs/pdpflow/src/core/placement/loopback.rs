// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::{
    PlacementService, RecordedOutputs, RoutingTable, StageReport, SubgroupOutputs, TestResults,
    TickRecord,
};
use crate::core::example_set::ExampleRecord;
use crate::core::graph::{MachineGraph, UnitId, UnitRole};
use crate::core::network::{StageDescriptor, StageMode};
use crate::core::payload::{Region, UnitPayload};
use crate::core::topology::GroupId;
use crate::core::{PdpError, Result};
use pdpflow_fixed::{WireReader, ACTIV_SHIFT, NAN_PATTERN, SHORT_ACTIV_SHIFT};
use std::collections::{HashMap, VecDeque};

/// One `update_region` call as the loopback saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionUpdate {
    pub unit: UnitId,
    pub region: Region,
    pub len: usize,
}

/// In-process placement service that executes nothing.
///
/// Keys are allocated as `(index + 1) * key_space_size` in partition order,
/// leaving 0 free to mean "no key". Payloads are kept and region updates
/// applied to them, so tests can inspect exactly what a unit would hold.
///
/// Output groups that write their outputs get a recording back from every
/// stage: one tick per event, each output echoing the event's target.
#[derive(Debug, Default)]
pub struct LoopbackPlacement {
    key_space_size: u32,
    routing: Option<RoutingTable>,
    payloads: HashMap<UnitId, UnitPayload>,
    /// Threshold units in graph order, with their subgroup.
    thresholds: Vec<(UnitId, GroupId, u32)>,
    example_cursor: u32,
    updates: Vec<RegionUpdate>,
    runs: Vec<StageDescriptor>,
    scripted: VecDeque<Vec<u8>>,
    epochs_trained: u32,
    place_calls: usize,
    stopped: bool,
}

impl LoopbackPlacement {
    pub fn new(key_space_size: u32) -> Self {
        Self {
            key_space_size,
            ..Default::default()
        }
    }

    /// Queue a raw `<4I` test-results record for the next test stage.
    pub fn push_test_results(&mut self, results: TestResults) {
        self.scripted.push_back(results.to_bytes());
    }

    pub fn routing(&self) -> Option<&RoutingTable> {
        self.routing.as_ref()
    }

    pub fn payload(&self, unit: &UnitId) -> Option<&UnitPayload> {
        self.payloads.get(unit)
    }

    pub fn payload_count(&self) -> usize {
        self.payloads.len()
    }

    pub fn updates(&self) -> &[RegionUpdate] {
        &self.updates
    }

    pub fn runs(&self) -> &[StageDescriptor] {
        &self.runs
    }

    /// Times a graph was placed, i.e. built and handed over.
    pub fn place_calls(&self) -> usize {
        self.place_calls
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn check_running(&self, call: &str) -> Result<()> {
        if self.stopped {
            return Err(PdpError::Placement(format!("{} after stop", call)));
        }
        Ok(())
    }

    /// Results for a test stage: the next scripted record, or an echo of
    /// the stage when nothing is queued.
    fn next_test_results(&mut self, stage: &StageDescriptor) -> Result<TestResults> {
        match self.scripted.pop_front() {
            Some(bytes) => TestResults::decode(&bytes),
            None => Ok(TestResults {
                epochs_trained: self.epochs_trained,
                examples_tested: stage.num_examples,
                ..Default::default()
            }),
        }
    }

    /// Ticks and outputs the loaded output groups record over `stage`.
    fn record_outputs(&mut self, stage: &StageDescriptor) -> Result<Option<RecordedOutputs>> {
        let mut writers = Vec::new();
        for (id, group, subgroup) in &self.thresholds {
            let Some(payload) = self.payloads.get(id) else {
                continue;
            };
            if let Some(flags) = OutputFlags::read(payload)? {
                writers.push((payload, *group, *subgroup, flags));
            }
        }
        let Some((first, ..)) = writers.first() else {
            return Ok(None);
        };
        let examples = example_table(first)?;
        if examples.is_empty() {
            return Ok(None);
        }
        let last_tick_only = writers.iter().any(|(.., flags)| flags.last_tick_only);

        let mut recorded = RecordedOutputs {
            ticks: Vec::new(),
            outputs: writers
                .iter()
                .map(|(_, group, subgroup, flags)| SubgroupOutputs {
                    group: *group,
                    subgroup: *subgroup,
                    units: flags.units,
                    data: Vec::new(),
                })
                .collect(),
        };

        let mut cursor = if stage.reset { 0 } else { self.example_cursor };
        for epoch in 0..stage.num_epochs {
            for _ in 0..stage.num_examples {
                let example = cursor as usize % examples.len();
                cursor = cursor.wrapping_add(1);
                let (num_events, ev_idx) = examples[example];

                for event in 0..num_events {
                    if last_tick_only && event + 1 != num_events {
                        continue;
                    }
                    recorded.ticks.push(TickRecord {
                        epoch,
                        example: example as u32,
                        event,
                        tick: event + 1,
                    });
                    let row = (ev_idx + event) as usize;
                    for ((payload, .., flags), out) in writers.iter().zip(&mut recorded.outputs) {
                        let targets = payload.region(Region::Targets).unwrap_or(&[]);
                        let units = flags.units as usize;
                        for u in 0..units {
                            let raw = target_at(targets, row * units + u);
                            out.data.extend_from_slice(&short_activ(raw).to_le_bytes());
                        }
                    }
                }
            }
        }
        self.example_cursor = cursor;

        tracing::debug!(
            "Loopback recorded {} ticks from {} output subgroups",
            recorded.ticks.len(),
            recorded.outputs.len()
        );
        Ok(Some(recorded))
    }
}

/// Recording switches read back from a Threshold unit's Core region.
#[derive(Debug, Clone, Copy)]
struct OutputFlags {
    units: u32,
    last_tick_only: bool,
}

impl OutputFlags {
    /// `None` unless the unit belongs to an output group that writes its
    /// outputs.
    fn read(payload: &UnitPayload) -> Result<Option<Self>> {
        let Some(core) = payload.region(Region::Core) else {
            return Ok(None);
        };
        let mut r = WireReader::new(core);
        let output_grp = r.u8()? != 0;
        r.skip(3)?;
        let units = r.u32()?;
        // partitions, rec_test_results
        r.skip(5)?;
        let write_out = r.u8()? != 0;
        let last_tick_only = r.u8()? != 0;
        Ok((output_grp && write_out).then_some(Self {
            units,
            last_tick_only,
        }))
    }
}

/// `(num_events, ev_idx)` of every example in a unit's Examples region.
fn example_table(payload: &UnitPayload) -> Result<Vec<(u32, u32)>> {
    let bytes = payload.region(Region::Examples).unwrap_or(&[]);
    let mut r = WireReader::new(bytes);
    (0..bytes.len() / ExampleRecord::SIZE)
        .map(|_| -> Result<(u32, u32)> {
            r.skip(4)?;
            let num_events = r.u32()?;
            let ev_idx = r.u32()?;
            r.skip(4)?;
            Ok((num_events, ev_idx))
        })
        .collect()
}

fn target_at(targets: &[u8], index: usize) -> i32 {
    targets
        .get(index * 4..)
        .and_then(|rest| WireReader::new(rest).i32().ok())
        .unwrap_or(NAN_PATTERN)
}

/// Activation to the unsigned Q.15 format outputs are recorded in; absent
/// targets record as 0.
fn short_activ(raw: i32) -> u16 {
    if raw == NAN_PATTERN {
        return 0;
    }
    (raw >> (ACTIV_SHIFT - SHORT_ACTIV_SHIFT)).clamp(0, i32::from(u16::MAX)) as u16
}

impl PlacementService for LoopbackPlacement {
    fn place(&mut self, graph: &MachineGraph) -> Result<RoutingTable> {
        self.check_running("place")?;
        let mut table = RoutingTable::new();
        for (index, partition) in graph.partitions().iter().enumerate() {
            let key = (index as u32)
                .checked_add(1)
                .and_then(|n| n.checked_mul(self.key_space_size))
                .ok_or_else(|| {
                    PdpError::Placement(format!(
                        "routing key space exhausted at partition {}",
                        partition.name
                    ))
                })?;
            table.insert(partition.name.clone(), key);
        }
        tracing::debug!("Loopback placed {} partitions", table.len());
        self.thresholds = graph
            .units_with_role(UnitRole::Threshold)
            .map(|u| (u.id.clone(), u.group, u.subgroup))
            .collect();
        self.example_cursor = 0;
        self.place_calls += 1;
        self.routing = Some(table.clone());
        Ok(table)
    }

    fn load(&mut self, payloads: &[UnitPayload]) -> Result<()> {
        self.check_running("load")?;
        if self.routing.is_none() {
            return Err(PdpError::Placement("load before place".into()));
        }
        self.payloads = payloads
            .iter()
            .map(|p| (p.unit.clone(), p.clone()))
            .collect();
        tracing::debug!("Loopback loaded {} units", self.payloads.len());
        Ok(())
    }

    fn update_region(&mut self, unit: &UnitId, region: Region, data: &[u8]) -> Result<()> {
        self.check_running("update_region")?;
        let payload = self
            .payloads
            .get_mut(unit)
            .ok_or_else(|| PdpError::Placement(format!("unit {} is not loaded", unit)))?;
        if !payload.has_region(region) {
            return Err(PdpError::Placement(format!(
                "unit {} has no {} region",
                unit, region
            )));
        }
        payload.set_region(region, data.to_vec());
        self.updates.push(RegionUpdate {
            unit: unit.clone(),
            region,
            len: data.len(),
        });
        Ok(())
    }

    fn run(&mut self, stage: &StageDescriptor) -> Result<StageReport> {
        self.check_running("run")?;
        if self.payloads.is_empty() {
            return Err(PdpError::Placement("run before load".into()));
        }
        let expected = stage.to_bytes();
        if let Some(stale) = self
            .payloads
            .values()
            .find(|p| p.region(Region::Stage) != Some(expected.as_slice()))
        {
            return Err(PdpError::Placement(format!(
                "unit {} holds a stale stage region",
                stale.unit
            )));
        }

        self.runs.push(*stage);
        let test_results = match stage.mode {
            StageMode::Train => {
                self.epochs_trained += stage.num_epochs;
                None
            }
            StageMode::Test => Some(self.next_test_results(stage)?),
        };
        let outputs = self.record_outputs(stage)?;

        Ok(StageReport {
            stage_id: stage.stage_id,
            mode: stage.mode,
            test_results,
            outputs,
        })
    }

    fn stop(&mut self) -> Result<()> {
        self.stopped = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{LinkCategory, Unit, UnitRole};
    use crate::core::partition::SubgroupRef;
    use crate::core::topology::{GroupId, UpdateFunction};

    fn graph() -> MachineGraph {
        let sg = SubgroupRef {
            group: GroupId::new(1),
            subgroup: 0,
            units: 2,
            index: 1,
        };
        let mut g = MachineGraph::new();
        g.add_unit(Unit::input(&sg)).unwrap();
        g.add_unit(Unit::threshold(&sg)).unwrap();
        let i = UnitId::input(sg.group, 0);
        let t = UnitId::threshold(sg.group, 0);
        g.add_edge(&i, &t, LinkCategory::Forward, 1).unwrap();
        g.add_edge(&t, &i, LinkCategory::Backprop, 1).unwrap();
        g
    }

    fn stage(stage_id: u32, mode: StageMode) -> StageDescriptor {
        StageDescriptor {
            stage_id,
            mode,
            update_function: UpdateFunction::Steepest,
            reset: true,
            num_examples: 4,
            num_epochs: 10,
        }
    }

    fn loaded(stage: &StageDescriptor) -> LoopbackPlacement {
        let g = graph();
        let mut lb = LoopbackPlacement::new(65536);
        lb.place(&g).unwrap();
        let payloads: Vec<_> = g
            .units()
            .map(|u| {
                let mut p = UnitPayload::new(u.id.clone(), u.role);
                p.set_region(Region::Stage, stage.to_bytes());
                p
            })
            .collect();
        lb.load(&payloads).unwrap();
        lb
    }

    #[test]
    fn test_keys_skip_zero() {
        let mut lb = LoopbackPlacement::new(65536);
        let table = lb.place(&graph()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.key("fwd_i1_0"), Some(65536));
        assert_eq!(table.key("bkp_t1_0"), Some(131072));
        assert_eq!(lb.place_calls(), 1);
    }

    #[test]
    fn test_key_space_overflow() {
        let mut lb = LoopbackPlacement::new(u32::MAX);
        assert!(matches!(lb.place(&graph()), Err(PdpError::Placement(_))));
    }

    #[test]
    fn test_load_requires_place() {
        let mut lb = LoopbackPlacement::new(16);
        let p = UnitPayload::new(UnitId::input(GroupId::new(1), 0), UnitRole::Input);
        assert!(lb.load(&[p]).is_err());
    }

    #[test]
    fn test_run_checks_stage_region() {
        let first = stage(0, StageMode::Train);
        let mut lb = loaded(&first);
        lb.run(&first).unwrap();

        let second = stage(1, StageMode::Test);
        assert!(matches!(lb.run(&second), Err(PdpError::Placement(_))));

        let bytes = second.to_bytes();
        for unit in [UnitId::input(GroupId::new(1), 0), UnitId::threshold(GroupId::new(1), 0)] {
            lb.update_region(&unit, Region::Stage, &bytes).unwrap();
        }
        let report = lb.run(&second).unwrap();
        assert_eq!(report.stage_id, 1);
        assert_eq!(
            report.test_results,
            Some(TestResults {
                epochs_trained: 10,
                examples_tested: 4,
                ..Default::default()
            })
        );
        assert_eq!(lb.runs().len(), 2);
        assert!(lb.updates().iter().all(|u| u.region == Region::Stage));
    }

    #[test]
    fn test_scripted_results_and_missing_region() {
        let s = stage(0, StageMode::Test);
        let mut lb = loaded(&s);
        let scripted = TestResults {
            epochs_trained: 1,
            examples_tested: 4,
            ticks_tested: 12,
            examples_correct: 3,
        };
        lb.push_test_results(scripted);
        assert_eq!(lb.run(&s).unwrap().test_results, Some(scripted));

        let unit = UnitId::input(GroupId::new(1), 0);
        assert!(lb.update_region(&unit, Region::Weights, &[0; 4]).is_err());

        lb.stop().unwrap();
        assert!(lb.is_stopped());
        assert!(lb.run(&s).is_err());
    }
}
