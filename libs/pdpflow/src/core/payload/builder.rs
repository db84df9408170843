// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::{
    InputCore, NetworkRecord, Region, SumCore, ThresholdCore, UnitPayload, WeightCore,
};
use crate::core::compiler::CompiledGraph;
use crate::core::config::RecordingOptions;
use crate::core::example_set::{CompiledExamples, EventRecord, ExampleRecord, SetRecord};
use crate::core::graph::{Unit, UnitRole};
use crate::core::network::{NetworkSettings, StageDescriptor};
use crate::core::placement::RoutingTable;
use crate::core::topology::{Group, GroupId, Topology, DEF_GROUP_CRITERION};
use crate::core::{PdpError, Result};
use pdpflow_fixed::{Activation, ErrorValue, FixedValue, FpReal, ShortFpReal, WeightValue, WireWriter};

/// Serializes every unit's regions from the compiled state of a network.
pub struct PayloadBuilder<'a> {
    pub topology: &'a Topology,
    pub compiled: &'a CompiledGraph,
    pub settings: &'a NetworkSettings,
    pub recording: &'a RecordingOptions,
    pub examples: &'a CompiledExamples,
    pub routing: &'a RoutingTable,
}

impl PayloadBuilder<'_> {
    pub fn build_all(&self, stage: &StageDescriptor) -> Result<Vec<UnitPayload>> {
        let payloads = self
            .compiled
            .graph
            .units()
            .map(|unit| self.build(unit, stage))
            .collect::<Result<Vec<_>>>()?;

        let bytes: usize = payloads.iter().map(UnitPayload::size).sum();
        tracing::debug!("Built {} payloads ({} bytes)", payloads.len(), bytes);
        Ok(payloads)
    }

    pub fn build(&self, unit: &Unit, stage: &StageDescriptor) -> Result<UnitPayload> {
        let group = self.topology.group(unit.group)?;
        let mut payload = UnitPayload::new(unit.id.clone(), unit.role);

        payload.set_region(Region::Network, self.network_region());
        payload.set_region(Region::Core, self.core_region(unit)?);
        payload.set_region(Region::ExampleSet, self.example_set_region());
        payload.set_region(Region::Examples, self.examples_region());

        match unit.role {
            UnitRole::Weight => {
                payload.set_region(Region::Weights, self.weights_region(unit)?);
            }
            UnitRole::Sum => {}
            UnitRole::Input => {
                payload.set_region(Region::Events, self.events_region());
                if !group.inputs.is_empty() {
                    payload.set_region(Region::Inputs, slice_region(group, unit, &group.inputs)?);
                }
            }
            UnitRole::Threshold => {
                payload.set_region(Region::Events, self.events_region());
                if !group.inputs.is_empty() {
                    payload.set_region(Region::Inputs, slice_region(group, unit, &group.inputs)?);
                }
                if !group.targets.is_empty() {
                    payload.set_region(Region::Targets, slice_region(group, unit, &group.targets)?);
                }
            }
        }

        let mut w = WireWriter::new();
        self.routing
            .keys_for(&self.compiled.graph, &unit.id)?
            .encode(&mut w);
        payload.set_region(Region::Routing, w.into_bytes());
        payload.set_region(Region::Stage, stage.to_bytes());

        Ok(payload)
    }

    fn network_region(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(NetworkRecord::SIZE);
        NetworkRecord {
            net_type: self.settings.net_type,
            ticks_per_interval: self.settings.ticks_per_interval,
            global_max_ticks: self.settings.global_max_ticks(),
            output_chain_len: self.topology.output_chain().len() as u32,
        }
        .encode(&mut w);
        w.into_bytes()
    }

    fn example_set_region(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(SetRecord::SIZE);
        self.examples.set.encode(&mut w);
        w.into_bytes()
    }

    fn examples_region(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(self.examples.examples.len() * ExampleRecord::SIZE);
        for record in &self.examples.examples {
            record.encode(&mut w);
        }
        w.into_bytes()
    }

    fn events_region(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(self.examples.events.len() * EventRecord::SIZE);
        for record in &self.examples.events {
            record.encode(&mut w);
        }
        w.into_bytes()
    }

    /// Core region of any unit. Learning parameters and convergence
    /// criteria live here, so it is rebuilt when either changes.
    pub fn core_region(&self, unit: &Unit) -> Result<Vec<u8>> {
        let group = self.topology.group(unit.group)?;
        let scoreboard = self.compiled.scoreboard();
        let mut w = WireWriter::new();

        match unit.role {
            UnitRole::Weight => {
                let (from_group, from_subgroup) = weight_source(unit)?;
                let from = self.topology.group(from_group)?;
                let linked = group.is_linked_from(from_group);
                let param = |own: Option<f64>, net: f64| {
                    if linked {
                        ShortFpReal::from_f64(own.unwrap_or(net))
                    } else {
                        ShortFpReal(0)
                    }
                };
                WeightCore {
                    num_rows: from.subgroup_units(from_subgroup),
                    num_cols: unit.units,
                    init_output: Activation::from_f64(from.init_output),
                    learning_rate: param(group.params.learning_rate, self.settings.learning_rate),
                    weight_decay: param(group.params.weight_decay, self.settings.weight_decay),
                    momentum: param(group.params.momentum, self.settings.momentum),
                    expected: scoreboard.weight_expectations(unit),
                }
                .encode(&mut w);
            }
            UnitRole::Sum => {
                let e = scoreboard.sum_expectations(unit);
                let first_group = unit.group == self.compiled.plan.first_group();
                let is_tree_root = unit.tree_node == Some(0);
                SumCore {
                    units: unit.units,
                    fwd_expected: e.fwd,
                    bkp_expected: e.bkp,
                    lds_expected: e.lds_packets,
                    fsgn_expected: e.fsgn,
                    bsgn_expected: e.bsgn,
                    is_first_group: first_group,
                    is_tree_root,
                    is_first_root: first_group && unit.subgroup == 0 && is_tree_root,
                }
                .encode(&mut w);
            }
            UnitRole::Input => {
                InputCore {
                    output_grp: group.roles.is_output(),
                    input_grp: group.roles.is_input(),
                    units: unit.units,
                    num_in_procs: group.num_in_procs,
                    procs: group.input_funcs.map(|f| f.code()),
                    in_integr_en: group.in_integr_en,
                    in_integr_dt: FpReal::from_f64(1.0 / f64::from(self.settings.ticks_per_interval.max(1))),
                    soft_clamp_strength: FpReal::from_f64(group.soft_clamp_strength),
                    init_net: FpReal::from_f64(group.init_net),
                    init_output: Activation::from_f64(group.init_output),
                }
                .encode(&mut w);
            }
            UnitRole::Threshold => {
                let chain = self.topology.output_chain();
                let crit = |own: Option<f64>, net: Option<f64>| {
                    ErrorValue::from_f64(own.or(net).unwrap_or(DEF_GROUP_CRITERION))
                };
                ThresholdCore {
                    output_grp: group.roles.is_output(),
                    input_grp: group.roles.is_input(),
                    units: unit.units,
                    partitions: 1,
                    rec_test_results: self.recording.rec_test_results,
                    write_out: group.write_out,
                    last_tick_only: !self.recording.rec_outputs
                        || self.recording.rec_example_last_tick_only,
                    write_blk: group.write_blk,
                    hard_clamp_en: group.hard_clamp_en,
                    out_integr_en: group.out_integr_en,
                    out_integr_dt: FpReal::from_f64(1.0 / f64::from(self.settings.ticks_per_interval.max(1))),
                    num_out_procs: group.num_out_procs,
                    procs: group.output_funcs.map(|f| f.code()),
                    weak_clamp_strength: FpReal::from_f64(group.weak_clamp_strength),
                    init_output: Activation::from_f64(group.init_output),
                    tst_group_criterion: crit(group.params.test_group_crit, self.settings.test_group_crit),
                    trn_group_criterion: crit(group.params.train_group_crit, self.settings.train_group_crit),
                    criterion_function: group.criterion_function.code(),
                    is_first_output_group: chain.first() == Some(&group.id),
                    is_last_output_group: chain.last() == Some(&group.id),
                    error_function: group.error_function.code(),
                    crit_expected: scoreboard.crit_expected(unit),
                }
                .encode(&mut w);
            }
        }
        Ok(w.into_bytes())
    }

    /// Weight block of a Weight unit, row-major over source units.
    ///
    /// A pair with no declared link gets a zero block.
    pub fn weights_region(&self, unit: &Unit) -> Result<Vec<u8>> {
        let (from_group, from_subgroup) = weight_source(unit)?;
        let to = self.topology.group(unit.group)?;
        let from = self.topology.group(from_group)?;

        let num_rows = from.subgroup_units(from_subgroup);
        let num_cols = to.subgroup_units(unit.subgroup);
        let rb = from.subgroup_offset(from_subgroup) as usize;
        let cb = to.subgroup_offset(unit.subgroup) as usize;
        let from_units = from.units as usize;

        let weights = to.weights.get(&from_group);
        if let Some(w) = weights {
            let needed = to.units as usize * from_units;
            if w.len() < needed {
                return Err(PdpError::Payload(format!(
                    "{} holds {} weights from {}, expected {}",
                    to.label,
                    w.len(),
                    from.label,
                    needed
                )));
            }
        }

        let mut w = WireWriter::with_capacity(num_rows as usize * num_cols as usize * 4);
        let mut saturated = 0usize;
        for r in 0..num_rows as usize {
            for c in 0..num_cols as usize {
                let value = weights.map_or(0.0, |ws| ws[(cb + c) * from_units + rb + r]);
                let (encoded, sat) = WeightValue::encode(value);
                saturated += usize::from(sat);
                w.fixed(encoded);
            }
        }

        if saturated > 0 {
            tracing::warn!(
                "{}: {} weight(s) from {} saturated to the weight_t range",
                unit.id,
                saturated,
                from.label
            );
        }
        Ok(w.into_bytes())
    }
}

fn weight_source(unit: &Unit) -> Result<(GroupId, u32)> {
    match (unit.from_group, unit.from_subgroup) {
        (Some(g), Some(s)) => Ok((g, s)),
        _ => Err(PdpError::Payload(format!(
            "{} is not a Weight unit",
            unit.id
        ))),
    }
}

/// Per-event values of one subgroup as activations.
fn slice_region(group: &Group, unit: &Unit, values: &[Option<f64>]) -> Result<Vec<u8>> {
    let units = group.units as usize;
    if units == 0 || values.len() % units != 0 {
        return Err(PdpError::Payload(format!(
            "group {} holds {} values, not a multiple of {} units",
            group.label,
            values.len(),
            units
        )));
    }
    let offset = group.subgroup_offset(unit.subgroup) as usize;
    let width = unit.units as usize;

    let mut w = WireWriter::with_capacity(values.len() / units * width * 4);
    for event in values.chunks(units) {
        for value in &event[offset..offset + width] {
            w.fixed(Activation::from_option(*value));
        }
    }
    Ok(w.into_bytes())
}
