// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::constants::*;
use super::functions::{ErrorFunction, InputFunction, OutputFunction, StopCriterion};
use super::ids::GroupId;
use super::roles::GroupRoles;
use crate::core::{PdpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-group overrides of network-wide learning and convergence parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupParams {
    pub learning_rate: Option<f64>,
    pub weight_decay: Option<f64>,
    pub momentum: Option<f64>,
    pub train_group_crit: Option<f64>,
    pub test_group_crit: Option<f64>,
}

/// A layer of the network.
///
/// All role-dependent defaults (clamping, integrators, convergence and error
/// functions) are derived once, here, from the role set.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    pub label: String,
    pub units: u32,
    pub roles: GroupRoles,

    pub input_funcs: [InputFunction; MAX_IN_PROCS],
    pub num_in_procs: u32,
    pub in_integr_en: bool,
    pub soft_clamp_strength: f64,

    pub output_funcs: [OutputFunction; MAX_OUT_PROCS],
    pub num_out_procs: u32,
    pub out_integr_en: bool,
    pub hard_clamp_en: bool,
    pub weak_clamp_strength: f64,

    pub criterion_function: StopCriterion,
    pub error_function: ErrorFunction,
    pub params: GroupParams,

    pub init_net: f64,
    pub init_output: f64,

    pub write_out: bool,
    pub write_blk: u32,
    pub is_first_out: bool,

    /// Number of capacity-bounded partitions.
    pub subgroups: u32,
    /// Units in each subgroup; only the last may be short.
    pub subunits: Vec<u32>,

    /// Predecessor groups, in link declaration order.
    pub links_from: Vec<GroupId>,
    /// Incoming weights per predecessor, column-major
    /// (`w[to_unit * from_units + from_unit]`).
    pub weights: HashMap<GroupId, Vec<f64>>,
    /// Dense per-event input values, `units` per event.
    pub inputs: Vec<Option<f64>>,
    /// Dense per-event target values, `units` per event.
    pub targets: Vec<Option<f64>>,
}

impl Group {
    pub fn new(
        id: GroupId,
        units: u32,
        roles: GroupRoles,
        input_funcs: Option<&[InputFunction]>,
        output_funcs: Option<&[OutputFunction]>,
        write_blk: u32,
        is_first_out: bool,
        label: String,
        max_subgroup_units: u32,
    ) -> Result<Self> {
        if units == 0 {
            return Err(PdpError::Configuration(format!(
                "group '{}' must have at least one unit",
                label
            )));
        }
        if roles.is_empty() {
            return Err(PdpError::Configuration(format!(
                "group '{}' has no role",
                label
            )));
        }
        if max_subgroup_units == 0 {
            return Err(PdpError::Configuration(
                "max_subgroup_units must be at least 1".into(),
            ));
        }

        let (in_list, num_in_procs) = pad_funcs::<MAX_IN_PROCS, _>(
            input_funcs.unwrap_or(&[]),
            InputFunction::None,
            &label,
            "input",
        )?;
        let in_integr_en = in_list.contains(&InputFunction::Integrator);

        let (mut out_list, mut num_out_procs) = match output_funcs {
            Some(funcs) => pad_funcs::<MAX_OUT_PROCS, _>(funcs, OutputFunction::None, &label, "output")?,
            None if roles.is_output() && !in_integr_en => pad_funcs::<MAX_OUT_PROCS, _>(
                &[OutputFunction::Logistic, OutputFunction::Integrator],
                OutputFunction::None,
                &label,
                "output",
            )?,
            None => pad_funcs::<MAX_OUT_PROCS, _>(
                &[OutputFunction::Logistic],
                OutputFunction::None,
                &label,
                "output",
            )?,
        };
        let mut out_integr_en = out_list.contains(&OutputFunction::Integrator);

        let mut hard_clamp_en = false;
        let mut init_output = DEF_INIT_OUTPUT;
        let mut criterion_function = StopCriterion::None;
        let mut error_function = ErrorFunction::None;

        if roles.is_bias() {
            out_list = single(OutputFunction::Bias);
            num_out_procs = 1;
            out_integr_en = false;
            init_output = BIAS_INIT_OUTPUT;
        } else {
            if roles.is_input() && !roles.is_output() {
                out_list = single(OutputFunction::HardClamp);
                num_out_procs = 1;
                out_integr_en = false;
                hard_clamp_en = true;
            }
            if roles.is_output() {
                criterion_function = StopCriterion::Standard;
                error_function = ErrorFunction::CrossEntropy;
            }
        }

        let subgroups = units.div_ceil(max_subgroup_units);
        let mut subunits = vec![max_subgroup_units; subgroups as usize - 1];
        subunits.push(units - max_subgroup_units * (subgroups - 1));

        tracing::debug!(
            "Creating group '{}' ({} units, {} subgroup{})",
            label,
            units,
            subgroups,
            if subgroups == 1 { "" } else { "s" }
        );

        Ok(Self {
            id,
            label,
            units,
            roles,
            input_funcs: in_list,
            num_in_procs,
            in_integr_en,
            soft_clamp_strength: DEF_SOFT_CLAMP,
            output_funcs: out_list,
            num_out_procs,
            out_integr_en,
            hard_clamp_en,
            weak_clamp_strength: DEF_WEAK_CLAMP,
            criterion_function,
            error_function,
            params: GroupParams::default(),
            init_net: DEF_INIT_NET,
            init_output,
            write_out: roles.is_output(),
            write_blk,
            is_first_out,
            subgroups,
            subunits,
            links_from: Vec::new(),
            weights: HashMap::new(),
            inputs: Vec::new(),
            targets: Vec::new(),
        })
    }

    /// First unit index of a subgroup within the group.
    pub fn subgroup_offset(&self, subgroup: u32) -> u32 {
        self.subunits.iter().take(subgroup as usize).sum()
    }

    /// Unit count of a subgroup, zero if out of range.
    pub fn subgroup_units(&self, subgroup: u32) -> u32 {
        self.subunits.get(subgroup as usize).copied().unwrap_or(0)
    }

    pub fn is_linked_from(&self, from: GroupId) -> bool {
        self.links_from.contains(&from)
    }
}

fn single(first: OutputFunction) -> [OutputFunction; MAX_OUT_PROCS] {
    let mut list = [OutputFunction::None; MAX_OUT_PROCS];
    list[0] = first;
    list
}

fn pad_funcs<const N: usize, F: Copy>(
    funcs: &[F],
    none: F,
    label: &str,
    stage: &str,
) -> Result<([F; N], u32)> {
    if funcs.len() > N {
        return Err(PdpError::Configuration(format!(
            "group '{}' lists {} {} functions, at most {} allowed",
            label,
            funcs.len(),
            stage,
            N
        )));
    }
    let mut list = [none; N];
    list[..funcs.len()].copy_from_slice(funcs);
    Ok((list, funcs.len() as u32))
}
