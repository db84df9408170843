// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Writer for Lens-style output files.
//!
//! ```text
//! <epoch> <example>
//! <ticks-on-example> <num-groups>
//! <tick> <event>            # "0 -1" opens every example
//! <num-units> 1             # then, per output group
//! <output> <target>         # per unit, "-" for an absent target
//! ```

use super::NetworkSettings;
use crate::core::example_set::ExampleSet;
use crate::core::placement::RecordedOutputs;
use crate::core::topology::{Group, Topology};
use crate::core::{PdpError, Result};
use pdpflow_fixed::SHORT_ACTIV_SHIFT;
use std::io::Write;

/// Write every recorded tick, grouped by epoch and example, with the
/// outputs of each output group in output-chain order.
pub fn write_lens_output<W: Write>(
    out: &mut W,
    topology: &Topology,
    examples: &ExampleSet,
    settings: &NetworkSettings,
    recorded: &RecordedOutputs,
) -> Result<()> {
    let chain = topology
        .output_chain()
        .iter()
        .map(|id| topology.group(*id))
        .collect::<Result<Vec<&Group>>>()?;
    let ticks_per_example = ticks_on_first_example(examples, settings);

    // index of each example's first event
    let mut first_event = Vec::with_capacity(examples.num_examples());
    let mut events = 0usize;
    for example in examples.examples() {
        first_event.push(events);
        events += example.events.len();
    }

    let mut current_epoch = None;
    let mut current_example = None;
    let mut event_base = 0usize;

    for (index, record) in recorded.ticks.iter().enumerate() {
        if current_epoch != Some(record.epoch) {
            current_epoch = Some(record.epoch);
            current_example = None;
        }

        if current_example != Some(record.example) {
            event_base = *first_event.get(record.example as usize).ok_or_else(|| {
                PdpError::Placement(format!(
                    "tick {} names example {}, the set holds {}",
                    index,
                    record.example,
                    first_event.len()
                ))
            })?;
            writeln!(out, "{} {}", record.epoch, record.example)?;
            writeln!(out, "{} {}", ticks_per_example, chain.len())?;
            writeln!(out, "0 -1")?;
            for group in &chain {
                writeln!(out, "{} 1", group.units)?;
                for _ in 0..group.units {
                    writeln!(out, "{:8.6} 0", 0.0)?;
                }
            }
            current_example = Some(record.example);
        }

        writeln!(out, "{} {}", record.tick, record.event)?;
        let row = event_base + record.event as usize;

        for group in &chain {
            let outputs = group_outputs(recorded, group, index)?;
            let units = group.units as usize;
            writeln!(out, "{} 1", group.units)?;
            for (u, raw) in outputs.iter().take(units).enumerate() {
                let output = f64::from(*raw) / f64::from(1u32 << SHORT_ACTIV_SHIFT);
                match group.targets.get(row * units + u).copied().flatten() {
                    Some(target) => writeln!(out, "{:8.6} {}", output, target.trunc() as i64)?,
                    None => writeln!(out, "{:8.6} -", output)?,
                }
            }
        }
    }
    Ok(())
}

/// Outputs of every subgroup of `group` at one tick, in unit order.
fn group_outputs(recorded: &RecordedOutputs, group: &Group, tick: usize) -> Result<Vec<u16>> {
    let mut outputs = Vec::with_capacity(group.units as usize);
    for subgroup in 0..group.subgroups {
        let block = recorded.subgroup(group.id, subgroup).ok_or_else(|| {
            PdpError::Placement(format!(
                "no outputs recorded for group {} subgroup {}",
                group.label, subgroup
            ))
        })?;
        outputs.extend(block.tick(tick)?);
    }
    if outputs.len() < group.units as usize {
        return Err(PdpError::Placement(format!(
            "group {} recorded {} outputs per tick, expected {}",
            group.label,
            outputs.len(),
            group.units
        )));
    }
    Ok(outputs)
}

/// Ticks the first example can run for, capped at the network's maximum.
fn ticks_on_first_example(examples: &ExampleSet, settings: &NetworkSettings) -> u32 {
    let cap = settings.global_max_ticks();
    let Some(first) = examples.examples().first() else {
        return 0;
    };
    first
        .events
        .iter()
        .map(|event| match event.max_time.or(examples.max_time) {
            Some(t) => (t.max(0.0) as u32).saturating_add(1) * settings.ticks_per_interval,
            None => cap,
        })
        .fold(0u32, |total, ticks| total.saturating_add(ticks).min(cap))
}
