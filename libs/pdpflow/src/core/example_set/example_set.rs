// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::records::{EventRecord, ExampleRecord, SetRecord};
use crate::core::topology::{GroupId, Topology, DEF_EXAMPLE_FREQ};
use crate::core::{PdpError, Result};
use pdpflow_fixed::{FixedValue, FpReal};
use std::collections::HashMap;
use std::path::Path;

/// Values carried by one input or target list of an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValues {
    /// One value per unit; `None` is an absent value.
    Dense(Vec<Option<f64>>),
    /// Listed units take `value`, every other unit the event default.
    Sparse { active: Vec<u32>, value: f64 },
}

/// An input or target list, optionally scoped to a named group.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList {
    pub group: Option<String>,
    pub values: EventValues,
}

impl ValueList {
    pub fn dense(group: Option<&str>, values: Vec<Option<f64>>) -> Self {
        Self {
            group: group.map(str::to_string),
            values: EventValues::Dense(values),
        }
    }

    pub fn sparse(group: Option<&str>, active: Vec<u32>, value: f64) -> Self {
        Self {
            group: group.map(str::to_string),
            values: EventValues::Sparse { active, value },
        }
    }

    fn expand(&self, units: u32, default: Option<f64>, label: &str) -> Result<Vec<Option<f64>>> {
        match &self.values {
            EventValues::Dense(values) => {
                if values.len() != units as usize {
                    return Err(PdpError::Example(format!(
                        "group '{}' has {} units but the event lists {} values",
                        label,
                        units,
                        values.len()
                    )));
                }
                Ok(values.clone())
            }
            EventValues::Sparse { active, value } => {
                let mut out = vec![default; units as usize];
                for &unit in active {
                    let slot = out.get_mut(unit as usize).ok_or_else(|| {
                        PdpError::Example(format!(
                            "unit {} out of range for group '{}' ({} units)",
                            unit, label, units
                        ))
                    })?;
                    *slot = Some(*value);
                }
                Ok(out)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub max_time: Option<f64>,
    pub min_time: Option<f64>,
    pub grace_time: Option<f64>,
    pub def_input: Option<f64>,
    pub def_target: Option<f64>,
    pub inputs: Vec<ValueList>,
    pub targets: Vec<ValueList>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, list: ValueList) -> Self {
        self.inputs.push(list);
        self
    }

    pub fn with_target(mut self, list: ValueList) -> Self {
        self.targets.push(list);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    pub name: Option<String>,
    pub freq: Option<f64>,
    pub events: Vec<Event>,
}

impl Example {
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}

/// Output of [`ExampleSet::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExamples {
    pub set: SetRecord,
    pub examples: Vec<ExampleRecord>,
    pub events: Vec<EventRecord>,
}

impl CompiledExamples {
    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }
}

/// An ordered collection of examples plus set-level defaults.
#[derive(Debug, Clone, Default)]
pub struct ExampleSet {
    pub label: String,
    pub max_time: Option<f64>,
    pub min_time: Option<f64>,
    pub grace_time: Option<f64>,
    pub def_input: Option<f64>,
    pub def_target: Option<f64>,
    /// Value of listed units in sparse input lists.
    pub active_input: Option<f64>,
    /// Value of listed units in sparse target lists.
    pub active_target: Option<f64>,
    examples: Vec<Example>,
    examples_loaded: bool,
    compiled: Option<CompiledExamples>,
}

impl ExampleSet {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn set_times(&mut self, max_time: Option<f64>, min_time: Option<f64>, grace_time: Option<f64>) {
        if let Some(t) = max_time {
            self.max_time = Some(t);
        }
        if let Some(t) = min_time {
            self.min_time = Some(t);
        }
        if let Some(t) = grace_time {
            self.grace_time = Some(t);
        }
        self.compiled = None;
    }

    /// Append an example; the set counts as loaded from then on.
    pub fn add_example(&mut self, example: Example) {
        self.examples.push(example);
        self.examples_loaded = true;
        self.compiled = None;
    }

    /// Read a Lens-format examples file, appending its examples and
    /// overriding set defaults found in its header.
    pub fn read_lens_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PdpError::Example(format!("cannot open examples file {}: {}", path.display(), e))
        })?;
        let count = self.load_lens_str(&content)?;
        tracing::info!(
            "Read {} examples from {} into set '{}'",
            count,
            path.display(),
            self.label
        );
        Ok(count)
    }

    /// Parse Lens-format example text into this set.
    pub fn load_lens_str(&mut self, content: &str) -> Result<usize> {
        let parsed = super::lens_examples::parse_lens_examples(content)?;
        let count = parsed.examples.len();

        let header = parsed.header;
        self.max_time = header.max_time.or(self.max_time);
        self.min_time = header.min_time.or(self.min_time);
        self.grace_time = header.grace_time.or(self.grace_time);
        self.def_input = header.def_input.or(self.def_input);
        self.def_target = header.def_target.or(self.def_target);
        self.active_input = header.active_input.or(self.active_input);
        self.active_target = header.active_target.or(self.active_target);

        self.examples.extend(parsed.examples);
        self.examples_loaded = true;
        self.compiled = None;
        Ok(count)
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn examples_loaded(&self) -> bool {
        self.examples_loaded
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn compiled(&self) -> Option<&CompiledExamples> {
        self.compiled.as_ref()
    }

    /// Drop compiled output, e.g. after the topology changed.
    pub fn invalidate(&mut self) {
        self.compiled = None;
    }

    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    /// Bind every event's values to the topology's INPUT and OUTPUT groups
    /// and produce the summary records.
    ///
    /// Unnamed lists bind only when exactly one INPUT (or OUTPUT) group
    /// exists. Groups an event does not mention receive the event default.
    /// Group arrays are replaced only when the whole set compiles. A set
    /// that already compiled returns its example count unchanged.
    pub fn compile(&mut self, topology: &mut Topology) -> Result<usize> {
        if let Some(compiled) = &self.compiled {
            return Ok(compiled.num_examples());
        }

        tracing::info!("Compiling example set '{}'", self.label);

        let input_groups: Vec<(GroupId, String, u32)> = topology
            .input_groups()
            .map(|g| (g.id, g.label.clone(), g.units))
            .collect();
        let output_groups: Vec<(GroupId, String, u32)> = topology
            .output_groups()
            .map(|g| (g.id, g.label.clone(), g.units))
            .collect();

        let mut inputs: HashMap<GroupId, Vec<Option<f64>>> =
            input_groups.iter().map(|(id, _, _)| (*id, Vec::new())).collect();
        let mut targets: HashMap<GroupId, Vec<Option<f64>>> =
            output_groups.iter().map(|(id, _, _)| (*id, Vec::new())).collect();

        let mut example_records = Vec::with_capacity(self.examples.len());
        let mut event_records = Vec::new();

        for (n, example) in self.examples.iter().enumerate() {
            example_records.push(ExampleRecord {
                num: n as u32,
                num_events: example.events.len() as u32,
                ev_idx: event_records.len() as u32,
                freq: FpReal::from_f64(example.freq.unwrap_or(DEF_EXAMPLE_FREQ)),
            });

            for event in &example.events {
                event_records.push(EventRecord {
                    max_time: FpReal::from_option(event.max_time),
                    min_time: FpReal::from_option(event.min_time),
                    grace_time: FpReal::from_option(event.grace_time),
                    it_idx: event_records.len() as u32,
                });

                let def_input = event.def_input.or(self.def_input);
                let def_target = event.def_target.or(self.def_target);

                bind_lists(&event.inputs, &input_groups, def_input, &mut inputs, "input")?;
                bind_lists(&event.targets, &output_groups, def_target, &mut targets, "target")?;
            }
        }

        for group in topology.groups_mut() {
            if let Some(values) = inputs.remove(&group.id) {
                group.inputs = values;
            }
            if let Some(values) = targets.remove(&group.id) {
                group.targets = values;
            }
        }

        let compiled = CompiledExamples {
            set: SetRecord {
                num_examples: self.examples.len() as u32,
                max_time: FpReal::from_option(self.max_time),
                min_time: FpReal::from_option(self.min_time),
                grace_time: FpReal::from_option(self.grace_time),
            },
            examples: example_records,
            events: event_records,
        };
        let count = compiled.num_examples();

        tracing::debug!(
            "Compiled {} examples ({} events)",
            count,
            compiled.events.len()
        );
        self.compiled = Some(compiled);
        Ok(count)
    }
}

/// Append one event's values for every group of a role.
fn bind_lists(
    lists: &[ValueList],
    groups: &[(GroupId, String, u32)],
    default: Option<f64>,
    arrays: &mut HashMap<GroupId, Vec<Option<f64>>>,
    kind: &str,
) -> Result<()> {
    let mut done: Vec<GroupId> = Vec::new();

    for list in lists {
        let (id, label, units) = match &list.group {
            None => match groups {
                [only] => only,
                _ => {
                    return Err(PdpError::Example(format!(
                        "unnamed {} list needs exactly one {} group, network has {}",
                        kind,
                        kind,
                        groups.len()
                    )));
                }
            },
            Some(name) => groups
                .iter()
                .find(|(_, label, _)| label == name)
                .ok_or_else(|| {
                    PdpError::Example(format!("no {} group named '{}'", kind, name))
                })?,
        };

        if done.contains(id) {
            return Err(PdpError::Example(format!(
                "{} group '{}' listed twice in one event",
                kind, label
            )));
        }

        let values = list.expand(*units, default, label)?;
        arrays.entry(*id).or_default().extend(values);
        done.push(*id);
    }

    for (id, _, units) in groups {
        if !done.contains(id) {
            arrays
                .entry(*id)
                .or_default()
                .extend(std::iter::repeat_n(default, *units as usize));
        }
    }
    Ok(())
}
