// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::constants::BIAS_LABEL;
use super::functions::{InputFunction, OutputFunction};
use super::group::Group;
use super::ids::{GroupId, LinkId};
use super::link::Link;
use super::roles::{GroupRole, GroupRoles};
use crate::core::{PdpError, Result};

/// Groups, links and the output chain of a network.
///
/// The bias group is created with the topology and is always `GroupId(0)`.
#[derive(Debug, Clone)]
pub struct Topology {
    groups: Vec<Group>,
    links: Vec<Link>,
    /// OUTPUT groups in insertion order. Never re-sorted.
    output_chain: Vec<GroupId>,
    max_subgroup_units: u32,
}

impl Topology {
    pub fn new(max_subgroup_units: u32) -> Result<Self> {
        let mut topology = Self {
            groups: Vec::new(),
            links: Vec::new(),
            output_chain: Vec::new(),
            max_subgroup_units,
        };
        topology.add_group(1, GroupRole::Bias.into(), None, None, Some(BIAS_LABEL))?;
        Ok(topology)
    }

    /// Add a group. OUTPUT and HIDDEN groups are linked from the bias group.
    pub fn add_group(
        &mut self,
        units: u32,
        roles: GroupRoles,
        input_funcs: Option<&[InputFunction]>,
        output_funcs: Option<&[OutputFunction]>,
        label: Option<&str>,
    ) -> Result<GroupId> {
        let id = GroupId::new(self.groups.len());
        let label = label
            .map(str::to_string)
            .unwrap_or_else(|| format!("g{}", id));

        if self.group_by_label(&label).is_some() {
            return Err(PdpError::Configuration(format!(
                "group label '{}' already in use",
                label
            )));
        }

        let (write_blk, is_first_out) = if roles.is_output() {
            (self.output_chain.len() as u32, self.output_chain.is_empty())
        } else {
            (0, false)
        };

        let group = Group::new(
            id,
            units,
            roles,
            input_funcs,
            output_funcs,
            write_blk,
            is_first_out,
            label,
            self.max_subgroup_units,
        )?;
        self.groups.push(group);

        if roles.is_output() {
            self.output_chain.push(id);
        }

        if roles.is_output() || roles.is_hidden() {
            self.add_link(self.bias(), id, None)?;
        }

        tracing::debug!(
            "Added group {} [total: {}]",
            self.groups[id.index()].label,
            self.groups.len()
        );
        Ok(id)
    }

    /// Declare a link; the destination records the source in `links_from`.
    pub fn add_link(&mut self, from: GroupId, to: GroupId, label: Option<&str>) -> Result<LinkId> {
        let from_label = self
            .groups
            .get(from.index())
            .map(|g| g.label.clone())
            .ok_or_else(|| PdpError::Topology(format!("link source group {} not found", from)))?;
        let to_group = self
            .groups
            .get_mut(to.index())
            .ok_or_else(|| PdpError::Topology(format!("link destination group {} not found", to)))?;

        if to_group.links_from.contains(&from) {
            return Err(PdpError::Topology(format!(
                "link {}-{} already declared",
                from_label, to_group.label
            )));
        }

        let label = label
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-{}", from_label, to_group.label));
        to_group.links_from.push(from);

        let id = LinkId::new(self.links.len());
        self.links.push(Link::new(id, from, to, label));
        Ok(id)
    }

    pub fn bias(&self) -> GroupId {
        GroupId::new(0)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn output_chain(&self) -> &[GroupId] {
        &self.output_chain
    }

    pub fn max_subgroup_units(&self) -> u32 {
        self.max_subgroup_units
    }

    pub fn group(&self, id: GroupId) -> Result<&Group> {
        self.groups
            .get(id.index())
            .ok_or_else(|| PdpError::NotFound(format!("group {}", id)))
    }

    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut Group> {
        self.groups
            .get_mut(id.index())
            .ok_or_else(|| PdpError::NotFound(format!("group {}", id)))
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut Group> {
        self.groups.iter_mut()
    }

    pub fn group_by_label(&self, label: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn input_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| g.roles.is_input())
    }

    pub fn output_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| g.roles.is_output())
    }

    pub fn total_subgroups(&self) -> u32 {
        self.groups.iter().map(|g| g.subgroups).sum()
    }

    /// Number of weights a weights file must supply for this topology.
    pub fn expected_link_count(&self) -> u64 {
        self.groups
            .iter()
            .map(|to| {
                to.links_from
                    .iter()
                    .map(|from| to.units as u64 * self.groups[from.index()].units as u64)
                    .sum::<u64>()
            })
            .sum()
    }

    /// Groups larger than `max_group_units`.
    pub fn oversized_groups(&self, max_group_units: u32) -> Vec<&Group> {
        self.groups
            .iter()
            .filter(|g| g.units > max_group_units)
            .collect()
    }
}
