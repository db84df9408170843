// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::tree_layout::TreeLayout;
use crate::core::config::Limits;
use crate::core::topology::{GroupId, Topology};
use crate::core::{PdpError, Result};
use serde::Serialize;

/// One capacity-bounded partition of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubgroupRef {
    pub group: GroupId,
    pub subgroup: u32,
    pub units: u32,
    /// Position among all subgroups of the network; also the leaf index
    /// this subgroup occupies in every reduction tree.
    pub index: u32,
}

/// Subgroup decomposition of a topology, plus everything the unit factory,
/// the wiring and the scoreboard derive from it.
#[derive(Debug, Clone)]
pub struct PartitionPlan {
    subgroups: Vec<SubgroupRef>,
    /// Index of each group's first subgroup in `subgroups`.
    group_start: Vec<u32>,
    group_count: Vec<u32>,
    output_chain: Vec<GroupId>,
    tree: TreeLayout,
}

impl PartitionPlan {
    pub fn new(topology: &Topology, limits: &Limits) -> Result<Self> {
        limits.validate()?;

        if let Some(group) = topology.oversized_groups(limits.max_group_units).first() {
            return Err(PdpError::Configuration(format!(
                "group '{}' has {} units, at most {} allowed",
                group.label, group.units, limits.max_group_units
            )));
        }

        let mut subgroups = Vec::new();
        let mut group_start = Vec::with_capacity(topology.groups().len());
        let mut group_count = Vec::with_capacity(topology.groups().len());

        for group in topology.groups() {
            group_start.push(subgroups.len() as u32);
            group_count.push(group.subgroups);
            for (s, units) in group.subunits.iter().enumerate() {
                subgroups.push(SubgroupRef {
                    group: group.id,
                    subgroup: s as u32,
                    units: *units,
                    index: subgroups.len() as u32,
                });
            }
        }

        let tree = TreeLayout::new(subgroups.len() as u32, limits.max_sum_links);

        tracing::debug!(
            "Partitioned {} groups into {} subgroups ({} tree node{} each)",
            group_count.len(),
            subgroups.len(),
            tree.nodes(),
            if tree.nodes() == 1 { "" } else { "s" }
        );

        Ok(Self {
            subgroups,
            group_start,
            group_count,
            output_chain: topology.output_chain().to_vec(),
            tree,
        })
    }

    pub fn subgroups(&self) -> &[SubgroupRef] {
        &self.subgroups
    }

    /// Total subgroups in the network.
    pub fn total(&self) -> u32 {
        self.subgroups.len() as u32
    }

    pub fn num_groups(&self) -> u32 {
        self.group_count.len() as u32
    }

    pub fn group_subgroups(&self, group: GroupId) -> u32 {
        self.group_count.get(group.index()).copied().unwrap_or(0)
    }

    pub fn subgroup(&self, group: GroupId, subgroup: u32) -> Option<&SubgroupRef> {
        if subgroup >= self.group_subgroups(group) {
            return None;
        }
        let start = self.group_start.get(group.index())?;
        self.subgroups.get((start + subgroup) as usize)
    }

    pub fn subgroups_of(&self, group: GroupId) -> &[SubgroupRef] {
        let start = self.group_start.get(group.index()).copied().unwrap_or(0) as usize;
        let count = self.group_subgroups(group) as usize;
        &self.subgroups[start..start + count]
    }

    /// The group holding the global reduction root.
    pub fn first_group(&self) -> GroupId {
        GroupId::new(0)
    }

    pub fn tree(&self) -> &TreeLayout {
        &self.tree
    }

    pub fn output_chain(&self) -> &[GroupId] {
        &self.output_chain
    }

    /// Every (to, from) subgroup pair that gets a Weight unit, in
    /// to-major order.
    pub fn weight_pairs(&self) -> impl Iterator<Item = (SubgroupRef, SubgroupRef)> + '_ {
        self.subgroups
            .iter()
            .flat_map(move |to| self.subgroups.iter().map(move |from| (*to, *from)))
    }

    /// Threshold chain through every output subgroup, in chain order.
    pub fn stop_chain(&self) -> Vec<SubgroupRef> {
        self.output_chain
            .iter()
            .flat_map(|g| self.subgroups_of(*g).iter().copied())
            .collect()
    }

    /// Last subgroup of the last output group; the stop broadcaster.
    pub fn last_output(&self) -> Option<SubgroupRef> {
        let group = *self.output_chain.last()?;
        self.subgroups_of(group).last().copied()
    }

    pub fn is_last_output(&self, sg: &SubgroupRef) -> bool {
        self.last_output().as_ref() == Some(sg)
    }

    /// Threshold that feeds this one in the stop chain.
    pub fn chain_predecessor(&self, sg: &SubgroupRef) -> Option<SubgroupRef> {
        let chain = self.stop_chain();
        let pos = chain.iter().position(|c| c == sg)?;
        pos.checked_sub(1).map(|p| chain[p])
    }

    pub fn chain_successor(&self, sg: &SubgroupRef) -> Option<SubgroupRef> {
        let chain = self.stop_chain();
        let pos = chain.iter().position(|c| c == sg)?;
        chain.get(pos + 1).copied()
    }

    /// Sibling partials the root of this subgroup's tree receives: one per
    /// other subgroup of the group, plus one per other group when this is
    /// subgroup 0 of the first group.
    pub fn sibling_count(&self, sg: &SubgroupRef) -> u32 {
        if sg.subgroup != 0 {
            return 0;
        }
        let mut siblings = self.group_subgroups(sg.group) - 1;
        if sg.group == self.first_group() {
            siblings += self.num_groups() - 1;
        }
        siblings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::GroupRole;

    fn limits(max_subgroup_units: u32) -> Limits {
        Limits {
            max_subgroup_units,
            ..Default::default()
        }
    }

    #[test]
    fn test_enumerates_subgroups_in_group_order() {
        let mut t = Topology::new(4).unwrap();
        let i = t
            .add_group(6, GroupRole::Input.into(), None, None, Some("in"))
            .unwrap();
        let o = t
            .add_group(9, GroupRole::Output.into(), None, None, Some("out"))
            .unwrap();
        let plan = PartitionPlan::new(&t, &limits(4)).unwrap();

        assert_eq!(plan.total(), 1 + 2 + 3);
        assert_eq!(plan.group_subgroups(i), 2);
        assert_eq!(plan.subgroup(o, 2).unwrap().units, 1);
        assert_eq!(plan.subgroup(o, 2).unwrap().index, 5);
        assert!(plan.subgroup(o, 3).is_none());
        assert_eq!(plan.weight_pairs().count(), 36);
        assert_eq!(plan.tree().leaves(), 6);
    }

    #[test]
    fn test_oversized_group_rejected() {
        let mut t = Topology::new(32).unwrap();
        t.add_group(200, GroupRole::Hidden.into(), None, None, None)
            .unwrap();
        assert!(matches!(
            PartitionPlan::new(&t, &Limits::default()),
            Err(PdpError::Configuration(_))
        ));
    }

    #[test]
    fn test_stop_chain_order() {
        let mut t = Topology::new(2).unwrap();
        let a = t
            .add_group(3, GroupRole::Output.into(), None, None, Some("a"))
            .unwrap();
        let b = t
            .add_group(1, GroupRole::Output.into(), None, None, Some("b"))
            .unwrap();
        let plan = PartitionPlan::new(&t, &limits(2)).unwrap();

        let chain: Vec<_> = plan
            .stop_chain()
            .iter()
            .map(|s| (s.group, s.subgroup))
            .collect();
        assert_eq!(chain, vec![(a, 0), (a, 1), (b, 0)]);

        let a1 = *plan.subgroup(a, 1).unwrap();
        let b0 = *plan.subgroup(b, 0).unwrap();
        assert_eq!(plan.chain_successor(&a1), Some(b0));
        assert_eq!(plan.chain_predecessor(&b0), Some(a1));
        assert!(plan.is_last_output(&b0));
        assert!(plan.chain_predecessor(plan.subgroup(a, 0).unwrap()).is_none());
    }

    #[test]
    fn test_sibling_counts() {
        let mut t = Topology::new(2).unwrap();
        let h = t
            .add_group(5, GroupRole::Hidden.into(), None, None, Some("h"))
            .unwrap();
        let plan = PartitionPlan::new(&t, &limits(2)).unwrap();

        let bias = *plan.subgroup(t.bias(), 0).unwrap();
        assert_eq!(plan.sibling_count(&bias), 1);
        assert_eq!(plan.sibling_count(plan.subgroup(h, 0).unwrap()), 2);
        assert_eq!(plan.sibling_count(plan.subgroup(h, 1).unwrap()), 0);
    }
}
