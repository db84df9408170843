// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::graph::{LinkCategory, Unit, UnitRole};
use crate::core::partition::{PartitionPlan, SubgroupRef};

/// Counts a Sum node writes into its core region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SumExpectations {
    pub fwd: u32,
    pub bkp: u32,
    /// Link-delta packets, not senders: leaves send one per unit.
    pub lds_packets: u32,
    pub fsgn: u32,
    pub bsgn: u32,
}

/// Expected-sender calculator over one partition plan.
#[derive(Debug, Clone, Copy)]
pub struct Scoreboard<'a> {
    plan: &'a PartitionPlan,
}

impl<'a> Scoreboard<'a> {
    pub fn new(plan: &'a PartitionPlan) -> Self {
        Self { plan }
    }

    fn subgroup_of(&self, unit: &Unit) -> Option<SubgroupRef> {
        self.plan.subgroup(unit.group, unit.subgroup).copied()
    }

    fn has_stop_chain(&self) -> bool {
        self.plan.last_output().is_some()
    }

    /// Distinct senders `unit` must hear from in `category`.
    pub fn expected_senders(&self, unit: &Unit, category: LinkCategory) -> u32 {
        let stop = u32::from(self.has_stop_chain());
        match unit.role {
            UnitRole::Weight => match category {
                LinkCategory::Forward | LinkCategory::Backprop | LinkCategory::LinkDeltaSum => 1,
                LinkCategory::SyncGen => {
                    if unit.is_self_pair() {
                        1
                    } else {
                        2
                    }
                }
                LinkCategory::Stop => stop,
            },
            UnitRole::Sum => {
                let node = unit.tree_node.unwrap_or(0);
                let tree = self.plan.tree();
                let inputs = tree.child_count(node) + tree.leaf_count(node);
                match category {
                    LinkCategory::Forward | LinkCategory::Backprop => inputs,
                    LinkCategory::LinkDeltaSum | LinkCategory::SyncGen => {
                        inputs + self.siblings(unit)
                    }
                    LinkCategory::Stop => stop,
                }
            }
            UnitRole::Input => match category {
                LinkCategory::Forward | LinkCategory::Backprop => 1,
                LinkCategory::LinkDeltaSum | LinkCategory::SyncGen => 0,
                LinkCategory::Stop => stop,
            },
            UnitRole::Threshold => match category {
                LinkCategory::Forward | LinkCategory::Backprop => 1,
                LinkCategory::LinkDeltaSum | LinkCategory::SyncGen => 0,
                LinkCategory::Stop => {
                    let Some(sg) = self.subgroup_of(unit) else {
                        return 0;
                    };
                    let broadcast = u32::from(self.has_stop_chain() && !self.plan.is_last_output(&sg));
                    self.crit_expected(unit) + broadcast
                }
            },
        }
    }

    /// Messages `unit` must receive in `category`. Equals the sender count
    /// except for link-delta traffic into Sum nodes, where each Weight leaf
    /// sends one packet per unit.
    pub fn expected_packets(&self, unit: &Unit, category: LinkCategory) -> u32 {
        if unit.role == UnitRole::Sum && category == LinkCategory::LinkDeltaSum {
            return self.sum_expectations(unit).lds_packets;
        }
        self.expected_senders(unit, category)
    }

    /// Sibling partials arriving at a tree root.
    fn siblings(&self, unit: &Unit) -> u32 {
        if unit.role != UnitRole::Sum || unit.tree_node != Some(0) {
            return 0;
        }
        self.subgroup_of(unit)
            .map(|sg| self.plan.sibling_count(&sg))
            .unwrap_or(0)
    }

    pub fn sum_expectations(&self, unit: &Unit) -> SumExpectations {
        let node = unit.tree_node.unwrap_or(0);
        let tree = self.plan.tree();
        let children = tree.child_count(node);
        let leaves = tree.leaf_count(node);
        let bsgn = self.siblings(unit);
        let fwd = self.expected_senders(unit, LinkCategory::Forward);

        SumExpectations {
            fwd,
            bkp: self.expected_senders(unit, LinkCategory::Backprop),
            lds_packets: leaves * unit.units + children + bsgn,
            fsgn: fwd + bsgn,
            bsgn,
        }
    }

    /// Weight-unit counts in core-region order: fwd, bkp, lds, fsg, stp.
    pub fn weight_expectations(&self, unit: &Unit) -> [u32; 5] {
        [
            LinkCategory::Forward,
            LinkCategory::Backprop,
            LinkCategory::LinkDeltaSum,
            LinkCategory::SyncGen,
            LinkCategory::Stop,
        ]
        .map(|c| self.expected_senders(unit, c))
    }

    /// Partial convergence decisions a Threshold waits for from its chain
    /// predecessor.
    pub fn crit_expected(&self, unit: &Unit) -> u32 {
        if unit.role != UnitRole::Threshold {
            return 0;
        }
        self.subgroup_of(unit)
            .and_then(|sg| self.plan.chain_predecessor(&sg))
            .map_or(0, |_| 1)
    }
}
