// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Edges between units, one function per concern.
//!
//! For Weight `W(g,s <- fg,fs)`, `leaf(x)` is the Sum node of a tree that
//! receives leaf index `x`:
//!
//! ```text
//! fwd  T(fg,fs) -> W -> S(g,s).leaf(fg,fs)
//! bkp  I(g,s)   -> W -> S(fg,fs).leaf(g,s)
//! lds  W -> S(g,s).leaf(fg,fs)        global root -> W
//! fsg  W -> S(g,s).leaf(fg,fs)        root(g,s), root(fg,fs) -> W
//! stp  last output T -> W
//! ```

use crate::core::graph::{LinkCategory, MachineGraph, UnitId};
use crate::core::partition::{PartitionPlan, SubgroupRef};
use crate::core::Result;

pub(super) struct Wiring<'a> {
    plan: &'a PartitionPlan,
    graph: &'a mut MachineGraph,
    edges: usize,
}

impl<'a> Wiring<'a> {
    pub(super) fn new(plan: &'a PartitionPlan, graph: &'a mut MachineGraph) -> Self {
        Self {
            plan,
            graph,
            edges: 0,
        }
    }

    /// Wire everything, returning the number of edges added.
    pub(super) fn wire_all(mut self) -> Result<usize> {
        self.wire_weights()?;
        self.wire_subgroups()?;
        self.wire_trees()?;
        self.wire_sibling_roots()?;
        self.wire_stop_chain()?;
        self.wire_stop_broadcast()?;
        Ok(self.edges)
    }

    fn connect(&mut self, from: &UnitId, to: &UnitId, category: LinkCategory, packets: u32) -> Result<()> {
        if self.graph.add_edge(from, to, category, packets)? {
            self.edges += 1;
        }
        Ok(())
    }

    fn root(sg: &SubgroupRef) -> UnitId {
        UnitId::sum(sg.group, sg.subgroup, 0)
    }

    fn leaf(&self, tree: &SubgroupRef, leaf: &SubgroupRef) -> UnitId {
        let node = self.plan.tree().leaf_node(leaf.index);
        UnitId::sum(tree.group, tree.subgroup, node)
    }

    fn global_root(&self) -> Option<UnitId> {
        self.plan
            .subgroup(self.plan.first_group(), 0)
            .map(Self::root)
    }

    fn wire_weights(&mut self) -> Result<()> {
        let global_root = self.global_root();
        let pairs: Vec<_> = self.plan.weight_pairs().collect();

        for (to, from) in &pairs {
            let w = UnitId::weight(to.group, to.subgroup, from.group, from.subgroup);
            let own_leaf = self.leaf(to, from);
            let back_leaf = self.leaf(from, to);

            self.connect(&UnitId::threshold(from.group, from.subgroup), &w, LinkCategory::Forward, 1)?;
            self.connect(&w, &own_leaf, LinkCategory::Forward, 1)?;

            self.connect(&UnitId::input(to.group, to.subgroup), &w, LinkCategory::Backprop, 1)?;
            self.connect(&w, &back_leaf, LinkCategory::Backprop, 1)?;

            self.connect(&w, &own_leaf, LinkCategory::LinkDeltaSum, to.units)?;
            if let Some(root) = &global_root {
                self.connect(root, &w, LinkCategory::LinkDeltaSum, 1)?;
            }

            self.connect(&w, &own_leaf, LinkCategory::SyncGen, 1)?;
            self.connect(&Self::root(to), &w, LinkCategory::SyncGen, 1)?;
            self.connect(&Self::root(from), &w, LinkCategory::SyncGen, 1)?;
        }

        tracing::debug!("Wired {} weight units", pairs.len());
        Ok(())
    }

    /// Sum -> Input -> Threshold forward, Threshold -> Input and Sum ->
    /// Threshold backward.
    fn wire_subgroups(&mut self) -> Result<()> {
        let plan = self.plan;
        for sg in plan.subgroups() {
            let s = Self::root(sg);
            let i = UnitId::input(sg.group, sg.subgroup);
            let t = UnitId::threshold(sg.group, sg.subgroup);

            self.connect(&s, &i, LinkCategory::Forward, 1)?;
            self.connect(&i, &t, LinkCategory::Forward, 1)?;
            self.connect(&t, &i, LinkCategory::Backprop, 1)?;
            self.connect(&s, &t, LinkCategory::Backprop, 1)?;
        }
        Ok(())
    }

    /// Internal tree nodes forward every summed category to their parent.
    fn wire_trees(&mut self) -> Result<()> {
        let plan = self.plan;
        let tree = plan.tree();
        for sg in plan.subgroups() {
            for node in 1..tree.nodes() {
                let Some(parent) = tree.parent(node) else {
                    continue;
                };
                let child = UnitId::sum(sg.group, sg.subgroup, node);
                let parent = UnitId::sum(sg.group, sg.subgroup, parent);
                for category in [
                    LinkCategory::Forward,
                    LinkCategory::Backprop,
                    LinkCategory::LinkDeltaSum,
                    LinkCategory::SyncGen,
                ] {
                    self.connect(&child, &parent, category, 1)?;
                }
            }
        }
        Ok(())
    }

    /// Roots of later subgroups report to subgroup 0 of their group, and
    /// subgroup 0 of every other group reports to the global root.
    fn wire_sibling_roots(&mut self) -> Result<()> {
        let plan = self.plan;
        let first = plan.first_group();
        let Some(global_root) = self.global_root() else {
            return Ok(());
        };

        for sg in plan.subgroups() {
            let target = if sg.subgroup != 0 {
                UnitId::sum(sg.group, 0, 0)
            } else if sg.group != first {
                global_root.clone()
            } else {
                continue;
            };
            let root = Self::root(sg);
            self.connect(&root, &target, LinkCategory::LinkDeltaSum, 1)?;
            self.connect(&root, &target, LinkCategory::SyncGen, 1)?;
        }
        Ok(())
    }

    /// Threshold daisy chain through every output subgroup in chain order.
    fn wire_stop_chain(&mut self) -> Result<()> {
        let chain = self.plan.stop_chain();
        for pair in chain.windows(2) {
            self.connect(
                &UnitId::threshold(pair[0].group, pair[0].subgroup),
                &UnitId::threshold(pair[1].group, pair[1].subgroup),
                LinkCategory::Stop,
                1,
            )?;
        }
        tracing::debug!("Stop chain spans {} threshold units", chain.len());
        Ok(())
    }

    /// The last output Threshold tells every other unit to stop.
    fn wire_stop_broadcast(&mut self) -> Result<()> {
        let Some(last) = self.plan.last_output() else {
            tracing::debug!("No output groups, skipping stop broadcast");
            return Ok(());
        };
        let source = UnitId::threshold(last.group, last.subgroup);
        let targets: Vec<UnitId> = self
            .graph
            .units()
            .filter(|u| u.id != source)
            .map(|u| u.id.clone())
            .collect();

        for target in &targets {
            self.connect(&source, target, LinkCategory::Stop, 1)?;
        }
        Ok(())
    }
}
