// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

/// Shape of one bounded-fan-in reduction tree.
///
/// Every subgroup owns a tree with one leaf per subgroup in the network.
/// Slots are handed out node by node, `max_links` per node:
///
/// ```text
///  slot:  0 1 2 3 | 4 5 6 7 | 8 9 ...
///  node:     0    |    1    |   2
///         [n1 n2 l0 l1][l2 l3 l4 l5][l6 ...]
/// ```
///
/// Internal nodes 1.. take the first slots, leaves the rest. Node 0 is the
/// root and the only node without a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    max_links: u32,
    leaves: u32,
    nodes: u32,
}

impl TreeLayout {
    pub fn new(leaves: u32, max_links: u32) -> Self {
        let max_links = max_links.max(2);
        let nodes = if leaves <= 1 {
            1
        } else {
            (leaves - 2) / (max_links - 1) + 1
        };
        Self {
            max_links,
            leaves,
            nodes,
        }
    }

    pub fn nodes(&self) -> u32 {
        self.nodes
    }

    pub fn leaves(&self) -> u32 {
        self.leaves
    }

    pub fn max_links(&self) -> u32 {
        self.max_links
    }

    fn slot_owner(&self, slot: u32) -> u32 {
        slot / self.max_links
    }

    /// Parent of `node`, `None` for the root.
    pub fn parent(&self, node: u32) -> Option<u32> {
        if node == 0 || node >= self.nodes {
            return None;
        }
        Some(self.slot_owner(node - 1))
    }

    /// Node that receives `leaf`.
    pub fn leaf_node(&self, leaf: u32) -> u32 {
        self.slot_owner(self.nodes - 1 + leaf)
    }

    pub fn children(&self, node: u32) -> impl Iterator<Item = u32> + '_ {
        (1..self.nodes).filter(move |&n| self.parent(n) == Some(node))
    }

    pub fn leaves_of(&self, node: u32) -> impl Iterator<Item = u32> + '_ {
        (0..self.leaves).filter(move |&l| self.leaf_node(l) == node)
    }

    pub fn child_count(&self, node: u32) -> u32 {
        self.children(node).count() as u32
    }

    pub fn leaf_count(&self, node: u32) -> u32 {
        self.leaves_of(node).count() as u32
    }

    /// Inputs a node accepts: child nodes plus leaves.
    pub fn in_degree(&self, node: u32) -> u32 {
        self.child_count(node) + self.leaf_count(node)
    }

    /// Hops from `node` up to the root.
    pub fn depth(&self, node: u32) -> u32 {
        let mut depth = 0;
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
            depth += 1;
        }
        depth
    }
}
