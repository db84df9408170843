// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::checksum::{compute_checksum, GraphChecksum};
use super::{LinkCategory, Unit, UnitId, UnitRole};
use crate::core::{PdpError, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A categorised edge between two units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineEdge {
    pub category: LinkCategory,
    /// Logical multicast partition of the source; the placement service
    /// allocates one routing key per partition.
    pub partition: String,
    /// Messages the source sends along this edge per exchange.
    pub packets: u32,
}

/// A named multicast source: one unit's outgoing traffic in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub name: String,
    pub source: UnitId,
    pub category: LinkCategory,
    pub fan_out: usize,
}

/// Unit and edge counts of a built graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub units: usize,
    pub units_by_role: BTreeMap<UnitRole, usize>,
    pub edges: usize,
    pub edges_by_category: BTreeMap<LinkCategory, usize>,
    pub partitions: usize,
    pub max_in_degree: usize,
}

/// Units and edges emitted to the placement service.
#[derive(Debug, Clone, Default)]
pub struct MachineGraph {
    graph: DiGraph<Unit, MachineEdge>,
    unit_to_node: HashMap<UnitId, NodeIndex>,
    edge_keys: HashSet<(NodeIndex, NodeIndex, LinkCategory)>,
}

impl MachineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&mut self, unit: Unit) -> Result<NodeIndex> {
        if self.unit_to_node.contains_key(&unit.id) {
            return Err(PdpError::Graph(format!("unit {} already exists", unit.id)));
        }
        let id = unit.id.clone();
        let node = self.graph.add_node(unit);
        self.unit_to_node.insert(id, node);
        Ok(node)
    }

    /// Connect two units. Returns `false` if the same (source, target,
    /// category) edge already exists.
    pub fn add_edge(
        &mut self,
        from: &UnitId,
        to: &UnitId,
        category: LinkCategory,
        packets: u32,
    ) -> Result<bool> {
        let from_idx = self.node_index(from)?;
        let to_idx = self.node_index(to)?;

        if !self.edge_keys.insert((from_idx, to_idx, category)) {
            return Ok(false);
        }

        let partition = self.graph[from_idx].partition_name(category);
        self.graph.add_edge(
            from_idx,
            to_idx,
            MachineEdge {
                category,
                partition,
                packets,
            },
        );
        Ok(true)
    }

    pub fn node_index(&self, id: &UnitId) -> Result<NodeIndex> {
        self.unit_to_node
            .get(id)
            .copied()
            .ok_or_else(|| PdpError::NotFound(format!("unit {}", id)))
    }

    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.unit_to_node.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn contains(&self, id: &UnitId) -> bool {
        self.unit_to_node.contains_key(id)
    }

    /// Units in creation order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn units_with_role(&self, role: UnitRole) -> impl Iterator<Item = &Unit> {
        self.units().filter(move |u| u.role == role)
    }

    pub fn unit_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Unit, &Unit, &MachineEdge)> {
        self.graph.edge_references().map(|e| {
            (
                &self.graph[e.source()],
                &self.graph[e.target()],
                e.weight(),
            )
        })
    }

    /// Edges of one category arriving at a unit.
    pub fn in_edges(&self, id: &UnitId, category: LinkCategory) -> Vec<(&Unit, &MachineEdge)> {
        self.directed_edges(id, category, Direction::Incoming)
    }

    /// Edges of one category leaving a unit.
    pub fn out_edges(&self, id: &UnitId, category: LinkCategory) -> Vec<(&Unit, &MachineEdge)> {
        self.directed_edges(id, category, Direction::Outgoing)
    }

    fn directed_edges(
        &self,
        id: &UnitId,
        category: LinkCategory,
        direction: Direction,
    ) -> Vec<(&Unit, &MachineEdge)> {
        let Some(idx) = self.unit_to_node.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(*idx, direction)
            .filter(|e| e.weight().category == category)
            .map(|e| {
                let other = match direction {
                    Direction::Incoming => e.source(),
                    Direction::Outgoing => e.target(),
                };
                (&self.graph[other], e.weight())
            })
            .collect()
    }

    /// Partition name of a unit's outgoing traffic, if it sends any.
    pub fn outgoing_partition(&self, id: &UnitId, category: LinkCategory) -> Option<String> {
        self.out_edges(id, category)
            .first()
            .map(|(_, e)| e.partition.clone())
    }

    /// All multicast partitions, in unit creation order then category order.
    pub fn partitions(&self) -> Vec<Partition> {
        let mut out = Vec::new();
        for unit in self.units() {
            for category in LinkCategory::ALL {
                let edges = self.out_edges(&unit.id, category);
                if let Some((_, edge)) = edges.first() {
                    out.push(Partition {
                        name: edge.partition.clone(),
                        source: unit.id.clone(),
                        category,
                        fan_out: edges.len(),
                    });
                }
            }
        }
        out
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            units: self.unit_count(),
            edges: self.edge_count(),
            partitions: self.partitions().len(),
            ..Default::default()
        };
        for unit in self.units() {
            *stats.units_by_role.entry(unit.role).or_default() += 1;
        }
        for (_, _, edge) in self.edges() {
            *stats.edges_by_category.entry(edge.category).or_default() += 1;
        }
        stats.max_in_degree = self
            .graph
            .node_indices()
            .map(|n| self.graph.edges_directed(n, Direction::Incoming).count())
            .max()
            .unwrap_or(0);
        stats
    }

    pub fn checksum(&self) -> GraphChecksum {
        compute_checksum(self)
    }

    /// JSON view of units and edges.
    pub fn to_json(&self) -> serde_json::Value {
        let edges: Vec<_> = self
            .edges()
            .map(|(from, to, edge)| {
                serde_json::json!({
                    "from": from.id,
                    "to": to.id,
                    "category": edge.category,
                    "partition": edge.partition,
                    "packets": edge.packets,
                })
            })
            .collect();
        serde_json::json!({
            "units": self.units().collect::<Vec<_>>(),
            "edges": edges,
        })
    }

    /// Underlying petgraph graph, for traversal algorithms.
    pub fn petgraph(&self) -> &DiGraph<Unit, MachineEdge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::partition::SubgroupRef;
    use crate::core::topology::GroupId;

    fn sg(group: usize) -> SubgroupRef {
        SubgroupRef {
            group: GroupId::new(group),
            subgroup: 0,
            units: 4,
            index: group as u32,
        }
    }

    fn small() -> MachineGraph {
        let mut g = MachineGraph::new();
        g.add_unit(Unit::input(&sg(1))).unwrap();
        g.add_unit(Unit::threshold(&sg(1))).unwrap();
        g.add_unit(Unit::sum(&sg(1), 0)).unwrap();
        g
    }

    #[test]
    fn test_duplicate_unit_rejected() {
        let mut g = small();
        assert!(matches!(
            g.add_unit(Unit::input(&sg(1))),
            Err(PdpError::Graph(_))
        ));
    }

    #[test]
    fn test_edges_deduplicated_per_category() {
        let mut g = small();
        let i = UnitId::input(GroupId::new(1), 0);
        let t = UnitId::threshold(GroupId::new(1), 0);

        assert!(g.add_edge(&i, &t, LinkCategory::Forward, 1).unwrap());
        assert!(!g.add_edge(&i, &t, LinkCategory::Forward, 1).unwrap());
        assert!(g.add_edge(&t, &i, LinkCategory::Backprop, 1).unwrap());
        assert_eq!(g.edge_count(), 2);

        let incoming = g.in_edges(&t, LinkCategory::Forward);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].0.id, i);
        assert_eq!(incoming[0].1.partition, "fwd_i1_0");
        assert!(g.in_edges(&t, LinkCategory::Stop).is_empty());
    }

    #[test]
    fn test_edge_to_unknown_unit() {
        let mut g = small();
        let i = UnitId::input(GroupId::new(1), 0);
        let missing = UnitId::input(GroupId::new(9), 0);
        assert!(matches!(
            g.add_edge(&i, &missing, LinkCategory::Forward, 1),
            Err(PdpError::NotFound(_))
        ));
    }

    #[test]
    fn test_stats_and_partitions() {
        let mut g = small();
        let i = UnitId::input(GroupId::new(1), 0);
        let t = UnitId::threshold(GroupId::new(1), 0);
        let s = UnitId::sum(GroupId::new(1), 0, 0);
        g.add_edge(&s, &i, LinkCategory::Forward, 1).unwrap();
        g.add_edge(&i, &t, LinkCategory::Forward, 1).unwrap();
        g.add_edge(&s, &t, LinkCategory::Backprop, 1).unwrap();

        let stats = g.stats();
        assert_eq!(stats.units, 3);
        assert_eq!(stats.units_by_role[&UnitRole::Sum], 1);
        assert_eq!(stats.edges_by_category[&LinkCategory::Forward], 2);
        assert_eq!(stats.partitions, 3);
        assert_eq!(stats.max_in_degree, 2);

        let partitions = g.partitions();
        assert_eq!(partitions[0].source, i);
        assert_eq!(partitions[1].name, "fwd_s1_0_0");
    }

    #[test]
    fn test_checksum_ignores_insertion_order() {
        let i = UnitId::input(GroupId::new(1), 0);
        let t = UnitId::threshold(GroupId::new(1), 0);

        let mut a = MachineGraph::new();
        a.add_unit(Unit::input(&sg(1))).unwrap();
        a.add_unit(Unit::threshold(&sg(1))).unwrap();
        a.add_edge(&i, &t, LinkCategory::Forward, 1).unwrap();
        a.add_edge(&t, &i, LinkCategory::Backprop, 1).unwrap();

        let mut b = MachineGraph::new();
        b.add_unit(Unit::threshold(&sg(1))).unwrap();
        b.add_unit(Unit::input(&sg(1))).unwrap();
        b.add_edge(&t, &i, LinkCategory::Backprop, 1).unwrap();
        b.add_edge(&i, &t, LinkCategory::Forward, 1).unwrap();

        assert_eq!(a.checksum(), b.checksum());

        b.add_edge(&t, &i, LinkCategory::Stop, 1).unwrap();
        assert_ne!(a.checksum(), b.checksum());
    }
}
