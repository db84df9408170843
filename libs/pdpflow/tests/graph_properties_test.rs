// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Structural properties every compiled graph must hold, checked over a
//! spread of topologies and capacity limits.

mod common;

use common::{compile, layered, limits};
use pdpflow::{
    GroupId, GroupRole, Limits, LinkCategory, PartitionPlan, Scoreboard, Topology, UnitId,
    UnitRole,
};
use petgraph::algo::has_path_connecting;
use petgraph::visit::{EdgeFiltered, EdgeRef};
use std::collections::HashSet;

fn sample_topologies() -> Vec<(Topology, Limits)> {
    let mut out = Vec::new();

    let (t, _) = layered(32, &[(10, GroupRole::Input), (10, GroupRole::Output)]);
    out.push((t, limits(32, 16)));

    let (t, _) = layered(
        8,
        &[
            (10, GroupRole::Input),
            (20, GroupRole::Hidden),
            (5, GroupRole::Output),
        ],
    );
    out.push((t, limits(8, 3)));

    // two output groups and a recurrent link on the hidden layer
    let (mut t, ids) = layered(
        4,
        &[
            (7, GroupRole::Input),
            (9, GroupRole::Hidden),
            (4, GroupRole::Output),
        ],
    );
    let second = t
        .add_group(6, GroupRole::Output.into(), None, None, Some("out2"))
        .unwrap();
    t.add_link(ids[1], second, None).unwrap();
    t.add_link(ids[1], ids[1], None).unwrap();
    out.push((t, limits(4, 2)));

    out
}

#[test]
fn test_partition_is_complete_and_bounded() {
    for cap in [1, 3, 7, 32] {
        let mut topology = Topology::new(cap).unwrap();
        let ids: Vec<GroupId> = [1, 5, 32, 33, 64, 70, 128]
            .iter()
            .map(|units| {
                topology
                    .add_group(*units, GroupRole::Hidden.into(), None, None, None)
                    .unwrap()
            })
            .collect();
        let plan = PartitionPlan::new(&topology, &limits(cap, 16)).unwrap();

        for id in ids {
            let group = topology.group(id).unwrap();
            let subgroups = plan.subgroups_of(id);
            assert_eq!(subgroups.len() as u32, group.subgroups);
            assert_eq!(subgroups.iter().map(|s| s.units).sum::<u32>(), group.units);
            assert!(subgroups.iter().all(|s| s.units >= 1 && s.units <= cap));

            let short = subgroups.iter().filter(|s| s.units < cap).count();
            assert!(short <= 1, "group {} has {} short subgroups", id, short);
            if short == 1 {
                assert!(subgroups.last().unwrap().units < cap);
            }
        }
    }
}

#[test]
fn test_weight_units_cover_every_subgroup_pair() {
    for (topology, limits) in sample_topologies() {
        let compiled = compile(&topology, limits);
        let plan = &compiled.plan;
        let total = plan.total() as usize;

        let weights: Vec<_> = compiled.graph.units_with_role(UnitRole::Weight).collect();
        assert_eq!(weights.len(), total * total);

        // undeclared pairs get a unit too, including input <- output
        for to in plan.subgroups() {
            for from in plan.subgroups() {
                let id = UnitId::weight(to.group, to.subgroup, from.group, from.subgroup);
                assert!(compiled.graph.contains(&id), "missing {}", id);
            }
        }
    }
}

#[test]
fn test_scoreboards_match_wiring() {
    for (topology, limits) in sample_topologies() {
        let compiled = compile(&topology, limits);
        let scoreboard = Scoreboard::new(&compiled.plan);
        assert!(scoreboard.audit(&compiled.graph).is_empty());

        for unit in compiled.graph.units() {
            for category in LinkCategory::ALL {
                let senders: HashSet<_> = compiled
                    .graph
                    .in_edges(&unit.id, category)
                    .into_iter()
                    .map(|(from, _)| from.id.clone())
                    .collect();
                assert_eq!(
                    scoreboard.expected_senders(unit, category) as usize,
                    senders.len(),
                    "{} {}",
                    unit.id,
                    category
                );
            }
        }
    }
}

#[test]
fn test_scoreboards_follow_topology_changes() {
    let (mut topology, ids) = layered(4, &[(6, GroupRole::Input), (6, GroupRole::Output)]);
    let before = compile(&topology, limits(4, 2));

    let hidden = topology
        .add_group(9, GroupRole::Hidden.into(), None, None, Some("h"))
        .unwrap();
    topology.add_link(ids[0], hidden, None).unwrap();
    topology.add_link(hidden, ids[1], None).unwrap();
    let after = compile(&topology, limits(4, 2));

    assert!(Scoreboard::new(&after.plan).audit(&after.graph).is_empty());
    assert_ne!(before.graph.checksum(), after.graph.checksum());
    assert!(after.graph.unit_count() > before.graph.unit_count());
}

#[test]
fn test_reduction_trees_are_bounded_and_rooted() {
    for (topology, limits) in sample_topologies() {
        let compiled = compile(&topology, limits);
        let graph = compiled.graph.petgraph();
        let within_tree = EdgeFiltered::from_fn(graph, |e| {
            let (from, to) = (&graph[e.source()], &graph[e.target()]);
            e.weight().category == LinkCategory::Forward
                && from.role == UnitRole::Sum
                && to.role == UnitRole::Sum
                && (from.group, from.subgroup) == (to.group, to.subgroup)
        });

        for sg in compiled.plan.subgroups() {
            let root = compiled
                .graph
                .node_index(&UnitId::sum(sg.group, sg.subgroup, 0))
                .unwrap();
            let mut roots = 0;

            for node in 0..compiled.plan.tree().nodes() {
                let id = UnitId::sum(sg.group, sg.subgroup, node);
                let fan_in = compiled.graph.in_edges(&id, LinkCategory::Forward).len();
                assert!(fan_in as u32 <= limits.max_sum_links, "{} fan-in {}", id, fan_in);

                let parents = compiled
                    .graph
                    .out_edges(&id, LinkCategory::Forward)
                    .into_iter()
                    .filter(|(to, _)| to.role == UnitRole::Sum)
                    .count();
                if parents == 0 {
                    roots += 1;
                }

                let idx = compiled.graph.node_index(&id).unwrap();
                assert!(has_path_connecting(&within_tree, idx, root, None));
            }
            assert_eq!(roots, 1);
        }

        // every Weight's forward leaf lies in its destination subgroup's tree
        for weight in compiled.graph.units_with_role(UnitRole::Weight) {
            let leaves = compiled.graph.out_edges(&weight.id, LinkCategory::Forward);
            assert_eq!(leaves.len(), 1);
            let leaf = leaves[0].0;
            assert_eq!(leaf.role, UnitRole::Sum);
            assert_eq!((leaf.group, leaf.subgroup), (weight.group, weight.subgroup));

            let root = compiled
                .graph
                .node_index(&UnitId::sum(weight.group, weight.subgroup, 0))
                .unwrap();
            let idx = compiled.graph.node_index(&leaf.id).unwrap();
            assert!(has_path_connecting(&within_tree, idx, root, None));
        }
    }
}

#[test]
fn test_stop_chain_follows_output_order() {
    let (mut topology, ids) = layered(
        32,
        &[
            (4, GroupRole::Input),
            (5, GroupRole::Output),
            (8, GroupRole::Hidden),
        ],
    );
    let late = topology
        .add_group(70, GroupRole::Output.into(), None, None, Some("late"))
        .unwrap();
    topology.add_link(ids[2], late, None).unwrap();
    assert_eq!(topology.output_chain(), &[ids[1], late]);

    let compiled = compile(&topology, limits(32, 16));
    let chain = compiled.plan.stop_chain();
    let order: Vec<(GroupId, u32)> = chain.iter().map(|s| (s.group, s.subgroup)).collect();
    assert_eq!(order, vec![(ids[1], 0), (late, 0), (late, 1), (late, 2)]);

    let broadcaster = UnitId::threshold(late, 2);
    for unit in compiled.graph.units() {
        let sent = compiled.graph.out_edges(&unit.id, LinkCategory::Stop);
        if unit.id == broadcaster {
            assert_eq!(sent.len(), compiled.graph.unit_count() - 1);
            continue;
        }
        match chain.iter().position(|s| UnitId::threshold(s.group, s.subgroup) == unit.id) {
            Some(pos) => {
                let next = &chain[pos + 1];
                assert_eq!(sent.len(), 1);
                assert_eq!(sent[0].0.id, UnitId::threshold(next.group, next.subgroup));
            }
            None => assert!(sent.is_empty(), "{} sends stop", unit.id),
        }
    }
}

#[test]
fn test_compiling_twice_is_identical() {
    for (topology, limits) in sample_topologies() {
        let a = compile(&topology, limits);
        let b = compile(&topology, limits);
        assert_eq!(a.graph.checksum(), b.graph.checksum());
        assert_eq!(a.graph.to_json(), b.graph.to_json());
        assert_eq!(a.result, b.result);
    }
}
