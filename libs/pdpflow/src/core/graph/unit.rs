// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::partition::SubgroupRef;
use crate::core::topology::GroupId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Compute role of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRole {
    Weight,
    Sum,
    Input,
    Threshold,
}

impl UnitRole {
    pub const ALL: [UnitRole; 4] = [
        UnitRole::Weight,
        UnitRole::Sum,
        UnitRole::Input,
        UnitRole::Threshold,
    ];

    /// Single-letter tag used in unit ids and partition names.
    pub fn tag(self) -> char {
        match self {
            Self::Weight => 'w',
            Self::Sum => 's',
            Self::Input => 'i',
            Self::Threshold => 't',
        }
    }
}

impl fmt::Display for UnitRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weight => write!(f, "weight"),
            Self::Sum => write!(f, "sum"),
            Self::Input => write!(f, "input"),
            Self::Threshold => write!(f, "threshold"),
        }
    }
}

/// Deterministic unit identifier, derived from role and position.
///
/// `w2.0<-1.1`, `s2.0.3`, `i2.0`, `t2.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn weight(to: GroupId, subgroup: u32, from: GroupId, from_subgroup: u32) -> Self {
        Self(format!("w{}.{}<-{}.{}", to, subgroup, from, from_subgroup))
    }

    pub fn sum(group: GroupId, subgroup: u32, node: u32) -> Self {
        Self(format!("s{}.{}.{}", group, subgroup, node))
    }

    pub fn input(group: GroupId, subgroup: u32) -> Self {
        Self(format!("i{}.{}", group, subgroup))
    }

    pub fn threshold(group: GroupId, subgroup: u32) -> Self {
        Self(format!("t{}.{}", group, subgroup))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for UnitId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for UnitId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UnitId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One compute role instance scoped to a subgroup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub role: UnitRole,
    pub group: GroupId,
    pub subgroup: u32,
    /// Source subgroup, Weight units only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_group: Option<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_subgroup: Option<u32>,
    /// Reduction-tree node, Sum units only. Node 0 is the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_node: Option<u32>,
    /// Units of the subgroup this unit serves.
    pub units: u32,
}

impl Unit {
    pub fn weight(to: &SubgroupRef, from: &SubgroupRef) -> Self {
        Self {
            id: UnitId::weight(to.group, to.subgroup, from.group, from.subgroup),
            role: UnitRole::Weight,
            group: to.group,
            subgroup: to.subgroup,
            from_group: Some(from.group),
            from_subgroup: Some(from.subgroup),
            tree_node: None,
            units: to.units,
        }
    }

    pub fn sum(sg: &SubgroupRef, node: u32) -> Self {
        Self {
            tree_node: Some(node),
            ..Self::plain(UnitId::sum(sg.group, sg.subgroup, node), UnitRole::Sum, sg)
        }
    }

    pub fn input(sg: &SubgroupRef) -> Self {
        Self::plain(UnitId::input(sg.group, sg.subgroup), UnitRole::Input, sg)
    }

    pub fn threshold(sg: &SubgroupRef) -> Self {
        Self::plain(
            UnitId::threshold(sg.group, sg.subgroup),
            UnitRole::Threshold,
            sg,
        )
    }

    fn plain(id: UnitId, role: UnitRole, sg: &SubgroupRef) -> Self {
        Self {
            id,
            role,
            group: sg.group,
            subgroup: sg.subgroup,
            from_group: None,
            from_subgroup: None,
            tree_node: None,
            units: sg.units,
        }
    }

    /// Whether a Weight unit connects a subgroup to itself.
    pub fn is_self_pair(&self) -> bool {
        self.from_group == Some(self.group) && self.from_subgroup == Some(self.subgroup)
    }

    /// Partition name of this unit's outgoing traffic in one category.
    pub fn partition_name(&self, category: super::LinkCategory) -> String {
        let mut name = format!(
            "{}_{}{}_{}",
            category.short_name(),
            self.role.tag(),
            self.group,
            self.subgroup
        );
        if let (Some(fg), Some(fs)) = (self.from_group, self.from_subgroup) {
            name.push_str(&format!("_{}_{}", fg, fs));
        }
        if let Some(node) = self.tree_node {
            name.push_str(&format!("_{}", node));
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::LinkCategory;

    fn sg(group: usize, subgroup: u32) -> SubgroupRef {
        SubgroupRef {
            group: GroupId::new(group),
            subgroup,
            units: 8,
            index: 0,
        }
    }

    #[test]
    fn test_ids_are_deterministic() {
        let w = Unit::weight(&sg(2, 0), &sg(1, 1));
        assert_eq!(w.id, "w2.0<-1.1");
        assert_eq!(Unit::sum(&sg(2, 1), 3).id, "s2.1.3");
        assert_eq!(Unit::input(&sg(0, 0)).id, "i0.0");
        assert_eq!(Unit::threshold(&sg(4, 2)).id.as_str(), "t4.2");
    }

    #[test]
    fn test_partition_names() {
        let w = Unit::weight(&sg(2, 0), &sg(1, 1));
        assert_eq!(w.partition_name(LinkCategory::SyncGen), "fsg_w2_0_1_1");
        assert_eq!(
            Unit::sum(&sg(2, 1), 0).partition_name(LinkCategory::LinkDeltaSum),
            "lds_s2_1_0"
        );
        assert_eq!(
            Unit::threshold(&sg(3, 0)).partition_name(LinkCategory::Stop),
            "stp_t3_0"
        );
    }

    #[test]
    fn test_self_pair() {
        assert!(Unit::weight(&sg(1, 0), &sg(1, 0)).is_self_pair());
        assert!(!Unit::weight(&sg(1, 0), &sg(1, 1)).is_self_pair());
        assert!(!Unit::input(&sg(1, 0)).is_self_pair());
    }
}
