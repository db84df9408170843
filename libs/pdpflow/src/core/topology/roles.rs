// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct RoleBits: u8 {
        const BIAS = 1 << 0;
        const INPUT = 1 << 1;
        const OUTPUT = 1 << 2;
        const HIDDEN = 1 << 3;
    }
}

/// Role a group plays in the network. Roles are not exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Bias,
    Input,
    Output,
    Hidden,
}

impl GroupRole {
    pub const ALL: [GroupRole; 4] = [
        GroupRole::Bias,
        GroupRole::Input,
        GroupRole::Output,
        GroupRole::Hidden,
    ];

    /// Wire code.
    pub fn code(self) -> u8 {
        match self {
            Self::Bias => 0,
            Self::Input => 1,
            Self::Output => 2,
            Self::Hidden => 3,
        }
    }

    fn bit(self) -> RoleBits {
        match self {
            Self::Bias => RoleBits::BIAS,
            Self::Input => RoleBits::INPUT,
            Self::Output => RoleBits::OUTPUT,
            Self::Hidden => RoleBits::HIDDEN,
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bias => write!(f, "bias"),
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Hidden => write!(f, "hidden"),
        }
    }
}

/// Set of [`GroupRole`]s held as a bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<GroupRole>", into = "Vec<GroupRole>")]
pub struct GroupRoles(RoleBits);

impl Default for GroupRoles {
    fn default() -> Self {
        Self::empty()
    }
}

impl GroupRoles {
    pub fn empty() -> Self {
        Self(RoleBits::empty())
    }

    pub fn contains(self, role: GroupRole) -> bool {
        self.0.contains(role.bit())
    }

    pub fn with(mut self, role: GroupRole) -> Self {
        self.0.insert(role.bit());
        self
    }

    pub fn insert(&mut self, role: GroupRole) {
        self.0.insert(role.bit());
    }

    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(self) -> impl Iterator<Item = GroupRole> {
        GroupRole::ALL.into_iter().filter(move |r| self.contains(*r))
    }

    pub fn is_bias(self) -> bool {
        self.contains(GroupRole::Bias)
    }

    pub fn is_input(self) -> bool {
        self.contains(GroupRole::Input)
    }

    pub fn is_output(self) -> bool {
        self.contains(GroupRole::Output)
    }

    pub fn is_hidden(self) -> bool {
        self.contains(GroupRole::Hidden)
    }
}

impl From<GroupRole> for GroupRoles {
    fn from(role: GroupRole) -> Self {
        Self::empty().with(role)
    }
}

impl From<&[GroupRole]> for GroupRoles {
    fn from(roles: &[GroupRole]) -> Self {
        roles.iter().fold(Self::empty(), |acc, r| acc.with(*r))
    }
}

impl<const N: usize> From<[GroupRole; N]> for GroupRoles {
    fn from(roles: [GroupRole; N]) -> Self {
        Self::from(&roles[..])
    }
}

impl From<Vec<GroupRole>> for GroupRoles {
    fn from(roles: Vec<GroupRole>) -> Self {
        Self::from(roles.as_slice())
    }
}

impl From<GroupRoles> for Vec<GroupRole> {
    fn from(roles: GroupRoles) -> Self {
        roles.iter().collect()
    }
}

impl fmt::Display for GroupRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_not_exclusive() {
        let roles = GroupRoles::from([GroupRole::Input, GroupRole::Output]);
        assert!(roles.is_input());
        assert!(roles.is_output());
        assert!(!roles.is_hidden());
        assert_eq!(roles.to_string(), "[input, output]");
    }

    #[test]
    fn test_roles_serde() {
        let roles: GroupRoles = serde_yaml::from_str("[hidden, bias]").unwrap();
        assert!(roles.is_hidden() && roles.is_bias());
        let yaml = serde_yaml::to_string(&roles).unwrap();
        assert!(yaml.contains("bias"));
        assert!(yaml.contains("hidden"));
    }

    #[test]
    fn test_empty() {
        assert!(GroupRoles::empty().is_empty());
        assert!(!GroupRoles::from(GroupRole::Hidden).is_empty());
    }
}
