// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a group: its position in network insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(usize);

impl GroupId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for GroupId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<GroupId> for usize {
    fn from(id: GroupId) -> Self {
        id.0
    }
}

/// Handle of a declared link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(usize);

impl LinkId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_roundtrip() {
        let id = GroupId::from(3);
        assert_eq!(id.index(), 3);
        assert_eq!(usize::from(id), 3);
        assert_eq!(id.to_string(), "3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
    }

    #[test]
    fn test_link_id_display() {
        assert_eq!(LinkId::new(2).to_string(), "L2");
    }
}
