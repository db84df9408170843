// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::ids::{GroupId, LinkId};
use serde::{Deserialize, Serialize};

/// A declared, directed connection between two groups.
///
/// A link implies a dense weight block between every pair of source and
/// destination subgroups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from: GroupId,
    pub to: GroupId,
    pub label: String,
}

impl Link {
    pub fn new(id: LinkId, from: GroupId, to: GroupId, label: String) -> Self {
        Self {
            id,
            from,
            to,
            label,
        }
    }

    pub fn is_recurrent(&self) -> bool {
        self.from == self.to
    }
}
