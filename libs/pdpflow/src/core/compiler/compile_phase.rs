// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

/// Graph compilation phase in the 4-phase pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilePhase {
    /// Phase 1: Splitting groups into subgroups.
    Partition,
    /// Phase 2: Creating Weight, Sum, Input and Threshold units.
    Create,
    /// Phase 3: Wiring the five link categories.
    Wire,
    /// Phase 4: Checking scoreboard counts against the wiring.
    Audit,
}

impl CompilePhase {
    /// All phases in execution order.
    pub const ALL: [CompilePhase; 4] = [
        CompilePhase::Partition,
        CompilePhase::Create,
        CompilePhase::Wire,
        CompilePhase::Audit,
    ];

    /// Get the next phase, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Partition => Some(Self::Create),
            Self::Create => Some(Self::Wire),
            Self::Wire => Some(Self::Audit),
            Self::Audit => None,
        }
    }

    /// Get the phase number (1-4).
    pub fn number(self) -> u8 {
        match self {
            Self::Partition => 1,
            Self::Create => 2,
            Self::Wire => 3,
            Self::Audit => 4,
        }
    }

    /// Get a human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Partition => "PARTITION",
            Self::Create => "CREATE",
            Self::Wire => "WIRE",
            Self::Audit => "AUDIT",
        }
    }
}

impl fmt::Display for CompilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {}: {}", self.number(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        assert_eq!(CompilePhase::Partition.next(), Some(CompilePhase::Create));
        assert_eq!(CompilePhase::Create.next(), Some(CompilePhase::Wire));
        assert_eq!(CompilePhase::Wire.next(), Some(CompilePhase::Audit));
        assert_eq!(CompilePhase::Audit.next(), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(CompilePhase::Partition.to_string(), "Phase 1: PARTITION");
        assert_eq!(CompilePhase::Audit.to_string(), "Phase 4: AUDIT");
    }
}
