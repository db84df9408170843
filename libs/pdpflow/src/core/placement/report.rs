// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::network::StageMode;
use crate::core::topology::GroupId;
use crate::core::{PdpError, Result};
use pdpflow_fixed::{WireReader, WireWriter};
use serde::Serialize;
use std::fmt;

/// Test-results record logged by the last output Threshold unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestResults {
    pub epochs_trained: u32,
    pub examples_tested: u32,
    pub ticks_tested: u32,
    pub examples_correct: u32,
}

impl TestResults {
    pub const SIZE: usize = 16;

    /// Decode the `<4I` record.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(bytes);
        Ok(Self {
            epochs_trained: r.u32()?,
            examples_tested: r.u32()?,
            ticks_tested: r.u32()?,
            examples_correct: r.u32()?,
        })
    }

    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.epochs_trained)
            .u32(self.examples_tested)
            .u32(self.ticks_tested)
            .u32(self.examples_correct);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(Self::SIZE);
        self.encode(&mut w);
        w.into_bytes()
    }
}

impl fmt::Display for TestResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "epochs trained: {}, examples tested: {}, ticks: {}, correct: {}",
            self.epochs_trained, self.examples_tested, self.ticks_tested, self.examples_correct
        )
    }
}

/// Position of one recorded tick, logged by the first output Threshold
/// unit alongside the outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickRecord {
    pub epoch: u32,
    pub example: u32,
    pub event: u32,
    pub tick: u32,
}

impl TickRecord {
    pub const SIZE: usize = 16;

    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.epoch)
            .u32(self.example)
            .u32(self.event)
            .u32(self.tick);
    }

    /// Decode a buffer of back-to-back `<4I` records.
    pub fn decode_all(bytes: &[u8]) -> Result<Vec<Self>> {
        if bytes.len() % Self::SIZE != 0 {
            return Err(PdpError::Placement(format!(
                "tick data of {} bytes is not a whole number of records",
                bytes.len()
            )));
        }
        let mut r = WireReader::new(bytes);
        (0..bytes.len() / Self::SIZE)
            .map(|_| -> Result<Self> {
                Ok(Self {
                    epoch: r.u32()?,
                    example: r.u32()?,
                    event: r.u32()?,
                    tick: r.u32()?,
                })
            })
            .collect()
    }
}

/// Outputs one Threshold subgroup recorded: `units` little-endian
/// `short_activ_t` values per recorded tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgroupOutputs {
    pub group: GroupId,
    pub subgroup: u32,
    pub units: u32,
    pub data: Vec<u8>,
}

impl SubgroupOutputs {
    pub fn num_ticks(&self) -> usize {
        match self.units {
            0 => 0,
            n => self.data.len() / (n as usize * 2),
        }
    }

    /// Raw outputs recorded at tick `index`.
    pub fn tick(&self, index: usize) -> Result<Vec<u16>> {
        let width = self.units as usize * 2;
        let start = index * width;
        let block = self.data.get(start..start + width).ok_or_else(|| {
            PdpError::Placement(format!(
                "group {} subgroup {} recorded {} ticks, tick {} requested",
                self.group,
                self.subgroup,
                self.num_ticks(),
                index
            ))
        })?;
        let mut r = WireReader::new(block);
        (0..self.units)
            .map(|_| r.u16().map_err(PdpError::from))
            .collect()
    }
}

/// Tick positions and per-subgroup outputs recorded during a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedOutputs {
    pub ticks: Vec<TickRecord>,
    pub outputs: Vec<SubgroupOutputs>,
}

impl RecordedOutputs {
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn subgroup(&self, group: GroupId, subgroup: u32) -> Option<&SubgroupOutputs> {
        self.outputs
            .iter()
            .find(|o| o.group == group && o.subgroup == subgroup)
    }
}

/// What the service returns after a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage_id: u32,
    pub mode: StageMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_results: Option<TestResults>,
    /// Present when the output groups recorded their outputs.
    #[serde(skip)]
    pub outputs: Option<RecordedOutputs>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_test_results() {
        let bytes = [5, 0, 0, 0, 4, 0, 0, 0, 40, 0, 0, 0, 3, 0, 0, 0];
        let r = TestResults::decode(&bytes).unwrap();
        assert_eq!(r.epochs_trained, 5);
        assert_eq!(r.ticks_tested, 40);
        assert_eq!(r.examples_correct, 3);
        assert_eq!(r.to_bytes(), bytes);
    }

    #[test]
    fn test_tick_records_and_outputs() {
        let mut w = WireWriter::new();
        for tick in 1..=3 {
            TickRecord {
                epoch: 0,
                example: 1,
                event: tick - 1,
                tick,
            }
            .encode(&mut w);
        }
        let ticks = TickRecord::decode_all(w.as_bytes()).unwrap();
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[2].tick, 3);
        assert_eq!(ticks[2].example, 1);
        assert!(TickRecord::decode_all(&w.as_bytes()[..20]).is_err());

        let outputs = SubgroupOutputs {
            group: GroupId::new(2),
            subgroup: 0,
            units: 2,
            data: vec![0x00, 0x80, 0x00, 0x40, 0x00, 0x00, 0xff, 0x7f],
        };
        assert_eq!(outputs.num_ticks(), 2);
        assert_eq!(outputs.tick(0).unwrap(), vec![0x8000, 0x4000]);
        assert_eq!(outputs.tick(1).unwrap(), vec![0, 0x7fff]);
        assert!(matches!(outputs.tick(2), Err(PdpError::Placement(_))));
    }

    #[test]
    fn test_short_record_is_wire_error() {
        assert!(matches!(
            TestResults::decode(&[1, 0, 0, 0]),
            Err(PdpError::Wire(_))
        ));
    }
}
