// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Core regions, one layout per unit role.

use crate::core::topology::{MAX_IN_PROCS, MAX_OUT_PROCS};
use pdpflow_fixed::{Activation, ErrorValue, FpReal, ShortFpReal, WireWriter};

/// Core of a Weight unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightCore {
    /// Units of the source subgroup.
    pub num_rows: u32,
    /// Units of the destination subgroup.
    pub num_cols: u32,
    pub init_output: Activation,
    pub learning_rate: ShortFpReal,
    pub weight_decay: ShortFpReal,
    pub momentum: ShortFpReal,
    /// Expected senders: fwd, bkp, lds, fsg, stp.
    pub expected: [u32; 5],
}

impl WeightCore {
    pub const SIZE: usize = 40;

    /// `<2Ii3h2x5I`
    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.num_rows)
            .u32(self.num_cols)
            .fixed(self.init_output)
            .fixed(self.learning_rate)
            .fixed(self.weight_decay)
            .fixed(self.momentum)
            .pad(2);
        for count in self.expected {
            w.u32(count);
        }
    }
}

/// Core of a Sum unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumCore {
    pub units: u32,
    pub fwd_expected: u32,
    pub bkp_expected: u32,
    pub lds_expected: u32,
    pub fsgn_expected: u32,
    pub bsgn_expected: u32,
    pub is_first_group: bool,
    pub is_tree_root: bool,
    /// Root of subgroup 0 of the first group: the global root.
    pub is_first_root: bool,
}

impl SumCore {
    pub const SIZE: usize = 28;

    /// `<6I3Bx`
    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.units)
            .u32(self.fwd_expected)
            .u32(self.bkp_expected)
            .u32(self.lds_expected)
            .u32(self.fsgn_expected)
            .u32(self.bsgn_expected)
            .u8(u8::from(self.is_first_group))
            .u8(u8::from(self.is_tree_root))
            .u8(u8::from(self.is_first_root))
            .pad(1);
    }
}

/// Core of an Input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputCore {
    pub output_grp: bool,
    pub input_grp: bool,
    pub units: u32,
    pub num_in_procs: u32,
    pub procs: [u8; MAX_IN_PROCS],
    pub in_integr_en: bool,
    pub in_integr_dt: FpReal,
    pub soft_clamp_strength: FpReal,
    pub init_net: FpReal,
    pub init_output: Activation,
}

impl InputCore {
    pub const SIZE: usize = 40;

    /// `<2B2x4IB3x4i`
    pub fn encode(&self, w: &mut WireWriter) {
        w.u8(u8::from(self.output_grp))
            .u8(u8::from(self.input_grp))
            .pad(2)
            .u32(self.units)
            .u32(self.num_in_procs);
        for proc in self.procs {
            w.u32(u32::from(proc));
        }
        w.u8(u8::from(self.in_integr_en))
            .pad(3)
            .fixed(self.in_integr_dt)
            .fixed(self.soft_clamp_strength)
            .fixed(self.init_net)
            .fixed(self.init_output);
    }
}

/// Core of a Threshold unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdCore {
    pub output_grp: bool,
    pub input_grp: bool,
    pub units: u32,
    pub partitions: u32,
    pub rec_test_results: bool,
    pub write_out: bool,
    pub last_tick_only: bool,
    pub write_blk: u32,
    pub hard_clamp_en: bool,
    pub out_integr_en: bool,
    pub out_integr_dt: FpReal,
    pub num_out_procs: u32,
    pub procs: [u8; MAX_OUT_PROCS],
    pub weak_clamp_strength: FpReal,
    pub init_output: Activation,
    pub tst_group_criterion: ErrorValue,
    pub trn_group_criterion: ErrorValue,
    pub criterion_function: u8,
    pub is_first_output_group: bool,
    pub is_last_output_group: bool,
    pub error_function: u8,
    /// Convergence decisions awaited from the chain predecessor.
    pub crit_expected: u32,
}

impl ThresholdCore {
    pub const SIZE: usize = 76;

    /// `<2B2x2I3BxI2B2xi6I4i4BI`
    pub fn encode(&self, w: &mut WireWriter) {
        w.u8(u8::from(self.output_grp))
            .u8(u8::from(self.input_grp))
            .pad(2)
            .u32(self.units)
            .u32(self.partitions)
            .u8(u8::from(self.rec_test_results))
            .u8(u8::from(self.write_out))
            .u8(u8::from(self.last_tick_only))
            .pad(1)
            .u32(self.write_blk)
            .u8(u8::from(self.hard_clamp_en))
            .u8(u8::from(self.out_integr_en))
            .pad(2)
            .fixed(self.out_integr_dt)
            .u32(self.num_out_procs);
        for proc in self.procs {
            w.u32(u32::from(proc));
        }
        w.fixed(self.weak_clamp_strength)
            .fixed(self.init_output)
            .fixed(self.tst_group_criterion)
            .fixed(self.trn_group_criterion)
            .u8(self.criterion_function)
            .u8(u8::from(self.is_first_output_group))
            .u8(u8::from(self.is_last_output_group))
            .u8(self.error_function)
            .u32(self.crit_expected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdpflow_fixed::FixedValue;

    #[test]
    fn test_weight_core_layout() {
        let core = WeightCore {
            num_rows: 10,
            num_cols: 4,
            init_output: Activation::from_f64(0.5),
            learning_rate: ShortFpReal::from_f64(0.1),
            weight_decay: ShortFpReal(0),
            momentum: ShortFpReal::from_f64(0.9),
            expected: [1, 1, 1, 2, 1],
        };
        let mut w = WireWriter::new();
        core.encode(&mut w);
        let b = w.as_bytes();
        assert_eq!(b.len(), WeightCore::SIZE);
        assert_eq!(&b[8..12], &(1i32 << 26).to_le_bytes());
        assert_eq!(&b[12..14], &3277i16.to_le_bytes());
        assert_eq!(&b[18..20], &[0, 0]);
        assert_eq!(&b[20..24], &[1, 0, 0, 0]);
        assert_eq!(&b[32..36], &[2, 0, 0, 0]);
    }

    #[test]
    fn test_sum_core_layout() {
        let core = SumCore {
            units: 10,
            fwd_expected: 3,
            bkp_expected: 3,
            lds_expected: 32,
            fsgn_expected: 5,
            bsgn_expected: 2,
            is_first_group: true,
            is_tree_root: true,
            is_first_root: true,
        };
        let mut w = WireWriter::new();
        core.encode(&mut w);
        let b = w.as_bytes();
        assert_eq!(b.len(), SumCore::SIZE);
        assert_eq!(&b[12..16], &[32, 0, 0, 0]);
        assert_eq!(&b[24..], &[1, 1, 1, 0]);
    }

    #[test]
    fn test_input_core_layout() {
        let core = InputCore {
            output_grp: true,
            input_grp: false,
            units: 6,
            num_in_procs: 1,
            procs: [0, 255],
            in_integr_en: true,
            in_integr_dt: FpReal::from_f64(0.25),
            soft_clamp_strength: FpReal::from_f64(0.5),
            init_net: FpReal(0),
            init_output: Activation::from_f64(0.5),
        };
        let mut w = WireWriter::new();
        core.encode(&mut w);
        let b = w.as_bytes();
        assert_eq!(b.len(), InputCore::SIZE);
        assert_eq!(&b[..4], &[1, 0, 0, 0]);
        assert_eq!(&b[16..20], &[255, 0, 0, 0]);
        assert_eq!(&b[20..24], &[1, 0, 0, 0]);
        assert_eq!(&b[24..28], &(1i32 << 14).to_le_bytes());
    }

    #[test]
    fn test_threshold_core_layout() {
        let core = ThresholdCore {
            output_grp: true,
            input_grp: false,
            units: 10,
            partitions: 1,
            rec_test_results: true,
            write_out: true,
            last_tick_only: false,
            write_blk: 0,
            hard_clamp_en: false,
            out_integr_en: true,
            out_integr_dt: FpReal::from_f64(1.0),
            num_out_procs: 2,
            procs: [0, 1, 255, 255, 255],
            weak_clamp_strength: FpReal::from_f64(0.5),
            init_output: Activation::from_f64(0.5),
            tst_group_criterion: ErrorValue::from_f64(0.0),
            trn_group_criterion: ErrorValue::from_f64(0.0),
            criterion_function: 1,
            is_first_output_group: true,
            is_last_output_group: true,
            error_function: 1,
            crit_expected: 0,
        };
        let mut w = WireWriter::new();
        core.encode(&mut w);
        let b = w.as_bytes();
        assert_eq!(b.len(), ThresholdCore::SIZE);
        assert_eq!(&b[12..16], &[1, 1, 0, 0]);
        assert_eq!(&b[20..24], &[0, 1, 0, 0]);
        assert_eq!(&b[24..28], &(1i32 << 16).to_le_bytes());
        assert_eq!(&b[36..40], &[1, 0, 0, 0]);
        assert_eq!(&b[68..72], &[1, 1, 1, 1]);
    }
}
