// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

/// Fractional bits of an `fpreal` (Q15.16).
pub const FPREAL_SHIFT: u32 = 16;
/// Fractional bits of a `short_fpreal` (Q.15).
pub const SHORT_FPREAL_SHIFT: u32 = 15;
/// Fractional bits of an `activation_t` (Q4.27).
pub const ACTIV_SHIFT: u32 = 27;
/// Fractional bits of a recorded `short_activ_t` (unsigned 16-bit, Q.15).
pub const SHORT_ACTIV_SHIFT: u32 = 15;
/// Fractional bits of an `error_t` (Q17.15).
pub const ERROR_SHIFT: u32 = 15;
/// Fractional bits of a `weight_t` (Q17.15).
pub const WEIGHT_SHIFT: u32 = 15;

/// Reserved "absent" bit pattern shared by all 32-bit formats.
pub const NAN_PATTERN: i32 = i32::MIN;

/// Largest raw weight magnitude.
pub const WEIGHT_MAX_RAW: i32 = 0xffff << WEIGHT_SHIFT;

/// Largest representable weight.
pub const WF_MAX: f64 = WEIGHT_MAX_RAW as f64 / (1u32 << WEIGHT_SHIFT) as f64;
/// Smallest representable weight.
pub const WF_MIN: f64 = -WF_MAX;
/// Weight resolution.
pub const WF_EPS: f64 = 1.0 / (1u32 << WEIGHT_SHIFT) as f64;

/// One of the fixed-point representations used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedFormat {
    FpReal,
    ShortFpReal,
    Activation,
    Error,
    Weight,
}

/// Result of encoding a real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    pub raw: i32,
    /// The value fell outside the format's range and was clamped.
    pub saturated: bool,
}

impl FixedFormat {
    pub const ALL: [FixedFormat; 5] = [
        FixedFormat::FpReal,
        FixedFormat::ShortFpReal,
        FixedFormat::Activation,
        FixedFormat::Error,
        FixedFormat::Weight,
    ];

    pub fn shift(self) -> u32 {
        match self {
            Self::FpReal => FPREAL_SHIFT,
            Self::ShortFpReal => SHORT_FPREAL_SHIFT,
            Self::Activation => ACTIV_SHIFT,
            Self::Error => ERROR_SHIFT,
            Self::Weight => WEIGHT_SHIFT,
        }
    }

    /// Width of the raw representation in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::ShortFpReal => 16,
            _ => 32,
        }
    }

    /// Whether the format reserves [`NAN_PATTERN`] for absent values.
    pub fn has_nan(self) -> bool {
        !matches!(self, Self::ShortFpReal)
    }

    pub fn raw_min(self) -> i32 {
        match self {
            Self::ShortFpReal => i16::MIN as i32,
            Self::Weight => -WEIGHT_MAX_RAW,
            _ => NAN_PATTERN + 1,
        }
    }

    pub fn raw_max(self) -> i32 {
        match self {
            Self::ShortFpReal => i16::MAX as i32,
            Self::Weight => WEIGHT_MAX_RAW,
            _ => i32::MAX,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FpReal => "fpreal",
            Self::ShortFpReal => "short_fpreal",
            Self::Activation => "activation_t",
            Self::Error => "error_t",
            Self::Weight => "weight_t",
        }
    }

    fn scale(self) -> f64 {
        (1u64 << self.shift()) as f64
    }

    /// Convert a real value, rounding half away from zero and saturating.
    ///
    /// NaN encodes to [`NAN_PATTERN`] where the format has one, and to zero
    /// otherwise.
    pub fn encode(self, value: f64) -> Encoded {
        if value.is_nan() {
            let raw = if self.has_nan() { NAN_PATTERN } else { 0 };
            return Encoded {
                raw,
                saturated: false,
            };
        }

        let scaled = (value * self.scale()).round();
        let (lo, hi) = (self.raw_min() as f64, self.raw_max() as f64);

        if scaled < lo {
            Encoded {
                raw: self.raw_min(),
                saturated: true,
            }
        } else if scaled > hi {
            Encoded {
                raw: self.raw_max(),
                saturated: true,
            }
        } else {
            Encoded {
                raw: scaled as i32,
                saturated: false,
            }
        }
    }

    /// Encode an optional value; `None` is treated as absent.
    pub fn encode_opt(self, value: Option<f64>) -> Encoded {
        self.encode(value.unwrap_or(f64::NAN))
    }

    /// Convert a raw value back to a real, `None` for the absent pattern.
    pub fn decode(self, raw: i32) -> Option<f64> {
        if self.has_nan() && raw == NAN_PATTERN {
            return None;
        }
        Some(raw as f64 / self.scale())
    }
}

impl fmt::Display for FixedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds() {
        assert_eq!(WEIGHT_MAX_RAW, 0x7fff_8000);
        assert_eq!(WF_MAX, 65535.0);
        assert_eq!(WF_MIN, -65535.0);
        assert_eq!(WF_EPS, 1.0 / 32768.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        // 0.5 LSB either side of zero
        let half = 0.5 / (1u32 << 16) as f64;
        assert_eq!(FixedFormat::FpReal.encode(half).raw, 1);
        assert_eq!(FixedFormat::FpReal.encode(-half).raw, -1);
        assert_eq!(FixedFormat::FpReal.encode(1.0).raw, 1 << 16);
        assert_eq!(FixedFormat::Activation.encode(0.5).raw, 1 << 26);
    }

    #[test]
    fn test_saturation_never_hits_nan_pattern() {
        let low = FixedFormat::FpReal.encode(-1.0e12);
        assert!(low.saturated);
        assert_eq!(low.raw, NAN_PATTERN + 1);

        let high = FixedFormat::Activation.encode(f64::INFINITY);
        assert!(high.saturated);
        assert_eq!(high.raw, i32::MAX);
    }

    #[test]
    fn test_weight_saturates_to_wf_bounds() {
        let enc = FixedFormat::Weight.encode(70000.0);
        assert!(enc.saturated);
        assert_eq!(enc.raw, WEIGHT_MAX_RAW);

        let enc = FixedFormat::Weight.encode(-70000.0);
        assert!(enc.saturated);
        assert_eq!(enc.raw, -WEIGHT_MAX_RAW);

        let enc = FixedFormat::Weight.encode(WF_MAX);
        assert!(!enc.saturated);
    }

    #[test]
    fn test_short_fpreal_range() {
        assert_eq!(FixedFormat::ShortFpReal.encode(0.1).raw, 3277);
        let enc = FixedFormat::ShortFpReal.encode(1.0);
        assert!(enc.saturated);
        assert_eq!(enc.raw, i16::MAX as i32);
        assert_eq!(FixedFormat::ShortFpReal.encode(f64::NAN).raw, 0);
    }

    #[test]
    fn test_absent_values() {
        for format in FixedFormat::ALL {
            if format.has_nan() {
                assert_eq!(format.encode_opt(None).raw, NAN_PATTERN);
                assert_eq!(format.decode(NAN_PATTERN), None);
            }
        }
    }

    #[test]
    fn test_decode() {
        assert_eq!(FixedFormat::Error.decode(1 << 15), Some(1.0));
        assert_eq!(FixedFormat::FpReal.decode(-(1 << 15)), Some(-0.5));
    }
}
