// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::format::{Encoded, FixedFormat, NAN_PATTERN};
use crate::wire::WireWriter;
use std::fmt;

/// A typed fixed-point quantity that knows its wire format.
pub trait FixedValue: Copy {
    const FORMAT: FixedFormat;

    /// Convert, returning whether the value saturated.
    fn encode(value: f64) -> (Self, bool);

    /// Raw integer as it appears on the wire, sign-extended to 32 bits.
    fn raw(self) -> i32;

    /// Append the little-endian raw value to a payload.
    fn write_to(self, writer: &mut WireWriter);

    fn from_f64(value: f64) -> Self {
        Self::encode(value).0
    }

    fn to_f64(self) -> Option<f64> {
        Self::FORMAT.decode(self.raw())
    }
}

macro_rules! fixed_type {
    ($(#[$meta:meta])* $name:ident, $raw:ty, $format:expr, $put:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub $raw);

        impl FixedValue for $name {
            const FORMAT: FixedFormat = $format;

            fn encode(value: f64) -> (Self, bool) {
                let Encoded { raw, saturated } = Self::FORMAT.encode(value);
                (Self(raw as $raw), saturated)
            }

            fn raw(self) -> i32 {
                self.0 as i32
            }

            fn write_to(self, writer: &mut WireWriter) {
                writer.$put(self.0);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.to_f64() {
                    Some(v) => write!(f, "{}", v),
                    None => write!(f, "NaN"),
                }
            }
        }
    };
}

fixed_type!(
    /// Q15.16 general-purpose real.
    FpReal, i32, FixedFormat::FpReal, i32
);
fixed_type!(
    /// Q.15 real for learning parameters.
    ShortFpReal, i16, FixedFormat::ShortFpReal, i16
);
fixed_type!(
    /// Q4.27 unit activation.
    Activation, i32, FixedFormat::Activation, i32
);
fixed_type!(
    /// Q17.15 error or convergence criterion.
    ErrorValue, i32, FixedFormat::Error, i32
);
fixed_type!(
    /// Q17.15 connection weight, saturating at `WF_MIN`/`WF_MAX`.
    WeightValue, i32, FixedFormat::Weight, i32
);

macro_rules! absent_value {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// The reserved "absent" value.
                pub const ABSENT: Self = Self(NAN_PATTERN);

                pub fn from_option(value: Option<f64>) -> Self {
                    value.map_or(Self::ABSENT, Self::from_f64)
                }

                pub fn is_absent(self) -> bool {
                    self.0 == NAN_PATTERN
                }
            }
        )*
    };
}

absent_value!(FpReal, Activation, ErrorValue, WeightValue);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_encode() {
        assert_eq!(FpReal::from_f64(1.5), FpReal(0x0001_8000));
        assert_eq!(ShortFpReal::from_f64(0.9), ShortFpReal(29491));
        assert_eq!(Activation::from_f64(1.0), Activation(1 << 27));
        assert_eq!(ErrorValue::from_f64(0.0), ErrorValue(0));
    }

    #[test]
    fn test_weight_saturation_reported() {
        let (w, saturated) = WeightValue::encode(1.0e6);
        assert!(saturated);
        assert_eq!(w.to_f64(), Some(crate::WF_MAX));

        let (w, saturated) = WeightValue::encode(-2.25);
        assert!(!saturated);
        assert_eq!(w.to_f64(), Some(-2.25));
    }

    #[test]
    fn test_absent() {
        assert!(Activation::from_option(None).is_absent());
        assert!(FpReal::from_f64(f64::NAN).is_absent());
        assert_eq!(Activation::ABSENT.to_f64(), None);
        assert_eq!(Activation::ABSENT.to_string(), "NaN");
        assert!(!Activation::from_option(Some(0.25)).is_absent());
    }
}
