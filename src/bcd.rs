//! Binary-coded decimal fields.
//!
//! Every time, date and alarm value in the PCF8523 is stored as a tens digit
//! and a units digit packed into one register byte. The width of the tens
//! digit depends on the register, so each field carries its own layout.

use core::ops::RangeInclusive;

use crate::bits::{extract_bits, pack_bits, BitField};
use crate::CodecError;

/// Bit positions of the tens and units digits of a BCD register field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BcdLayout {
    /// Tens digit
    pub tens: BitField,
    /// Units digit
    pub units: BitField,
}

impl BcdLayout {
    /// Creates a layout from the `(msb, width)` pairs of both digits.
    pub const fn new(tens_msb: u8, tens_width: u8, units_msb: u8, units_width: u8) -> Self {
        Self {
            tens: BitField::new(tens_msb, tens_width),
            units: BitField::new(units_msb, units_width),
        }
    }

    /// Largest value whose tens digit fits the layout.
    pub const fn max_value(self) -> u8 {
        self.tens.mask() * 10 + 9
    }
}

/// Seconds (0-59)
pub const SECONDS: BcdLayout = BcdLayout::new(6, 3, 3, 4);
/// Minutes (0-59), also used by the minute alarm
pub const MINUTES: BcdLayout = BcdLayout::new(6, 3, 3, 4);
/// Hours in 24-hour mode (0-23)
pub const HOURS_24: BcdLayout = BcdLayout::new(5, 2, 3, 4);
/// Hours in 12-hour mode (1-12), the AM/PM flag sits in bit 5
pub const HOURS_12: BcdLayout = BcdLayout::new(4, 1, 3, 4);
/// Day of month (1-31)
pub const DAYS: BcdLayout = BcdLayout::new(5, 2, 3, 4);
/// Month (1-12)
pub const MONTHS: BcdLayout = BcdLayout::new(4, 1, 3, 4);
/// Two-digit year (0-99)
pub const YEARS: BcdLayout = BcdLayout::new(7, 4, 3, 4);

/// Decodes the BCD field described by `layout`.
///
/// No validation is done: a units nibble above 9 is passed through as-is.
pub const fn decode_bcd(byte: u8, layout: BcdLayout) -> u8 {
    10 * extract_bits(byte, layout.tens) + extract_bits(byte, layout.units)
}

/// Encodes `value` into the BCD field described by `layout`.
///
/// Bits outside the layout are 0.
///
/// # Errors
///
/// Returns [`CodecError::Range`] if the tens digit does not fit the layout.
pub fn encode_bcd(value: u8, layout: BcdLayout) -> Result<u8, CodecError> {
    if value > layout.max_value() {
        return Err(CodecError::Range("value does not fit the BCD field"));
    }
    let tens = value / 10;
    let units = value - 10 * tens;
    Ok(pack_bits(&[(layout.tens, tens), (layout.units, units)]))
}

/// Encodes `value` after checking it against the domain of the field.
pub(crate) fn encode_bcd_in(
    value: u8,
    domain: RangeInclusive<u8>,
    layout: BcdLayout,
    message: &'static str,
) -> Result<u8, CodecError> {
    if !domain.contains(&value) {
        return Err(CodecError::Range(message));
    }
    encode_bcd(value, layout)
}
