//! Offset register (0x0E).
//!
//! The offset register trims the oscillator by adding or removing correction
//! pulses. Bit 7 selects how often the correction is applied, bits 6..0 hold
//! a signed 7-bit two's complement step count.

use crate::bits::register_block;
use crate::registers::{OffsetMode, OffsetRegister};
use crate::CodecError;

/// Smallest value of a 7-bit two's complement field.
pub const OFFSET_MIN: i16 = -64;
/// Largest value of a 7-bit two's complement field.
pub const OFFSET_MAX: i16 = 63;

const SEVEN_BITS: u8 = 0x7F;
const SIGN_BIT: u8 = 0x40;

/// Decodes a 7-bit two's complement value. Bit 7 of `raw` is ignored.
pub const fn decode_7bit_twos_complement(raw: u8) -> i8 {
    let raw = raw & SEVEN_BITS;
    if raw & SIGN_BIT != 0 {
        -(((!raw & SEVEN_BITS) + 1) as i8)
    } else {
        raw as i8
    }
}

/// Encodes `value` as a 7-bit two's complement field.
///
/// # Errors
///
/// Returns [`CodecError::Range`] when `value` is outside -64..=63.
pub fn encode_7bit_twos_complement(value: i16) -> Result<u8, CodecError> {
    if !(OFFSET_MIN..=OFFSET_MAX).contains(&value) {
        return Err(CodecError::Range("offset must be -64..=63"));
    }
    // The range check above makes both casts lossless.
    if value >= 0 {
        Ok(value as u8)
    } else {
        Ok(!((-value - 1) as u8) & SEVEN_BITS)
    }
}

impl OffsetMode {
    /// Correction applied by one offset step, in parts per million.
    pub const fn ppm_per_step(self) -> f64 {
        match self {
            OffsetMode::EveryTwoHours => 4.34,
            OffsetMode::EveryMinute => 4.069,
        }
    }
}

/// Decoded offset register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Offset {
    pub mode: OffsetMode,
    /// Signed step count (-64..=63)
    pub value: i8,
}

impl Offset {
    /// Offset in parts per million.
    pub fn ppm(&self) -> f64 {
        f64::from(self.value) * self.mode.ppm_per_step()
    }
}

/// Decodes the offset register.
pub fn decode_offset(bytes: &[u8]) -> Result<Offset, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let register = OffsetRegister::from(raw);
    Ok(Offset {
        mode: register.mode(),
        value: decode_7bit_twos_complement(register.raw_offset()),
    })
}

/// Encodes the offset register.
///
/// `value` is taken as `i16` so that out-of-range requests can be reported
/// instead of wrapping.
pub fn encode_offset(mode: OffsetMode, value: i16) -> Result<u8, CodecError> {
    let mut register = OffsetRegister::default();
    register.set_mode(mode);
    register.set_raw_offset(encode_7bit_twos_complement(value)?);
    Ok(register.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_twos_complement() {
        assert_eq!(decode_7bit_twos_complement(0), 0);
        assert_eq!(decode_7bit_twos_complement(0x3F), 63);
        assert_eq!(decode_7bit_twos_complement(0x7F), -1);
        assert_eq!(decode_7bit_twos_complement(0x7E), -2);
        assert_eq!(decode_7bit_twos_complement(0x41), -63);
        assert_eq!(decode_7bit_twos_complement(0x40), -64);
        assert_eq!(decode_7bit_twos_complement(0xFF), -1);
    }

    #[test]
    fn test_twos_complement_round_trip() {
        for value in OFFSET_MIN..=OFFSET_MAX {
            let raw = encode_7bit_twos_complement(value).unwrap();
            assert_eq!(raw & 0x80, 0);
            assert_eq!(i16::from(decode_7bit_twos_complement(raw)), value);
        }
    }

    #[test]
    fn test_twos_complement_bounds() {
        assert!(encode_7bit_twos_complement(63).is_ok());
        assert!(encode_7bit_twos_complement(-64).is_ok());
        assert!(matches!(
            encode_7bit_twos_complement(64),
            Err(CodecError::Range(_))
        ));
        assert!(matches!(
            encode_7bit_twos_complement(-65),
            Err(CodecError::Range(_))
        ));
    }

    #[test]
    fn test_decode_offset() {
        let offset = decode_offset(&[0]).unwrap();
        assert_eq!(offset.mode, OffsetMode::EveryTwoHours);
        assert_eq!(offset.value, 0);
        assert_eq!(offset.ppm(), 0.0);

        let offset = decode_offset(&[0b0101_0110]).unwrap();
        assert_eq!(offset.mode, OffsetMode::EveryTwoHours);
        assert_eq!(offset.value, -42);
        assert_eq!(offset.ppm(), -42.0 * 4.34);

        let offset = decode_offset(&[0b1101_0110]).unwrap();
        assert_eq!(offset.mode, OffsetMode::EveryMinute);
        assert_eq!(offset.value, -42);
        assert_eq!(offset.ppm(), -42.0 * 4.069);
    }

    #[test]
    fn test_encode_offset() {
        assert_eq!(encode_offset(OffsetMode::EveryMinute, 42).unwrap(), 0b1010_1010);
        assert_eq!(encode_offset(OffsetMode::EveryMinute, -42).unwrap(), 0b1101_0110);
        assert_eq!(encode_offset(OffsetMode::EveryMinute, 0).unwrap(), 0b1000_0000);
        assert_eq!(encode_offset(OffsetMode::EveryTwoHours, -42).unwrap(), 0b0101_0110);
        assert!(encode_offset(OffsetMode::EveryTwoHours, 100).is_err());
    }

    #[test]
    fn test_decode_offset_empty() {
        assert!(matches!(
            decode_offset(&[]),
            Err(CodecError::Length {
                expected: 1,
                actual: 0
            })
        ));
    }
}
