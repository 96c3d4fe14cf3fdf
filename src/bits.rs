//! Bit extraction and packing helpers.
//!
//! Fields are described the way the PCF8523 datasheet draws register layouts:
//! by the position of their most significant bit and their width. A field
//! `(6, 3)` covers bits 6, 5 and 4; bit 0 is the least significant bit.

use crate::CodecError;

/// A contiguous run of bits inside a register byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    /// Position of the most significant bit of the field
    pub msb: u8,
    /// Number of bits in the field
    pub width: u8,
}

impl BitField {
    /// Creates a field of `width` bits whose most significant bit is `msb`.
    pub const fn new(msb: u8, width: u8) -> Self {
        Self { msb, width }
    }

    /// Creates a single-bit field.
    pub const fn bit(position: u8) -> Self {
        Self::new(position, 1)
    }

    /// Number of positions the field is shifted up from bit 0.
    pub const fn shift(self) -> u8 {
        self.msb + 1 - self.width
    }

    /// Right-aligned mask of the field width (`0b111` for a 3-bit field).
    pub const fn mask(self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Mask of the field at its position in the register byte.
    pub const fn register_mask(self) -> u8 {
        self.mask() << self.shift()
    }
}

/// Returns the right-shifted, width-masked value of `field` within `value`.
pub const fn extract_bits(value: u8, field: BitField) -> u8 {
    (value >> field.shift()) & field.mask()
}

/// Packs `(field, value)` pairs into one byte.
///
/// Values wider than their field are truncated to the field width. Bits not
/// covered by any field are left at 0. Fields must not overlap.
pub fn pack_bits(fields: &[(BitField, u8)]) -> u8 {
    let mut covered = 0u8;
    fields.iter().fold(0u8, |byte, &(field, value)| {
        debug_assert!(
            covered & field.register_mask() == 0,
            "overlapping bit fields"
        );
        covered |= field.register_mask();
        byte | ((value & field.mask()) << field.shift())
    })
}

/// Copies the first `N` bytes of a register block, failing with a length
/// error when the buffer is shorter than the register group.
pub(crate) fn register_block<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CodecError> {
    bytes
        .get(..N)
        .and_then(|block| <[u8; N]>::try_from(block).ok())
        .ok_or(CodecError::Length {
            expected: N,
            actual: bytes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_geometry() {
        let tens = BitField::new(6, 3);
        assert_eq!(tens.shift(), 4);
        assert_eq!(tens.mask(), 0b111);
        assert_eq!(tens.register_mask(), 0b0111_0000);

        let whole = BitField::new(7, 8);
        assert_eq!(whole.shift(), 0);
        assert_eq!(whole.mask(), 0xFF);

        let flag = BitField::bit(2);
        assert_eq!(flag.register_mask(), 0b0000_0100);
    }

    #[test]
    fn test_extract_bits() {
        assert_eq!(extract_bits(0b1110_0000, BitField::new(7, 3)), 0b111);
        assert_eq!(extract_bits(0b0101_1001, BitField::new(6, 3)), 0b101);
        assert_eq!(extract_bits(0b0101_1001, BitField::new(3, 4)), 0b1001);
        assert_eq!(extract_bits(0b1000_0000, BitField::bit(7)), 1);
        assert_eq!(extract_bits(0b0111_1111, BitField::bit(7)), 0);
    }

    #[test]
    fn test_pack_bits() {
        let byte = pack_bits(&[
            (BitField::new(7, 3), 0b110),
            (BitField::bit(3), 1),
            (BitField::bit(2), 1),
            (BitField::bit(0), 1),
        ]);
        assert_eq!(byte, 0b1100_1101);
    }

    #[test]
    fn test_pack_bits_truncates_wide_values() {
        assert_eq!(pack_bits(&[(BitField::new(1, 2), 0b111)]), 0b0000_0011);
    }

    #[test]
    fn test_pack_then_extract() {
        let fields = [BitField::bit(7), BitField::new(6, 3), BitField::new(3, 4)];
        let byte = pack_bits(&[(fields[0], 1), (fields[1], 0b011), (fields[2], 0b1001)]);
        assert_eq!(extract_bits(byte, fields[0]), 1);
        assert_eq!(extract_bits(byte, fields[1]), 0b011);
        assert_eq!(extract_bits(byte, fields[2]), 0b1001);
    }

    #[test]
    #[should_panic(expected = "overlapping bit fields")]
    fn test_pack_bits_rejects_overlap() {
        let _ = pack_bits(&[(BitField::new(5, 2), 1), (BitField::bit(4), 1)]);
    }

    #[test]
    fn test_register_block() {
        assert_eq!(register_block::<2>(&[1, 2, 3]).unwrap(), [1, 2]);
        assert!(matches!(
            register_block::<3>(&[1]),
            Err(CodecError::Length {
                expected: 3,
                actual: 1
            })
        ));
        assert!(matches!(
            register_block::<1>(&[]),
            Err(CodecError::Length {
                expected: 1,
                actual: 0
            })
        ));
    }
}
