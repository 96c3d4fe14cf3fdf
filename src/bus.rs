//! Register bus abstraction.
//!
//! The device facade does not talk to I2C directly. It reads and writes
//! contiguous register blocks through [`RegisterBus`], which keeps the codec
//! testable and lets the transport be swapped. [`I2cBus`] implements the
//! trait on top of any `embedded-hal` I2C bus.

use embedded_hal::i2c::I2c;

/// Default 7-bit I2C address of the PCF8523.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Largest number of register bytes sent in a single I2C write.
pub const MAX_BLOCK_LEN: usize = 7;

/// Blocking access to a contiguous range of device registers.
pub trait RegisterBus {
    /// Transport error.
    type Error;

    /// Reads registers starting at `register` into `buffer`.
    ///
    /// Returns the number of bytes actually read. Fewer bytes than
    /// `buffer.len()` are reported to the caller as a length error when the
    /// block is decoded.
    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Writes `data` to consecutive registers starting at `register`.
    fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_block(register, buffer)
    }

    fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_block(register, data)
    }
}

/// Splits a block write into frames of at most [`MAX_BLOCK_LEN`] data bytes,
/// each prefixed with its start register.
///
/// The device auto-increments the register address, so frame `n` starts
/// `n * MAX_BLOCK_LEN` registers after `register`.
pub(crate) fn frames(
    register: u8,
    data: &[u8],
) -> impl Iterator<Item = ([u8; MAX_BLOCK_LEN + 1], usize)> + '_ {
    data.chunks(MAX_BLOCK_LEN)
        .enumerate()
        .map(move |(index, chunk)| {
            let mut frame = [0u8; MAX_BLOCK_LEN + 1];
            // Register addresses are 8 bits wide and wrap like the device pointer
            frame[0] = register.wrapping_add((index * MAX_BLOCK_LEN) as u8);
            frame[1..=chunk.len()].copy_from_slice(chunk);
            (frame, chunk.len() + 1)
        })
}

/// [`RegisterBus`] over an I2C bus and a device address.
pub struct I2cBus<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

impl<I2C> I2cBus<I2C> {
    /// Creates a new bus for the device at `address` (typically
    /// [`DEFAULT_ADDRESS`]).
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// I2C address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Releases the underlying I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cBus<I2C> {
    type Error = I2C::Error;

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.write_read(self.address, &[register], buffer)?;
        debug!("read {:?} from {:?}", &buffer[..], register);
        Ok(buffer.len())
    }

    fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        for (frame, len) in frames(register, data) {
            debug!("write frame {:?}", &frame[..len]);
            self.i2c.write(self.address, &frame[..len])?;
        }
        Ok(())
    }
}
