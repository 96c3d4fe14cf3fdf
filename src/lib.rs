//! # PCF8523 Real-Time Clock Driver
//!
//! A platform-agnostic driver for the NXP PCF8523 real-time clock, built on
//! `embedded-hal` traits.
//!
//! The crate has two layers:
//!
//! - A pure codec, one module per register group ([`control`], [`datetime`],
//!   [`alarm`], [`offset`], [`timer`]), translating between raw register bytes
//!   and typed values. It performs no I/O.
//! - The [`PCF8523`] facade, which binds register addresses to the codec and
//!   issues exactly one bus transaction per call through a [`RegisterBus`].
//!
//! ## Features
//!
//! - Time and date with a caller-supplied century, in 12 or 24-hour mode
//! - Alarm, offset calibration, countdown timers and CLKOUT configuration
//! - Control and status flags, including battery switchover
//! - Conversion to and from `chrono::NaiveDateTime`
//! - Optional async facade (`async` feature)
//! - Optional logging through `log` or `defmt`
//!
//! ## Usage
//!
//! ```
//! use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
//! use pcf8523::{I2cBus, DEFAULT_ADDRESS, PCF8523};
//!
//! let i2c = I2cMock::new(&[I2cTrans::write_read(
//!     DEFAULT_ADDRESS,
//!     vec![0x03],
//!     vec![0x00, 0x30, 0x15, 0x14, 0x04, 0x03, 0x24],
//! )]);
//! let mut rtc = PCF8523::new(I2cBus::new(i2c, DEFAULT_ADDRESS));
//!
//! let time = rtc.time().unwrap();
//! assert_eq!((time.year, time.month(), time.day), (2024, Some("March"), 14));
//! assert_eq!((time.hour, time.minute), (15, 30));
//!
//! rtc.release().release().done();
//! ```
//!
//! ## Configuration
//!
//! The device does not store the century, and the 12/24-hour mode used to
//! decode the hour registers is a property of the caller's setup. Both come
//! from [`Config`], set at construction and overridable per call through the
//! `*_with` accessors.

#![no_std]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! debug {
            ($($arg:tt)*) => { defmt::debug!($($arg)*) };
        }
        macro_rules! error {
            ($($arg:tt)*) => { defmt::error!($($arg)*) };
        }
    } else if #[cfg(feature = "log")] {
        macro_rules! debug {
            ($($arg:tt)*) => { log::debug!($($arg)*) };
        }
        macro_rules! error {
            ($($arg:tt)*) => { log::error!($($arg)*) };
        }
    } else {
        macro_rules! debug {
            ($($arg:tt)*) => {};
        }
        macro_rules! error {
            ($($arg:tt)*) => {};
        }
    }
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod bcd;
pub mod bits;
pub mod bus;
pub mod control;
pub mod datetime;
pub mod offset;
pub mod registers;
pub mod timer;

use core::fmt;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use alarm::{Alarm, AlarmDay, AlarmHour, AlarmMinute, AlarmWeekday};
pub use bus::{I2cBus, RegisterBus, DEFAULT_ADDRESS};
pub use control::{Control1, Control2, Control2Settings, Control3, Control3Settings, Profile};
pub use datetime::{CoreTime, Time};
pub use offset::Offset;
pub use registers::{
    CapacitorSelection, ClockOutFrequency, OffsetMode, PulseWidth, RegAddr, SourceClock,
    TimeRepresentation, TimerAMode,
};
pub use timer::{
    TimeUnit, Timer, TimerAFrequencyControl, TimerBFrequencyControl, TimerControl, TimerDuration,
};

use registers::{ALARM_LEN, PROFILE_LEN, RESET_MAGIC_VALUE, TIMER_LEN, TIME_LEN};

/// Errors produced while decoding or encoding register values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// The buffer is shorter than the register group
    Length {
        /// Bytes required by the register group
        expected: usize,
        /// Bytes available
        actual: usize,
    },
    /// A value is outside the domain of its register field
    Range(&'static str),
    /// A field required by the selected mode is missing
    MissingField(&'static str),
    /// A named value is not one of the known values
    UnknownValue(&'static str),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Length { expected, actual } => {
                write!(f, "expected {expected} register bytes, got {actual}")
            }
            CodecError::Range(message) => write!(f, "out of range: {message}"),
            CodecError::MissingField(field) => write!(f, "missing required field: {field}"),
            CodecError::UnknownValue(name) => write!(f, "unknown {name}"),
        }
    }
}

/// Errors returned by the device facades.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PCF8523Error<E> {
    /// The bus rejected a transaction
    Bus(E),
    /// Register data could not be decoded or a value could not be encoded
    Codec(CodecError),
}

impl<E> From<CodecError> for PCF8523Error<E> {
    fn from(e: CodecError) -> Self {
        PCF8523Error::Codec(e)
    }
}

/// Century used when none is configured.
pub const DEFAULT_CENTURY: u16 = 2000;

/// Facade configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// First year of the century the two-digit year register counts from
    pub century: u16,
    /// Hour mode used to decode and encode the hour registers
    pub time_representation: TimeRepresentation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            century: DEFAULT_CENTURY,
            time_representation: TimeRepresentation::TwentyFourHour,
        }
    }
}

impl Config {
    /// Applies per-call overrides.
    pub(crate) fn resolve(
        &self,
        representation: Option<TimeRepresentation>,
        century: Option<u16>,
    ) -> (TimeRepresentation, u16) {
        (
            representation.unwrap_or(self.time_representation),
            century.unwrap_or(self.century),
        )
    }
}

/// PCF8523 Real-Time Clock driver.
///
/// Every accessor performs a single read or write of a contiguous register
/// block on the bus `B`.
pub struct PCF8523<B: RegisterBus> {
    pub(crate) bus: B,
    config: Config,
}

impl<I2C: I2c> PCF8523<I2cBus<I2C>> {
    /// Creates a driver for the device at `address` on an I2C bus.
    pub fn from_i2c(i2c: I2C, address: u8) -> Self {
        Self::new(I2cBus::new(i2c, address))
    }
}

impl<B: RegisterBus> PCF8523<B> {
    /// Creates a driver with the default configuration (century 2000, 24-hour
    /// mode).
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, Config::default())
    }

    /// Creates a driver with the given configuration.
    pub fn with_config(bus: B, config: Config) -> Self {
        Self { bus, config }
    }

    /// The configuration set at construction.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Reads `N` registers starting at `register`, returning the data and the
    /// number of bytes the bus delivered.
    fn read_registers<const N: usize>(
        &mut self,
        register: RegAddr,
    ) -> Result<([u8; N], usize), PCF8523Error<B::Error>> {
        let mut data = [0u8; N];
        debug!("reading {} bytes from {:?}", N, register);
        let len = self
            .bus
            .read_block(register as u8, &mut data)
            .map_err(PCF8523Error::Bus)?;
        Ok((data, len.min(N)))
    }

    fn write_registers(
        &mut self,
        register: RegAddr,
        data: &[u8],
    ) -> Result<(), PCF8523Error<B::Error>> {
        debug!("writing {:?} to {:?}", data, register);
        self.bus
            .write_block(register as u8, data)
            .map_err(PCF8523Error::Bus)
    }

    /// Reads all three control registers.
    pub fn profile(&mut self) -> Result<Profile, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<PROFILE_LEN>(RegAddr::Control1)?;
        Ok(control::decode_profile(&data[..len])?)
    }

    /// Reads Control_2: interrupt flags and timer interrupt enables.
    pub fn control2(&mut self) -> Result<Control2, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::Control2)?;
        Ok(control::decode_control2(&data[..len])?)
    }

    /// Writes Control_2: interrupt enables plus the flags to clear.
    pub fn set_control2(
        &mut self,
        settings: &Control2Settings,
    ) -> Result<(), PCF8523Error<B::Error>> {
        self.write_registers(RegAddr::Control2, &[control::encode_control2(settings)])
    }

    /// Reads Control_3: power mode and battery status.
    pub fn control3(&mut self) -> Result<Control3, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::Control3)?;
        Ok(control::decode_control3(&data[..len])?)
    }

    /// Writes Control_3. Nothing is written for the reserved power mode.
    pub fn set_control3(
        &mut self,
        settings: &Control3Settings,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let value = control::encode_control3(settings)?;
        self.write_registers(RegAddr::Control3, &[value])
    }

    /// Reads the time registers with the configured hour mode and century.
    pub fn time(&mut self) -> Result<Time, PCF8523Error<B::Error>> {
        self.time_with(None, None)
    }

    /// Reads the time registers, overriding the hour mode and century.
    pub fn time_with(
        &mut self,
        representation: Option<TimeRepresentation>,
        century: Option<u16>,
    ) -> Result<Time, PCF8523Error<B::Error>> {
        let (representation, century) = self.config.resolve(representation, century);
        let (data, len) = self.read_registers::<TIME_LEN>(RegAddr::Seconds)?;
        Ok(datetime::decode_time(&data[..len], representation, century)?)
    }

    /// Writes the time registers with the configured hour mode and century.
    pub fn set_time(&mut self, time: &CoreTime) -> Result<(), PCF8523Error<B::Error>> {
        self.set_time_with(time, None, None)
    }

    /// Writes the time registers, overriding the hour mode and century.
    pub fn set_time_with(
        &mut self,
        time: &CoreTime,
        representation: Option<TimeRepresentation>,
        century: Option<u16>,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let (representation, century) = self.config.resolve(representation, century);
        let raw = datetime::encode_time(time, representation, century)?;
        self.write_registers(RegAddr::Seconds, &raw)
    }

    /// Reads the current date and time as a chrono `NaiveDateTime`.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, PCF8523Error<B::Error>> {
        Ok(self.time()?.to_naive_datetime()?)
    }

    /// Sets the date and time from a chrono `NaiveDateTime`.
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let time = CoreTime::from_naive_datetime(datetime, self.config.time_representation)?;
        self.set_time(&time)
    }

    /// Reads the four alarm registers.
    pub fn alarm(&mut self) -> Result<Alarm, PCF8523Error<B::Error>> {
        self.alarm_with(None)
    }

    /// Reads the four alarm registers, overriding the hour mode.
    pub fn alarm_with(
        &mut self,
        representation: Option<TimeRepresentation>,
    ) -> Result<Alarm, PCF8523Error<B::Error>> {
        let (representation, _) = self.config.resolve(representation, None);
        let (data, len) = self.read_registers::<ALARM_LEN>(RegAddr::MinuteAlarm)?;
        Ok(alarm::decode_alarm(&data[..len], representation)?)
    }

    /// Writes the four alarm registers.
    pub fn set_alarm(&mut self, alarm: &Alarm) -> Result<(), PCF8523Error<B::Error>> {
        self.set_alarm_with(alarm, None)
    }

    /// Writes the four alarm registers, overriding the hour mode.
    pub fn set_alarm_with(
        &mut self,
        alarm: &Alarm,
        representation: Option<TimeRepresentation>,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let (representation, _) = self.config.resolve(representation, None);
        let raw = alarm::encode_alarm(alarm, representation)?;
        self.write_registers(RegAddr::MinuteAlarm, &raw)
    }

    /// Writes the minute alarm register.
    pub fn set_alarm_minute(&mut self, minute: &AlarmMinute) -> Result<(), PCF8523Error<B::Error>> {
        let value = alarm::encode_alarm_minute(minute)?;
        self.write_registers(RegAddr::MinuteAlarm, &[value])
    }

    /// Writes the hour alarm register with the configured hour mode.
    pub fn set_alarm_hour(&mut self, hour: &AlarmHour) -> Result<(), PCF8523Error<B::Error>> {
        self.set_alarm_hour_with(hour, None)
    }

    /// Writes the hour alarm register, overriding the hour mode.
    pub fn set_alarm_hour_with(
        &mut self,
        hour: &AlarmHour,
        representation: Option<TimeRepresentation>,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let (representation, _) = self.config.resolve(representation, None);
        let value = alarm::encode_alarm_hour(hour, representation)?;
        self.write_registers(RegAddr::HourAlarm, &[value])
    }

    /// Writes the day alarm register.
    pub fn set_alarm_day(&mut self, day: &AlarmDay) -> Result<(), PCF8523Error<B::Error>> {
        let value = alarm::encode_alarm_day(day)?;
        self.write_registers(RegAddr::DayAlarm, &[value])
    }

    /// Writes the weekday alarm register.
    pub fn set_alarm_weekday(
        &mut self,
        weekday: &AlarmWeekday,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let value = alarm::encode_alarm_weekday(weekday)?;
        self.write_registers(RegAddr::WeekdayAlarm, &[value])
    }

    /// Reads the offset register.
    pub fn offset(&mut self) -> Result<Offset, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::Offset)?;
        Ok(offset::decode_offset(&data[..len])?)
    }

    /// Writes the offset register. `value` must be within -64..=63.
    pub fn set_offset(
        &mut self,
        mode: OffsetMode,
        value: i16,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let raw = offset::encode_offset(mode, value)?;
        self.write_registers(RegAddr::Offset, &[raw])
    }

    /// Reads the five timer registers.
    pub fn timer(&mut self) -> Result<Timer, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<TIMER_LEN>(RegAddr::TimerClockOutControl)?;
        Ok(timer::decode_timer(&data[..len])?)
    }

    /// Writes the five timer registers.
    pub fn set_timer(&mut self, timer: &Timer) -> Result<(), PCF8523Error<B::Error>> {
        self.write_registers(RegAddr::TimerClockOutControl, &timer::encode_timer(timer))
    }

    /// Reads the remaining ticks of timer A.
    pub fn timer_a_value(&mut self) -> Result<u8, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::TimerA)?;
        Ok(timer::decode_timer_value(&data[..len])?)
    }

    /// Loads timer A with `ticks` (0-255).
    pub fn set_timer_a_value(&mut self, ticks: i32) -> Result<(), PCF8523Error<B::Error>> {
        let value = timer::encode_timer_value(ticks)?;
        self.write_registers(RegAddr::TimerA, &[value])
    }

    /// Reads the remaining ticks of timer B.
    pub fn timer_b_value(&mut self) -> Result<u8, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::TimerB)?;
        Ok(timer::decode_timer_value(&data[..len])?)
    }

    /// Loads timer B with `ticks` (0-255).
    pub fn set_timer_b_value(&mut self, ticks: i32) -> Result<(), PCF8523Error<B::Error>> {
        let value = timer::encode_timer_value(ticks)?;
        self.write_registers(RegAddr::TimerB, &[value])
    }

    /// Performs a software reset of the device.
    pub fn soft_reset(&mut self) -> Result<(), PCF8523Error<B::Error>> {
        debug!("software reset");
        self.write_registers(RegAddr::Control1, &[RESET_MAGIC_VALUE])
    }
}

// Single-register accessors whose encoding cannot fail
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty, $decode:path, $encode:path)),+) => {
        impl<B: RegisterBus> PCF8523<B> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, PCF8523Error<B::Error>> {
                        let (data, len) = self.read_registers::<1>($regaddr)?;
                        Ok($decode(&data[..len])?)
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: &$typ) -> Result<(), PCF8523Error<B::Error>> {
                        self.write_registers($regaddr, &[$encode(value)])
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (
        control1,
        RegAddr::Control1,
        Control1,
        control::decode_control1,
        control::encode_control1
    ),
    (
        timer_control,
        RegAddr::TimerClockOutControl,
        TimerControl,
        timer::decode_timer_control,
        timer::encode_timer_control
    ),
    (
        timer_a_frequency_control,
        RegAddr::TimerAFrequencyControl,
        TimerAFrequencyControl,
        timer::decode_timer_a_frequency_control,
        timer::encode_timer_a_frequency_control
    ),
    (
        timer_b_frequency_control,
        RegAddr::TimerBFrequencyControl,
        TimerBFrequencyControl,
        timer::decode_timer_b_frequency_control,
        timer::encode_timer_b_frequency_control
    )
);
