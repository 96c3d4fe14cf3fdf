//! Alarm registers (0x0A to 0x0D).
//!
//! The PCF8523 has a single alarm built from four registers: minute, hour,
//! day of month and weekday. Each register carries its own enable bit, and
//! the alarm fires when every enabled register matches the current time.
//!
//! # Enable bit
//!
//! Bit 7 of each alarm register is active low: 0 enables the field, 1
//! disables it. The `Default` of every type in this module is a disabled
//! field with value 0; the `at` constructors build enabled fields.
//!
//! # Example
//!
//! ```
//! use pcf8523::alarm::{encode_alarm, Alarm, AlarmHour, AlarmMinute};
//! use pcf8523::TimeRepresentation;
//!
//! // Every day at 07:30
//! let alarm = Alarm {
//!     minute: AlarmMinute::at(30),
//!     hour: AlarmHour::at(7),
//!     ..Default::default()
//! };
//! let raw = encode_alarm(&alarm, TimeRepresentation::TwentyFourHour).unwrap();
//! assert_eq!(raw, [0x30, 0x07, 0x80, 0x80]);
//! ```

use crate::bcd::{self, decode_bcd, encode_bcd_in};
use crate::bits::{extract_bits, pack_bits, register_block};
use crate::datetime::{decode_hour, encode_hour, encode_weekday, hour24, weekday_name};
use crate::registers::{TimeRepresentation, ALARM_DISABLE, ALARM_LEN, WEEKDAY};
use crate::CodecError;

/// Minute alarm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmMinute {
    /// Minute (0-59)
    pub minute: u8,
    pub enabled: bool,
}

impl AlarmMinute {
    /// Enabled minute alarm.
    pub const fn at(minute: u8) -> Self {
        Self {
            minute,
            enabled: true,
        }
    }
}

/// Hour alarm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmHour {
    /// Hour, 0-23 in 24-hour mode or 1-12 in 12-hour mode
    pub hour: u8,
    /// PM flag, required in 12-hour mode
    pub pm: Option<bool>,
    pub enabled: bool,
}

impl AlarmHour {
    /// Enabled hour alarm in 24-hour mode.
    pub const fn at(hour: u8) -> Self {
        Self {
            hour,
            pm: None,
            enabled: true,
        }
    }

    /// Enabled hour alarm in 12-hour mode.
    pub const fn at_12h(hour: u8, pm: bool) -> Self {
        Self {
            hour,
            pm: Some(pm),
            enabled: true,
        }
    }

    /// 24-hour value of the alarm hour, see [`crate::datetime::hour24`].
    pub const fn hour24(&self) -> u8 {
        hour24(self.hour, self.pm)
    }
}

/// Day of month alarm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmDay {
    /// Day of month (1-31)
    pub day: u8,
    pub enabled: bool,
}

impl AlarmDay {
    /// Enabled day alarm.
    pub const fn at(day: u8) -> Self {
        Self { day, enabled: true }
    }
}

/// Weekday alarm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmWeekday {
    /// Weekday index (0 = Sunday)
    pub weekday: u8,
    pub enabled: bool,
}

impl AlarmWeekday {
    /// Enabled weekday alarm.
    pub const fn at(weekday: u8) -> Self {
        Self {
            weekday,
            enabled: true,
        }
    }

    /// English name of the weekday.
    pub fn name(&self) -> Option<&'static str> {
        weekday_name(self.weekday)
    }
}

/// The four alarm registers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    pub minute: AlarmMinute,
    pub hour: AlarmHour,
    pub day: AlarmDay,
    pub weekday: AlarmWeekday,
}

impl Alarm {
    /// Returns true when no register takes part in the match.
    pub const fn is_disabled(&self) -> bool {
        !(self.minute.enabled || self.hour.enabled || self.day.enabled || self.weekday.enabled)
    }
}

const fn is_enabled(byte: u8) -> bool {
    extract_bits(byte, ALARM_DISABLE) == 0
}

fn disable_bit(enabled: bool) -> u8 {
    pack_bits(&[(ALARM_DISABLE, (!enabled).into())])
}

/// Decodes the minute alarm.
pub fn decode_alarm_minute(bytes: &[u8]) -> Result<AlarmMinute, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    Ok(AlarmMinute {
        minute: decode_bcd(raw, bcd::MINUTES),
        enabled: is_enabled(raw),
    })
}

/// Encodes the minute alarm.
pub fn encode_alarm_minute(alarm: &AlarmMinute) -> Result<u8, CodecError> {
    let value = encode_bcd_in(alarm.minute, 0..=59, bcd::MINUTES, "alarm minute must be 0-59")?;
    Ok(value | disable_bit(alarm.enabled))
}

/// Decodes the hour alarm in the given hour mode.
pub fn decode_alarm_hour(
    bytes: &[u8],
    representation: TimeRepresentation,
) -> Result<AlarmHour, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let (hour, pm) = decode_hour(raw, representation);
    Ok(AlarmHour {
        hour,
        pm,
        enabled: is_enabled(raw),
    })
}

/// Encodes the hour alarm.
///
/// # Errors
///
/// [`CodecError::MissingField`] when `pm` is missing in 12-hour mode, and
/// [`CodecError::Range`] when the hour is out of range for the mode.
pub fn encode_alarm_hour(
    alarm: &AlarmHour,
    representation: TimeRepresentation,
) -> Result<u8, CodecError> {
    let value = encode_hour(alarm.hour, alarm.pm, representation)?;
    Ok(value | disable_bit(alarm.enabled))
}

/// Decodes the day alarm.
pub fn decode_alarm_day(bytes: &[u8]) -> Result<AlarmDay, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    Ok(AlarmDay {
        day: decode_bcd(raw, bcd::DAYS),
        enabled: is_enabled(raw),
    })
}

/// Encodes the day alarm.
///
/// An enabled day must be 1-31. A disabled field does not take part in the
/// match, so its default day 0 is still written.
pub fn encode_alarm_day(alarm: &AlarmDay) -> Result<u8, CodecError> {
    let domain = if alarm.enabled { 1..=31 } else { 0..=31 };
    let value = encode_bcd_in(alarm.day, domain, bcd::DAYS, "alarm day must be 1-31")?;
    Ok(value | disable_bit(alarm.enabled))
}

/// Decodes the weekday alarm.
pub fn decode_alarm_weekday(bytes: &[u8]) -> Result<AlarmWeekday, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    Ok(AlarmWeekday {
        weekday: extract_bits(raw, WEEKDAY),
        enabled: is_enabled(raw),
    })
}

/// Encodes the weekday alarm. The weekday must be 0-6.
pub fn encode_alarm_weekday(alarm: &AlarmWeekday) -> Result<u8, CodecError> {
    let value = encode_weekday(alarm.weekday)?;
    Ok(value | disable_bit(alarm.enabled))
}

/// Decodes the four alarm registers.
pub fn decode_alarm(bytes: &[u8], representation: TimeRepresentation) -> Result<Alarm, CodecError> {
    let raw = register_block::<ALARM_LEN>(bytes)?;
    Ok(Alarm {
        minute: decode_alarm_minute(&raw[0..1])?,
        hour: decode_alarm_hour(&raw[1..2], representation)?,
        day: decode_alarm_day(&raw[2..3])?,
        weekday: decode_alarm_weekday(&raw[3..4])?,
    })
}

/// Encodes the four alarm registers.
pub fn encode_alarm(
    alarm: &Alarm,
    representation: TimeRepresentation,
) -> Result<[u8; ALARM_LEN], CodecError> {
    let raw = [
        encode_alarm_minute(&alarm.minute)?,
        encode_alarm_hour(&alarm.hour, representation)?,
        encode_alarm_day(&alarm.day)?,
        encode_alarm_weekday(&alarm.weekday)?,
    ];
    debug!("alarm raw={:?}", raw);
    Ok(raw)
}
