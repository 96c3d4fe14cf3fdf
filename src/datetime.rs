//! Time registers (0x03 to 0x09) and calendar conversion.
//!
//! The PCF8523 keeps seconds, minutes, hours, day of month, weekday, month and
//! a two-digit year in seven consecutive BCD registers. The century is not
//! stored by the device; it is supplied by the caller on every conversion.
//!
//! # Hour handling
//!
//! In 12-hour mode the hours register holds 1-12 plus a PM flag. The derived
//! 24-hour value is `hour + 12` when PM is set and `hour` otherwise, without
//! remapping 12 o'clock: 12 AM reads as hour 12 and 12 PM as hour 24.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::bcd::{self, decode_bcd, encode_bcd_in};
use crate::bits::{extract_bits, pack_bits, register_block};
use crate::registers::{TimeRepresentation, OSCILLATOR_STOP, PM_FLAG, TIME_LEN, WEEKDAY};
use crate::CodecError;

/// English weekday names, indexed from Sunday.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// English month names, indexed from January.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of the weekday at `index` (0 = Sunday).
pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAYS.get(usize::from(index)).copied()
}

/// Name of month number `month` (1 = January). Month 0 has no name.
pub fn month_name(month: u8) -> Option<&'static str> {
    usize::from(month)
        .checked_sub(1)
        .and_then(|index| MONTHS.get(index))
        .copied()
}

/// 24-hour value of an hour register: `hour + 12` when `pm` is set.
///
/// Saturates at `u8::MAX` for hours no register can hold.
pub const fn hour24(hour: u8, pm: Option<bool>) -> u8 {
    match pm {
        Some(true) => hour.saturating_add(12),
        _ => hour,
    }
}

/// Decodes an hours or hour-alarm register, returning the hour and, in
/// 12-hour mode, the PM flag.
pub(crate) fn decode_hour(byte: u8, representation: TimeRepresentation) -> (u8, Option<bool>) {
    match representation {
        TimeRepresentation::TwentyFourHour => (decode_bcd(byte, bcd::HOURS_24), None),
        TimeRepresentation::TwelveHour => (
            decode_bcd(byte, bcd::HOURS_12),
            Some(extract_bits(byte, PM_FLAG) == 1),
        ),
    }
}

/// Encodes an hours or hour-alarm register. `pm` is ignored in 24-hour mode
/// and required in 12-hour mode.
pub(crate) fn encode_hour(
    hour: u8,
    pm: Option<bool>,
    representation: TimeRepresentation,
) -> Result<u8, CodecError> {
    match representation {
        TimeRepresentation::TwentyFourHour => {
            encode_bcd_in(hour, 0..=23, bcd::HOURS_24, "hour must be 0-23")
        }
        TimeRepresentation::TwelveHour => {
            let pm = pm.ok_or(CodecError::MissingField("pm"))?;
            let value = encode_bcd_in(hour, 1..=12, bcd::HOURS_12, "hour must be 1-12")?;
            Ok(value | pack_bits(&[(PM_FLAG, pm.into())]))
        }
    }
}

/// Encodes the weekday index (0 = Sunday).
pub(crate) fn encode_weekday(weekday: u8) -> Result<u8, CodecError> {
    if weekday > 6 {
        return Err(CodecError::Range("weekday must be 0-6"));
    }
    Ok(pack_bits(&[(WEEKDAY, weekday)]))
}

/// Time and date written to the time registers.
///
/// `hour` is 0-23 in 24-hour mode and 1-12 in 12-hour mode, where `pm` is
/// required. `year` is the full four-digit year.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoreTime {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub pm: Option<bool>,
    /// Day of month
    pub day: u8,
    /// Weekday index, 0 = Sunday
    pub weekday: u8,
    /// Month number, 1 = January
    pub month: u8,
    pub year: u16,
}

impl CoreTime {
    /// Midnight (24-hour) on the given date, weekday Sunday.
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self {
            second: 0,
            minute: 0,
            hour: 0,
            pm: None,
            day,
            weekday: 0,
            month,
            year,
        }
    }

    /// Sets the time of day.
    #[must_use]
    pub const fn with_time(mut self, hour: u8, minute: u8, second: u8) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self
    }

    /// Sets the PM flag used in 12-hour mode.
    #[must_use]
    pub const fn with_pm(mut self, pm: bool) -> Self {
        self.pm = Some(pm);
        self
    }

    /// Sets the weekday index (0 = Sunday).
    #[must_use]
    pub const fn with_weekday(mut self, weekday: u8) -> Self {
        self.weekday = weekday;
        self
    }

    /// Builds a `CoreTime` from a chrono date and time.
    ///
    /// The weekday is derived from the date. In 12-hour mode midnight becomes
    /// 12 AM and noon 12 PM.
    pub fn from_naive_datetime(
        datetime: &NaiveDateTime,
        representation: TimeRepresentation,
    ) -> Result<Self, CodecError> {
        let year =
            u16::try_from(datetime.year()).map_err(|_| CodecError::Range("year out of range"))?;
        let (hour, pm) = match representation {
            TimeRepresentation::TwentyFourHour => (datetime.hour(), None),
            TimeRepresentation::TwelveHour => match datetime.hour() {
                0 => (12, Some(false)),
                h @ 1..=11 => (h, Some(false)),
                12 => (12, Some(true)),
                h => (h - 12, Some(true)),
            },
        };
        // chrono guarantees every component below fits its register
        Ok(Self {
            second: datetime.second() as u8,
            minute: datetime.minute() as u8,
            hour: hour as u8,
            pm,
            day: datetime.day() as u8,
            weekday: datetime.weekday().num_days_from_sunday() as u8,
            month: datetime.month() as u8,
            year,
        })
    }
}

/// Time and date decoded from the time registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    /// Clock integrity is guaranteed (oscillator-stop flag clear)
    pub integrity: bool,
    pub second: u8,
    pub minute: u8,
    /// Hour as stored, 1-12 in 12-hour mode
    pub hour: u8,
    /// PM flag, only present in 12-hour mode
    pub pm: Option<bool>,
    /// Derived 24-hour value
    pub hour24: u8,
    pub day: u8,
    pub weekday_value: u8,
    pub month_value: u8,
    pub year: u16,
}

impl Time {
    /// English name of the weekday.
    pub fn weekday(&self) -> Option<&'static str> {
        weekday_name(self.weekday_value)
    }

    /// English name of the month, `None` for month 0.
    pub fn month(&self) -> Option<&'static str> {
        month_name(self.month_value)
    }

    /// The fields needed to write this time back.
    pub fn core(&self) -> CoreTime {
        CoreTime {
            second: self.second,
            minute: self.minute,
            hour: self.hour,
            pm: self.pm,
            day: self.day,
            weekday: self.weekday_value,
            month: self.month_value,
            year: self.year,
        }
    }

    /// Converts to a chrono date and time using [`Time::hour24`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Range`] when the registers do not describe a real
    /// calendar instant (month 0, day 31 in a 30-day month, hour 24, ...).
    pub fn to_naive_datetime(&self) -> Result<NaiveDateTime, CodecError> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month_value),
            u32::from(self.day),
        )
        .and_then(|date| {
            date.and_hms_opt(
                u32::from(self.hour24),
                u32::from(self.minute),
                u32::from(self.second),
            )
        })
        .ok_or(CodecError::Range("not a valid calendar date and time"))
    }
}

/// Decodes the seven time registers.
///
/// Field values are not validated; an invalid BCD nibble is passed through.
///
/// # Errors
///
/// - [`CodecError::Length`] when `bytes` holds fewer than seven registers.
/// - [`CodecError::Range`] when `century` plus the two-digit year does not
///   fit a `u16`.
pub fn decode_time(
    bytes: &[u8],
    representation: TimeRepresentation,
    century: u16,
) -> Result<Time, CodecError> {
    let [seconds, minutes, hours, days, weekdays, months, years] =
        register_block::<TIME_LEN>(bytes)?;

    let (hour, pm) = decode_hour(hours, representation);
    let year = century
        .checked_add(u16::from(decode_bcd(years, bcd::YEARS)))
        .ok_or(CodecError::Range("century plus year overflows"))?;
    Ok(Time {
        integrity: extract_bits(seconds, OSCILLATOR_STOP) == 0,
        second: decode_bcd(seconds, bcd::SECONDS),
        minute: decode_bcd(minutes, bcd::MINUTES),
        hour,
        pm,
        hour24: hour24(hour, pm),
        day: decode_bcd(days, bcd::DAYS),
        weekday_value: extract_bits(weekdays, WEEKDAY),
        month_value: decode_bcd(months, bcd::MONTHS),
        year,
    })
}

/// Encodes `time` into the seven time registers.
///
/// The oscillator-stop flag is written as 0, which marks the clock as
/// trustworthy again.
///
/// # Errors
///
/// - [`CodecError::Range`] when a field is out of range or the year is not
///   within the 100 years starting at `century`.
/// - [`CodecError::MissingField`] when `pm` is missing in 12-hour mode.
pub fn encode_time(
    time: &CoreTime,
    representation: TimeRepresentation,
    century: u16,
) -> Result<[u8; TIME_LEN], CodecError> {
    let year_offset = i32::from(time.year) - i32::from(century);
    if year_offset < 0 {
        error!("year {} precedes century {}", time.year, century);
        return Err(CodecError::Range("year precedes configured century"));
    }
    if year_offset >= 100 {
        error!("year {} exceeds century {}", time.year, century);
        return Err(CodecError::Range("year exceeds configured century span"));
    }

    let raw = [
        encode_bcd_in(time.second, 0..=59, bcd::SECONDS, "second must be 0-59")?,
        encode_bcd_in(time.minute, 0..=59, bcd::MINUTES, "minute must be 0-59")?,
        encode_hour(time.hour, time.pm, representation)?,
        encode_bcd_in(time.day, 1..=31, bcd::DAYS, "day must be 1-31")?,
        encode_weekday(time.weekday)?,
        encode_bcd_in(time.month, 1..=12, bcd::MONTHS, "month must be 1-12")?,
        encode_bcd_in(year_offset as u8, 0..=99, bcd::YEARS, "year out of range")?,
    ];
    debug!("time raw={:?}", raw);
    Ok(raw)
}
