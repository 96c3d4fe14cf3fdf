//! Register definitions and bitfield structures for the PCF8523 RTC.
//!
//! This module contains the register addresses, the named values stored in
//! register fields, and bitfield views of the flag registers.

use core::str::FromStr;

use bitfield::bitfield;

use crate::bits::BitField;
use crate::CodecError;

/// Register addresses for the PCF8523 RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Control_1 register
    Control1 = 0x00,
    /// Control_2 register (interrupt flags and enables)
    Control2 = 0x01,
    /// Control_3 register (power management)
    Control3 = 0x02,
    /// Seconds register (0-59) with oscillator-stop flag
    Seconds = 0x03,
    /// Minutes register (0-59)
    Minutes = 0x04,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x05,
    /// Days register (1-31)
    Days = 0x06,
    /// Weekdays register (0-6)
    Weekdays = 0x07,
    /// Months register (1-12)
    Months = 0x08,
    /// Years register (0-99)
    Years = 0x09,
    /// Minute alarm register
    MinuteAlarm = 0x0A,
    /// Hour alarm register
    HourAlarm = 0x0B,
    /// Day alarm register
    DayAlarm = 0x0C,
    /// Weekday alarm register
    WeekdayAlarm = 0x0D,
    /// Offset register
    Offset = 0x0E,
    /// CLKOUT and timer control register
    TimerClockOutControl = 0x0F,
    /// Timer A frequency control register
    TimerAFrequencyControl = 0x10,
    /// Timer A value register
    TimerA = 0x11,
    /// Timer B frequency control register
    TimerBFrequencyControl = 0x12,
    /// Timer B value register
    TimerB = 0x13,
}

/// Register block lengths read or written in one transaction.
pub const PROFILE_LEN: usize = 3;
/// Seconds through years
pub const TIME_LEN: usize = 7;
/// Minute, hour, day and weekday alarms
pub const ALARM_LEN: usize = 4;
/// CLKOUT control, timer A frequency/value, timer B frequency/value
pub const TIMER_LEN: usize = 5;

/// Value written to Control_1 to trigger a software reset.
pub const RESET_MAGIC_VALUE: u8 = 0x58;

/// Oscillator-stop flag in the seconds register (1 = time not trustworthy)
pub const OSCILLATOR_STOP: BitField = BitField::bit(7);
/// AM/PM flag in the hours and hour-alarm registers (12-hour mode)
pub const PM_FLAG: BitField = BitField::bit(5);
/// Weekday value in the weekdays and weekday-alarm registers
pub const WEEKDAY: BitField = BitField::new(2, 3);
/// Alarm enable bit, active low (1 = alarm field disabled)
pub const ALARM_DISABLE: BitField = BitField::bit(7);

/// Power-mode bits of Control_3 for battery-low detection, switchover and
/// direct switching.
pub const POWER_MODE_BATTERY_LOW_DETECTION_OFF: BitField = BitField::bit(2);
/// Switchover function disabled when set
pub const POWER_MODE_SWITCHOVER_OFF: BitField = BitField::bit(1);
/// Direct switching mode when set, standard mode when clear
pub const POWER_MODE_DIRECT_SWITCHING: BitField = BitField::bit(0);
/// Reserved power-mode combination that must never be written.
pub const ILLEGAL_POWER_MODE: u8 = 0b110;

/// Time representation format for the PCF8523.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    #[default]
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// Creates a `TimeRepresentation` from the 12_24 bit.
    fn from(v: u8) -> Self {
        match v & 0b1 {
            0 => TimeRepresentation::TwentyFourHour,
            _ => TimeRepresentation::TwelveHour,
        }
    }
}
impl From<TimeRepresentation> for u8 {
    /// Converts a `TimeRepresentation` to its raw register value.
    fn from(v: TimeRepresentation) -> Self {
        v as u8
    }
}

/// Internal oscillator capacitor selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CapacitorSelection {
    /// 7 pF
    #[default]
    SevenPicofarad = 0,
    /// 12.5 pF
    TwelvePointFivePicofarad = 1,
}

impl CapacitorSelection {
    /// Datasheet label of the selection.
    pub const fn label(self) -> &'static str {
        match self {
            CapacitorSelection::SevenPicofarad => "7pF",
            CapacitorSelection::TwelvePointFivePicofarad => "12.5pF",
        }
    }
}
impl From<u8> for CapacitorSelection {
    /// Creates a `CapacitorSelection` from the CAP_SEL bit.
    fn from(v: u8) -> Self {
        match v & 0b1 {
            0 => CapacitorSelection::SevenPicofarad,
            _ => CapacitorSelection::TwelvePointFivePicofarad,
        }
    }
}
impl From<CapacitorSelection> for u8 {
    /// Converts a `CapacitorSelection` to its raw register value.
    fn from(v: CapacitorSelection) -> Self {
        v as u8
    }
}
impl FromStr for CapacitorSelection {
    type Err = CodecError;

    /// Parses a datasheet label ("7pF" or "12.5pF").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7pF" => Ok(CapacitorSelection::SevenPicofarad),
            "12.5pF" => Ok(CapacitorSelection::TwelvePointFivePicofarad),
            _ => Err(CodecError::UnknownValue("capacitor selection")),
        }
    }
}

/// Offset correction mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetMode {
    /// Correction pulse applied once every two hours
    #[default]
    EveryTwoHours = 0,
    /// Correction pulse applied once every minute
    EveryMinute = 1,
}
impl From<u8> for OffsetMode {
    /// Creates an `OffsetMode` from the MODE bit.
    fn from(v: u8) -> Self {
        match v & 0b1 {
            0 => OffsetMode::EveryTwoHours,
            _ => OffsetMode::EveryMinute,
        }
    }
}
impl From<OffsetMode> for u8 {
    /// Converts an `OffsetMode` to its raw register value.
    fn from(v: OffsetMode) -> Self {
        v as u8
    }
}

/// Timer A function (TAC bits).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAMode {
    /// Timer A disabled
    #[default]
    Disabled = 0b00,
    /// Timer A configured as countdown timer
    Countdown = 0b01,
    /// Timer A configured as watchdog timer
    Watchdog = 0b10,
    /// Timer A disabled (alternate encoding)
    DisabledAlt = 0b11,
}
impl From<u8> for TimerAMode {
    /// Creates a `TimerAMode` from the TAC bits.
    fn from(v: u8) -> Self {
        match v & 0b11 {
            0b00 => TimerAMode::Disabled,
            0b01 => TimerAMode::Countdown,
            0b10 => TimerAMode::Watchdog,
            _ => TimerAMode::DisabledAlt,
        }
    }
}
impl From<TimerAMode> for u8 {
    /// Converts a `TimerAMode` to its raw register value.
    fn from(v: TimerAMode) -> Self {
        v as u8
    }
}

/// CLKOUT pin frequency (COF bits).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockOutFrequency {
    /// 32.768 kHz
    #[default]
    Hz32768 = 0b000,
    /// 16.384 kHz
    Hz16384 = 0b001,
    /// 8.192 kHz
    Hz8192 = 0b010,
    /// 4.096 kHz
    Hz4096 = 0b011,
    /// 1.024 kHz
    Hz1024 = 0b100,
    /// 32 Hz
    Hz32 = 0b101,
    /// 1 Hz
    Hz1 = 0b110,
    /// CLKOUT disabled (high-Z)
    Disabled = 0b111,
}
impl From<u8> for ClockOutFrequency {
    /// Creates a `ClockOutFrequency` from the COF bits.
    fn from(v: u8) -> Self {
        match v & 0b111 {
            0b000 => ClockOutFrequency::Hz32768,
            0b001 => ClockOutFrequency::Hz16384,
            0b010 => ClockOutFrequency::Hz8192,
            0b011 => ClockOutFrequency::Hz4096,
            0b100 => ClockOutFrequency::Hz1024,
            0b101 => ClockOutFrequency::Hz32,
            0b110 => ClockOutFrequency::Hz1,
            _ => ClockOutFrequency::Disabled,
        }
    }
}
impl From<ClockOutFrequency> for u8 {
    /// Converts a `ClockOutFrequency` to its raw register value.
    fn from(v: ClockOutFrequency) -> Self {
        v as u8
    }
}

/// Source clock of timer A and timer B (TAQ/TBQ bits).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceClock {
    /// 4.096 kHz
    #[default]
    Hz4096 = 0b000,
    /// 64 Hz
    Hz64 = 0b001,
    /// 1 Hz
    Hz1 = 0b010,
    /// 1/60 Hz
    PerMinute = 0b011,
    /// 1/3600 Hz (alternate encoding)
    PerHourAlt2 = 0b100,
    /// Encoding without a frequency mapping
    Reserved = 0b101,
    /// 1/3600 Hz (alternate encoding)
    PerHourAlt1 = 0b110,
    /// 1/3600 Hz
    PerHour = 0b111,
}
impl From<u8> for SourceClock {
    /// Creates a `SourceClock` from the TAQ/TBQ bits.
    fn from(v: u8) -> Self {
        match v & 0b111 {
            0b000 => SourceClock::Hz4096,
            0b001 => SourceClock::Hz64,
            0b010 => SourceClock::Hz1,
            0b011 => SourceClock::PerMinute,
            0b100 => SourceClock::PerHourAlt2,
            0b101 => SourceClock::Reserved,
            0b110 => SourceClock::PerHourAlt1,
            _ => SourceClock::PerHour,
        }
    }
}
impl From<SourceClock> for u8 {
    /// Converts a `SourceClock` to its raw register value.
    fn from(v: SourceClock) -> Self {
        v as u8
    }
}

/// Timer B interrupt pulse width (TBW bits).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseWidth {
    /// 46.875 ms
    #[default]
    Ms46_875 = 0b000,
    /// 62.500 ms
    Ms62_500 = 0b001,
    /// 78.125 ms
    Ms78_125 = 0b010,
    /// 93.750 ms
    Ms93_750 = 0b011,
    /// 125.000 ms
    Ms125_000 = 0b100,
    /// 156.250 ms
    Ms156_250 = 0b101,
    /// 187.500 ms
    Ms187_500 = 0b110,
    /// 218.750 ms
    Ms218_750 = 0b111,
}

impl PulseWidth {
    /// Pulse width in milliseconds.
    pub const fn milliseconds(self) -> f64 {
        match self {
            PulseWidth::Ms46_875 => 46.875,
            PulseWidth::Ms62_500 => 62.5,
            PulseWidth::Ms78_125 => 78.125,
            PulseWidth::Ms93_750 => 93.75,
            PulseWidth::Ms125_000 => 125.0,
            PulseWidth::Ms156_250 => 156.25,
            PulseWidth::Ms187_500 => 187.5,
            PulseWidth::Ms218_750 => 218.75,
        }
    }
}
impl From<u8> for PulseWidth {
    /// Creates a `PulseWidth` from the TBW bits.
    fn from(v: u8) -> Self {
        match v & 0b111 {
            0b000 => PulseWidth::Ms46_875,
            0b001 => PulseWidth::Ms62_500,
            0b010 => PulseWidth::Ms78_125,
            0b011 => PulseWidth::Ms93_750,
            0b100 => PulseWidth::Ms125_000,
            0b101 => PulseWidth::Ms156_250,
            0b110 => PulseWidth::Ms187_500,
            _ => PulseWidth::Ms218_750,
        }
    }
}
impl From<PulseWidth> for u8 {
    /// Converts a `PulseWidth` to its raw register value.
    fn from(v: PulseWidth) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Control_1 register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control1Register(u8);
    impl Debug;
    /// Oscillator load capacitance
    pub from into CapacitorSelection, capacitor_selection, set_capacitor_selection: 7, 7;
    /// RTC clock stopped
    pub stop, set_stop: 5;
    /// Software reset request
    pub software_reset, set_software_reset: 4;
    /// 12/24-hour mode
    pub from into TimeRepresentation, time_representation, set_time_representation: 3, 3;
    /// Second interrupt enable
    pub second_interrupt_enable, set_second_interrupt_enable: 2;
    /// Alarm interrupt enable
    pub alarm_interrupt_enable, set_alarm_interrupt_enable: 1;
    /// Correction interrupt enable
    pub correction_interrupt_enable, set_correction_interrupt_enable: 0;
}
from_register_u8!(Control1Register);

bitfield! {
    /// Control_2 register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control2Register(u8);
    impl Debug;
    /// Watchdog timer A interrupt generated (cleared on read)
    pub watchdog_a_flag, set_watchdog_a_flag: 7;
    /// Countdown timer A interrupt generated
    pub countdown_a_flag, set_countdown_a_flag: 6;
    /// Countdown timer B interrupt generated
    pub countdown_b_flag, set_countdown_b_flag: 5;
    /// Second interrupt generated
    pub second_flag, set_second_flag: 4;
    /// Alarm interrupt generated
    pub alarm_flag, set_alarm_flag: 3;
    /// Watchdog timer A interrupt enable
    pub watchdog_a_interrupt_enable, set_watchdog_a_interrupt_enable: 2;
    /// Countdown timer A interrupt enable
    pub countdown_a_interrupt_enable, set_countdown_a_interrupt_enable: 1;
    /// Countdown timer B interrupt enable
    pub countdown_b_interrupt_enable, set_countdown_b_interrupt_enable: 0;
}
from_register_u8!(Control2Register);

bitfield! {
    /// Control_3 register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control3Register(u8);
    impl Debug;
    /// Battery switchover and battery-low detection control
    pub power_mode, set_power_mode: 7, 5;
    /// Battery switchover happened
    pub battery_switchover_flag, set_battery_switchover_flag: 3;
    /// Battery low (read-only, written as 1)
    pub battery_low_flag, set_battery_low_flag: 2;
    /// Battery switchover interrupt enable
    pub battery_switchover_interrupt_enable, set_battery_switchover_interrupt_enable: 1;
    /// Battery low interrupt enable
    pub battery_low_interrupt_enable, set_battery_low_interrupt_enable: 0;
}
from_register_u8!(Control3Register);

bitfield! {
    /// Offset register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct OffsetRegister(u8);
    impl Debug;
    /// Correction pulse interval
    pub from into OffsetMode, mode, set_mode: 7, 7;
    /// Offset value, 7-bit two's complement
    pub raw_offset, set_raw_offset: 6, 0;
}
from_register_u8!(OffsetRegister);

bitfield! {
    /// Tmr_CLKOUT_ctrl register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct TimerControlRegister(u8);
    impl Debug;
    /// Timer A interrupt is pulsed instead of a permanent flag
    pub timer_a_pulsed, set_timer_a_pulsed: 7;
    /// Timer B interrupt is pulsed instead of a permanent flag
    pub timer_b_pulsed, set_timer_b_pulsed: 6;
    /// CLKOUT frequency
    pub from into ClockOutFrequency, clock_out, set_clock_out: 5, 3;
    /// Timer A function
    pub from into TimerAMode, timer_a_mode, set_timer_a_mode: 2, 1;
    /// Countdown timer B enable
    pub countdown_b_enable, set_countdown_b_enable: 0;
}
from_register_u8!(TimerControlRegister);

bitfield! {
    /// Tmr_A_freq_ctrl register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct TimerAFrequencyRegister(u8);
    impl Debug;
    /// Timer A source clock
    pub from into SourceClock, source_clock, set_source_clock: 2, 0;
}
from_register_u8!(TimerAFrequencyRegister);

bitfield! {
    /// Tmr_B_freq_ctrl register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct TimerBFrequencyRegister(u8);
    impl Debug;
    /// Timer B interrupt pulse width
    pub from into PulseWidth, pulse_width, set_pulse_width: 6, 4;
    /// Timer B source clock
    pub from into SourceClock, source_clock, set_source_clock: 2, 0;
}
from_register_u8!(TimerBFrequencyRegister);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_addresses() {
        assert_eq!(RegAddr::Control1 as u8, 0x00);
        assert_eq!(RegAddr::Seconds as u8, 0x03);
        assert_eq!(RegAddr::MinuteAlarm as u8, 0x0A);
        assert_eq!(RegAddr::Offset as u8, 0x0E);
        assert_eq!(RegAddr::TimerClockOutControl as u8, 0x0F);
        assert_eq!(RegAddr::TimerB as u8, 0x13);
    }

    #[test]
    fn test_capacitor_selection_labels() {
        assert_eq!(
            "7pF".parse::<CapacitorSelection>().unwrap(),
            CapacitorSelection::SevenPicofarad
        );
        assert_eq!(
            "12.5pF".parse::<CapacitorSelection>().unwrap(),
            CapacitorSelection::TwelvePointFivePicofarad
        );
        assert!(matches!(
            "10pF".parse::<CapacitorSelection>(),
            Err(CodecError::UnknownValue(_))
        ));
        assert_eq!(CapacitorSelection::TwelvePointFivePicofarad.label(), "12.5pF");
    }

    #[test]
    fn test_enum_conversions_mask_field_width() {
        assert_eq!(TimeRepresentation::from(1), TimeRepresentation::TwelveHour);
        assert_eq!(TimeRepresentation::from(2), TimeRepresentation::TwentyFourHour);
        assert_eq!(TimerAMode::from(0b110), TimerAMode::Watchdog);
        assert_eq!(SourceClock::from(0b1101), SourceClock::Reserved);
        assert_eq!(u8::from(ClockOutFrequency::Hz1024), 0b100);
        assert_eq!(u8::from(PulseWidth::Ms218_750), 0b111);
    }

    #[test]
    fn test_control1_register_conversions() {
        let control = Control1Register::from(0b1000_1001);
        assert_eq!(
            control.capacitor_selection(),
            CapacitorSelection::TwelvePointFivePicofarad
        );
        assert!(!control.stop());
        assert_eq!(control.time_representation(), TimeRepresentation::TwelveHour);
        assert!(!control.second_interrupt_enable());
        assert!(!control.alarm_interrupt_enable());
        assert!(control.correction_interrupt_enable());
        assert_eq!(u8::from(control), 0b1000_1001);
    }

    #[test]
    fn test_control2_register_conversions() {
        let control = Control2Register::from(0b0100_0111);
        assert!(!control.watchdog_a_flag());
        assert!(control.countdown_a_flag());
        assert!(!control.countdown_b_flag());
        assert!(control.watchdog_a_interrupt_enable());
        assert!(control.countdown_a_interrupt_enable());
        assert!(control.countdown_b_interrupt_enable());
    }

    #[test]
    fn test_control3_register_conversions() {
        let control = Control3Register::from(0b0110_0101);
        assert_eq!(control.power_mode(), 0b011);
        assert!(!control.battery_switchover_flag());
        assert!(control.battery_low_flag());
        assert!(!control.battery_switchover_interrupt_enable());
        assert!(control.battery_low_interrupt_enable());
    }

    #[test]
    fn test_timer_register_conversions() {
        let control = TimerControlRegister::from(0b0110_0100);
        assert!(!control.timer_a_pulsed());
        assert!(control.timer_b_pulsed());
        assert_eq!(control.clock_out(), ClockOutFrequency::Hz1024);
        assert_eq!(control.timer_a_mode(), TimerAMode::Watchdog);
        assert!(!control.countdown_b_enable());

        let freq_b = TimerBFrequencyRegister::from(0b0100_0011);
        assert_eq!(freq_b.pulse_width(), PulseWidth::Ms125_000);
        assert_eq!(freq_b.source_clock(), SourceClock::PerMinute);

        let mut freq_a = TimerAFrequencyRegister::default();
        freq_a.set_source_clock(SourceClock::PerHour);
        assert_eq!(u8::from(freq_a), 0b0000_0111);
    }

    #[test]
    fn test_offset_register_conversions() {
        let offset = OffsetRegister::from(0b1101_0110);
        assert_eq!(offset.mode(), OffsetMode::EveryMinute);
        assert_eq!(offset.raw_offset(), 0b101_0110);
    }
}
