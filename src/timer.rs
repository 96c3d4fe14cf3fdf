//! Timer and CLKOUT registers (0x0F to 0x13).
//!
//! The PCF8523 has two 8-bit countdown timers. Timer A can also act as a
//! watchdog. Each timer counts ticks of a selectable source clock; timer B
//! additionally has a configurable interrupt pulse width. The CLKOUT
//! frequency shares the control register with the timer modes.
//!
//! | Register | Address |
//! |---|---|
//! | Tmr_CLKOUT_ctrl | 0x0F |
//! | Tmr_A_freq_ctrl | 0x10 |
//! | Tmr_A_reg | 0x11 |
//! | Tmr_B_freq_ctrl | 0x12 |
//! | Tmr_B_reg | 0x13 |

use crate::bits::register_block;
use crate::registers::{
    ClockOutFrequency, PulseWidth, SourceClock, TimerAFrequencyRegister, TimerAMode,
    TimerBFrequencyRegister, TimerControlRegister, TIMER_LEN,
};
use crate::CodecError;

/// Unit of a timer duration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Lower case English name of the unit.
    pub const fn name(self) -> &'static str {
        match self {
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        }
    }
}

impl SourceClock {
    /// Clock frequency in Hz, `None` for the reserved encoding.
    pub fn frequency_hz(self) -> Option<f64> {
        match self {
            SourceClock::Hz4096 => Some(4096.0),
            SourceClock::Hz64 => Some(64.0),
            SourceClock::Hz1 => Some(1.0),
            SourceClock::PerMinute => Some(1.0 / 60.0),
            SourceClock::PerHour | SourceClock::PerHourAlt1 | SourceClock::PerHourAlt2 => {
                Some(1.0 / 3600.0)
            }
            SourceClock::Reserved => None,
        }
    }

    /// Length of one tick in seconds, `None` for the reserved encoding.
    ///
    /// Every period is exactly representable, unlike the sub-hertz frequencies.
    pub fn tick_seconds(self) -> Option<f64> {
        match self {
            SourceClock::Hz4096 => Some(1.0 / 4096.0),
            SourceClock::Hz64 => Some(1.0 / 64.0),
            SourceClock::Hz1 => Some(1.0),
            SourceClock::PerMinute => Some(60.0),
            SourceClock::PerHour | SourceClock::PerHourAlt1 | SourceClock::PerHourAlt2 => {
                Some(3600.0)
            }
            SourceClock::Reserved => None,
        }
    }

    /// Units that read naturally for durations counted with this clock.
    pub const fn preferred_units(self) -> &'static [TimeUnit] {
        match self {
            SourceClock::Hz4096 => &[TimeUnit::Microseconds, TimeUnit::Milliseconds],
            SourceClock::Hz64 => &[TimeUnit::Milliseconds, TimeUnit::Seconds],
            SourceClock::Hz1 => &[TimeUnit::Seconds],
            SourceClock::PerMinute => &[TimeUnit::Minutes],
            SourceClock::PerHour | SourceClock::PerHourAlt1 | SourceClock::PerHourAlt2 => {
                &[TimeUnit::Hours]
            }
            SourceClock::Reserved => &[],
        }
    }
}

/// A timer value expressed in every unit, truncated to three decimals.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerDuration {
    pub microseconds: f64,
    pub milliseconds: f64,
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub preferred_units: &'static [TimeUnit],
}

impl TimerDuration {
    /// The duration in `unit`.
    pub fn in_unit(&self, unit: TimeUnit) -> f64 {
        match unit {
            TimeUnit::Microseconds => self.microseconds,
            TimeUnit::Milliseconds => self.milliseconds,
            TimeUnit::Seconds => self.seconds,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Hours => self.hours,
        }
    }
}

fn truncate3(value: f64) -> f64 {
    (value * 1000.0) as i64 as f64 / 1000.0
}

/// Converts a countdown value to elapsed time for the given source clock.
///
/// # Errors
///
/// Returns [`CodecError::Range`] if `ticks` is outside 0-255 or the source
/// clock has no frequency.
pub fn timer_value_to_duration(
    source_clock: SourceClock,
    ticks: i32,
) -> Result<TimerDuration, CodecError> {
    if !(0..=255).contains(&ticks) {
        return Err(CodecError::Range("timer value must be 0-255"));
    }
    let tick = source_clock
        .tick_seconds()
        .ok_or(CodecError::Range("source clock has no frequency"))?;

    let seconds = f64::from(ticks) * tick;
    Ok(TimerDuration {
        microseconds: truncate3(seconds * 1_000_000.0),
        milliseconds: truncate3(seconds * 1000.0),
        seconds: truncate3(seconds),
        minutes: truncate3(seconds / 60.0),
        hours: truncate3(seconds / 3600.0),
        preferred_units: source_clock.preferred_units(),
    })
}

/// Decoded Tmr_CLKOUT_ctrl register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerControl {
    /// Timer A interrupt is a pulse instead of a permanent flag
    pub timer_a_pulsed: bool,
    /// Timer B interrupt is a pulse instead of a permanent flag
    pub timer_b_pulsed: bool,
    pub clock_out: ClockOutFrequency,
    pub timer_a_mode: TimerAMode,
    pub countdown_b_enabled: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerAFrequencyControl {
    pub source_clock: SourceClock,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerBFrequencyControl {
    pub pulse_width: PulseWidth,
    pub source_clock: SourceClock,
}

/// All five timer registers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timer {
    pub control: TimerControl,
    pub timer_a_frequency: TimerAFrequencyControl,
    /// Timer A remaining ticks
    pub timer_a_value: u8,
    pub timer_b_frequency: TimerBFrequencyControl,
    /// Timer B remaining ticks
    pub timer_b_value: u8,
}

impl Timer {
    /// Timer A value converted with its source clock.
    pub fn timer_a_duration(&self) -> Result<TimerDuration, CodecError> {
        timer_value_to_duration(
            self.timer_a_frequency.source_clock,
            i32::from(self.timer_a_value),
        )
    }

    /// Timer B value converted with its source clock.
    pub fn timer_b_duration(&self) -> Result<TimerDuration, CodecError> {
        timer_value_to_duration(
            self.timer_b_frequency.source_clock,
            i32::from(self.timer_b_value),
        )
    }
}

/// Decodes the Tmr_CLKOUT_ctrl register.
pub fn decode_timer_control(bytes: &[u8]) -> Result<TimerControl, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let register = TimerControlRegister::from(raw);
    Ok(TimerControl {
        timer_a_pulsed: register.timer_a_pulsed(),
        timer_b_pulsed: register.timer_b_pulsed(),
        clock_out: register.clock_out(),
        timer_a_mode: register.timer_a_mode(),
        countdown_b_enabled: register.countdown_b_enable(),
    })
}

/// Encodes the Tmr_CLKOUT_ctrl register.
pub fn encode_timer_control(control: &TimerControl) -> u8 {
    let mut register = TimerControlRegister::default();
    register.set_timer_a_pulsed(control.timer_a_pulsed);
    register.set_timer_b_pulsed(control.timer_b_pulsed);
    register.set_clock_out(control.clock_out);
    register.set_timer_a_mode(control.timer_a_mode);
    register.set_countdown_b_enable(control.countdown_b_enabled);
    register.into()
}

/// Decodes the Tmr_A_freq_ctrl register.
pub fn decode_timer_a_frequency_control(
    bytes: &[u8],
) -> Result<TimerAFrequencyControl, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    Ok(TimerAFrequencyControl {
        source_clock: TimerAFrequencyRegister::from(raw).source_clock(),
    })
}

/// Encodes the Tmr_A_freq_ctrl register.
pub fn encode_timer_a_frequency_control(control: &TimerAFrequencyControl) -> u8 {
    let mut register = TimerAFrequencyRegister::default();
    register.set_source_clock(control.source_clock);
    register.into()
}

/// Decodes the Tmr_B_freq_ctrl register.
pub fn decode_timer_b_frequency_control(
    bytes: &[u8],
) -> Result<TimerBFrequencyControl, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let register = TimerBFrequencyRegister::from(raw);
    Ok(TimerBFrequencyControl {
        pulse_width: register.pulse_width(),
        source_clock: register.source_clock(),
    })
}

/// Encodes the Tmr_B_freq_ctrl register.
pub fn encode_timer_b_frequency_control(control: &TimerBFrequencyControl) -> u8 {
    let mut register = TimerBFrequencyRegister::default();
    register.set_pulse_width(control.pulse_width);
    register.set_source_clock(control.source_clock);
    register.into()
}

/// Decodes a timer A or timer B value register.
pub fn decode_timer_value(bytes: &[u8]) -> Result<u8, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    Ok(raw)
}

/// Encodes a timer A or timer B value register.
///
/// # Errors
///
/// Returns [`CodecError::Range`] if `ticks` is outside 0-255.
pub fn encode_timer_value(ticks: i32) -> Result<u8, CodecError> {
    u8::try_from(ticks).map_err(|_| CodecError::Range("timer value must be 0-255"))
}

/// Decodes the five timer registers.
pub fn decode_timer(bytes: &[u8]) -> Result<Timer, CodecError> {
    let raw = register_block::<TIMER_LEN>(bytes)?;
    Ok(Timer {
        control: decode_timer_control(&raw[0..1])?,
        timer_a_frequency: decode_timer_a_frequency_control(&raw[1..2])?,
        timer_a_value: decode_timer_value(&raw[2..3])?,
        timer_b_frequency: decode_timer_b_frequency_control(&raw[3..4])?,
        timer_b_value: decode_timer_value(&raw[4..5])?,
    })
}

/// Encodes the five timer registers.
pub fn encode_timer(timer: &Timer) -> [u8; TIMER_LEN] {
    [
        encode_timer_control(&timer.control),
        encode_timer_a_frequency_control(&timer.timer_a_frequency),
        timer.timer_a_value,
        encode_timer_b_frequency_control(&timer.timer_b_frequency),
        timer.timer_b_value,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_timer_control() {
        let control = decode_timer_control(&[0b0110_0100]).unwrap();
        assert!(!control.timer_a_pulsed);
        assert!(control.timer_b_pulsed);
        assert_eq!(control.clock_out, ClockOutFrequency::Hz1024);
        assert_eq!(control.timer_a_mode, TimerAMode::Watchdog);
        assert!(!control.countdown_b_enabled);

        let control = decode_timer_control(&[0]).unwrap();
        assert_eq!(control, TimerControl::default());
        assert_eq!(control.clock_out, ClockOutFrequency::Hz32768);
    }

    #[test]
    fn test_encode_timer_control() {
        let control = TimerControl {
            timer_a_pulsed: true,
            timer_b_pulsed: false,
            clock_out: ClockOutFrequency::Disabled,
            timer_a_mode: TimerAMode::Countdown,
            countdown_b_enabled: true,
        };
        assert_eq!(encode_timer_control(&control), 0b1011_1011);
    }

    #[test]
    fn test_timer_a_frequency_control() {
        let control = decode_timer_a_frequency_control(&[0b1111_1010]).unwrap();
        assert_eq!(control.source_clock, SourceClock::Hz1);

        let control = TimerAFrequencyControl {
            source_clock: SourceClock::PerHourAlt1,
        };
        assert_eq!(encode_timer_a_frequency_control(&control), 0b0000_0110);
    }

    #[test]
    fn test_timer_b_frequency_control() {
        let control = decode_timer_b_frequency_control(&[0b0100_0011]).unwrap();
        assert_eq!(control.pulse_width, PulseWidth::Ms125_000);
        assert_eq!(control.pulse_width.milliseconds(), 125.0);
        assert_eq!(control.source_clock, SourceClock::PerMinute);
        assert_eq!(encode_timer_b_frequency_control(&control), 0b0100_0011);
    }

    #[test]
    fn test_timer_values() {
        assert_eq!(decode_timer_value(&[0xA5]).unwrap(), 0xA5);
        assert_eq!(encode_timer_value(0).unwrap(), 0);
        assert_eq!(encode_timer_value(255).unwrap(), 255);
        assert!(matches!(encode_timer_value(256), Err(CodecError::Range(_))));
        assert!(matches!(encode_timer_value(-1), Err(CodecError::Range(_))));
    }

    #[test]
    fn test_duration_one_hertz() {
        let duration = timer_value_to_duration(SourceClock::Hz1, 255).unwrap();
        assert_eq!(duration.seconds, 255.0);
        assert_eq!(duration.minutes, 4.25);
        assert_eq!(duration.hours, 0.070);
        assert_eq!(duration.milliseconds, 255_000.0);
        assert_eq!(duration.preferred_units, &[TimeUnit::Seconds]);
        assert_eq!(duration.preferred_units[0].name(), "seconds");
    }

    #[test]
    fn test_duration_truncates() {
        // 1 / 4096 s = 244.140625 us
        let duration = timer_value_to_duration(SourceClock::Hz4096, 1).unwrap();
        assert_eq!(duration.microseconds, 244.140);
        assert_eq!(duration.milliseconds, 0.244);
        assert_eq!(duration.seconds, 0.0);
        assert_eq!(
            duration.preferred_units,
            &[TimeUnit::Microseconds, TimeUnit::Milliseconds]
        );
        assert_eq!(duration.in_unit(TimeUnit::Milliseconds), 0.244);
    }

    #[test]
    fn test_duration_slow_clocks() {
        let duration = timer_value_to_duration(SourceClock::PerMinute, 90).unwrap();
        assert_eq!(duration.minutes, 90.0);
        assert_eq!(duration.hours, 1.5);
        assert_eq!(duration.preferred_units, &[TimeUnit::Minutes]);

        for clock in [
            SourceClock::PerHour,
            SourceClock::PerHourAlt1,
            SourceClock::PerHourAlt2,
        ] {
            let duration = timer_value_to_duration(clock, 2).unwrap();
            assert_eq!(duration.hours, 2.0);
            assert_eq!(duration.seconds, 7200.0);
            assert_eq!(duration.preferred_units, &[TimeUnit::Hours]);
        }

        let duration = timer_value_to_duration(SourceClock::Hz64, 32).unwrap();
        assert_eq!(duration.milliseconds, 500.0);
        assert_eq!(duration.preferred_units, &[TimeUnit::Milliseconds, TimeUnit::Seconds]);
    }

    #[test]
    fn test_source_clock_frequencies() {
        assert_eq!(SourceClock::Hz4096.frequency_hz(), Some(4096.0));
        assert_eq!(SourceClock::PerHourAlt2.frequency_hz(), Some(1.0 / 3600.0));
        assert_eq!(SourceClock::Reserved.frequency_hz(), None);
        assert_eq!(SourceClock::Reserved.tick_seconds(), None);
        assert!(SourceClock::Reserved.preferred_units().is_empty());
    }

    #[test]
    fn test_duration_errors() {
        assert!(matches!(
            timer_value_to_duration(SourceClock::Hz1, 256),
            Err(CodecError::Range(_))
        ));
        assert!(matches!(
            timer_value_to_duration(SourceClock::Hz1, -1),
            Err(CodecError::Range(_))
        ));
        assert!(matches!(
            timer_value_to_duration(SourceClock::Reserved, 1),
            Err(CodecError::Range(_))
        ));
    }

    #[test]
    fn test_decode_timer() {
        let timer = decode_timer(&[0b0110_0100, 0b0000_0010, 10, 0b0100_0011, 3]).unwrap();
        assert_eq!(timer.control.timer_a_mode, TimerAMode::Watchdog);
        assert_eq!(timer.timer_a_frequency.source_clock, SourceClock::Hz1);
        assert_eq!(timer.timer_a_value, 10);
        assert_eq!(timer.timer_b_frequency.pulse_width, PulseWidth::Ms125_000);
        assert_eq!(timer.timer_b_value, 3);

        assert_eq!(timer.timer_a_duration().unwrap().seconds, 10.0);
        assert_eq!(timer.timer_b_duration().unwrap().minutes, 3.0);
        assert_eq!(encode_timer(&timer), [0b0110_0100, 0b0000_0010, 10, 0b0100_0011, 3]);
    }

    #[test]
    fn test_decode_timer_short_buffer() {
        assert!(matches!(
            decode_timer(&[0; 4]),
            Err(CodecError::Length {
                expected: 5,
                actual: 4
            })
        ));
    }
}
