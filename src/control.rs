//! Control_1, Control_2 and Control_3 registers.
//!
//! The three control registers sit at the start of the register map and are
//! read together as the device profile.

use crate::bits::{extract_bits, pack_bits, register_block};
use crate::registers::{
    CapacitorSelection, Control1Register, Control2Register, Control3Register, TimeRepresentation,
    ILLEGAL_POWER_MODE, POWER_MODE_BATTERY_LOW_DETECTION_OFF, POWER_MODE_DIRECT_SWITCHING,
    POWER_MODE_SWITCHOVER_OFF, PROFILE_LEN,
};
use crate::CodecError;

/// Decoded Control_1 register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control1 {
    /// Oscillator load capacitance
    pub capacitor_selection: CapacitorSelection,
    /// RTC time circuits frozen
    pub stop: bool,
    /// 12 or 24 hour mode of the time and alarm registers
    pub time_representation: TimeRepresentation,
    /// Second interrupt enabled
    pub second_interrupt_enabled: bool,
    /// Alarm interrupt enabled
    pub alarm_interrupt_enabled: bool,
    /// Correction interrupt enabled
    pub correction_interrupt_enabled: bool,
}

/// Decoded Control_2 register.
///
/// The flags report interrupts that have fired. They are cleared by writing
/// 0, see [`Control2Settings`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control2 {
    /// Watchdog timer A interrupt fired
    pub watchdog_a_flag: bool,
    /// Countdown timer A interrupt fired
    pub countdown_a_flag: bool,
    /// Countdown timer B interrupt fired
    pub countdown_b_flag: bool,
    /// Second interrupt fired
    pub second_flag: bool,
    /// Alarm interrupt fired
    pub alarm_flag: bool,
    /// Watchdog timer A interrupt enabled
    pub watchdog_a_interrupt_enabled: bool,
    /// Countdown timer A interrupt enabled
    pub countdown_a_interrupt_enabled: bool,
    /// Countdown timer B interrupt enabled
    pub countdown_b_interrupt_enabled: bool,
}

/// Values written to Control_2.
///
/// The `clear_*` intents default to `false`, which leaves the matching flag
/// untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control2Settings {
    /// Watchdog timer A interrupt enabled
    pub watchdog_a_interrupt_enabled: bool,
    /// Countdown timer A interrupt enabled
    pub countdown_a_interrupt_enabled: bool,
    /// Countdown timer B interrupt enabled
    pub countdown_b_interrupt_enabled: bool,
    /// Clear the countdown timer A flag
    pub clear_countdown_a: bool,
    /// Clear the countdown timer B flag
    pub clear_countdown_b: bool,
    /// Clear the second flag
    pub clear_second: bool,
    /// Clear the alarm flag
    pub clear_alarm: bool,
}

impl From<&Control2> for Control2Settings {
    /// Keeps the interrupt enables of a decoded register and clears nothing.
    fn from(control: &Control2) -> Self {
        Self {
            watchdog_a_interrupt_enabled: control.watchdog_a_interrupt_enabled,
            countdown_a_interrupt_enabled: control.countdown_a_interrupt_enabled,
            countdown_b_interrupt_enabled: control.countdown_b_interrupt_enabled,
            ..Default::default()
        }
    }
}

/// Decoded Control_3 register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control3 {
    /// Battery-low detection enabled
    pub battery_low_detection_enabled: bool,
    /// Battery switchover enabled
    pub switchover_enabled: bool,
    /// Direct switching mode, `None` when switchover is disabled
    pub direct_switching_enabled: Option<bool>,
    /// A battery switchover occurred
    pub battery_switchover_flag: bool,
    /// Battery voltage is low
    pub battery_low_flag: bool,
    /// Battery switchover interrupt enabled
    pub battery_switchover_interrupt_enabled: bool,
    /// Battery-low interrupt enabled
    pub battery_low_interrupt_enabled: bool,
}

/// Values written to Control_3.
///
/// The default is power mode `000`: battery-low detection and standard
/// switchover enabled, no interrupts, switchover flag kept.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control3Settings {
    /// Battery-low detection enabled
    pub battery_low_detection_enabled: bool,
    /// Battery switchover enabled
    pub switchover_enabled: bool,
    /// Direct switching instead of standard mode
    pub direct_switching_enabled: bool,
    /// Battery switchover interrupt enabled
    pub battery_switchover_interrupt_enabled: bool,
    /// Battery-low interrupt enabled
    pub battery_low_interrupt_enabled: bool,
    /// Clear the battery switchover flag
    pub clear_battery_switchover: bool,
}

impl Default for Control3Settings {
    fn default() -> Self {
        Self {
            battery_low_detection_enabled: true,
            switchover_enabled: true,
            direct_switching_enabled: false,
            battery_switchover_interrupt_enabled: false,
            battery_low_interrupt_enabled: false,
            clear_battery_switchover: false,
        }
    }
}

impl From<&Control3> for Control3Settings {
    /// Keeps the power mode and interrupt enables of a decoded register.
    fn from(control: &Control3) -> Self {
        Self {
            battery_low_detection_enabled: control.battery_low_detection_enabled,
            switchover_enabled: control.switchover_enabled,
            direct_switching_enabled: control.direct_switching_enabled.unwrap_or(false),
            battery_switchover_interrupt_enabled: control.battery_switchover_interrupt_enabled,
            battery_low_interrupt_enabled: control.battery_low_interrupt_enabled,
            clear_battery_switchover: false,
        }
    }
}

/// All three control registers, read in one transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    pub control1: Control1,
    pub control2: Control2,
    pub control3: Control3,
}

/// Decodes Control_1 from the first byte of `bytes`.
pub fn decode_control1(bytes: &[u8]) -> Result<Control1, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let register = Control1Register::from(raw);
    Ok(Control1 {
        capacitor_selection: register.capacitor_selection(),
        stop: register.stop(),
        time_representation: register.time_representation(),
        second_interrupt_enabled: register.second_interrupt_enable(),
        alarm_interrupt_enabled: register.alarm_interrupt_enable(),
        correction_interrupt_enabled: register.correction_interrupt_enable(),
    })
}

/// Encodes Control_1. The software reset bit is written as 0.
pub fn encode_control1(control: &Control1) -> u8 {
    let mut register = Control1Register::default();
    register.set_capacitor_selection(control.capacitor_selection);
    register.set_stop(control.stop);
    register.set_time_representation(control.time_representation);
    register.set_second_interrupt_enable(control.second_interrupt_enabled);
    register.set_alarm_interrupt_enable(control.alarm_interrupt_enabled);
    register.set_correction_interrupt_enable(control.correction_interrupt_enabled);
    register.into()
}

/// Decodes Control_2 from the first byte of `bytes`.
pub fn decode_control2(bytes: &[u8]) -> Result<Control2, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let register = Control2Register::from(raw);
    Ok(Control2 {
        watchdog_a_flag: register.watchdog_a_flag(),
        countdown_a_flag: register.countdown_a_flag(),
        countdown_b_flag: register.countdown_b_flag(),
        second_flag: register.second_flag(),
        alarm_flag: register.alarm_flag(),
        watchdog_a_interrupt_enabled: register.watchdog_a_interrupt_enable(),
        countdown_a_interrupt_enabled: register.countdown_a_interrupt_enable(),
        countdown_b_interrupt_enabled: register.countdown_b_interrupt_enable(),
    })
}

/// Encodes Control_2.
///
/// A flag is written as 0 to clear it and 1 to keep it. The watchdog flag is
/// cleared by reading the register and is always written as 0.
pub fn encode_control2(settings: &Control2Settings) -> u8 {
    let mut register = Control2Register::default();
    register.set_watchdog_a_flag(false);
    register.set_countdown_a_flag(!settings.clear_countdown_a);
    register.set_countdown_b_flag(!settings.clear_countdown_b);
    register.set_second_flag(!settings.clear_second);
    register.set_alarm_flag(!settings.clear_alarm);
    register.set_watchdog_a_interrupt_enable(settings.watchdog_a_interrupt_enabled);
    register.set_countdown_a_interrupt_enable(settings.countdown_a_interrupt_enabled);
    register.set_countdown_b_interrupt_enable(settings.countdown_b_interrupt_enabled);
    register.into()
}

/// Decodes Control_3 from the first byte of `bytes`.
pub fn decode_control3(bytes: &[u8]) -> Result<Control3, CodecError> {
    let [raw] = register_block::<1>(bytes)?;
    let register = Control3Register::from(raw);
    let power_mode = register.power_mode();
    let switchover_enabled = extract_bits(power_mode, POWER_MODE_SWITCHOVER_OFF) == 0;
    Ok(Control3 {
        battery_low_detection_enabled: extract_bits(
            power_mode,
            POWER_MODE_BATTERY_LOW_DETECTION_OFF,
        ) == 0,
        switchover_enabled,
        direct_switching_enabled: switchover_enabled
            .then(|| extract_bits(power_mode, POWER_MODE_DIRECT_SWITCHING) == 1),
        battery_switchover_flag: register.battery_switchover_flag(),
        battery_low_flag: register.battery_low_flag(),
        battery_switchover_interrupt_enabled: register.battery_switchover_interrupt_enable(),
        battery_low_interrupt_enabled: register.battery_low_interrupt_enable(),
    })
}

/// Encodes Control_3.
///
/// The battery-low flag is read-only and written as 1. The switchover flag is
/// written as 0 only when clearing it.
///
/// # Errors
///
/// Returns [`CodecError::Range`] for the reserved power mode `110` (battery-low
/// detection, switchover and direct switching all disabled).
pub fn encode_control3(settings: &Control3Settings) -> Result<u8, CodecError> {
    let power_mode = pack_bits(&[
        (
            POWER_MODE_BATTERY_LOW_DETECTION_OFF,
            (!settings.battery_low_detection_enabled).into(),
        ),
        (
            POWER_MODE_SWITCHOVER_OFF,
            (!settings.switchover_enabled).into(),
        ),
        (
            POWER_MODE_DIRECT_SWITCHING,
            settings.direct_switching_enabled.into(),
        ),
    ]);
    if power_mode == ILLEGAL_POWER_MODE {
        error!("power mode {:?} is reserved", power_mode);
        return Err(CodecError::Range("power mode 110 is not allowed"));
    }

    let mut register = Control3Register::default();
    register.set_power_mode(power_mode);
    register.set_battery_switchover_flag(!settings.clear_battery_switchover);
    register.set_battery_low_flag(true);
    register.set_battery_switchover_interrupt_enable(settings.battery_switchover_interrupt_enabled);
    register.set_battery_low_interrupt_enable(settings.battery_low_interrupt_enabled);
    Ok(register.into())
}

/// Decodes Control_1, Control_2 and Control_3 from a 3-byte block.
pub fn decode_profile(bytes: &[u8]) -> Result<Profile, CodecError> {
    let raw = register_block::<PROFILE_LEN>(bytes)?;
    Ok(Profile {
        control1: decode_control1(&raw[0..1])?,
        control2: decode_control2(&raw[1..2])?,
        control3: decode_control3(&raw[2..3])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_control1() {
        let control = decode_control1(&[0b1010_1111]).unwrap();
        assert_eq!(
            control.capacitor_selection,
            CapacitorSelection::TwelvePointFivePicofarad
        );
        assert!(control.stop);
        assert_eq!(control.time_representation, TimeRepresentation::TwelveHour);
        assert!(control.second_interrupt_enabled);
        assert!(control.alarm_interrupt_enabled);
        assert!(control.correction_interrupt_enabled);

        let control = decode_control1(&[0]).unwrap();
        assert_eq!(control, Control1::default());
    }

    #[test]
    fn test_encode_control1() {
        let control = Control1 {
            capacitor_selection: CapacitorSelection::TwelvePointFivePicofarad,
            stop: false,
            time_representation: TimeRepresentation::TwelveHour,
            second_interrupt_enabled: false,
            alarm_interrupt_enabled: true,
            correction_interrupt_enabled: false,
        };
        assert_eq!(encode_control1(&control), 0b1000_1010);
        assert_eq!(encode_control1(&Control1::default()), 0);
    }

    #[test]
    fn test_encode_control1_drops_reserved_bits() {
        let control = decode_control1(&[0xFF]).unwrap();
        assert_eq!(encode_control1(&control), 0b1010_1111);
    }

    #[test]
    fn test_decode_control2() {
        let control = decode_control2(&[0b1010_1010]).unwrap();
        assert!(control.watchdog_a_flag);
        assert!(!control.countdown_a_flag);
        assert!(control.countdown_b_flag);
        assert!(!control.second_flag);
        assert!(control.alarm_flag);
        assert!(!control.watchdog_a_interrupt_enabled);
        assert!(control.countdown_a_interrupt_enabled);
        assert!(!control.countdown_b_interrupt_enabled);
    }

    #[test]
    fn test_encode_control2_keeps_flags_by_default() {
        assert_eq!(encode_control2(&Control2Settings::default()), 0b0111_1000);
    }

    #[test]
    fn test_encode_control2_clear_intents() {
        let settings = Control2Settings {
            watchdog_a_interrupt_enabled: true,
            countdown_a_interrupt_enabled: true,
            clear_countdown_a: true,
            ..Default::default()
        };
        assert_eq!(encode_control2(&settings), 0b0011_1110);

        let settings = Control2Settings {
            countdown_b_interrupt_enabled: true,
            clear_second: true,
            clear_alarm: true,
            ..Default::default()
        };
        assert_eq!(encode_control2(&settings), 0b0110_0001);
    }

    #[test]
    fn test_control2_settings_from_decoded() {
        let control = decode_control2(&[0b1111_1101]).unwrap();
        let settings = Control2Settings::from(&control);
        assert!(settings.watchdog_a_interrupt_enabled);
        assert!(!settings.countdown_a_interrupt_enabled);
        assert!(settings.countdown_b_interrupt_enabled);
        assert!(!settings.clear_alarm);
        assert_eq!(encode_control2(&settings), 0b0111_1101);
    }

    #[test]
    fn test_decode_control3_zero() {
        let control = decode_control3(&[0]).unwrap();
        assert!(control.battery_low_detection_enabled);
        assert!(control.switchover_enabled);
        assert_eq!(control.direct_switching_enabled, Some(false));
        assert!(!control.battery_switchover_flag);
        assert!(!control.battery_low_flag);
    }

    #[test]
    fn test_decode_control3_direct_switching_needs_switchover() {
        let control = decode_control3(&[0b0010_0000]).unwrap();
        assert_eq!(control.direct_switching_enabled, Some(true));

        let control = decode_control3(&[0b1110_1111]).unwrap();
        assert!(!control.battery_low_detection_enabled);
        assert!(!control.switchover_enabled);
        assert_eq!(control.direct_switching_enabled, None);
        assert!(control.battery_switchover_flag);
        assert!(control.battery_low_flag);
        assert!(control.battery_switchover_interrupt_enabled);
        assert!(control.battery_low_interrupt_enabled);
    }

    #[test]
    fn test_encode_control3() {
        assert_eq!(
            encode_control3(&Control3Settings::default()).unwrap(),
            0b0000_1100
        );

        let settings = Control3Settings {
            battery_switchover_interrupt_enabled: true,
            battery_low_interrupt_enabled: true,
            clear_battery_switchover: true,
            ..Default::default()
        };
        assert_eq!(encode_control3(&settings).unwrap(), 0b0000_0111);

        let settings = Control3Settings {
            battery_low_detection_enabled: false,
            switchover_enabled: false,
            direct_switching_enabled: true,
            ..Default::default()
        };
        assert_eq!(encode_control3(&settings).unwrap(), 0b1110_1100);

        let settings = Control3Settings {
            battery_low_detection_enabled: false,
            battery_low_interrupt_enabled: true,
            clear_battery_switchover: true,
            ..Default::default()
        };
        assert_eq!(encode_control3(&settings).unwrap(), 0b1000_0101);
    }

    #[test]
    fn test_encode_control3_rejects_reserved_power_mode() {
        let settings = Control3Settings {
            battery_low_detection_enabled: false,
            switchover_enabled: false,
            direct_switching_enabled: false,
            ..Default::default()
        };
        assert!(matches!(
            encode_control3(&settings),
            Err(CodecError::Range(_))
        ));
    }

    #[test]
    fn test_decode_profile() {
        let profile = decode_profile(&[0b0000_1000, 0b0000_1000, 0b0000_0100]).unwrap();
        assert_eq!(
            profile.control1.time_representation,
            TimeRepresentation::TwelveHour
        );
        assert!(profile.control2.alarm_flag);
        assert!(profile.control3.battery_low_flag);
    }

    #[test]
    fn test_decode_short_buffers() {
        assert!(matches!(
            decode_control1(&[]),
            Err(CodecError::Length {
                expected: 1,
                actual: 0
            })
        ));
        assert!(matches!(
            decode_profile(&[0, 0]),
            Err(CodecError::Length {
                expected: 3,
                actual: 2
            })
        ));
    }
}
