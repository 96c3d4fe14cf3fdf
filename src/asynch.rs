//! Async implementation of the PCF8523 driver.
//!
//! This module mirrors the blocking [`crate::PCF8523`] facade on top of
//! `embedded-hal-async` traits. It is only available when the `async` feature
//! is enabled. The codec is shared, so every accessor decodes and validates
//! exactly like its blocking counterpart.
//!
//! # Example
//!
//! ```rust,ignore
//! use pcf8523::asynch::PCF8523;
//!
//! let mut rtc = PCF8523::from_i2c(i2c, pcf8523::DEFAULT_ADDRESS);
//!
//! let time = rtc.time().await?;
//! let datetime = rtc.datetime().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::bus::{frames, I2cBus};
use crate::registers::{ALARM_LEN, PROFILE_LEN, RESET_MAGIC_VALUE, TIMER_LEN, TIME_LEN};
use crate::{
    alarm, control, datetime, offset, timer, Alarm, AlarmDay, AlarmHour, AlarmMinute,
    AlarmWeekday, Config, Control1, Control2, Control2Settings, Control3, Control3Settings,
    CoreTime, Offset, OffsetMode, PCF8523Error, Profile, RegAddr, Time, TimeRepresentation, Timer,
    TimerAFrequencyControl, TimerBFrequencyControl, TimerControl,
};

/// Async access to a contiguous range of device registers.
///
/// See [`crate::RegisterBus`] for the contract.
#[allow(async_fn_in_trait)]
pub trait AsyncRegisterBus {
    /// Transport error.
    type Error;

    /// Reads registers starting at `register` into `buffer`, returning the
    /// number of bytes read.
    async fn read_block(&mut self, register: u8, buffer: &mut [u8])
        -> Result<usize, Self::Error>;

    /// Writes `data` to consecutive registers starting at `register`.
    async fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error>;
}

impl<B: AsyncRegisterBus + ?Sized> AsyncRegisterBus for &mut B {
    type Error = B::Error;

    async fn read_block(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error> {
        (**self).read_block(register, buffer).await
    }

    async fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_block(register, data).await
    }
}

impl<I2C: I2c> AsyncRegisterBus for I2cBus<I2C> {
    type Error = I2C::Error;

    async fn read_block(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error> {
        self.i2c
            .write_read(self.address, &[register], buffer)
            .await?;
        debug!("read {:?} from {:?}", &buffer[..], register);
        Ok(buffer.len())
    }

    async fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        for (frame, len) in frames(register, data) {
            debug!("write frame {:?}", &frame[..len]);
            self.i2c.write(self.address, &frame[..len]).await?;
        }
        Ok(())
    }
}

/// PCF8523 Real-Time Clock async driver.
pub struct PCF8523<B: AsyncRegisterBus> {
    pub(crate) bus: B,
    config: Config,
}

impl<I2C: I2c> PCF8523<I2cBus<I2C>> {
    /// Creates an async driver for the device at `address` on an I2C bus.
    pub fn from_i2c(i2c: I2C, address: u8) -> Self {
        Self::new(I2cBus::new(i2c, address))
    }
}

impl<B: AsyncRegisterBus> PCF8523<B> {
    /// Creates an async driver with the default configuration.
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, Config::default())
    }

    /// Creates an async driver with the given configuration.
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

    async fn read_registers<const N: usize>(
        &mut self,
        register: RegAddr,
    ) -> Result<([u8; N], usize), PCF8523Error<B::Error>> {
        let mut data = [0u8; N];
        debug!("reading {} bytes from {:?}", N, register);
        let len = self
            .bus
            .read_block(register as u8, &mut data)
            .await
            .map_err(PCF8523Error::Bus)?;
        Ok((data, len.min(N)))
    }

    async fn write_registers(
        &mut self,
        register: RegAddr,
        data: &[u8],
    ) -> Result<(), PCF8523Error<B::Error>> {
        debug!("writing {:?} to {:?}", data, register);
        self.bus
            .write_block(register as u8, data)
            .await
            .map_err(PCF8523Error::Bus)
    }

    /// Reads all three control registers.
    pub async fn profile(&mut self) -> Result<Profile, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<PROFILE_LEN>(RegAddr::Control1).await?;
        Ok(control::decode_profile(&data[..len])?)
    }

    /// Reads Control_2: interrupt flags and timer interrupt enables.
    pub async fn control2(&mut self) -> Result<Control2, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::Control2).await?;
        Ok(control::decode_control2(&data[..len])?)
    }

    /// Writes Control_2: interrupt enables plus the flags to clear.
    pub async fn set_control2(
        &mut self,
        settings: &Control2Settings,
    ) -> Result<(), PCF8523Error<B::Error>> {
        self.write_registers(RegAddr::Control2, &[control::encode_control2(settings)])
            .await
    }

    /// Reads Control_3: power mode and battery status.
    pub async fn control3(&mut self) -> Result<Control3, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::Control3).await?;
        Ok(control::decode_control3(&data[..len])?)
    }

    /// Writes Control_3. Nothing is written for the reserved power mode.
    pub async fn set_control3(
        &mut self,
        settings: &Control3Settings,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let value = control::encode_control3(settings)?;
        self.write_registers(RegAddr::Control3, &[value]).await
    }

    /// Reads the time registers with the configured hour mode and century.
    pub async fn time(&mut self) -> Result<Time, PCF8523Error<B::Error>> {
        self.time_with(None, None).await
    }

    /// Reads the time registers, overriding the hour mode and century.
    pub async fn time_with(
        &mut self,
        representation: Option<TimeRepresentation>,
        century: Option<u16>,
    ) -> Result<Time, PCF8523Error<B::Error>> {
        let (representation, century) = self.config.resolve(representation, century);
        let (data, len) = self.read_registers::<TIME_LEN>(RegAddr::Seconds).await?;
        Ok(datetime::decode_time(&data[..len], representation, century)?)
    }

    /// Writes the time registers with the configured hour mode and century.
    pub async fn set_time(&mut self, time: &CoreTime) -> Result<(), PCF8523Error<B::Error>> {
        self.set_time_with(time, None, None).await
    }

    /// Writes the time registers, overriding the hour mode and century.
    pub async fn set_time_with(
        &mut self,
        time: &CoreTime,
        representation: Option<TimeRepresentation>,
        century: Option<u16>,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let (representation, century) = self.config.resolve(representation, century);
        let raw = datetime::encode_time(time, representation, century)?;
        self.write_registers(RegAddr::Seconds, &raw).await
    }

    /// Gets the current date and time from the device.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, PCF8523Error<B::Error>> {
        Ok(self.time().await?.to_naive_datetime()?)
    }

    /// Sets the current date and time on the device.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let time = CoreTime::from_naive_datetime(datetime, self.config.time_representation)?;
        self.set_time(&time).await
    }

    /// Reads the four alarm registers.
    pub async fn alarm(&mut self) -> Result<Alarm, PCF8523Error<B::Error>> {
        self.alarm_with(None).await
    }

    /// Reads the four alarm registers, overriding the hour mode.
    pub async fn alarm_with(
        &mut self,
        representation: Option<TimeRepresentation>,
    ) -> Result<Alarm, PCF8523Error<B::Error>> {
        let (representation, _) = self.config.resolve(representation, None);
        let (data, len) = self.read_registers::<ALARM_LEN>(RegAddr::MinuteAlarm).await?;
        Ok(alarm::decode_alarm(&data[..len], representation)?)
    }

    /// Writes the four alarm registers.
    pub async fn set_alarm(&mut self, alarm: &Alarm) -> Result<(), PCF8523Error<B::Error>> {
        self.set_alarm_with(alarm, None).await
    }

    /// Writes the four alarm registers, overriding the hour mode.
    pub async fn set_alarm_with(
        &mut self,
        alarm: &Alarm,
        representation: Option<TimeRepresentation>,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let (representation, _) = self.config.resolve(representation, None);
        let raw = alarm::encode_alarm(alarm, representation)?;
        self.write_registers(RegAddr::MinuteAlarm, &raw).await
    }

    /// Writes the minute alarm register.
    pub async fn set_alarm_minute(
        &mut self,
        minute: &AlarmMinute,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let value = alarm::encode_alarm_minute(minute)?;
        self.write_registers(RegAddr::MinuteAlarm, &[value]).await
    }

    /// Writes the hour alarm register with the configured hour mode.
    pub async fn set_alarm_hour(&mut self, hour: &AlarmHour) -> Result<(), PCF8523Error<B::Error>> {
        self.set_alarm_hour_with(hour, None).await
    }

    /// Writes the hour alarm register, overriding the hour mode.
    pub async fn set_alarm_hour_with(
        &mut self,
        hour: &AlarmHour,
        representation: Option<TimeRepresentation>,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let (representation, _) = self.config.resolve(representation, None);
        let value = alarm::encode_alarm_hour(hour, representation)?;
        self.write_registers(RegAddr::HourAlarm, &[value]).await
    }

    /// Writes the day alarm register.
    pub async fn set_alarm_day(&mut self, day: &AlarmDay) -> Result<(), PCF8523Error<B::Error>> {
        let value = alarm::encode_alarm_day(day)?;
        self.write_registers(RegAddr::DayAlarm, &[value]).await
    }

    /// Writes the weekday alarm register.
    pub async fn set_alarm_weekday(
        &mut self,
        weekday: &AlarmWeekday,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let value = alarm::encode_alarm_weekday(weekday)?;
        self.write_registers(RegAddr::WeekdayAlarm, &[value]).await
    }

    /// Reads the offset register.
    pub async fn offset(&mut self) -> Result<Offset, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::Offset).await?;
        Ok(offset::decode_offset(&data[..len])?)
    }

    /// Writes the offset register. `value` must be within -64..=63.
    pub async fn set_offset(
        &mut self,
        mode: OffsetMode,
        value: i16,
    ) -> Result<(), PCF8523Error<B::Error>> {
        let raw = offset::encode_offset(mode, value)?;
        self.write_registers(RegAddr::Offset, &[raw]).await
    }

    /// Reads the five timer registers.
    pub async fn timer(&mut self) -> Result<Timer, PCF8523Error<B::Error>> {
        let (data, len) = self
            .read_registers::<TIMER_LEN>(RegAddr::TimerClockOutControl)
            .await?;
        Ok(timer::decode_timer(&data[..len])?)
    }

    /// Writes the five timer registers.
    pub async fn set_timer(&mut self, timer: &Timer) -> Result<(), PCF8523Error<B::Error>> {
        self.write_registers(RegAddr::TimerClockOutControl, &timer::encode_timer(timer))
            .await
    }

    /// Reads the remaining ticks of timer A.
    pub async fn timer_a_value(&mut self) -> Result<u8, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::TimerA).await?;
        Ok(timer::decode_timer_value(&data[..len])?)
    }

    /// Loads timer A with `ticks` (0-255).
    pub async fn set_timer_a_value(&mut self, ticks: i32) -> Result<(), PCF8523Error<B::Error>> {
        let value = timer::encode_timer_value(ticks)?;
        self.write_registers(RegAddr::TimerA, &[value]).await
    }

    /// Reads the remaining ticks of timer B.
    pub async fn timer_b_value(&mut self) -> Result<u8, PCF8523Error<B::Error>> {
        let (data, len) = self.read_registers::<1>(RegAddr::TimerB).await?;
        Ok(timer::decode_timer_value(&data[..len])?)
    }

    /// Loads timer B with `ticks` (0-255).
    pub async fn set_timer_b_value(&mut self, ticks: i32) -> Result<(), PCF8523Error<B::Error>> {
        let value = timer::encode_timer_value(ticks)?;
        self.write_registers(RegAddr::TimerB, &[value]).await
    }

    /// Performs a software reset of the device.
    pub async fn soft_reset(&mut self) -> Result<(), PCF8523Error<B::Error>> {
        debug!("software reset");
        self.write_registers(RegAddr::Control1, &[RESET_MAGIC_VALUE])
            .await
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty, $decode:path, $encode:path)),+) => {
        impl<B: AsyncRegisterBus> PCF8523<B> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, PCF8523Error<B::Error>> {
                        let (data, len) = self.read_registers::<1>($regaddr).await?;
                        Ok($decode(&data[..len])?)
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: &$typ) -> Result<(), PCF8523Error<B::Error>> {
                        self.write_registers($regaddr, &[$encode(value)]).await
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
