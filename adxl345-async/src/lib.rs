#![cfg_attr(not(test), no_std)]

mod config;
pub mod convert;
#[cfg(test)]
mod fake;
mod interface;
mod interrupt;
mod register;
mod sample;

use bitflags::bitflags;
use embedded_hal::digital::{Error as _, ErrorKind as PinErrorKind};
use embedded_hal_async::digital::Wait;

pub use config::{ActivityConfig, Config, FreeFallConfig, TapConfig};
pub use interface::{Address, I2cInterface, Interface, SpiInterface};
pub use interrupt::{ActiveLevel, Interrupt, InterruptMap, InterruptPin, Interrupts};
pub use sample::{Acceleration, DataFormat, Justify, Range, SpiWire};

const DEVICE_ID: u8 = 0xE5;

/// Number of bytes in one X/Y/Z sample.
const SAMPLE_SIZE: usize = 6;

/// Size of the register map, every address is below this.
const REGISTER_COUNT: usize = 0x40;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChipInfo {
    pub chip_name: &'static str,
    pub manufacturer_name: &'static str,
    pub interface: &'static str,
    pub supply_voltage_min_v: f32,
    pub supply_voltage_max_v: f32,
    pub max_current_ma: f32,
    pub temperature_min: f32,
    pub temperature_max: f32,
    pub driver_version: u32,
}

pub const INFO: ChipInfo = ChipInfo {
    chip_name: "Analog Devices ADXL345",
    manufacturer_name: "Analog Devices",
    interface: "IIC SPI",
    supply_voltage_min_v: 2.0,
    supply_voltage_max_v: 3.6,
    max_current_ma: 0.14,
    temperature_min: -40.0,
    temperature_max: 85.0,
    driver_version: 2000,
};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TapAxes: u8 {
        const X = 1 << 2;
        const Y = 1 << 1;
        const Z = 1 << 0;
    }

    /// Axes taking part in activity and inactivity detection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ActivityAxes: u8 {
        const ACTIVITY_X   = 1 << 6;
        const ACTIVITY_Y   = 1 << 5;
        const ACTIVITY_Z   = 1 << 4;
        const INACTIVITY_X = 1 << 2;
        const INACTIVITY_Y = 1 << 1;
        const INACTIVITY_Z = 1 << 0;
    }

    /// First axis involved in a tap or activity event.
    /// Not cleared on read, updated on the next event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TapStatus: u8 {
        const ACTIVITY_X = 1 << 6;
        const ACTIVITY_Y = 1 << 5;
        const ACTIVITY_Z = 1 << 4;
        const ASLEEP     = 1 << 3;
        const TAP_X      = 1 << 2;
        const TAP_Y      = 1 << 1;
        const TAP_Z      = 1 << 0;
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PowerControl: u8 {
        /// Serially link activity and inactivity detection.
        const LINK       = 1 << 5;
        const AUTO_SLEEP = 1 << 4;
        const MEASURE    = 1 << 3;
        const SLEEP      = 1 << 2;
    }
}

/// Output data rate, including the reduced power rates.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rate {
    Hz0_10 = 0x00,
    Hz0_20 = 0x01,
    Hz0_39 = 0x02,
    Hz0_78 = 0x03,
    Hz1_56 = 0x04,
    Hz3_13 = 0x05,
    Hz6_25 = 0x06,
    Hz12_5 = 0x07,
    Hz25 = 0x08,
    Hz50 = 0x09,
    Hz100 = 0x0A,
    Hz200 = 0x0B,
    Hz400 = 0x0C,
    Hz800 = 0x0D,
    Hz1600 = 0x0E,
    Hz3200 = 0x0F,
    LowPowerHz12_5 = 0x17,
    LowPowerHz25 = 0x18,
    LowPowerHz50 = 0x19,
    LowPowerHz100 = 0x1A,
    LowPowerHz200 = 0x1B,
    LowPowerHz400 = 0x1C,
}

impl Rate {
    pub fn from_bits(bits: u8) -> Option<Self> {
        let rate = match bits {
            0x00 => Rate::Hz0_10,
            0x01 => Rate::Hz0_20,
            0x02 => Rate::Hz0_39,
            0x03 => Rate::Hz0_78,
            0x04 => Rate::Hz1_56,
            0x05 => Rate::Hz3_13,
            0x06 => Rate::Hz6_25,
            0x07 => Rate::Hz12_5,
            0x08 => Rate::Hz25,
            0x09 => Rate::Hz50,
            0x0A => Rate::Hz100,
            0x0B => Rate::Hz200,
            0x0C => Rate::Hz400,
            0x0D => Rate::Hz800,
            0x0E => Rate::Hz1600,
            0x0F => Rate::Hz3200,
            0x17 => Rate::LowPowerHz12_5,
            0x18 => Rate::LowPowerHz25,
            0x19 => Rate::LowPowerHz50,
            0x1A => Rate::LowPowerHz100,
            0x1B => Rate::LowPowerHz200,
            0x1C => Rate::LowPowerHz400,
            _ => return None,
        };
        Some(rate)
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Coupling {
    Dc = 0,
    Ac = 1,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepFrequency {
    Hz8 = 0b00,
    Hz4 = 0b01,
    Hz2 = 0b10,
    Hz1 = 0b11,
}

impl SleepFrequency {
    fn from_bits_truncate(bits: u8) -> Self {
        match bits & register::power_ctl::WAKEUP {
            0b00 => SleepFrequency::Hz8,
            0b01 => SleepFrequency::Hz4,
            0b10 => SleepFrequency::Hz2,
            _ => SleepFrequency::Hz1,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoMode {
    Bypass = 0b00,
    Fifo = 0b01,
    Stream = 0b10,
    Trigger = 0b11,
}

impl FifoMode {
    fn from_bits_truncate(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => FifoMode::Bypass,
            0b01 => FifoMode::Fifo,
            0b10 => FifoMode::Stream,
            _ => FifoMode::Trigger,
        }
    }
}

/// Contents of the FIFO_CTL register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoControl {
    pub mode: FifoMode,
    /// Pin whose interrupt ends trigger mode collection.
    pub trigger_pin: InterruptPin,
    /// Watermark level, or samples kept before the trigger in trigger mode.
    /// Only the low 5 bits are used.
    pub samples: u8,
}

impl FifoControl {
    pub(crate) fn bits(&self) -> u8 {
        ((self.mode as u8) << register::fifo_ctl::MODE_SHIFT)
            | ((self.trigger_pin as u8) << 5)
            | (self.samples & register::fifo_ctl::SAMPLES)
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        let trigger_pin = if bits & register::fifo_ctl::TRIGGER != 0 {
            InterruptPin::Pin2
        } else {
            InterruptPin::Pin1
        };

        FifoControl {
            mode: FifoMode::from_bits_truncate(bits >> register::fifo_ctl::MODE_SHIFT),
            trigger_pin,
            samples: bits & register::fifo_ctl::SAMPLES,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoStatus {
    /// A trigger event happened, only meaningful in trigger mode.
    pub triggered: bool,
    /// Samples waiting in the FIFO.
    pub entries: u8,
}

impl FifoStatus {
    fn from_bits(bits: u8) -> Self {
        FifoStatus {
            triggered: bits & register::fifo_status::FIFO_TRIG != 0,
            entries: bits & register::fifo_status::ENTRIES,
        }
    }
}

#[derive(Debug)]
pub enum Error<E> {
    Bus(E),
    InvalidDeviceId(u8),
    /// A raw register access reaches past the last register.
    InvalidRegister(u8),
    UnknownRate(u8),
    EmptyBuffer,
    /// The host interrupt pin failed while waiting for it.
    Pin(PinErrorKind),
}

impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            Error::Bus(e) => write!(f, "Bus error: {}", e),
            Error::InvalidDeviceId(id) => write!(f, "Invalid device ID: {:#04x}", id),
            Error::InvalidRegister(reg) => write!(f, "Invalid register: {:#04x}", reg),
            Error::UnknownRate(bits) => write!(f, "Unknown data rate: {:#04x}", bits),
            Error::EmptyBuffer => write!(f, "Sample buffer is empty"),
            Error::Pin(kind) => write!(f, "Interrupt pin error: {:?}", kind),
        }
    }
}

impl<E> core::convert::From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

pub struct ADXL345<IFACE> {
    iface: IFACE,
}

impl<I2C: embedded_hal_async::i2c::I2c> ADXL345<I2cInterface<I2C>> {
    pub fn new_i2c(i2c: I2C, address: Address) -> Self {
        ADXL345::new(I2cInterface::new(i2c, address))
    }
}

impl<SPI: embedded_hal_async::spi::SpiDevice> ADXL345<SpiInterface<SPI>> {
    pub fn new_spi(spi: SPI) -> Self {
        ADXL345::new(SpiInterface::new(spi))
    }
}

impl<IFACE: Interface<Error = E>, E> ADXL345<IFACE> {
    pub fn new(iface: IFACE) -> Self {
        ADXL345 { iface }
    }

    pub fn release(self) -> IFACE {
        self.iface
    }

    // Initialization

    pub async fn device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::DEVID).await
    }

    /// Check that the device on the bus is an ADXL345.
    pub async fn initialize(&mut self) -> Result<(), Error<E>> {
        let device_id = self.device_id().await?;

        if device_id == DEVICE_ID {
            Ok(())
        } else {
            log::warn!("adxl345: invalid device id {:#04x}", device_id);
            Err(Error::InvalidDeviceId(device_id))
        }
    }

    /// Stop measuring and put the device to sleep.
    pub async fn power_down(&mut self) -> Result<(), Error<E>> {
        self.update_u8(
            register::POWER_CTL,
            register::power_ctl::MEASURE | register::power_ctl::SLEEP,
            register::power_ctl::SLEEP,
        )
        .await
    }

    /// Apply a complete configuration and start measuring.
    ///
    /// The device stays in standby until everything is written. Interrupts
    /// are routed before they are enabled.
    pub async fn configure(&mut self, config: &Config) -> Result<(), Error<E>> {
        let standby = config.standby_power_bits();
        self.write_u8(register::POWER_CTL, standby).await?;

        self.write_u8(register::BW_RATE, config.rate as u8).await?;
        self.set_data_format(config.data_format).await?;
        self.set_fifo_control(config.fifo).await?;
        self.write(register::THRESH_TAP, &config.event_registers())
            .await?;

        self.set_interrupt_map(config.interrupt_map).await?;
        self.set_enabled_interrupts(config.interrupts).await?;

        self.write_u8(register::POWER_CTL, standby | register::power_ctl::MEASURE)
            .await?;

        log::debug!("adxl345: configured, interrupts {:?}", config.interrupts);
        Ok(())
    }

    // Interrupts

    pub async fn interrupt_enabled(&mut self, interrupt: Interrupt) -> Result<bool, Error<E>> {
        self.read_bit(register::INT_ENABLE, interrupt.mask()).await
    }

    /// Enable or disable one interrupt, leaving the others untouched.
    pub async fn set_interrupt_enabled(
        &mut self,
        interrupt: Interrupt,
        enabled: bool,
    ) -> Result<(), Error<E>> {
        self.write_bit(register::INT_ENABLE, interrupt.mask(), enabled)
            .await
    }

    pub async fn enabled_interrupts(&mut self) -> Result<Interrupts, Error<E>> {
        let bits = self.read_u8(register::INT_ENABLE).await?;
        Ok(Interrupts::from_bits_retain(bits))
    }

    pub async fn set_enabled_interrupts(&mut self, interrupts: Interrupts) -> Result<(), Error<E>> {
        self.write_u8(register::INT_ENABLE, interrupts.bits()).await
    }

    /// Pin the interrupt is routed to.
    pub async fn interrupt_pin(&mut self, interrupt: Interrupt) -> Result<InterruptPin, Error<E>> {
        Ok(self.interrupt_map().await?.pin(interrupt))
    }

    /// Route one interrupt, leaving the others untouched.
    pub async fn set_interrupt_pin(
        &mut self,
        interrupt: Interrupt,
        pin: InterruptPin,
    ) -> Result<(), Error<E>> {
        self.write_bit(
            register::INT_MAP,
            interrupt.mask(),
            pin == InterruptPin::Pin2,
        )
        .await
    }

    pub async fn interrupt_map(&mut self) -> Result<InterruptMap, Error<E>> {
        let bits = self.read_u8(register::INT_MAP).await?;
        Ok(InterruptMap::from_bits(bits))
    }

    pub async fn set_interrupt_map(&mut self, map: InterruptMap) -> Result<(), Error<E>> {
        self.write_u8(register::INT_MAP, map.bits()).await
    }

    pub async fn interrupt_active_level(&mut self) -> Result<ActiveLevel, Error<E>> {
        let inverted = self
            .read_bit(register::DATA_FORMAT, register::data_format::INT_INVERT)
            .await?;
        Ok(ActiveLevel::from_bit(inverted))
    }

    pub async fn set_interrupt_active_level(&mut self, level: ActiveLevel) -> Result<(), Error<E>> {
        self.write_bit(
            register::DATA_FORMAT,
            register::data_format::INT_INVERT,
            level == ActiveLevel::Low,
        )
        .await
    }

    /// Snapshot of the asserted interrupt conditions.
    ///
    /// Reading clears the tap, activity, inactivity and free-fall
    /// conditions. Data ready, watermark and overrun stay asserted until
    /// the samples are read. Conditions are reported whether or not they
    /// are enabled.
    pub async fn interrupt_source(&mut self) -> Result<Interrupts, Error<E>> {
        let bits = self.read_u8(register::INT_SOURCE).await?;
        Ok(Interrupts::from_bits_retain(bits))
    }

    /// Read the interrupt source once and call `on_interrupt` for every
    /// asserted condition, from data ready down to overrun.
    pub async fn handle_interrupt<F>(&mut self, mut on_interrupt: F) -> Result<Interrupts, Error<E>>
    where
        F: FnMut(Interrupt),
    {
        let source = self.interrupt_source().await?;

        for interrupt in source.iter_conditions() {
            log::debug!("adxl345: interrupt {:?}", interrupt);
            on_interrupt(interrupt);
        }

        Ok(source)
    }

    /// Wait for the host pin wired to INT1 or INT2 to reach `level`,
    /// then read the interrupt source.
    pub async fn wait_for_interrupt<P: Wait>(
        &mut self,
        pin: &mut P,
        level: ActiveLevel,
    ) -> Result<Interrupts, Error<E>> {
        let waited = match level {
            ActiveLevel::High => pin.wait_for_high().await,
            ActiveLevel::Low => pin.wait_for_low().await,
        };
        waited.map_err(|e| Error::Pin(e.kind()))?;

        self.interrupt_source().await
    }

    // Tap

    pub async fn tap_threshold(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::THRESH_TAP).await
    }

    /// 62.5 mg/LSB, see [convert::threshold_from_g].
    pub async fn set_tap_threshold(&mut self, threshold: u8) -> Result<(), Error<E>> {
        self.write_u8(register::THRESH_TAP, threshold).await
    }

    pub async fn offset(&mut self) -> Result<(i8, i8, i8), Error<E>> {
        let mut buf = [0; 3];
        self.read_registers(register::OFSX, &mut buf).await?;
        Ok((buf[0] as i8, buf[1] as i8, buf[2] as i8))
    }

    /// 15.6 mg/LSB, see [convert::offset_from_g].
    pub async fn set_offset(&mut self, x: i8, y: i8, z: i8) -> Result<(), Error<E>> {
        self.write(register::OFSX, &[x as u8, y as u8, z as u8])
            .await
    }

    pub async fn duration(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::DUR).await
    }

    /// 625 us/LSB, 0 disables tap detection.
    pub async fn set_duration(&mut self, duration: u8) -> Result<(), Error<E>> {
        self.write_u8(register::DUR, duration).await
    }

    pub async fn latent(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::LATENT).await
    }

    /// 1.25 ms/LSB, 0 disables double tap detection.
    pub async fn set_latent(&mut self, latent: u8) -> Result<(), Error<E>> {
        self.write_u8(register::LATENT, latent).await
    }

    pub async fn window(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::WINDOW).await
    }

    /// 1.25 ms/LSB, 0 disables double tap detection.
    pub async fn set_window(&mut self, window: u8) -> Result<(), Error<E>> {
        self.write_u8(register::WINDOW, window).await
    }

    pub async fn tap_axes(&mut self) -> Result<TapAxes, Error<E>> {
        let bits = self.read_u8(register::TAP_AXES).await?;
        Ok(TapAxes::from_bits_truncate(bits))
    }

    pub async fn set_tap_axes(&mut self, axes: TapAxes) -> Result<(), Error<E>> {
        self.update_u8(register::TAP_AXES, register::tap_axes::AXES, axes.bits())
            .await
    }

    pub async fn tap_suppress(&mut self) -> Result<bool, Error<E>> {
        self.read_bit(register::TAP_AXES, register::tap_axes::SUPPRESS)
            .await
    }

    pub async fn set_tap_suppress(&mut self, suppress: bool) -> Result<(), Error<E>> {
        self.write_bit(register::TAP_AXES, register::tap_axes::SUPPRESS, suppress)
            .await
    }

    pub async fn tap_status(&mut self) -> Result<TapStatus, Error<E>> {
        let bits = self.read_u8(register::ACT_TAP_STATUS).await?;
        Ok(TapStatus::from_bits_truncate(bits))
    }

    // Activity and inactivity

    pub async fn activity_threshold(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::THRESH_ACT).await
    }

    pub async fn set_activity_threshold(&mut self, threshold: u8) -> Result<(), Error<E>> {
        self.write_u8(register::THRESH_ACT, threshold).await
    }

    pub async fn inactivity_threshold(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::THRESH_INACT).await
    }

    pub async fn set_inactivity_threshold(&mut self, threshold: u8) -> Result<(), Error<E>> {
        self.write_u8(register::THRESH_INACT, threshold).await
    }

    pub async fn inactivity_time(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::TIME_INACT).await
    }

    /// 1 s/LSB.
    pub async fn set_inactivity_time(&mut self, time: u8) -> Result<(), Error<E>> {
        self.write_u8(register::TIME_INACT, time).await
    }

    pub async fn activity_axes(&mut self) -> Result<ActivityAxes, Error<E>> {
        let bits = self.read_u8(register::ACT_INACT_CTL).await?;
        Ok(ActivityAxes::from_bits_truncate(bits))
    }

    pub async fn set_activity_axes(&mut self, axes: ActivityAxes) -> Result<(), Error<E>> {
        self.update_u8(
            register::ACT_INACT_CTL,
            register::act_inact_ctl::AXES,
            axes.bits(),
        )
        .await
    }

    pub async fn activity_coupling(&mut self) -> Result<Coupling, Error<E>> {
        let ac = self
            .read_bit(register::ACT_INACT_CTL, register::act_inact_ctl::ACT_AC)
            .await?;
        Ok(if ac { Coupling::Ac } else { Coupling::Dc })
    }

    pub async fn set_activity_coupling(&mut self, coupling: Coupling) -> Result<(), Error<E>> {
        self.write_bit(
            register::ACT_INACT_CTL,
            register::act_inact_ctl::ACT_AC,
            coupling == Coupling::Ac,
        )
        .await
    }

    pub async fn inactivity_coupling(&mut self) -> Result<Coupling, Error<E>> {
        let ac = self
            .read_bit(register::ACT_INACT_CTL, register::act_inact_ctl::INACT_AC)
            .await?;
        Ok(if ac { Coupling::Ac } else { Coupling::Dc })
    }

    pub async fn set_inactivity_coupling(&mut self, coupling: Coupling) -> Result<(), Error<E>> {
        self.write_bit(
            register::ACT_INACT_CTL,
            register::act_inact_ctl::INACT_AC,
            coupling == Coupling::Ac,
        )
        .await
    }

    // Free fall

    pub async fn free_fall_threshold(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::THRESH_FF).await
    }

    pub async fn set_free_fall_threshold(&mut self, threshold: u8) -> Result<(), Error<E>> {
        self.write_u8(register::THRESH_FF, threshold).await
    }

    pub async fn free_fall_time(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(register::TIME_FF).await
    }

    /// 5 ms/LSB.
    pub async fn set_free_fall_time(&mut self, time: u8) -> Result<(), Error<E>> {
        self.write_u8(register::TIME_FF, time).await
    }

    // Data rate and format

    pub async fn rate(&mut self) -> Result<Rate, Error<E>> {
        let bits = self.read_u8(register::BW_RATE).await? & register::bw_rate::RATE;
        Rate::from_bits(bits).ok_or(Error::UnknownRate(bits))
    }

    pub async fn set_rate(&mut self, rate: Rate) -> Result<(), Error<E>> {
        self.update_u8(register::BW_RATE, register::bw_rate::RATE, rate as u8)
            .await
    }

    pub async fn data_format(&mut self) -> Result<DataFormat, Error<E>> {
        let bits = self.read_u8(register::DATA_FORMAT).await?;
        Ok(DataFormat::from_bits(bits))
    }

    pub async fn set_data_format(&mut self, format: DataFormat) -> Result<(), Error<E>> {
        self.write_u8(register::DATA_FORMAT, format.bits()).await
    }

    pub async fn self_test(&mut self) -> Result<bool, Error<E>> {
        self.read_bit(register::DATA_FORMAT, register::data_format::SELF_TEST)
            .await
    }

    pub async fn set_self_test(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.write_bit(register::DATA_FORMAT, register::data_format::SELF_TEST, enabled)
            .await
    }

    pub async fn spi_wire(&mut self) -> Result<SpiWire, Error<E>> {
        Ok(self.data_format().await?.spi_wire)
    }

    pub async fn set_spi_wire(&mut self, wire: SpiWire) -> Result<(), Error<E>> {
        self.write_bit(
            register::DATA_FORMAT,
            register::data_format::SPI,
            wire == SpiWire::ThreeWire,
        )
        .await
    }

    pub async fn full_resolution(&mut self) -> Result<bool, Error<E>> {
        self.read_bit(register::DATA_FORMAT, register::data_format::FULL_RES)
            .await
    }

    pub async fn set_full_resolution(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.write_bit(register::DATA_FORMAT, register::data_format::FULL_RES, enabled)
            .await
    }

    pub async fn justify(&mut self) -> Result<Justify, Error<E>> {
        Ok(self.data_format().await?.justify)
    }

    pub async fn set_justify(&mut self, justify: Justify) -> Result<(), Error<E>> {
        self.write_bit(
            register::DATA_FORMAT,
            register::data_format::JUSTIFY,
            justify == Justify::Left,
        )
        .await
    }

    pub async fn range(&mut self) -> Result<Range, Error<E>> {
        Ok(self.data_format().await?.range)
    }

    pub async fn set_range(&mut self, range: Range) -> Result<(), Error<E>> {
        self.update_u8(register::DATA_FORMAT, register::data_format::RANGE, range as u8)
            .await
    }

    // Power

    pub async fn power_control(&mut self) -> Result<PowerControl, Error<E>> {
        let bits = self.read_u8(register::POWER_CTL).await?;
        Ok(PowerControl::from_bits_truncate(bits))
    }

    /// Write every power flag at once, keeping the sleep frequency.
    pub async fn set_power_control(&mut self, power: PowerControl) -> Result<(), Error<E>> {
        self.update_u8(register::POWER_CTL, PowerControl::all().bits(), power.bits())
            .await
    }

    pub async fn link_activity_inactivity(&mut self) -> Result<bool, Error<E>> {
        Ok(self.power_control().await?.contains(PowerControl::LINK))
    }

    pub async fn set_link_activity_inactivity(&mut self, linked: bool) -> Result<(), Error<E>> {
        self.write_bit(register::POWER_CTL, register::power_ctl::LINK, linked)
            .await
    }

    pub async fn auto_sleep(&mut self) -> Result<bool, Error<E>> {
        Ok(self.power_control().await?.contains(PowerControl::AUTO_SLEEP))
    }

    pub async fn set_auto_sleep(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.write_bit(register::POWER_CTL, register::power_ctl::AUTO_SLEEP, enabled)
            .await
    }

    pub async fn measure(&mut self) -> Result<bool, Error<E>> {
        Ok(self.power_control().await?.contains(PowerControl::MEASURE))
    }

    pub async fn set_measure(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.write_bit(register::POWER_CTL, register::power_ctl::MEASURE, enabled)
            .await
    }

    pub async fn sleep(&mut self) -> Result<bool, Error<E>> {
        Ok(self.power_control().await?.contains(PowerControl::SLEEP))
    }

    pub async fn set_sleep(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.write_bit(register::POWER_CTL, register::power_ctl::SLEEP, enabled)
            .await
    }

    pub async fn sleep_frequency(&mut self) -> Result<SleepFrequency, Error<E>> {
        let bits = self.read_u8(register::POWER_CTL).await?;
        Ok(SleepFrequency::from_bits_truncate(bits))
    }

    pub async fn set_sleep_frequency(&mut self, frequency: SleepFrequency) -> Result<(), Error<E>> {
        self.update_u8(
            register::POWER_CTL,
            register::power_ctl::WAKEUP,
            frequency as u8,
        )
        .await
    }

    // FIFO

    pub async fn fifo_control(&mut self) -> Result<FifoControl, Error<E>> {
        let bits = self.read_u8(register::FIFO_CTL).await?;
        Ok(FifoControl::from_bits(bits))
    }

    pub async fn set_fifo_control(&mut self, fifo: FifoControl) -> Result<(), Error<E>> {
        self.write_u8(register::FIFO_CTL, fifo.bits()).await
    }

    pub async fn fifo_mode(&mut self) -> Result<FifoMode, Error<E>> {
        Ok(self.fifo_control().await?.mode)
    }

    pub async fn set_fifo_mode(&mut self, mode: FifoMode) -> Result<(), Error<E>> {
        self.update_u8(
            register::FIFO_CTL,
            register::fifo_ctl::MODE,
            (mode as u8) << register::fifo_ctl::MODE_SHIFT,
        )
        .await
    }

    pub async fn trigger_pin(&mut self) -> Result<InterruptPin, Error<E>> {
        Ok(self.fifo_control().await?.trigger_pin)
    }

    pub async fn set_trigger_pin(&mut self, pin: InterruptPin) -> Result<(), Error<E>> {
        self.write_bit(
            register::FIFO_CTL,
            register::fifo_ctl::TRIGGER,
            pin == InterruptPin::Pin2,
        )
        .await
    }

    pub async fn watermark(&mut self) -> Result<u8, Error<E>> {
        Ok(self.fifo_control().await?.samples)
    }

    /// Only the low 5 bits of `level` are kept.
    pub async fn set_watermark(&mut self, level: u8) -> Result<(), Error<E>> {
        self.update_u8(register::FIFO_CTL, register::fifo_ctl::SAMPLES, level)
            .await
    }

    pub async fn fifo_status(&mut self) -> Result<FifoStatus, Error<E>> {
        let bits = self.read_u8(register::FIFO_STATUS).await?;
        Ok(FifoStatus::from_bits(bits))
    }

    // Data

    /// Read the current sample from the data registers.
    pub async fn acceleration(&mut self) -> Result<Acceleration, Error<E>> {
        let format = self.data_format().await?;
        self.read_sample(&format).await
    }

    /// Read samples into `buf` and return how many were written.
    ///
    /// In bypass mode this is the single current sample, otherwise it is as
    /// many samples as the FIFO holds, up to the length of `buf`. The FIFO
    /// reports up to 33 entries, the 32 stored plus the one waiting in the
    /// data registers.
    pub async fn read(&mut self, buf: &mut [Acceleration]) -> Result<usize, Error<E>> {
        if buf.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        let fifo = self.fifo_control().await?;
        let format = self.data_format().await?;

        if fifo.mode == FifoMode::Bypass {
            buf[0] = self.read_sample(&format).await?;
            return Ok(1);
        }

        let entries = self.fifo_status().await?.entries as usize;
        let count = entries.min(buf.len());
        // Every sample has to be popped with its own burst of the
        // data registers.
        for sample in buf[..count].iter_mut() {
            *sample = self.read_sample(&format).await?;
        }

        log::trace!("adxl345: read {} of {} fifo entries", count, entries);
        Ok(count)
    }

    async fn read_sample(&mut self, format: &DataFormat) -> Result<Acceleration, Error<E>> {
        let mut buf = [0; SAMPLE_SIZE];
        self.read_registers(register::DATAX0, &mut buf).await?;
        Ok(format.decode(&buf))
    }

    // Raw register access

    /// Read `buf.len()` registers starting at `register`.
    ///
    /// Fails with [Error::InvalidRegister] when the range goes past 0x3F.
    pub async fn register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        check_register_range(register, buf.len())?;
        self.read_registers(register, buf).await
    }

    pub async fn set_register(&mut self, register: u8, data: &[u8]) -> Result<(), Error<E>> {
        check_register_range(register, data.len())?;
        self.write(register, data).await
    }

    // Register r/w utilities

    async fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.iface.read_registers(register, buf).await?;
        Ok(())
    }

    async fn read_u8(&mut self, register: u8) -> Result<u8, Error<E>> {
        let mut data: [u8; 1] = [0; 1];
        self.read_registers(register, &mut data).await?;
        Ok(data[0])
    }

    async fn write(&mut self, register: u8, data: &[u8]) -> Result<(), Error<E>> {
        self.iface.write_registers(register, data).await?;
        Ok(())
    }

    async fn write_u8(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        self.write(register, &[value]).await
    }

    async fn read_bit(&mut self, register: u8, mask: u8) -> Result<bool, Error<E>> {
        Ok(self.read_u8(register).await? & mask != 0)
    }

    async fn write_bit(&mut self, register: u8, mask: u8, set: bool) -> Result<(), Error<E>> {
        self.update_u8(register, mask, if set { mask } else { 0 })
            .await
    }

    /// Replace the bits of `mask` with the ones of `value`.
    async fn update_u8(&mut self, register: u8, mask: u8, value: u8) -> Result<(), Error<E>> {
        let prev = self.read_u8(register).await?;
        let next = (prev & !mask) | (value & mask);

        log::trace!(
            "adxl345: {:#04x} {:#010b} -> {:#010b}",
            register,
            prev,
            next
        );
        self.write_u8(register, next).await
    }
}

fn check_register_range<E>(register: u8, len: usize) -> Result<(), Error<E>> {
    if register as usize + len > REGISTER_COUNT {
        Err(Error::InvalidRegister(register))
    } else {
        Ok(())
    }
}
