use crate::convert;
use crate::interrupt::{ActiveLevel, InterruptMap, InterruptPin, Interrupts};
use crate::register::power_ctl;
use crate::sample::{DataFormat, Justify, Range, SpiWire};
use crate::{ActivityAxes, Coupling, FifoControl, FifoMode, Rate, SleepFrequency, TapAxes};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapConfig {
    pub threshold_g: f32,
    pub duration_us: u32,
    pub latent_ms: f32,
    pub window_ms: f32,
    pub axes: TapAxes,
    pub suppress: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityConfig {
    pub activity_threshold_g: f32,
    pub activity_coupling: Coupling,
    pub inactivity_threshold_g: f32,
    pub inactivity_coupling: Coupling,
    pub inactivity_time_s: u8,
    pub axes: ActivityAxes,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreeFallConfig {
    pub threshold_g: f32,
    pub time_ms: u16,
}

/// Complete device setup, applied with [crate::ADXL345::configure].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub rate: Rate,
    pub data_format: DataFormat,
    pub link: bool,
    pub auto_sleep: bool,
    pub sleep: bool,
    pub sleep_frequency: SleepFrequency,
    pub fifo: FifoControl,
    /// Per-axis offset in g, added to every sample by the device.
    pub offset_g: [f32; 3],
    pub tap: TapConfig,
    pub activity: ActivityConfig,
    pub free_fall: FreeFallConfig,
    pub interrupt_map: InterruptMap,
    pub interrupts: Interrupts,
}

impl Default for Config {
    /// Single-shot measurements at 100Hz, ±2g full resolution,
    /// every detector off and every interrupt routed to INT1 but disabled.
    fn default() -> Self {
        Config {
            rate: Rate::Hz100,
            data_format: DataFormat {
                self_test: false,
                spi_wire: SpiWire::FourWire,
                active_level: ActiveLevel::Low,
                full_resolution: true,
                justify: Justify::Right,
                range: Range::G2,
            },
            link: true,
            auto_sleep: false,
            sleep: false,
            sleep_frequency: SleepFrequency::Hz1,
            fifo: FifoControl {
                mode: FifoMode::Bypass,
                trigger_pin: InterruptPin::Pin2,
                samples: 16,
            },
            offset_g: [0.0; 3],
            tap: TapConfig {
                threshold_g: 3.0,
                duration_us: 10_000,
                latent_ms: 20.0,
                window_ms: 80.0,
                axes: TapAxes::empty(),
                suppress: false,
            },
            activity: ActivityConfig {
                activity_threshold_g: 2.0,
                activity_coupling: Coupling::Ac,
                inactivity_threshold_g: 1.0,
                inactivity_coupling: Coupling::Dc,
                inactivity_time_s: 3,
                axes: ActivityAxes::empty(),
            },
            free_fall: FreeFallConfig {
                threshold_g: 0.8,
                time_ms: 10,
            },
            interrupt_map: InterruptMap::new(),
            interrupts: Interrupts::empty(),
        }
    }
}

impl Config {
    /// Buffer samples in the FIFO at 12.5Hz, ±16g, and interrupt when
    /// the watermark is reached or samples get dropped.
    pub fn fifo() -> Self {
        let mut config = Config::default();
        config.rate = Rate::Hz12_5;
        config.data_format.range = Range::G16;
        config.fifo.mode = FifoMode::Fifo;
        config.interrupts = Interrupts::WATERMARK | Interrupts::OVERRUN;
        config
    }

    /// Event detection on all three axes for each selected detector, with
    /// its interrupts routed to INT1 and enabled. `tap` covers both single
    /// and double tap.
    pub fn interrupt(tap: bool, activity: bool, inactivity: bool, free_fall: bool) -> Self {
        let mut config = Config::default();

        if tap {
            config.tap.axes = TapAxes::all();
            config.interrupts |= Interrupts::SINGLE_TAP | Interrupts::DOUBLE_TAP;
        }
        if activity {
            config.activity.axes |=
                ActivityAxes::ACTIVITY_X | ActivityAxes::ACTIVITY_Y | ActivityAxes::ACTIVITY_Z;
            config.interrupts |= Interrupts::ACTIVITY;
        }
        if inactivity {
            config.activity.axes |= ActivityAxes::INACTIVITY_X
                | ActivityAxes::INACTIVITY_Y
                | ActivityAxes::INACTIVITY_Z;
            config.interrupts |= Interrupts::INACTIVITY;
        }
        if free_fall {
            config.interrupts |= Interrupts::FREE_FALL;
        }
        config
    }

    /// POWER_CTL with measurement off.
    pub(crate) fn standby_power_bits(&self) -> u8 {
        let mut bits = self.sleep_frequency as u8;
        if self.link {
            bits |= power_ctl::LINK;
        }
        if self.auto_sleep {
            bits |= power_ctl::AUTO_SLEEP;
        }
        if self.sleep {
            bits |= power_ctl::SLEEP;
        }
        bits
    }

    /// THRESH_TAP up to TAP_AXES, which are contiguous.
    pub(crate) fn event_registers(&self) -> [u8; 14] {
        let [ofsx, ofsy, ofsz] = self.offset_g.map(convert::offset_from_g);
        let act_inact_ctl = self.activity.axes.bits()
            | ((self.activity.activity_coupling as u8) << 7)
            | ((self.activity.inactivity_coupling as u8) << 3);
        let tap_axes = self.tap.axes.bits() | (u8::from(self.tap.suppress) << 3);

        [
            convert::threshold_from_g(self.tap.threshold_g),
            ofsx as u8,
            ofsy as u8,
            ofsz as u8,
            convert::duration_from_us(self.tap.duration_us),
            convert::latent_from_ms(self.tap.latent_ms),
            convert::latent_from_ms(self.tap.window_ms),
            convert::threshold_from_g(self.activity.activity_threshold_g),
            convert::threshold_from_g(self.activity.inactivity_threshold_g),
            convert::inactivity_time_from_s(self.activity.inactivity_time_s),
            act_inact_ctl,
            convert::threshold_from_g(self.free_fall.threshold_g),
            convert::free_fall_time_from_ms(self.free_fall.time_ms),
            tap_axes,
        ]
    }
}
