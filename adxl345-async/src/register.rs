#![allow(dead_code)]

/// Device ID, always reads 0xE5
pub const DEVID: u8 = 0x00;

// 0x01 to 0x1C are reserved

/// Tap threshold
pub const THRESH_TAP: u8 = 0x1D;

/// X-axis offset
pub const OFSX: u8 = 0x1E;
/// Y-axis offset
pub const OFSY: u8 = 0x1F;
/// Z-axis offset
pub const OFSZ: u8 = 0x20;

/// Tap duration
pub const DUR: u8 = 0x21;
/// Tap latency
pub const LATENT: u8 = 0x22;
/// Tap window
pub const WINDOW: u8 = 0x23;

/// Activity threshold
pub const THRESH_ACT: u8 = 0x24;
/// Inactivity threshold
pub const THRESH_INACT: u8 = 0x25;
/// Inactivity time
pub const TIME_INACT: u8 = 0x26;
/// Axis enable control for activity and inactivity detection
pub const ACT_INACT_CTL: u8 = 0x27;

/// Free-fall threshold
pub const THRESH_FF: u8 = 0x28;
/// Free-fall time
pub const TIME_FF: u8 = 0x29;

/// Axis control for single tap/double tap
pub const TAP_AXES: u8 = 0x2A;
/// Source of single tap/double tap
pub const ACT_TAP_STATUS: u8 = 0x2B;

/// Data rate and power mode control
pub const BW_RATE: u8 = 0x2C;
/// Power-saving features control
pub const POWER_CTL: u8 = 0x2D;

/// Interrupt enable control
pub const INT_ENABLE: u8 = 0x2E;
/// Interrupt mapping control
pub const INT_MAP: u8 = 0x2F;
/// Source of interrupts. Tap, activity, inactivity and free-fall
/// are cleared on read.
pub const INT_SOURCE: u8 = 0x30;

/// Data format control
pub const DATA_FORMAT: u8 = 0x31;

/// X-axis data 0
pub const DATAX0: u8 = 0x32;
/// X-axis data 1
pub const DATAX1: u8 = 0x33;
/// Y-axis data 0
pub const DATAY0: u8 = 0x34;
/// Y-axis data 1
pub const DATAY1: u8 = 0x35;
/// Z-axis data 0
pub const DATAZ0: u8 = 0x36;
/// Z-axis data 1
pub const DATAZ1: u8 = 0x37;

/// FIFO control
pub const FIFO_CTL: u8 = 0x38;
/// FIFO status
pub const FIFO_STATUS: u8 = 0x39;

pub mod act_inact_ctl {
    pub const ACT_AC: u8 = 1 << 7;
    pub const INACT_AC: u8 = 1 << 3;
    pub const AXES: u8 = 0b0111_0111;
}

pub mod tap_axes {
    pub const SUPPRESS: u8 = 1 << 3;
    pub const AXES: u8 = 0b111;
}

pub mod bw_rate {
    pub const RATE: u8 = 0x1F;
}

pub mod power_ctl {
    pub const LINK: u8 = 1 << 5;
    pub const AUTO_SLEEP: u8 = 1 << 4;
    pub const MEASURE: u8 = 1 << 3;
    pub const SLEEP: u8 = 1 << 2;
    pub const WAKEUP: u8 = 0b11;
}

pub mod data_format {
    pub const SELF_TEST: u8 = 1 << 7;
    pub const SPI: u8 = 1 << 6;
    pub const INT_INVERT: u8 = 1 << 5;
    pub const FULL_RES: u8 = 1 << 3;
    pub const JUSTIFY: u8 = 1 << 2;
    pub const RANGE: u8 = 0b11;
}

pub mod fifo_ctl {
    pub const MODE_SHIFT: u8 = 6;
    pub const MODE: u8 = 0b11 << MODE_SHIFT;
    pub const TRIGGER: u8 = 1 << 5;
    pub const SAMPLES: u8 = 0x1F;
}

pub mod fifo_status {
    pub const FIFO_TRIG: u8 = 1 << 7;
    pub const ENTRIES: u8 = 0x3F;
}
