//! Conversions between physical units and register values.
//!
//! Converting to a register value truncates toward zero and saturates at
//! the bounds of the register.

/// THRESH_TAP, THRESH_ACT, THRESH_INACT and THRESH_FF all use 62.5 mg/LSB.
const THRESHOLD_G_PER_LSB: f32 = 0.0625;
const OFFSET_G_PER_LSB: f32 = 0.0156;
const DURATION_US_PER_LSB: u32 = 625;
const LATENT_MS_PER_LSB: f32 = 1.25;
const FREE_FALL_TIME_MS_PER_LSB: u16 = 5;

pub fn threshold_from_g(g: f32) -> u8 {
    (g / THRESHOLD_G_PER_LSB) as u8
}

pub fn threshold_to_g(reg: u8) -> f32 {
    reg as f32 * THRESHOLD_G_PER_LSB
}

pub fn offset_from_g(g: f32) -> i8 {
    (g / OFFSET_G_PER_LSB) as i8
}

pub fn offset_to_g(reg: i8) -> f32 {
    reg as f32 * OFFSET_G_PER_LSB
}

/// Maximum time an event must be above THRESH_TAP to count as a tap.
pub fn duration_from_us(us: u32) -> u8 {
    (us / DURATION_US_PER_LSB).min(u8::MAX as u32) as u8
}

pub fn duration_to_us(reg: u8) -> u32 {
    reg as u32 * DURATION_US_PER_LSB
}

/// Also used for the tap window, which has the same scale.
pub fn latent_from_ms(ms: f32) -> u8 {
    (ms / LATENT_MS_PER_LSB) as u8
}

pub fn latent_to_ms(reg: u8) -> f32 {
    reg as f32 * LATENT_MS_PER_LSB
}

pub fn inactivity_time_from_s(s: u8) -> u8 {
    s
}

pub fn inactivity_time_to_s(reg: u8) -> u8 {
    reg
}

pub fn free_fall_time_from_ms(ms: u16) -> u8 {
    (ms / FREE_FALL_TIME_MS_PER_LSB).min(u8::MAX as u16) as u8
}

pub fn free_fall_time_to_ms(reg: u8) -> u16 {
    reg as u16 * FREE_FALL_TIME_MS_PER_LSB
}
