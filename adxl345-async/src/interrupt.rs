//! Interrupt conditions and their routing.
//!
//! INT_ENABLE, INT_MAP and INT_SOURCE share the same layout: every
//! condition owns one bit, at the same position in all three registers.

use bitflags::bitflags;

/// A condition the ADXL345 can raise an interrupt for.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interrupt {
    DataReady = 7,
    SingleTap = 6,
    DoubleTap = 5,
    Activity = 4,
    Inactivity = 3,
    FreeFall = 2,
    Watermark = 1,
    Overrun = 0,
}

impl Interrupt {
    /// Every condition, from the most significant bit down.
    /// Interrupts are dispatched in this order.
    pub const ALL: [Interrupt; 8] = [
        Interrupt::DataReady,
        Interrupt::SingleTap,
        Interrupt::DoubleTap,
        Interrupt::Activity,
        Interrupt::Inactivity,
        Interrupt::FreeFall,
        Interrupt::Watermark,
        Interrupt::Overrun,
    ];

    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

bitflags! {
    /// A set of interrupt conditions, as stored in INT_ENABLE or reported
    /// by INT_SOURCE.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Interrupts: u8 {
        const DATA_READY = 1 << 7;
        const SINGLE_TAP = 1 << 6;
        const DOUBLE_TAP = 1 << 5;
        const ACTIVITY   = 1 << 4;
        const INACTIVITY = 1 << 3;
        const FREE_FALL  = 1 << 2;
        const WATERMARK  = 1 << 1;
        const OVERRUN    = 1 << 0;
    }
}

impl From<Interrupt> for Interrupts {
    fn from(interrupt: Interrupt) -> Self {
        Interrupts::from_bits_retain(interrupt.mask())
    }
}

impl Interrupts {
    pub fn contains_condition(&self, interrupt: Interrupt) -> bool {
        self.bits() & interrupt.mask() != 0
    }

    /// The conditions in this set, in dispatch order.
    pub fn iter_conditions(self) -> impl Iterator<Item = Interrupt> {
        Interrupt::ALL
            .into_iter()
            .filter(move |interrupt| self.contains_condition(*interrupt))
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptPin {
    Pin1 = 0,
    Pin2 = 1,
}

/// Polarity of both interrupt pins, the INT_INVERT bit of DATA_FORMAT.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    High = 0,
    Low = 1,
}

impl ActiveLevel {
    pub(crate) fn from_bit(set: bool) -> Self {
        if set {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        }
    }
}

/// Routing of every interrupt condition to exactly one pin.
///
/// A cleared bit in INT_MAP sends the condition to INT1, a set bit to INT2,
/// so every possible register value is a valid map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InterruptMap(u8);

impl InterruptMap {
    /// Everything routed to INT1.
    pub const fn new() -> Self {
        InterruptMap(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        InterruptMap(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn pin(&self, interrupt: Interrupt) -> InterruptPin {
        if self.0 & interrupt.mask() == 0 {
            InterruptPin::Pin1
        } else {
            InterruptPin::Pin2
        }
    }

    pub fn set(&mut self, interrupt: Interrupt, pin: InterruptPin) {
        self.0 = (self.0 & !interrupt.mask()) | ((pin as u8) << interrupt as u8);
    }

    pub fn with(mut self, interrupt: Interrupt, pin: InterruptPin) -> Self {
        self.set(interrupt, pin);
        self
    }

    /// The conditions routed to `pin`.
    pub fn routed_to(&self, pin: InterruptPin) -> Interrupts {
        match pin {
            InterruptPin::Pin1 => Interrupts::from_bits_retain(!self.0),
            InterruptPin::Pin2 => Interrupts::from_bits_retain(self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_masks_match_register_layout() {
        assert_eq!(Interrupt::DataReady.mask(), 0x80);
        assert_eq!(Interrupt::Overrun.mask(), 0x01);
        assert_eq!(
            Interrupts::from(Interrupt::FreeFall),
            Interrupts::FREE_FALL
        );
        let all = Interrupt::ALL
            .iter()
            .fold(0u8, |acc, interrupt| acc | interrupt.mask());
        assert_eq!(all, 0xFF);
    }

    #[test]
    fn test_iter_conditions_is_in_dispatch_order() {
        let set = Interrupts::OVERRUN | Interrupts::SINGLE_TAP | Interrupts::DATA_READY;
        let mut it = set.iter_conditions();
        assert_eq!(it.next(), Some(Interrupt::DataReady));
        assert_eq!(it.next(), Some(Interrupt::SingleTap));
        assert_eq!(it.next(), Some(Interrupt::Overrun));
        assert_eq!(it.next(), None);

        assert_eq!(Interrupts::empty().iter_conditions().count(), 0);
    }

    #[test]
    fn test_interrupt_map_routes_each_condition_once() {
        let map = InterruptMap::new()
            .with(Interrupt::Watermark, InterruptPin::Pin2)
            .with(Interrupt::DoubleTap, InterruptPin::Pin2)
            .with(Interrupt::DoubleTap, InterruptPin::Pin1);

        assert_eq!(map.bits(), 0b0000_0010);
        assert_eq!(map.pin(Interrupt::Watermark), InterruptPin::Pin2);
        assert_eq!(map.pin(Interrupt::DoubleTap), InterruptPin::Pin1);
        assert_eq!(map.pin(Interrupt::DataReady), InterruptPin::Pin1);

        let pin1 = map.routed_to(InterruptPin::Pin1);
        let pin2 = map.routed_to(InterruptPin::Pin2);
        assert_eq!(pin2, Interrupts::WATERMARK);
        assert!(pin1.intersection(pin2).is_empty());
        assert_eq!(pin1.union(pin2), Interrupts::all());
    }

    #[test]
    fn test_active_level_from_invert_bit() {
        assert_eq!(ActiveLevel::from_bit(false), ActiveLevel::High);
        assert_eq!(ActiveLevel::from_bit(true), ActiveLevel::Low);
    }
}
