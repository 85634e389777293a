use crate::interrupt::ActiveLevel;
use crate::register::data_format;

/// Scale of a full resolution sample, and of a ±2g sample in fixed
/// 10-bit resolution.
const G_PER_LSB: f32 = 0.0039;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    G2 = 0b00,
    G4 = 0b01,
    G8 = 0b10,
    G16 = 0b11,
}

impl Range {
    pub(crate) fn from_bits_truncate(bits: u8) -> Self {
        match bits & data_format::RANGE {
            0b00 => Range::G2,
            0b01 => Range::G4,
            0b10 => Range::G8,
            _ => Range::G16,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Justify {
    /// Right-justified with sign extension.
    Right = 0,
    /// MSB-aligned.
    Left = 1,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiWire {
    FourWire = 0,
    ThreeWire = 1,
}

/// Contents of the DATA_FORMAT register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataFormat {
    pub self_test: bool,
    pub spi_wire: SpiWire,
    pub active_level: ActiveLevel,
    pub full_resolution: bool,
    pub justify: Justify,
    pub range: Range,
}

impl Default for DataFormat {
    /// The power-on value of the register.
    fn default() -> Self {
        DataFormat::from_bits(0x00)
    }
}

impl DataFormat {
    pub fn bits(&self) -> u8 {
        (u8::from(self.self_test) << 7)
            | ((self.spi_wire as u8) << 6)
            | ((self.active_level as u8) << 5)
            | (u8::from(self.full_resolution) << 3)
            | ((self.justify as u8) << 2)
            | self.range as u8
    }

    pub fn from_bits(bits: u8) -> Self {
        let spi_wire = if bits & data_format::SPI != 0 {
            SpiWire::ThreeWire
        } else {
            SpiWire::FourWire
        };
        let justify = if bits & data_format::JUSTIFY != 0 {
            Justify::Left
        } else {
            Justify::Right
        };

        DataFormat {
            self_test: bits & data_format::SELF_TEST != 0,
            spi_wire,
            active_level: ActiveLevel::from_bit(bits & data_format::INT_INVERT != 0),
            full_resolution: bits & data_format::FULL_RES != 0,
            justify,
            range: Range::from_bits_truncate(bits),
        }
    }

    /// Number of significant bits in a sample.
    fn resolution_bits(&self) -> u32 {
        if self.full_resolution {
            10 + self.range as u32
        } else {
            10
        }
    }

    fn g_per_lsb(&self) -> f32 {
        if self.full_resolution {
            G_PER_LSB
        } else {
            G_PER_LSB * (1 << self.range as u8) as f32
        }
    }

    /// Turn the two little-endian data register bytes of an axis into a
    /// right-aligned, sign-extended count.
    pub fn decode_axis(&self, lsb: u8, msb: u8) -> i16 {
        let value = i16::from_le_bytes([lsb, msb]);
        match self.justify {
            Justify::Right => value,
            // Arithmetic shift keeps the sign.
            Justify::Left => value >> (16 - self.resolution_bits()),
        }
    }

    pub fn decode(&self, buf: &[u8; 6]) -> Acceleration {
        let raw = [
            self.decode_axis(buf[0], buf[1]),
            self.decode_axis(buf[2], buf[3]),
            self.decode_axis(buf[4], buf[5]),
        ];
        let scale = self.g_per_lsb();

        Acceleration {
            raw,
            g: raw.map(|count| count as f32 * scale),
        }
    }
}

/// One X/Y/Z sample.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Acceleration {
    /// Counts, right-aligned.
    pub raw: [i16; 3],
    pub g: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(full_resolution: bool, justify: Justify, range: Range) -> DataFormat {
        DataFormat {
            full_resolution,
            justify,
            range,
            ..DataFormat::default()
        }
    }

    #[test]
    fn test_data_format_bits() {
        let f = DataFormat {
            self_test: false,
            spi_wire: SpiWire::FourWire,
            active_level: ActiveLevel::Low,
            full_resolution: true,
            justify: Justify::Right,
            range: Range::G16,
        };
        assert_eq!(f.bits(), 0b0010_1011);
        assert_eq!(DataFormat::from_bits(0b0010_1011), f);
        assert_eq!(DataFormat::from_bits(0xFF).bits(), 0xEF);
    }

    #[test]
    fn test_decode_right_justified() {
        let f = format(true, Justify::Right, Range::G2);
        assert_eq!(f.decode_axis(0x00, 0x01), 256);
        assert_eq!(f.decode_axis(0x00, 0xFF), -256);
        assert_eq!(f.decode_axis(0xFF, 0xFF), -1);
    }

    #[test]
    fn test_decode_left_justified_full_resolution() {
        // -1 count, MSB-aligned, for every resolution
        assert_eq!(format(true, Justify::Left, Range::G2).decode_axis(0xC0, 0xFF), -1);
        assert_eq!(format(true, Justify::Left, Range::G4).decode_axis(0xE0, 0xFF), -1);
        assert_eq!(format(true, Justify::Left, Range::G8).decode_axis(0xF0, 0xFF), -1);
        assert_eq!(format(true, Justify::Left, Range::G16).decode_axis(0xF8, 0xFF), -1);

        // 256 counts at 13 bits
        let f = format(true, Justify::Left, Range::G16);
        assert_eq!(f.decode_axis(0x00, 0x08), 256);
        // most negative 11 bit value
        let f = format(true, Justify::Left, Range::G4);
        assert_eq!(f.decode_axis(0x00, 0x80), -1024);
    }

    #[test]
    fn test_decode_left_justified_fixed_resolution() {
        let f = format(false, Justify::Left, Range::G16);
        assert_eq!(f.decode_axis(0x40, 0x00), 1);
        assert_eq!(f.decode_axis(0x00, 0x80), -512);
    }

    #[test]
    fn test_decode_scale() {
        let buf = [0x00, 0x01, 0x00, 0xFF, 0x00, 0x00];

        let a = format(true, Justify::Right, Range::G16).decode(&buf);
        assert_eq!(a.raw, [256, -256, 0]);
        assert!((a.g[0] - 0.9984).abs() < 1e-4);
        assert!((a.g[1] + 0.9984).abs() < 1e-4);

        let a = format(false, Justify::Right, Range::G4).decode(&buf);
        assert!((a.g[0] - 1.9968).abs() < 1e-4);
        let a = format(false, Justify::Right, Range::G16).decode(&buf);
        assert!((a.g[0] - 7.9872).abs() < 1e-4);
    }
}
