//! Bus access for the ADXL345.
//!
//! The chip speaks both I2C and SPI with the same register map, so the
//! driver is generic over [Interface] and only the framing differs.

use embedded_hal_async::{i2c, i2c::I2c, spi, spi::SpiDevice};

/// Read flag of the SPI command byte.
const SPI_READ: u8 = 1 << 7;
/// Multi-byte flag of the SPI command byte, makes the register address
/// auto-increment during the transfer.
const SPI_MULTI_BYTE: u8 = 1 << 6;

/// 7-bit I2C address, selected by the level of the ALT ADDRESS pin.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// ALT ADDRESS tied to ground.
    AltLow = 0x53,
    /// ALT ADDRESS tied to VCC.
    AltHigh = 0x1D,
}

#[allow(async_fn_in_trait)]
pub trait Interface {
    type Error;

    /// Read `buf.len()` consecutive registers starting at `register`.
    async fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` to consecutive registers starting at `register`.
    async fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error>;
}

pub struct I2cInterface<I2C> {
    address: u8,
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: Address) -> Self {
        I2cInterface {
            address: address as u8,
            i2c,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Interface for I2cInterface<I2C> {
    type Error = I2C::Error;

    async fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[register], buf).await
    }

    async fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        // Adjacent writes go out back to back without a repeated start.
        self.i2c
            .transaction(
                self.address,
                &mut [i2c::Operation::Write(&[register]), i2c::Operation::Write(data)],
            )
            .await
    }
}

pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    pub fn new(spi: SPI) -> Self {
        SpiInterface { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

fn spi_command(register: u8, read: bool, len: usize) -> u8 {
    let mut command = register & 0x3F;
    if len > 1 {
        command |= SPI_MULTI_BYTE;
    }
    if read {
        command |= SPI_READ;
    }
    command
}

impl<SPI: SpiDevice> Interface for SpiInterface<SPI> {
    type Error = SPI::Error;

    async fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let command = spi_command(register, true, buf.len());
        self.spi
            .transaction(&mut [spi::Operation::Write(&[command]), spi::Operation::Read(buf)])
            .await
    }

    async fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        let command = spi_command(register, false, data.len());
        self.spi
            .transaction(&mut [spi::Operation::Write(&[command]), spi::Operation::Write(data)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDevice, FakeSpi};
    use crate::register;
    use embassy_futures::block_on;

    #[test]
    fn test_spi_command_flags() {
        assert_eq!(spi_command(0x2E, false, 1), 0x2E);
        assert_eq!(spi_command(0x30, true, 1), 0xB0);
        assert_eq!(spi_command(0x32, true, 6), 0xF2);
        assert_eq!(spi_command(0x1E, false, 3), 0x5E);
    }

    #[test]
    fn test_spi_interface_reads_and_writes_registers() {
        let mut device = FakeDevice::new();
        device.set(register::INT_MAP, 0xA5);
        let mut iface = SpiInterface::new(FakeSpi::new(device));

        let mut buf = [0; 1];
        block_on(iface.read_registers(register::INT_MAP, &mut buf)).unwrap();
        assert_eq!(buf, [0xA5]);

        block_on(iface.write_registers(register::OFSX, &[1, 2, 3])).unwrap();
        let spi = iface.release();
        assert_eq!(spi.device.get(register::OFSX), 1);
        assert_eq!(spi.device.get(register::OFSY), 2);
        assert_eq!(spi.device.get(register::OFSZ), 3);
        assert_eq!(spi.commands, [0xAF, 0x5E]);
    }

    #[test]
    fn test_i2c_interface_uses_address() {
        let mut iface = I2cInterface::new(FakeDevice::new(), Address::AltHigh);
        block_on(iface.write_registers(register::THRESH_TAP, &[0x30])).unwrap();
        let device = iface.release();
        assert_eq!(device.last_address, Some(0x1D));
        assert_eq!(device.get(register::THRESH_TAP), 0x30);
    }
}
