//! In-memory ADXL345 used by the tests.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::{digital, i2c, spi};

use crate::register;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

impl core::fmt::Display for FakeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "fake bus error")
    }
}

impl i2c::Error for FakeError {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::Other
    }
}

impl spi::Error for FakeError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl digital::Error for FakeError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Conditions of INT_SOURCE cleared by reading it.
const CLEAR_ON_READ: u8 = 0b0111_1100;

/// Register file with the read side effects of the real chip.
pub struct FakeDevice {
    regs: [u8; 0x40],
    /// Samples waiting in the FIFO, served through DATAX0..DATAZ1.
    pub fifo: VecDeque<[u8; 6]>,
    /// Every register write, in order.
    pub writes: Vec<(u8, u8)>,
    pub last_address: Option<u8>,
    pub fail: bool,
}

impl FakeDevice {
    pub fn new() -> Self {
        let mut regs = [0; 0x40];
        regs[register::DEVID as usize] = 0xE5;
        regs[register::BW_RATE as usize] = 0x0A;

        FakeDevice {
            regs,
            fifo: VecDeque::new(),
            writes: Vec::new(),
            last_address: None,
            fail: false,
        }
    }

    pub fn get(&self, register: u8) -> u8 {
        self.regs[register as usize]
    }

    pub fn set(&mut self, register: u8, value: u8) {
        self.regs[register as usize] = value;
    }

    pub fn push_sample(&mut self, sample: [u8; 6]) {
        self.fifo.push_back(sample);
        self.sync_fifo_status();
    }

    fn sync_fifo_status(&mut self) {
        let status = &mut self.regs[register::FIFO_STATUS as usize];
        *status = (*status & register::fifo_status::FIFO_TRIG) | self.fifo.len() as u8;
    }

    fn read_register(&mut self, register: u8) -> u8 {
        match register {
            register::INT_SOURCE => {
                let value = self.regs[register as usize];
                self.regs[register as usize] &= !CLEAR_ON_READ;
                value
            }
            register::DATAX0..=register::DATAZ1 if !self.fifo.is_empty() => {
                let offset = (register - register::DATAX0) as usize;
                let value = self.fifo[0][offset];
                if register == register::DATAZ1 {
                    self.fifo.pop_front();
                    self.sync_fifo_status();
                }
                value
            }
            _ => self.regs[register as usize],
        }
    }

    fn write_register(&mut self, register: u8, value: u8) {
        self.writes.push((register, value));
        self.regs[register as usize] = value;
    }

    fn read_from(&mut self, register: u8, buf: &mut [u8]) {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_register(register + i as u8);
        }
    }

    fn write_from(&mut self, register: u8, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_register(register + i as u8, *byte);
        }
    }
}

impl i2c::ErrorType for FakeDevice {
    type Error = FakeError;
}

impl embedded_hal_async::i2c::I2c for FakeDevice {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(FakeError);
        }
        self.last_address = Some(address);

        // The first byte written selects the register, the rest
        // auto-increment from there.
        let mut pointer: Option<u8> = None;
        for operation in operations.iter_mut() {
            match operation {
                i2c::Operation::Write(data) => {
                    let data: &[u8] = *data;
                    let (register, rest) = match pointer {
                        Some(register) => (register, data),
                        None => match data.split_first() {
                            Some((register, rest)) => (*register, rest),
                            None => continue,
                        },
                    };
                    self.write_from(register, rest);
                    pointer = Some(register + rest.len() as u8);
                }
                i2c::Operation::Read(buf) => {
                    let register = pointer.unwrap_or(0);
                    self.read_from(register, buf);
                    pointer = Some(register + buf.len() as u8);
                }
            }
        }
        Ok(())
    }
}

/// SPI framing in front of a [FakeDevice].
pub struct FakeSpi {
    pub device: FakeDevice,
    /// Every command byte received.
    pub commands: Vec<u8>,
}

impl FakeSpi {
    pub fn new(device: FakeDevice) -> Self {
        FakeSpi {
            device,
            commands: Vec::new(),
        }
    }
}

impl spi::ErrorType for FakeSpi {
    type Error = FakeError;
}

impl embedded_hal_async::spi::SpiDevice for FakeSpi {
    async fn transaction(
        &mut self,
        operations: &mut [spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        if self.device.fail {
            return Err(FakeError);
        }

        let mut register: Option<u8> = None;
        for operation in operations.iter_mut() {
            match (operation, register) {
                (spi::Operation::Write(data), None) => {
                    let (command, rest) = data.split_first().ok_or(FakeError)?;
                    self.commands.push(*command);
                    let start = *command & 0x3F;
                    self.device.write_from(start, rest);
                    register = Some(start + rest.len() as u8);
                }
                (spi::Operation::Write(data), Some(start)) => {
                    self.device.write_from(start, data);
                    register = Some(start + data.len() as u8);
                }
                (spi::Operation::Read(buf), Some(start)) => {
                    self.device.read_from(start, buf);
                    register = Some(start + buf.len() as u8);
                }
                _ => return Err(FakeError),
            }
        }
        Ok(())
    }
}

/// Host pin wired to INT1 or INT2.
#[derive(Default)]
pub struct FakePin {
    /// Levels waited for, `true` for high.
    pub waited: Vec<bool>,
    pub fail: bool,
}

impl FakePin {
    fn wait(&mut self, high: bool) -> Result<(), FakeError> {
        if self.fail {
            return Err(FakeError);
        }
        self.waited.push(high);
        Ok(())
    }
}

impl digital::ErrorType for FakePin {
    type Error = FakeError;
}

impl embedded_hal_async::digital::Wait for FakePin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.wait(true)
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.wait(false)
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait(true)
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait(false)
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait(true)
    }
}
