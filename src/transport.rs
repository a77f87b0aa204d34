//! Register framing over an `embedded-hal` I²C bus
//!
//! The bus itself (a Linux `i2cdev`, an MCU peripheral, a mock) is supplied by the caller. This
//! module only binds it to the chip address, frames register accesses and enforces the
//! single-transaction size limits.

use crate::hw_def::*;
use crate::Error;

use embedded_hal::{delay::DelayNs, i2c::I2c};

#[cfg(feature = "defmt")]
use defmt::{trace, warn};
#[cfg(feature = "log")]
use log::{trace, warn};

/// Bus, delay provider and chip address of one HSCDTD008A
#[derive(Debug)]
pub struct Transport<I2C, Delay> {
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
    pub(crate) i2c_addr: I2cAddr,
}

impl<I2C, Delay, E> Transport<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Bind a bus to the chip address
    ///
    /// Fails if the address is outside the non-reserved 7-bit range.
    pub fn open(i2c: I2C, delay: Delay, i2c_addr: I2cAddr) -> Result<Self, Error<E>> {
        let addr = i2c_addr.as_u8();
        if !(0x08..=0x77).contains(&addr) {
            warn!("hscdtd008a::open(): address {:#x} cannot be selected", addr);
            return Err(Error::InvalidAddress(addr));
        }
        trace!("hscdtd008a::open(): bound to {:#x}", addr);
        Ok(Self { i2c, delay, i2c_addr })
    }

    /// Give the bus and delay provider back
    pub fn close(self) -> (I2C, Delay) {
        (self.i2c, self.delay)
    }

    /// Chip address this transport talks to
    pub fn address(&self) -> I2cAddr {
        self.i2c_addr
    }

    /// Read `buf.len()` consecutive registers starting at `reg`
    ///
    /// The index write and the read are one transaction with a repeated start, which the chip
    /// requires.
    pub fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        if buf.is_empty() {
            return Err(Error::InvalidInputData);
        }
        if buf.len() > MAX_READ_LEN {
            warn!("hscdtd008a::read(): {} bytes does not fit one transaction", buf.len());
            return Err(Error::BufferCapacity(buf.len()));
        }
        trace!("hscdtd008a::read(): reg={:#x}, len={}", reg, buf.len());
        self.i2c.write_read(self.i2c_addr.as_u8(), &[reg], buf)?;
        Ok(())
    }

    /// Write `bytes` to consecutive registers starting at `reg`
    pub fn write(&mut self, reg: u8, bytes: &[u8]) -> Result<(), Error<E>> {
        if bytes.is_empty() {
            return Err(Error::InvalidInputData);
        }
        if bytes.len() > MAX_WRITE_LEN {
            warn!("hscdtd008a::write(): {} bytes does not fit one transaction", bytes.len());
            return Err(Error::BufferCapacity(bytes.len()));
        }
        trace!("hscdtd008a::write(): reg={:#x}, len={}", reg, bytes.len());
        let mut frame = [0u8; MAX_WRITE_LEN + 1];
        frame[0] = reg;
        frame[1..=bytes.len()].copy_from_slice(bytes);
        self.i2c.write(self.i2c_addr.as_u8(), &frame[..=bytes.len()])?;
        Ok(())
    }

    /// Block for `ms` milliseconds
    pub fn sleep(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
