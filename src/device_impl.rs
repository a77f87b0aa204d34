use crate::transport::Transport;

use core::fmt;

#[cfg(feature="defmt")]
use defmt::Format;

/// HSCDTD008A device driver
///
/// Owns the bus for as long as it lives; [`Hscdtd008a::close`] hands it back.
#[derive(Debug)]
pub struct Hscdtd008a<I2C, Delay> {
    pub(crate) transport: Transport<I2C, Delay>,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub enum Error<E> {
    /// I²C communication error
    I2c(E),
    /// The device address cannot be selected on the bus
    InvalidAddress(u8),
    /// Transfer length does not fit a single bus transaction
    BufferCapacity(usize),
    /// Invalid input data provided
    InvalidInputData,
    /// WIA register did not identify an HSCDTD008A (contains the value read)
    WrongDevice(u8),
    /// First self-test response was not 0xAA (contains the value read)
    SelfTestFirstResponse(u8),
    /// Second self-test response was not 0x55 (contains the value read)
    SelfTestSecondResponse(u8),
    /// SRST was still set after the reset settle time
    ResetNotCleared,
    /// DRDY did not come up within the poll budget
    MeasurementTimeout,
    /// TRDY did not come up within the poll budget
    TemperatureTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::InvalidAddress(addr) => write!(f, "address 0x{addr:02X} cannot be selected"),
            Self::BufferCapacity(len) => write!(f, "{len} bytes exceed a single transaction"),
            Self::InvalidInputData => write!(f, "invalid input data"),
            Self::WrongDevice(wia) => write!(f, "unexpected WIA 0x{wia:02X}"),
            Self::SelfTestFirstResponse(resp) => write!(f, "self-test response 0x{resp:02X}, expected 0xAA"),
            Self::SelfTestSecondResponse(resp) => write!(f, "self-test response 0x{resp:02X}, expected 0x55"),
            Self::ResetNotCleared => write!(f, "soft reset did not complete"),
            Self::MeasurementTimeout => write!(f, "magnetic data not ready"),
            Self::TemperatureTimeout => write!(f, "temperature data not ready"),
        }
    }
}

impl<E> Error<E> {
    /// Whether the error came from the bus rather than from the device's answers
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::I2c(_) | Self::InvalidAddress(_) | Self::BufferCapacity(_) | Self::InvalidInputData)
    }
}
