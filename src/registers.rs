//! Typed register values and the register access layer
//!
//! Each control register is a newtype over its byte. Getters decode one field and `with_*`
//! methods return a copy with only that field replaced, so a read-modify-write keeps the
//! reserved bits the chip handed back.

use crate::hw_def::*;
use crate::transport::Transport;
use crate::types::*;
use crate::Error;

use embedded_hal::{delay::DelayNs, i2c::I2c};

#[cfg(feature = "defmt")]
use defmt::Format;

/// A register that can be read as one byte
pub trait ReadableRegister: Sized {
    /// Address of the register
    const REGISTER: Register;
    /// Build the typed value from the byte read from the device
    fn from_raw(raw: u8) -> Self;
}

/// A register that can also be written back as one byte
pub trait WritableRegister: ReadableRegister + Copy {
    /// Byte to send to the device
    fn raw(&self) -> u8;
}

macro_rules! register {
    ($(#[$doc:meta])* $name:ident, $reg:expr) => {
        $(#[$doc])*
        #[cfg_attr(feature = "defmt", derive(Format))]
        #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
        pub struct $name(u8);
        impl ReadableRegister for $name {
            const REGISTER: Register = $reg;
            fn from_raw(raw: u8) -> Self {
                Self(raw)
            }
        }
        impl WritableRegister for $name {
            fn raw(&self) -> u8 {
                self.0
            }
        }
    };
}

register!(
    /// CTRL1: power mode, output data rate and state
    Ctrl1, Register::Ctrl1
);
register!(
    /// CTRL2: FIFO configuration and data-ready pin
    Ctrl2, Register::Ctrl2
);
register!(
    /// CTRL3: action triggers, all self-clearing
    Ctrl3, Register::Ctrl3
);
register!(
    /// CTRL4: output resolution
    Ctrl4, Register::Ctrl4
);

impl ReadableRegister for StatusBits {
    const REGISTER: Register = Register::Status;
    fn from_raw(raw: u8) -> Self {
        raw.into()
    }
}

impl Ctrl1 {
    /// Power mode (PC)
    pub fn power_mode(&self) -> PowerMode {
        PowerMode::from_bits(field_get(self.0, CTRL1_FIELD_LSBIT_PC, CTRL1_FIELD_WIDTH_PC))
    }
    /// Replace the power mode (PC)
    pub fn with_power_mode(self, mode: PowerMode) -> Self {
        Self(field_set(self.0, CTRL1_FIELD_LSBIT_PC, CTRL1_FIELD_WIDTH_PC, mode.bits()))
    }
    /// Output data rate (ODR)
    pub fn output_data_rate(&self) -> OutputDataRate {
        OutputDataRate::from_bits(field_get(self.0, CTRL1_FIELD_LSBIT_ODR, CTRL1_FIELD_WIDTH_ODR))
    }
    /// Replace the output data rate (ODR)
    pub fn with_output_data_rate(self, odr: OutputDataRate) -> Self {
        Self(field_set(self.0, CTRL1_FIELD_LSBIT_ODR, CTRL1_FIELD_WIDTH_ODR, odr.bits()))
    }
    /// Normal or force state (FS)
    pub fn state(&self) -> State {
        State::from_bits(field_get(self.0, CTRL1_FIELD_LSBIT_FS, CTRL1_FIELD_WIDTH_FS))
    }
    /// Replace the state (FS)
    pub fn with_state(self, state: State) -> Self {
        Self(field_set(self.0, CTRL1_FIELD_LSBIT_FS, CTRL1_FIELD_WIDTH_FS, state.bits()))
    }
}

impl Ctrl2 {
    /// FIFO storage method (FCO)
    pub fn fifo_storage_method(&self) -> FifoStorageMethod {
        FifoStorageMethod::from_bits(field_get(self.0, CTRL2_FIELD_LSBIT_FCO, CTRL2_FIELD_WIDTH_FCO))
    }
    /// Replace the FIFO storage method (FCO)
    pub fn with_fifo_storage_method(self, fco: FifoStorageMethod) -> Self {
        Self(field_set(self.0, CTRL2_FIELD_LSBIT_FCO, CTRL2_FIELD_WIDTH_FCO, fco.bits()))
    }
    /// FIFO comparison method (AOR)
    pub fn fifo_comparison_method(&self) -> FifoComparisonMethod {
        FifoComparisonMethod::from_bits(field_get(self.0, CTRL2_FIELD_LSBIT_AOR, CTRL2_FIELD_WIDTH_AOR))
    }
    /// Replace the FIFO comparison method (AOR)
    pub fn with_fifo_comparison_method(self, aor: FifoComparisonMethod) -> Self {
        Self(field_set(self.0, CTRL2_FIELD_LSBIT_AOR, CTRL2_FIELD_WIDTH_AOR, aor.bits()))
    }
    /// FIFO enabled (FF)
    pub fn fifo_enabled(&self) -> bool {
        field_get(self.0, CTRL2_FIELD_LSBIT_FF, CTRL2_FIELD_WIDTH_FF) != 0
    }
    /// Replace the FIFO enable bit (FF)
    pub fn with_fifo_enabled(self, enabled: bool) -> Self {
        Self(field_set(self.0, CTRL2_FIELD_LSBIT_FF, CTRL2_FIELD_WIDTH_FF, enabled as u8))
    }
    /// DRDY output on the pin (DEN)
    pub fn data_ready_pin_enabled(&self) -> bool {
        field_get(self.0, CTRL2_FIELD_LSBIT_DEN, CTRL2_FIELD_WIDTH_DEN) != 0
    }
    /// Replace the DRDY pin enable bit (DEN)
    pub fn with_data_ready_pin_enabled(self, enabled: bool) -> Self {
        Self(field_set(self.0, CTRL2_FIELD_LSBIT_DEN, CTRL2_FIELD_WIDTH_DEN, enabled as u8))
    }
    /// DRDY pin polarity (DRP)
    pub fn data_ready_pin_polarity(&self) -> DataReadyPinPolarity {
        DataReadyPinPolarity::from_bits(field_get(self.0, CTRL2_FIELD_LSBIT_DRP, CTRL2_FIELD_WIDTH_DRP))
    }
    /// Replace the DRDY pin polarity (DRP)
    pub fn with_data_ready_pin_polarity(self, drp: DataReadyPinPolarity) -> Self {
        Self(field_set(self.0, CTRL2_FIELD_LSBIT_DRP, CTRL2_FIELD_WIDTH_DRP, drp.bits()))
    }
}

impl Ctrl3 {
    /// CTRL3 with only the soft reset bit set
    pub fn soft_reset() -> Self {
        Self::default().with_soft_reset(true)
    }
    /// Soft reset in progress (SRST)
    pub fn soft_reset_pending(&self) -> bool {
        field_get(self.0, CTRL3_FIELD_LSBIT_SRST, CTRL3_FIELD_WIDTH_SRST) != 0
    }
    /// Replace the soft reset bit (SRST)
    pub fn with_soft_reset(self, set: bool) -> Self {
        Self(field_set(self.0, CTRL3_FIELD_LSBIT_SRST, CTRL3_FIELD_WIDTH_SRST, set as u8))
    }
    /// Forced measurement in progress (FRC)
    pub fn force_pending(&self) -> bool {
        field_get(self.0, CTRL3_FIELD_LSBIT_FRC, CTRL3_FIELD_WIDTH_FRC) != 0
    }
    /// Replace the force measurement bit (FRC)
    pub fn with_force(self, set: bool) -> Self {
        Self(field_set(self.0, CTRL3_FIELD_LSBIT_FRC, CTRL3_FIELD_WIDTH_FRC, set as u8))
    }
    /// Self-test in progress (STC)
    pub fn self_test_pending(&self) -> bool {
        field_get(self.0, CTRL3_FIELD_LSBIT_STC, CTRL3_FIELD_WIDTH_STC) != 0
    }
    /// Replace the self-test bit (STC)
    pub fn with_self_test(self, set: bool) -> Self {
        Self(field_set(self.0, CTRL3_FIELD_LSBIT_STC, CTRL3_FIELD_WIDTH_STC, set as u8))
    }
    /// Temperature measurement in progress (TCS)
    pub fn temperature_pending(&self) -> bool {
        field_get(self.0, CTRL3_FIELD_LSBIT_TCS, CTRL3_FIELD_WIDTH_TCS) != 0
    }
    /// Replace the temperature measurement bit (TCS)
    pub fn with_temperature(self, set: bool) -> Self {
        Self(field_set(self.0, CTRL3_FIELD_LSBIT_TCS, CTRL3_FIELD_WIDTH_TCS, set as u8))
    }
    /// Offset calibration in progress (OCL)
    pub fn offset_calibration_pending(&self) -> bool {
        field_get(self.0, CTRL3_FIELD_LSBIT_OCL, CTRL3_FIELD_WIDTH_OCL) != 0
    }
    /// Replace the offset calibration bit (OCL)
    pub fn with_offset_calibration(self, set: bool) -> Self {
        Self(field_set(self.0, CTRL3_FIELD_LSBIT_OCL, CTRL3_FIELD_WIDTH_OCL, set as u8))
    }
}

impl Ctrl4 {
    /// Output resolution (RS)
    pub fn resolution(&self) -> Resolution {
        Resolution::from_bits(field_get(self.0, CTRL4_FIELD_LSBIT_RS, CTRL4_FIELD_WIDTH_RS))
    }
    /// Replace the output resolution (RS)
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self(field_set(self.0, CTRL4_FIELD_LSBIT_RS, CTRL4_FIELD_WIDTH_RS, resolution.bits()))
    }
}

impl<I2C, Delay, E> Transport<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Read one register as a raw byte
    pub fn read_byte(&mut self, reg: Register) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.read(reg.addr(), &mut buf)?;
        Ok(buf[0])
    }

    /// Write one raw byte to a register
    pub fn write_byte(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
        self.write(reg.addr(), &[value])
    }

    /// Read a typed register
    pub fn read_register<R: ReadableRegister>(&mut self) -> Result<R, Error<E>> {
        let raw = self.read_byte(R::REGISTER)?;
        Ok(R::from_raw(raw))
    }

    /// Write a typed register as a whole
    pub fn write_register<R: WritableRegister>(&mut self, value: R) -> Result<(), Error<E>> {
        self.write_byte(R::REGISTER, value.raw())
    }

    /// Read a register, let `f` change it and write it back
    ///
    /// Nothing is written if the read fails.
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<R, Error<E>>
    where
        R: WritableRegister,
        F: FnOnce(R) -> R,
    {
        let value = f(self.read_register::<R>()?);
        self.write_register(value)?;
        Ok(value)
    }
}
