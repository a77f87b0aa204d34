//! This is a platform-agnostic Rust driver for the ALPS HSCDTD008A 3-axis geomagnetic sensor
//! using the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//!
//! This driver allows you to:
//! - Bring the device up: settle, soft reset (with retries), identity check, 15-bit output,
//!   active mode and self-test.
//! - Trigger force-state measurements and read the three axes in µT.
//! - Read the latest axis data without triggering a measurement.
//! - Run temperature compensation and read the die temperature.
//! - Start an offset calibration.
//! - Run the self-test and a soft reset on their own.
//! - Configure power mode, output data rate, normal/force state, resolution, FIFO storage and
//!   comparison method, FIFO enable, and the data-ready pin.
//!
//! This driver does not yet support the following device features:
//! - Reading samples out of the FIFO.
//! - Offset and interrupt threshold registers.
//! - Waiting for offset calibration to complete.
//!
//! All calls block. Polling loops have fixed iteration budgets (50 polls, 1 ms apart), so the
//! time they take depends on bus speed.
//!
//! ## Features
//!
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## The device
//!
//! The HSCDTD008A is a 3-axis magnetic sensor with an I²C interface at address 0x0C. It has a
//! stand-by and an active power mode, and in active mode either runs continuously at the output
//! data rate (normal state) or converts once per trigger (force state). Output is 14 or 15 bit
//! signed; at 15 bit one LSB is 0.150 µT.
//!
//! ## Example:
//!
//! ```ignore
//! use hscdtd008a::{Hscdtd008a, I2cAddr};
//!
//! // Platform-specific
//! let i2c = /* embedded_hal::i2c::I2c instance */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let mut mag = Hscdtd008a::open(i2c, delay, I2cAddr::Default).unwrap();
//! mag.initialize().unwrap();
//! mag.temperature_compensation().unwrap();
//!
//! loop {
//!     let reading = mag.measure().unwrap();
//!     println!("{reading}");
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![no_std]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::{debug, trace, warn};
    } else if #[cfg(feature = "log")] {
        use log::{debug, trace, warn};
    }
}
// Defined ahead of the module declarations so every module sees them
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

mod device_impl;
mod hw_def;
pub mod registers;
pub mod transport;
mod types;

pub use crate::{device_impl::*, hw_def::*, types::*};
pub use crate::registers::{Ctrl1, Ctrl2, Ctrl3, Ctrl4, ReadableRegister, WritableRegister};
pub use crate::transport::Transport;

use embedded_hal::{delay::DelayNs, i2c::I2c};

impl<I2C, Delay, E> Hscdtd008a<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Bind the driver to a bus and chip address
    ///
    /// Nothing is sent to the device; call [`Self::initialize`] next.
    pub fn open(i2c: I2C, delay: Delay, i2c_addr: I2cAddr) -> Result<Self, Error<E>> {
        Ok(Self {
            transport: Transport::open(i2c, delay, i2c_addr)?,
        })
    }

    /// Give the bus and delay provider back
    pub fn close(self) -> (I2C, Delay) {
        self.transport.close()
    }

    /// Raw register access, for registers the driver does not wrap
    pub fn transport(&mut self) -> &mut Transport<I2C, Delay> {
        &mut self.transport
    }

    /// Bring the device up after power-on
    ///
    /// Waits for the bus to settle, soft resets (retrying, since early resets after power-up
    /// are unreliable), checks WIA, selects 15-bit output, enters active mode and runs the
    /// self-test. Stops at the first step that fails.
    pub fn initialize(&mut self) -> Result<(), Error<E>> {
        self.transport.sleep(OPEN_SETTLE_MS);
        self.reset_with_retry()?;
        self.transport.sleep(POST_RESET_MS);
        self.who_i_am_check()?;
        self.set_resolution(Resolution::Bits15)?;
        self.set_mode(PowerMode::Active)?;
        self.self_test()?;
        debug!("hscdtd008a::initialize(): done");
        Ok(())
    }

    fn reset_with_retry(&mut self) -> Result<(), Error<E>> {
        let mut attempt = 1;
        loop {
            match self.soft_reset() {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!("hscdtd008a::initialize(): soft reset attempt {}/{} failed", attempt, RESET_ATTEMPTS);
                    self.transport.sleep(RESET_RETRY_MS);
                    if attempt >= RESET_ATTEMPTS {
                        return Err(err);
                    }
                    attempt += 1;
                }
            }
        }
    }

    // CTRL1

    /// Set the power mode (stand-by or active)
    pub fn set_mode(&mut self, mode: PowerMode) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl1| reg.with_power_mode(mode))?;
        Ok(())
    }

    /// Set the output data rate
    ///
    /// Only applies in the normal state.
    pub fn set_output_data_rate(&mut self, odr: OutputDataRate) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl1| reg.with_output_data_rate(odr))?;
        Ok(())
    }

    /// Set the normal or force state
    pub fn set_state(&mut self, state: State) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl1| reg.with_state(state))?;
        Ok(())
    }

    // CTRL2

    /// Set how samples are stored in the FIFO
    ///
    /// Only meaningful with the FIFO enabled.
    pub fn set_fifo_data_storage_method(&mut self, fco: FifoStorageMethod) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl2| reg.with_fifo_storage_method(fco))?;
        Ok(())
    }

    /// Set how axes are combined when storing by comparison
    pub fn set_fifo_comparison_method(&mut self, aor: FifoComparisonMethod) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl2| reg.with_fifo_comparison_method(aor))?;
        Ok(())
    }

    /// Enable or disable the FIFO
    pub fn set_fifo_enable(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl2| reg.with_fifo_enabled(enabled))?;
        Ok(())
    }

    /// Enable or disable DRDY output on the DRDY pin
    pub fn set_data_ready_pin_enable(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl2| reg.with_data_ready_pin_enabled(enabled))?;
        Ok(())
    }

    /// Set the DRDY pin polarity
    pub fn set_data_ready_pin_polarity(&mut self, drp: DataReadyPinPolarity) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl2| reg.with_data_ready_pin_polarity(drp))?;
        Ok(())
    }

    // CTRL4

    /// Set the output resolution
    ///
    /// Readings are always scaled with the 15-bit factor, see [`RawMagneticReading::micro_tesla`].
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl4| reg.with_resolution(resolution))?;
        Ok(())
    }

    // Device functionality

    /// Check that WIA holds the HSCDTD008A identity
    pub fn who_i_am_check(&mut self) -> Result<(), Error<E>> {
        let wia = self.transport.read_byte(Register::Wia)?;
        if wia != WIA_VALUE {
            warn!("hscdtd008a::who_i_am_check(): WIA={:#x}", wia);
            return Err(Error::WrongDevice(wia));
        }
        Ok(())
    }

    /// Start an offset calibration
    ///
    /// Device must be in the force state. Completion is not waited for.
    pub fn offset_calibration(&mut self) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl3| reg.with_offset_calibration(true))?;
        Ok(())
    }

    /// Measure the temperature and compensate the magnetic output with it
    ///
    /// The measured temperature is used for all later compensation until this is called again.
    /// Device must be in the force state.
    pub fn temperature_compensation(&mut self) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl3| reg.with_temperature(true))?;

        for _ in 0..POLL_ATTEMPTS {
            self.transport.sleep(POLL_INTERVAL_MS);
            let status: StatusBits = self.transport.read_register()?;
            if status.temperature_ready {
                // TRDY only clears once TEMP has been read
                self.read_temperature()?;
                return Ok(());
            }
        }
        warn!("hscdtd008a::temperature_compensation(): TRDY never set");
        Err(Error::TemperatureTimeout)
    }

    /// Read the last measured temperature in °C
    ///
    /// Does not start a temperature measurement.
    pub fn read_temperature(&mut self) -> Result<i8, Error<E>> {
        let temp = self.transport.read_byte(Register::Temp)?;
        Ok(temp as i8)
    }

    /// Run the built-in self-test
    pub fn self_test(&mut self) -> Result<(), Error<E>> {
        self.transport.modify_register(|reg: Ctrl3| reg.with_self_test(true))?;
        self.transport.sleep(SELFTEST_SETTLE_MS);

        let first = self.transport.read_byte(Register::SelfTestResp)?;
        if first != SELFTEST_RESP_FIRST {
            warn!("hscdtd008a::self_test(): first response {:#x}", first);
            return Err(Error::SelfTestFirstResponse(first));
        }
        let second = self.transport.read_byte(Register::SelfTestResp)?;
        if second != SELFTEST_RESP_SECOND {
            warn!("hscdtd008a::self_test(): second response {:#x}", second);
            return Err(Error::SelfTestSecondResponse(second));
        }
        Ok(())
    }

    /// Soft reset the device
    ///
    /// The device comes back in stand-by with default registers and must be reconfigured.
    /// A single attempt; [`Self::initialize`] is what retries.
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.transport.write_register(Ctrl3::soft_reset())?;
        self.transport.sleep(RESET_SETTLE_MS);

        let ctrl3: Ctrl3 = self.transport.read_register()?;
        if ctrl3.soft_reset_pending() {
            return Err(Error::ResetNotCleared);
        }
        Ok(())
    }

    /// Read the 16-bit firmware information word (INFO_H:INFO_L)
    pub fn read_info(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.transport.read(Register::InfoL.addr(), &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read (and thereby clear) the status register
    pub fn read_status(&mut self) -> Result<StatusBits, Error<E>> {
        self.transport.read_register()
    }

    /// Trigger one force-state measurement and return it in µT
    ///
    /// The configured state is left as it is.
    pub fn measure(&mut self) -> Result<MagneticReading, Error<E>> {
        // drop whatever flags an earlier conversion left behind
        self.read_status()?;
        self.transport.modify_register(|reg: Ctrl3| reg.with_force(true))?;

        let mut ready = false;
        for _ in 0..POLL_ATTEMPTS {
            if self.read_status()?.data_ready {
                ready = true;
                break;
            }
            self.transport.sleep(POLL_INTERVAL_MS);
        }
        if !ready {
            warn!("hscdtd008a::measure(): DRDY never set");
            return Err(Error::MeasurementTimeout);
        }

        self.read_magnetodata()
    }

    /// Read the latest axis data in µT without triggering a measurement
    pub fn read_magnetodata(&mut self) -> Result<MagneticReading, Error<E>> {
        Ok(self.read_raw_magnetodata()?.micro_tesla())
    }

    /// Read the latest raw axis data without triggering a measurement
    pub fn read_raw_magnetodata(&mut self) -> Result<RawMagneticReading, Error<E>> {
        let mut buf = [0u8; 2 * NUM_AXIS];
        self.transport.read(Register::XoutL.addr(), &mut buf)?;
        let raw = RawMagneticReading::from_le_bytes(&buf);
        trace!("hscdtd008a::read_raw_magnetodata(): x={}, y={}, z={}", raw.x, raw.y, raw.z);
        Ok(raw)
    }
}
