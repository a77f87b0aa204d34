//! Register map, bit positions and fixed timing of the HSCDTD008A

#[cfg(feature = "defmt")]
use defmt::Format;

/// Default (and only documented) 7-bit I²C address of the HSCDTD008A
pub const I2C_ADDRESS_DEFAULT: u8 = 0x0C;

/// I²C device address
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum I2cAddr {
    /// 0x0C
    #[default]
    Default,
    /// Any other 7-bit address, e.g. behind an address translator
    Custom(u8),
}
impl I2cAddr {
    /// Get the 7-bit address as a byte
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Default => I2C_ADDRESS_DEFAULT,
            Self::Custom(addr) => *addr,
        }
    }
}

/// Register addresses
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// Self-test response (0xAA then 0x55 after a self-test)
    SelfTestResp = 0x0C,
    /// Firmware information, low byte
    InfoL = 0x0D,
    /// Firmware information, high byte
    InfoH = 0x0E,
    /// Who I am
    Wia = 0x0F,
    /// X axis output, low byte
    XoutL = 0x10,
    /// X axis output, high byte
    XoutH = 0x11,
    /// Y axis output, low byte
    YoutL = 0x12,
    /// Y axis output, high byte
    YoutH = 0x13,
    /// Z axis output, low byte
    ZoutL = 0x14,
    /// Z axis output, high byte
    ZoutH = 0x15,
    /// Status
    Status = 0x18,
    /// Control 1: power mode, output data rate, state
    Ctrl1 = 0x1B,
    /// Control 2: FIFO and data-ready pin
    Ctrl2 = 0x1C,
    /// Control 3: one-shot actions (reset, force, self-test, compensation, calibration)
    Ctrl3 = 0x1D,
    /// Control 4: output resolution
    Ctrl4 = 0x1E,
    /// Temperature, signed 8 bit, 1 °C/LSB
    Temp = 0x31,
}
impl Register {
    /// Get the register index as sent on the bus
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Expected content of the WIA register
pub const WIA_VALUE: u8 = 0x49;
/// First self-test response after STC is set
pub const SELFTEST_RESP_FIRST: u8 = 0xAA;
/// Second self-test response, read right after the first one
pub const SELFTEST_RESP_SECOND: u8 = 0x55;

/// Number of magnetic axes
pub const NUM_AXIS: usize = 3;
/// Magnetic flux density per LSB at 15-bit resolution, in µT
pub const UT_PER_LSB_15B: f32 = 0.150;

/// Largest read the transport accepts in one transaction
pub const MAX_READ_LEN: usize = 31;
/// Largest write payload the transport accepts in one transaction (index byte excluded)
pub const MAX_WRITE_LEN: usize = 30;

/// Bus settle time after opening the transport
pub const OPEN_SETTLE_MS: u32 = 100;
/// Soft reset attempts made by initialization before giving up
pub const RESET_ATTEMPTS: u8 = 10;
/// Sleep between failed soft reset attempts
pub const RESET_RETRY_MS: u32 = 5;
/// Time the chip needs to clear SRST
pub const RESET_SETTLE_MS: u32 = 5;
/// Quiet time after a successful reset during initialization
pub const POST_RESET_MS: u32 = 50;
/// Wait between starting a self-test and reading its response
pub const SELFTEST_SETTLE_MS: u32 = 5;
/// Poll budget for DRDY and TRDY
pub const POLL_ATTEMPTS: u8 = 50;
/// Sleep per poll iteration
pub const POLL_INTERVAL_MS: u32 = 1;

// CTRL1
pub(crate) const CTRL1_FIELD_LSBIT_PC: u8 = 7;
pub(crate) const CTRL1_FIELD_WIDTH_PC: u8 = 1;
pub(crate) const CTRL1_FIELD_LSBIT_ODR: u8 = 3;
pub(crate) const CTRL1_FIELD_WIDTH_ODR: u8 = 2;
pub(crate) const CTRL1_FIELD_LSBIT_FS: u8 = 1;
pub(crate) const CTRL1_FIELD_WIDTH_FS: u8 = 1;

// CTRL2
pub(crate) const CTRL2_FIELD_LSBIT_FCO: u8 = 6;
pub(crate) const CTRL2_FIELD_WIDTH_FCO: u8 = 1;
pub(crate) const CTRL2_FIELD_LSBIT_AOR: u8 = 5;
pub(crate) const CTRL2_FIELD_WIDTH_AOR: u8 = 1;
pub(crate) const CTRL2_FIELD_LSBIT_FF: u8 = 4;
pub(crate) const CTRL2_FIELD_WIDTH_FF: u8 = 1;
pub(crate) const CTRL2_FIELD_LSBIT_DEN: u8 = 3;
pub(crate) const CTRL2_FIELD_WIDTH_DEN: u8 = 1;
pub(crate) const CTRL2_FIELD_LSBIT_DRP: u8 = 2;
pub(crate) const CTRL2_FIELD_WIDTH_DRP: u8 = 1;

// CTRL3
pub(crate) const CTRL3_FIELD_LSBIT_SRST: u8 = 7;
pub(crate) const CTRL3_FIELD_WIDTH_SRST: u8 = 1;
pub(crate) const CTRL3_FIELD_LSBIT_FRC: u8 = 6;
pub(crate) const CTRL3_FIELD_WIDTH_FRC: u8 = 1;
pub(crate) const CTRL3_FIELD_LSBIT_STC: u8 = 4;
pub(crate) const CTRL3_FIELD_WIDTH_STC: u8 = 1;
pub(crate) const CTRL3_FIELD_LSBIT_TCS: u8 = 1;
pub(crate) const CTRL3_FIELD_WIDTH_TCS: u8 = 1;
pub(crate) const CTRL3_FIELD_LSBIT_OCL: u8 = 0;
pub(crate) const CTRL3_FIELD_WIDTH_OCL: u8 = 1;

// CTRL4
pub(crate) const CTRL4_FIELD_LSBIT_RS: u8 = 4;
pub(crate) const CTRL4_FIELD_WIDTH_RS: u8 = 1;

// STATUS
pub(crate) const STATUS_FIELD_LSBIT_DRDY: u8 = 6;
pub(crate) const STATUS_FIELD_WIDTH_DRDY: u8 = 1;
pub(crate) const STATUS_FIELD_LSBIT_DOR: u8 = 5;
pub(crate) const STATUS_FIELD_WIDTH_DOR: u8 = 1;
pub(crate) const STATUS_FIELD_LSBIT_FFU: u8 = 2;
pub(crate) const STATUS_FIELD_WIDTH_FFU: u8 = 1;
pub(crate) const STATUS_FIELD_LSBIT_TRDY: u8 = 1;
pub(crate) const STATUS_FIELD_WIDTH_TRDY: u8 = 1;
pub(crate) const STATUS_FIELD_LSBIT_ORDY: u8 = 0;
pub(crate) const STATUS_FIELD_WIDTH_ORDY: u8 = 1;

/// Mask covering a field of `width` bits starting at `lsbit`
pub(crate) const fn field_mask(lsbit: u8, width: u8) -> u8 {
    (((1u16 << width) - 1) << lsbit) as u8
}

/// Extract a field from a register byte
pub(crate) const fn field_get(raw: u8, lsbit: u8, width: u8) -> u8 {
    (raw & field_mask(lsbit, width)) >> lsbit
}

/// Replace a field in a register byte, leaving every other bit untouched
pub(crate) const fn field_set(raw: u8, lsbit: u8, width: u8, value: u8) -> u8 {
    let mask = field_mask(lsbit, width);
    (raw & !mask) | ((value << lsbit) & mask)
}
