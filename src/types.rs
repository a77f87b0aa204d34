use crate::hw_def::*;

use core::fmt;

#[cfg(feature="defmt")]
use defmt::Format;

/// Power mode (CTRL1.PC)
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PowerMode {
    /// Stand-by, the power-on default
    #[default]
    StandBy,
    /// Active, required for any measurement
    Active,
}
impl PowerMode {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::StandBy => 0,
            Self::Active => 1,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::StandBy } else { Self::Active }
    }
}

/// Output data rate in the normal state (CTRL1.ODR)
///
/// Has no effect in the force state.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputDataRate {
    /// 0.5 Hz, the power-on default
    #[default]
    Hz0_5,
    /// 10 Hz
    Hz10,
    /// 20 Hz
    Hz20,
    /// 100 Hz
    Hz100,
}
impl OutputDataRate {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::Hz0_5 => 0b00,
            Self::Hz10 => 0b01,
            Self::Hz20 => 0b10,
            Self::Hz100 => 0b11,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Hz0_5,
            0b01 => Self::Hz10,
            0b10 => Self::Hz20,
            _ => Self::Hz100,
        }
    }
}

/// Measurement state (CTRL1.FS)
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum State {
    /// Free running at the output data rate
    Normal,
    /// One conversion per force trigger, the power-on default
    #[default]
    Force,
}
impl State {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Force => 1,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::Normal } else { Self::Force }
    }
}

/// How samples are stored in the FIFO (CTRL2.FCO)
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FifoStorageMethod {
    /// Every sample is stored
    #[default]
    Direct,
    /// Only samples passing the threshold comparison are stored
    Comparison,
}
impl FifoStorageMethod {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::Direct => 0,
            Self::Comparison => 1,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::Direct } else { Self::Comparison }
    }
}

/// How the axes are combined in comparison storage (CTRL2.AOR)
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FifoComparisonMethod {
    /// Any axis over threshold
    #[default]
    Or,
    /// All axes over threshold
    And,
}
impl FifoComparisonMethod {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::Or => 0,
            Self::And => 1,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::Or } else { Self::And }
    }
}

/// Electrical polarity of the DRDY pin (CTRL2.DRP)
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DataReadyPinPolarity {
    /// Pin is driven low when data is ready
    ActiveLow,
    /// Pin is driven high when data is ready, the power-on default
    #[default]
    ActiveHigh,
}
impl DataReadyPinPolarity {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::ActiveLow => 0,
            Self::ActiveHigh => 1,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::ActiveLow } else { Self::ActiveHigh }
    }
}

/// Output resolution (CTRL4.RS)
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Resolution {
    /// -8192 to +8191, the power-on default
    #[default]
    Bits14,
    /// -16384 to +16383, 0.150 µT/LSB
    Bits15,
}
impl Resolution {
    pub(crate) fn bits(self) -> u8 {
        match self {
            Self::Bits14 => 0,
            Self::Bits15 => 1,
        }
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 { Self::Bits14 } else { Self::Bits15 }
    }
}

/// Status bits from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusBits {
    raw: u8,
    /// magnetic data is ready to be read
    pub data_ready: bool,
    /// data overrun: a sample was overwritten before being read
    pub data_overrun: bool,
    /// FIFO full
    pub fifo_full: bool,
    /// temperature data is ready to be read
    pub temperature_ready: bool,
    /// offset calibration finished
    pub offset_ready: bool,
}
impl From<u8> for StatusBits {
    fn from(raw: u8) -> Self {
        Self {
            raw,
            data_ready: field_get(raw, STATUS_FIELD_LSBIT_DRDY, STATUS_FIELD_WIDTH_DRDY) != 0,
            data_overrun: field_get(raw, STATUS_FIELD_LSBIT_DOR, STATUS_FIELD_WIDTH_DOR) != 0,
            fifo_full: field_get(raw, STATUS_FIELD_LSBIT_FFU, STATUS_FIELD_WIDTH_FFU) != 0,
            temperature_ready: field_get(raw, STATUS_FIELD_LSBIT_TRDY, STATUS_FIELD_WIDTH_TRDY) != 0,
            offset_ready: field_get(raw, STATUS_FIELD_LSBIT_ORDY, STATUS_FIELD_WIDTH_ORDY) != 0,
        }
    }
}
impl StatusBits {
    /// Get the raw status bits
    pub fn raw(&self) -> u8 {
        self.raw
    }
}
impl fmt::Display for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusBits {{ 0x{:02x}; ", self.raw)?;
        if self.data_ready {
            write!(f, "data_ready ")?;
        }
        if self.data_overrun {
            write!(f, "data_overrun ")?;
        }
        if self.fifo_full {
            write!(f, "fifo_full ")?;
        }
        if self.temperature_ready {
            write!(f, "temperature_ready ")?;
        }
        if self.offset_ready {
            write!(f, "offset_ready ")?;
        }
        write!(f, "}}")
    }
}

/// Raw (still in LSB) magnetic flux density from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RawMagneticReading {
    /// unprocessed X axis
    pub x: i16,
    /// unprocessed Y axis
    pub y: i16,
    /// unprocessed Z axis
    pub z: i16,
}
impl RawMagneticReading {
    /// Decode the six little-endian output bytes starting at XOUT_L
    pub fn from_le_bytes(buf: &[u8; 2 * NUM_AXIS]) -> Self {
        Self {
            x: i16::from_le_bytes([buf[0], buf[1]]),
            y: i16::from_le_bytes([buf[2], buf[3]]),
            z: i16::from_le_bytes([buf[4], buf[5]]),
        }
    }
    /// Convert to µT
    ///
    /// The 15-bit factor is used whatever resolution is configured; the scale at 14 bit is not
    /// given by the datasheet.
    pub fn micro_tesla(&self) -> MagneticReading {
        self.into()
    }
}

/// Magnetic flux density from the device after conversion, in µT
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MagneticReading {
    /// X axis in µT
    pub x: f32,
    /// Y axis in µT
    pub y: f32,
    /// Z axis in µT
    pub z: f32,
}
impl From<&RawMagneticReading> for MagneticReading {
    fn from(raw: &RawMagneticReading) -> Self {
        Self {
            x: raw_to_micro_tesla(raw.x),
            y: raw_to_micro_tesla(raw.y),
            z: raw_to_micro_tesla(raw.z),
        }
    }
}
impl fmt::Display for MagneticReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:.3} µT, y={:.3} µT, z={:.3} µT", self.x, self.y, self.z)
    }
}

fn raw_to_micro_tesla(raw: i16) -> f32 {
    raw as f32 * UT_PER_LSB_15B
}
