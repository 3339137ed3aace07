#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod fifo;
pub mod info;
pub mod interface;
pub mod interrupt;
pub mod registers;

// Re-export main types
pub use config::{
    AdcRange, AdcResolution, Led, Mode, ProximityThreshold, SampleAveraging, SampleRate,
    SensorConfig, Slot,
};
pub use device::{DieTemperature, Max30105Driver};
pub use fifo::{ChannelLayout, FIFO_BURST_BYTES, FIFO_DEPTH, FifoReadout, Sample};
pub use info::DeviceInfo;
pub use interface::I2cInterface;
pub use interrupt::{InterruptConfig, InterruptEvent, InterruptSource, InterruptStatus};

/// MAX30105 7-bit I2C address (0xAE/0xAF in 8-bit write/read notation)
pub const I2C_ADDRESS: u8 = 0x57;

/// Expected value of the `PART_ID` register
pub const PART_ID_VALUE: u8 = 0x15;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `PART_ID` register value (contains the actual value read)
    InvalidDevice(u8),
    /// Invalid configuration parameter, rejected before touching the bus
    InvalidConfig,
    /// Operation attempted before `init()` or after `deinit()`
    NotInitialized,
    /// Soft reset bit did not self-clear in time
    ResetTimeout,
    /// FIFO overflowed since the last drain and samples were lost
    FifoOverrun,
    /// Mode register holds a value that is not a valid acquisition mode
    InvalidMode(u8),
    /// Die temperature conversion did not complete in time
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

impl Error<()> {
    /// Re-type a bus-free error so it can be returned next to transport errors
    pub(crate) const fn widen<E>(self) -> Error<E> {
        match self {
            // Bus-free helpers never produce `Bus`; treat it as a bad argument.
            Self::Bus(()) | Self::InvalidConfig => Error::InvalidConfig,
            Self::InvalidDevice(id) => Error::InvalidDevice(id),
            Self::NotInitialized => Error::NotInitialized,
            Self::ResetTimeout => Error::ResetTimeout,
            Self::FifoOverrun => Error::FifoOverrun,
            Self::InvalidMode(raw) => Error::InvalidMode(raw),
            Self::Timeout => Error::Timeout,
        }
    }
}
