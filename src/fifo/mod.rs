//! FIFO sample acquisition
//!
//! The MAX30105 buffers up to 32 samples in an on-chip ring. Each sample holds
//! one 3-byte word per active LED channel, so a full burst is 32 × 9 = 288 bytes
//! in the three-LED mode.
//!
//! The ring is described by three 5-bit registers: the write pointer (next slot
//! the chip fills), the read pointer (next slot the host drains) and the
//! overflow counter (samples lost since the last drain). Reading the data port
//! advances the read pointer on the chip side.
//!
//! # Example
//!
//! ```ignore
//! # use max30105::Max30105Driver;
//! # let sensor: Max30105Driver<_> = todo!();
//! let readout = sensor.read_fifo(32)?;
//! if readout.overrun {
//!     // Samples were dropped before this drain, the returned ones are still valid
//! }
//! for sample in &readout.samples {
//!     let _red = sample.red;
//! }
//! # Ok::<(), max30105::Error<()>>(())
//! ```

pub mod parser;

use crate::config::Mode;
use crate::Error;

/// Number of sample slots in the on-chip ring
pub const FIFO_DEPTH: usize = 32;

/// Largest possible FIFO burst in bytes (32 samples, three channels)
pub const FIFO_BURST_BYTES: usize = FIFO_DEPTH * 3 * BYTES_PER_CHANNEL;

/// Bytes stored per channel word
pub const BYTES_PER_CHANNEL: usize = 3;

/// Mask applied to the 5-bit ring registers
pub(crate) const POINTER_MASK: u8 = 0x1F;

/// Byte layout of one FIFO sample for a given acquisition mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelLayout {
    /// Active channels per sample (1 to 3)
    pub channels: usize,
    /// Bytes per sample
    pub bytes_per_sample: usize,
}

impl ChannelLayout {
    /// Layout used by `mode`
    pub const fn for_mode(mode: Mode) -> Self {
        let channels = mode.channels();
        Self {
            channels,
            bytes_per_sample: channels * BYTES_PER_CHANNEL,
        }
    }
}

impl From<Mode> for ChannelLayout {
    fn from(mode: Mode) -> Self {
        Self::for_mode(mode)
    }
}

/// Number of unread samples between the read and write pointers
///
/// Equal pointers mean the ring is empty. The chip never reports "full"
/// through the pointers themselves.
pub const fn available_samples(write_pointer: u8, read_pointer: u8) -> u8 {
    write_pointer.wrapping_sub(read_pointer) & POINTER_MASK
}

/// Check that a value fits in a 5-bit ring register
pub(crate) const fn check_pointer(value: u8) -> Result<u8, Error<()>> {
    if value > POINTER_MASK {
        Err(Error::InvalidConfig)
    } else {
        Ok(value)
    }
}

/// One acquisition instant
///
/// Channels missing from the active mode are `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Red channel
    pub red: u32,
    /// IR channel (red+IR and three-LED modes)
    pub ir: Option<u32>,
    /// Green channel (three-LED mode only)
    pub green: Option<u32>,
}

/// Result of one FIFO drain
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoReadout {
    /// Decoded samples, oldest first
    pub samples: heapless::Vec<Sample, FIFO_DEPTH>,
    /// The overflow counter was nonzero at drain time
    pub overrun: bool,
}

impl FifoReadout {
    /// Number of samples read
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// No samples were available
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Turn an overrun into [`Error::FifoOverrun`]
    ///
    /// For callers that treat lost samples as a failure. The samples are
    /// dropped with the error.
    ///
    /// # Errors
    /// Returns `FifoOverrun` if the overflow counter was nonzero.
    pub fn check<E>(self) -> Result<heapless::Vec<Sample, FIFO_DEPTH>, Error<E>> {
        if self.overrun {
            Err(Error::FifoOverrun)
        } else {
            Ok(self.samples)
        }
    }
}
