//! FIFO byte stream decoding
//!
//! Each channel word is three bytes, most significant first. The chip
//! left-justifies the ADC result to 18 bits, so lower resolutions are shifted
//! right by `18 - bits` after assembly. Channel order within a sample is red,
//! then IR, then green.
//!
//! # Example
//!
//! ```ignore
//! # use max30105::{AdcResolution, ChannelLayout, Mode, fifo::parser::SampleParser};
//! let parser = SampleParser::new(ChannelLayout::from(Mode::RedIr), AdcResolution::Bits16);
//! let samples = parser.parse(&[0x01, 0x00, 0x00, 0x02, 0x00, 0x00])?;
//! assert_eq!(samples[0].red, 0x4000);
//! # Ok::<(), max30105::Error<()>>(())
//! ```

use super::{BYTES_PER_CHANNEL, ChannelLayout, FIFO_DEPTH, Sample};
use crate::config::AdcResolution;
use crate::Error;

/// FIFO sample decoder
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleParser {
    layout: ChannelLayout,
    shift: u8,
}

impl SampleParser {
    /// Create a decoder for the given layout and resolution
    pub const fn new(layout: ChannelLayout, resolution: AdcResolution) -> Self {
        Self {
            layout,
            shift: resolution.shift(),
        }
    }

    /// Bytes consumed per sample
    pub const fn bytes_per_sample(&self) -> usize {
        self.layout.bytes_per_sample
    }

    /// Decode every complete sample in `data`
    ///
    /// Trailing bytes that do not form a whole sample are ignored.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `data` holds more samples than the ring depth.
    pub fn parse(&self, data: &[u8]) -> Result<heapless::Vec<Sample, FIFO_DEPTH>, Error<()>> {
        let mut samples = heapless::Vec::new();

        for chunk in data.chunks_exact(self.layout.bytes_per_sample) {
            if samples.push(self.parse_sample(chunk)).is_err() {
                return Err(Error::InvalidConfig);
            }
        }

        Ok(samples)
    }

    /// Decode one sample; `data` is exactly `bytes_per_sample` long
    fn parse_sample(&self, data: &[u8]) -> Sample {
        let mut words = data.chunks_exact(BYTES_PER_CHANNEL).map(|word| self.word(word));

        Sample {
            red: words.next().unwrap_or(0),
            ir: if self.layout.channels >= 2 { words.next() } else { None },
            green: if self.layout.channels >= 3 { words.next() } else { None },
        }
    }

    fn word(&self, bytes: &[u8]) -> u32 {
        let raw = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
        raw >> self.shift
    }
}
