//! Acquisition configuration types
//!
//! Provides the enums that map onto the MAX30105 configuration bit-fields and a
//! [`SensorConfig`] profile describing a complete device setup.
//!
//! All configuration is applied through methods on `Max30105Driver`.
//!
//! # Example
//!
//! ```ignore
//! # use max30105::{Max30105Driver, SensorConfig, Mode, SampleRate};
//! # let sensor: Max30105Driver<_> = todo!();
//! let config = SensorConfig {
//!     mode: Mode::RedIr,
//!     sample_rate: SampleRate::Hz400,
//!     ..Default::default()
//! };
//! sensor.configure(&config)?;
//! # Ok::<(), max30105::Error<()>>(())
//! ```

use crate::interrupt::InterruptConfig;

/// On-chip sample averaging (FIFO_CONFIG `SMP_AVE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleAveraging {
    /// No averaging
    Avg1 = 0,
    /// 2 samples averaged per FIFO sample
    Avg2 = 1,
    /// 4 samples averaged
    Avg4 = 2,
    /// 8 samples averaged
    Avg8 = 3,
    /// 16 samples averaged
    Avg16 = 4,
    /// 32 samples averaged
    Avg32 = 5,
}

impl SampleAveraging {
    /// Decode the 3-bit register field. Raw values 5, 6 and 7 all select 32.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Avg1,
            1 => Self::Avg2,
            2 => Self::Avg4,
            3 => Self::Avg8,
            4 => Self::Avg16,
            _ => Self::Avg32,
        }
    }

    /// Number of raw samples averaged into one FIFO sample
    pub const fn samples(self) -> u8 {
        1 << (self as u8)
    }
}

/// Acquisition (LED) mode (MODE_CONFIG `MODE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Red LED only
    Red = 0x02,
    /// Red and IR LEDs
    RedIr = 0x03,
    /// Multi-LED mode: green, red and IR
    GreenRedIr = 0x07,
}

impl Mode {
    /// Decode the 3-bit mode field, `None` for reserved values
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0x02 => Some(Self::Red),
            0x03 => Some(Self::RedIr),
            0x07 => Some(Self::GreenRedIr),
            _ => None,
        }
    }

    /// Number of LED channels stored per FIFO sample
    pub const fn channels(self) -> usize {
        match self {
            Self::Red => 1,
            Self::RedIr => 2,
            Self::GreenRedIr => 3,
        }
    }
}

/// Particle-sensing ADC full-scale range (`ADC_RGE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcRange {
    /// 2048 nA full scale
    Na2048 = 0,
    /// 4096 nA full scale
    Na4096 = 1,
    /// 8192 nA full scale
    Na8192 = 2,
    /// 16384 nA full scale
    Na16384 = 3,
}

impl AdcRange {
    /// Decode the 2-bit register field
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Na2048,
            1 => Self::Na4096,
            2 => Self::Na8192,
            _ => Self::Na16384,
        }
    }

    /// Full-scale current in nA
    pub const fn full_scale_na(self) -> u16 {
        2048 << (self as u8)
    }
}

/// Particle-sensing sample rate (`SR`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleRate {
    /// 50 samples per second
    Hz50 = 0,
    /// 100 samples per second
    Hz100 = 1,
    /// 200 samples per second
    Hz200 = 2,
    /// 400 samples per second
    Hz400 = 3,
    /// 800 samples per second
    Hz800 = 4,
    /// 1000 samples per second
    Hz1000 = 5,
    /// 1600 samples per second
    Hz1600 = 6,
    /// 3200 samples per second
    Hz3200 = 7,
}

impl SampleRate {
    /// Decode the 3-bit register field
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Hz50,
            1 => Self::Hz100,
            2 => Self::Hz200,
            3 => Self::Hz400,
            4 => Self::Hz800,
            5 => Self::Hz1000,
            6 => Self::Hz1600,
            _ => Self::Hz3200,
        }
    }

    /// Sample rate in Hz
    pub const fn hz(self) -> u16 {
        match self {
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
            Self::Hz400 => 400,
            Self::Hz800 => 800,
            Self::Hz1000 => 1000,
            Self::Hz1600 => 1600,
            Self::Hz3200 => 3200,
        }
    }
}

/// ADC resolution, set through the LED pulse width (`LED_PW`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcResolution {
    /// 15-bit samples (69 us pulse)
    Bits15 = 0,
    /// 16-bit samples (118 us pulse)
    Bits16 = 1,
    /// 17-bit samples (215 us pulse)
    Bits17 = 2,
    /// 18-bit samples (411 us pulse)
    Bits18 = 3,
}

impl AdcResolution {
    /// Decode the 2-bit register field
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Bits15,
            1 => Self::Bits16,
            2 => Self::Bits17,
            _ => Self::Bits18,
        }
    }

    /// Effective bits per sample
    pub const fn bits(self) -> u8 {
        15 + self as u8
    }

    /// Right shift that aligns an 18-bit left-justified FIFO word to this resolution
    pub const fn shift(self) -> u8 {
        18 - self.bits()
    }
}

/// LED driven during a multi-LED time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    /// Slot disabled
    None = 0,
    /// Red LED at LED1_PA amplitude
    Red = 1,
    /// IR LED at LED2_PA amplitude
    Ir = 2,
    /// Green LED at LED3_PA amplitude
    Green = 3,
    /// Red LED at PILOT_PA amplitude
    RedPilot = 5,
    /// IR LED at PILOT_PA amplitude
    IrPilot = 6,
    /// Green LED at PILOT_PA amplitude
    GreenPilot = 7,
}

impl Led {
    /// Decode the 3-bit slot field. The reserved value 4 disables the slot.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            1 => Self::Red,
            2 => Self::Ir,
            3 => Self::Green,
            5 => Self::RedPilot,
            6 => Self::IrPilot,
            7 => Self::GreenPilot,
            _ => Self::None,
        }
    }
}

/// Multi-LED time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Slot 1 (MULTI_LED_CONTROL_1, bits 2:0)
    Slot1,
    /// Slot 2 (MULTI_LED_CONTROL_1, bits 6:4)
    Slot2,
    /// Slot 3 (MULTI_LED_CONTROL_2, bits 2:0)
    Slot3,
    /// Slot 4 (MULTI_LED_CONTROL_2, bits 6:4)
    Slot4,
}

/// Proximity interrupt threshold conversions
///
/// One register LSB equals 1023 ADC counts. The mapping truncates, so only
/// multiples of 1023 survive a round trip through the register.
pub struct ProximityThreshold;

impl ProximityThreshold {
    /// ADC counts per register LSB
    pub const ADC_PER_LSB: u32 = 1023;

    /// Convert ADC counts into the register value (`floor(adc / 1023)`)
    ///
    /// Counts above `255 * 1023` saturate at 255.
    pub const fn to_register(adc: u32) -> u8 {
        let register = adc / Self::ADC_PER_LSB;
        if register > u8::MAX as u32 {
            u8::MAX
        } else {
            register as u8
        }
    }

    /// Convert a register value back into ADC counts
    pub const fn to_adc(register: u8) -> u32 {
        register as u32 * Self::ADC_PER_LSB
    }
}

/// Complete acquisition profile
///
/// The defaults describe a continuous three-LED FIFO capture at 100 Hz with the
/// almost-full, ALC overflow, proximity and die temperature interrupts enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// On-chip sample averaging
    pub sample_averaging: SampleAveraging,
    /// Overwrite oldest samples when the FIFO is full
    pub fifo_rollover: bool,
    /// Almost-full threshold (0-15)
    pub fifo_almost_full: u8,
    /// Acquisition mode
    pub mode: Mode,
    /// ADC full-scale range
    pub adc_range: AdcRange,
    /// Sample rate
    pub sample_rate: SampleRate,
    /// ADC resolution
    pub adc_resolution: AdcResolution,
    /// Red LED pulse amplitude (raw)
    pub led_red_amplitude: u8,
    /// IR LED pulse amplitude (raw)
    pub led_ir_amplitude: u8,
    /// Green LED pulse amplitude (raw)
    pub led_green_amplitude: u8,
    /// Proximity (pilot) pulse amplitude (raw)
    pub led_proximity_amplitude: u8,
    /// Proximity interrupt threshold in ADC counts
    pub proximity_threshold_adc: u32,
    /// LED assignment for slots 1 through 4
    pub slots: [Led; 4],
    /// Start a die temperature conversion as part of the setup
    pub die_temperature: bool,
    /// Interrupt sources to enable
    pub interrupts: InterruptConfig,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sample_averaging: SampleAveraging::Avg8,
            fifo_rollover: true,
            fifo_almost_full: 0x0F,
            mode: Mode::GreenRedIr,
            adc_range: AdcRange::Na4096,
            sample_rate: SampleRate::Hz100,
            adc_resolution: AdcResolution::Bits18,
            led_red_amplitude: 0x7F,
            led_ir_amplitude: 0x7F,
            led_green_amplitude: 0x7F,
            led_proximity_amplitude: 0x7F,
            proximity_threshold_adc: 1023,
            slots: [Led::Red, Led::Ir, Led::Green, Led::None],
            die_temperature: false,
            interrupts: InterruptConfig {
                fifo_almost_full: true,
                data_ready: false,
                alc_overflow: true,
                proximity: true,
                die_temperature_ready: true,
            },
        }
    }
}

impl SensorConfig {
    /// Slots paired with their configured LED, in slot order
    pub const fn slot_assignments(&self) -> [(Slot, Led); 4] {
        [
            (Slot::Slot1, self.slots[0]),
            (Slot::Slot2, self.slots[1]),
            (Slot::Slot3, self.slots[2]),
            (Slot::Slot4, self.slots[3]),
        ]
    }
}
