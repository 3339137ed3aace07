//! Interrupt configuration and dispatch types
//!
//! The MAX30105 raises its open-drain INT pin for six events spread across two
//! status registers. Reading a status register clears its flags, so one read
//! per register is all the dispatcher gets.
//!
//! | Event | Register | Bit | Enable |
//! |-------|----------|-----|--------|
//! | FIFO almost full | 0x00 | 7 | 0x02 bit 7 |
//! | New data ready | 0x00 | 6 | 0x02 bit 6 |
//! | ALC overflow | 0x00 | 5 | 0x02 bit 5 |
//! | Proximity threshold | 0x00 | 4 | 0x02 bit 4 |
//! | Power ready | 0x00 | 0 | always on |
//! | Die temperature ready | 0x01 | 1 | 0x03 bit 1 |
//!
//! # Example
//!
//! ```ignore
//! # use max30105::{Max30105Driver, InterruptConfig, InterruptEvent};
//! # let sensor: Max30105Driver<_> = todo!();
//! sensor.configure_interrupts(&InterruptConfig {
//!     fifo_almost_full: true,
//!     ..Default::default()
//! })?;
//!
//! // From the INT pin handler:
//! sensor.irq_handler(|event| {
//!     if event == InterruptEvent::FifoAlmostFull {
//!         // schedule a FIFO drain
//!     }
//! })?;
//! # Ok::<(), max30105::Error<()>>(())
//! ```

/// Event reported by the interrupt dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptEvent {
    /// FIFO reached the almost-full threshold
    FifoAlmostFull = 7,
    /// A new sample entered the FIFO
    DataReady = 6,
    /// Ambient light cancellation reached its limit
    AlcOverflow = 5,
    /// Proximity threshold crossed, particle sensing started
    Proximity = 4,
    /// Power-up or brownout recovery completed
    PowerReady = 0,
    /// Die temperature conversion finished
    DieTemperatureReady = 1,
}

impl InterruptEvent {
    /// Every event, in dispatch order
    pub const ALL: [Self; 6] = [
        Self::FifoAlmostFull,
        Self::DataReady,
        Self::AlcOverflow,
        Self::Proximity,
        Self::PowerReady,
        Self::DieTemperatureReady,
    ];

    /// Bit position inside its status register
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

/// Interrupt source that can be enabled
///
/// Power ready cannot be masked and so has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptSource {
    /// FIFO almost full
    FifoAlmostFull,
    /// New FIFO data ready
    DataReady,
    /// ALC overflow
    AlcOverflow,
    /// Proximity threshold
    Proximity,
    /// Die temperature ready
    DieTemperatureReady,
}

impl InterruptSource {
    /// Every maskable source
    pub const ALL: [Self; 5] = [
        Self::FifoAlmostFull,
        Self::DataReady,
        Self::AlcOverflow,
        Self::Proximity,
        Self::DieTemperatureReady,
    ];

    /// Event this source gates
    pub const fn event(self) -> InterruptEvent {
        match self {
            Self::FifoAlmostFull => InterruptEvent::FifoAlmostFull,
            Self::DataReady => InterruptEvent::DataReady,
            Self::AlcOverflow => InterruptEvent::AlcOverflow,
            Self::Proximity => InterruptEvent::Proximity,
            Self::DieTemperatureReady => InterruptEvent::DieTemperatureReady,
        }
    }
}

/// Interrupt enable configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InterruptConfig {
    /// FIFO almost-full interrupt
    pub fifo_almost_full: bool,
    /// New data ready interrupt
    pub data_ready: bool,
    /// ALC overflow interrupt
    pub alc_overflow: bool,
    /// Proximity interrupt
    pub proximity: bool,
    /// Die temperature ready interrupt
    pub die_temperature_ready: bool,
}

impl InterruptConfig {
    /// Whether `source` is enabled in this configuration
    pub const fn is_enabled(&self, source: InterruptSource) -> bool {
        match source {
            InterruptSource::FifoAlmostFull => self.fifo_almost_full,
            InterruptSource::DataReady => self.data_ready,
            InterruptSource::AlcOverflow => self.alc_overflow,
            InterruptSource::Proximity => self.proximity,
            InterruptSource::DieTemperatureReady => self.die_temperature_ready,
        }
    }

    /// Check if any interrupt is enabled
    pub const fn any_enabled(&self) -> bool {
        self.fifo_almost_full
            || self.data_ready
            || self.alc_overflow
            || self.proximity
            || self.die_temperature_ready
    }
}

const fn bit(value: u8, event: InterruptEvent) -> bool {
    value & (1 << event.bit()) != 0
}

/// Snapshot of both interrupt status registers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InterruptStatus {
    /// FIFO almost full
    pub fifo_almost_full: bool,
    /// New data ready
    pub data_ready: bool,
    /// ALC overflow
    pub alc_overflow: bool,
    /// Proximity threshold triggered
    pub proximity: bool,
    /// Power ready
    pub power_ready: bool,
    /// Die temperature ready
    pub die_temperature_ready: bool,
}

impl InterruptStatus {
    /// Decode the raw status 1 and status 2 bytes
    pub const fn from_registers(status1: u8, status2: u8) -> Self {
        Self {
            fifo_almost_full: bit(status1, InterruptEvent::FifoAlmostFull),
            data_ready: bit(status1, InterruptEvent::DataReady),
            alc_overflow: bit(status1, InterruptEvent::AlcOverflow),
            proximity: bit(status1, InterruptEvent::Proximity),
            power_ready: bit(status1, InterruptEvent::PowerReady),
            die_temperature_ready: bit(status2, InterruptEvent::DieTemperatureReady),
        }
    }

    /// Whether `event` is flagged
    pub const fn is_set(&self, event: InterruptEvent) -> bool {
        match event {
            InterruptEvent::FifoAlmostFull => self.fifo_almost_full,
            InterruptEvent::DataReady => self.data_ready,
            InterruptEvent::AlcOverflow => self.alc_overflow,
            InterruptEvent::Proximity => self.proximity,
            InterruptEvent::PowerReady => self.power_ready,
            InterruptEvent::DieTemperatureReady => self.die_temperature_ready,
        }
    }

    /// Check if any flag is set
    pub const fn any_set(&self) -> bool {
        self.fifo_almost_full
            || self.data_ready
            || self.alc_overflow
            || self.proximity
            || self.power_ready
            || self.die_temperature_ready
    }

    /// Flagged events in dispatch order
    pub fn events(&self) -> impl Iterator<Item = InterruptEvent> + '_ {
        InterruptEvent::ALL
            .into_iter()
            .filter(move |event| self.is_set(*event))
    }
}
