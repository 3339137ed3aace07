//! High-level driver API for the MAX30105
//!
//! Every method takes `&self`. Register traffic runs inside a
//! `critical_section`, so one driver value can be shared between the main loop
//! and the INT pin interrupt handler (for example from a `static`). The
//! temperature completion flag and result live in atomics written by
//! [`Max30105Driver::irq_handler`].
//!
//! Callbacks passed to `irq_handler` run outside the critical section and may
//! call back into the driver.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use critical_section::Mutex;
use device_driver::RegisterInterface;

use crate::config::{
    AdcRange, AdcResolution, Led, Mode, ProximityThreshold, SampleAveraging, SampleRate,
    SensorConfig, Slot,
};
use crate::fifo::parser::SampleParser;
use crate::fifo::{ChannelLayout, FIFO_BURST_BYTES, FifoReadout, available_samples, check_pointer};
use crate::info::DeviceInfo;
use crate::interrupt::{InterruptConfig, InterruptEvent, InterruptSource, InterruptStatus};
use crate::registers::{FIFO_DATA_ADDRESS, INT_STATUS_1_ADDRESS, RegisterDevice};
use crate::{Error, PART_ID_VALUE};

/// Longest time the soft reset bit may stay set
const RESET_TIMEOUT_MS: u32 = 10;

/// Reset poll period
const POLL_INTERVAL_MS: u32 = 1;

/// Iterations of the 1 ms temperature wait
const TEMPERATURE_TIMEOUT_MS: u32 = 5000;

/// Largest value accepted by the almost-full threshold field
const FIFO_ALMOST_FULL_MAX: u8 = 0x0F;

/// Die temperature reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DieTemperature {
    /// `(integer << 4) | fraction`, as read from 0x1F and 0x20
    pub raw: u16,
    /// Temperature in °C
    pub celsius: f32,
}

impl DieTemperature {
    /// Combine the integer and fraction registers
    ///
    /// The integer register is two's complement; the fraction counts 1/16 °C.
    pub fn from_registers(integer: u8, fraction: u8) -> Self {
        let fraction = fraction & 0x0F;
        Self {
            raw: (u16::from(integer) << 4) | u16::from(fraction),
            celsius: f32::from(integer as i8) + f32::from(fraction) * 0.0625,
        }
    }
}

struct Inner<I> {
    device: RegisterDevice<I>,
    buffer: [u8; FIFO_BURST_BYTES],
}

/// Main driver for the MAX30105
pub struct Max30105Driver<I> {
    inner: Mutex<RefCell<Inner<I>>>,
    inited: AtomicBool,
    finished: AtomicBool,
    raw: AtomicU16,
    temperature: AtomicU32,
}

impl<I> Max30105Driver<I> {
    /// Static chip information, available without initialization
    pub const fn info() -> DeviceInfo {
        DeviceInfo::MAX30105
    }

    /// Whether [`init()`](Self::init) has completed
    pub fn is_initialized(&self) -> bool {
        self.inited.load(Ordering::Acquire)
    }

    /// Most recent temperature stored by the interrupt handler
    ///
    /// `None` while a conversion started by
    /// [`read_temperature()`](Self::read_temperature) is pending or before the
    /// first conversion.
    pub fn last_temperature(&self) -> Option<DieTemperature> {
        self.finished
            .load(Ordering::Acquire)
            .then(|| self.stored_temperature())
    }

    fn stored_temperature(&self) -> DieTemperature {
        DieTemperature {
            raw: self.raw.load(Ordering::Relaxed),
            celsius: f32::from_bits(self.temperature.load(Ordering::Relaxed)),
        }
    }
}

impl<I> Max30105Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new driver instance
    ///
    /// No bus traffic happens here. Call [`init()`](Self::init) before any
    /// other operation.
    pub fn new(interface: I) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                device: RegisterDevice::new(interface),
                buffer: [0; FIFO_BURST_BYTES],
            })),
            inited: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            raw: AtomicU16::new(0),
            temperature: AtomicU32::new(0),
        }
    }

    /// Verify the part ID, soft reset the chip and empty the FIFO
    ///
    /// On failure the driver stays uninitialized.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PART_ID` register does not read 0x15
    /// - The soft reset bit does not clear within 10 ms
    pub fn init<D>(&self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.inited.store(false, Ordering::Release);

        let part_id = self.locked(|inner| Ok(inner.device.part_id().read()?.part_id()))?;
        if part_id != PART_ID_VALUE {
            #[cfg(feature = "defmt")]
            defmt::warn!("MAX30105: unexpected part ID {=u8:#x}", part_id);
            return Err(Error::InvalidDevice(part_id));
        }

        self.soft_reset(delay)?;

        self.locked(|inner| {
            inner.device.fifo_read_pointer().write(|w| {
                w.set_fifo_rd_ptr(0);
            })?;
            inner.device.fifo_write_pointer().write(|w| {
                w.set_fifo_wr_ptr(0);
            })?;
            inner.device.overflow_counter().write(|w| {
                w.set_ovf_counter(0);
            })?;
            Ok(())
        })?;

        self.inited.store(true, Ordering::Release);

        #[cfg(feature = "defmt")]
        defmt::debug!("MAX30105: initialized");

        Ok(())
    }

    /// Put the chip into shutdown and mark the driver uninitialized
    ///
    /// If the shutdown write fails the driver stays initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or communication fails.
    pub fn deinit(&self) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.mode_config().modify(|w| {
                w.set_shdn(true);
            })?;
            Ok(())
        })?;

        self.inited.store(false, Ordering::Release);
        Ok(())
    }

    /// Soft reset the chip
    ///
    /// All configuration registers return to their power-on values.
    ///
    /// # Errors
    ///
    /// Returns `ResetTimeout` if the reset bit does not clear within 10 ms.
    pub fn reset<D>(&self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.ensure_initialized()?;
        self.soft_reset(delay)
    }

    /// Read the revision and part identification registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_id(&self) -> Result<(u8, u8), Error<I::Error>> {
        self.checked(|device| {
            let revision = device.revision_id().read()?.rev_id();
            let part = device.part_id().read()?.part_id();
            Ok((revision, part))
        })
    }

    /// Read raw bytes starting at `register`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_register(&self, register: u8, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.interface.read_register(register, 8, buffer)?;
            Ok(())
        })
    }

    /// Write raw bytes starting at `register`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_register(&self, register: u8, data: &[u8]) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.interface.write_register(register, 8, data)?;
            Ok(())
        })
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.inner.into_inner().into_inner().device.interface
    }

    // ==================== CONFIGURATION ====================

    /// Apply a complete acquisition profile
    ///
    /// The chip is held in shutdown while the registers are rewritten and woken
    /// once every field is applied.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `fifo_almost_full` exceeds 15, otherwise an
    /// error if communication with the device fails.
    pub fn configure(&self, config: &SensorConfig) -> Result<(), Error<I::Error>> {
        self.ensure_initialized()?;
        if config.fifo_almost_full > FIFO_ALMOST_FULL_MAX {
            return Err(Error::InvalidConfig);
        }

        self.locked(|inner| {
            let device = &mut inner.device;

            device.mode_config().modify(|w| {
                w.set_shdn(true);
            })?;

            device.fifo_config().write(|w| {
                w.set_smp_ave(config.sample_averaging as u8);
                w.set_fifo_roll_over_en(config.fifo_rollover);
                w.set_fifo_a_full(config.fifo_almost_full);
            })?;
            device.mode_config().modify(|w| {
                w.set_mode(config.mode as u8);
            })?;
            device.adc_config().write(|w| {
                w.set_adc_rge(config.adc_range as u8);
                w.set_sr(config.sample_rate as u8);
                w.set_led_pw(config.adc_resolution as u8);
            })?;

            device.led_red_pa().write(|w| {
                w.set_amplitude(config.led_red_amplitude);
            })?;
            device.led_ir_pa().write(|w| {
                w.set_amplitude(config.led_ir_amplitude);
            })?;
            device.led_green_pa().write(|w| {
                w.set_amplitude(config.led_green_amplitude);
            })?;
            device.pilot_pa().write(|w| {
                w.set_amplitude(config.led_proximity_amplitude);
            })?;
            device.prox_int_thresh().write(|w| {
                w.set_prox_int_thresh(ProximityThreshold::to_register(config.proximity_threshold_adc));
            })?;

            device.multi_led_control_1().write(|w| {
                w.set_lower_slot(config.slots[0] as u8);
                w.set_upper_slot(config.slots[1] as u8);
            })?;
            device.multi_led_control_2().write(|w| {
                w.set_lower_slot(config.slots[2] as u8);
                w.set_upper_slot(config.slots[3] as u8);
            })?;

            device.die_temp_config().write(|w| {
                w.set_temp_en(config.die_temperature);
            })?;
            Self::write_interrupt_enables(device, &config.interrupts)?;

            device.mode_config().modify(|w| {
                w.set_shdn(false);
            })?;
            Ok(())
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MAX30105: configured {}", config.mode);

        Ok(())
    }

    /// Set sample averaging
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sample_averaging(&self, averaging: SampleAveraging) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.fifo_config().modify(|w| {
                w.set_smp_ave(averaging as u8);
            })?;
            Ok(())
        })
    }

    /// Get sample averaging
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn sample_averaging(&self) -> Result<SampleAveraging, Error<I::Error>> {
        self.checked(|device| Ok(SampleAveraging::from_bits(device.fifo_config().read()?.smp_ave())))
    }

    /// Enable or disable FIFO rollover when full
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_fifo_rollover(&self, enable: bool) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.fifo_config().modify(|w| {
                w.set_fifo_roll_over_en(enable);
            })?;
            Ok(())
        })
    }

    /// Whether FIFO rollover is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_rollover(&self) -> Result<bool, Error<I::Error>> {
        self.checked(|device| Ok(device.fifo_config().read()?.fifo_roll_over_en()))
    }

    /// Set the FIFO almost-full threshold
    ///
    /// The interrupt fires when `32 - threshold` slots remain free.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for values above 15 without touching the bus.
    pub fn set_fifo_almost_full(&self, threshold: u8) -> Result<(), Error<I::Error>> {
        self.ensure_initialized()?;
        if threshold > FIFO_ALMOST_FULL_MAX {
            return Err(Error::InvalidConfig);
        }
        self.locked(|inner| {
            inner.device.fifo_config().modify(|w| {
                w.set_fifo_a_full(threshold);
            })?;
            Ok(())
        })
    }

    /// Get the FIFO almost-full threshold
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_almost_full(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.fifo_config().read()?.fifo_a_full()))
    }

    /// Enter or leave power-save shutdown
    ///
    /// Register contents survive shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_shutdown(&self, enable: bool) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.mode_config().modify(|w| {
                w.set_shdn(enable);
            })?;
            Ok(())
        })
    }

    /// Whether the chip is in shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn shutdown(&self) -> Result<bool, Error<I::Error>> {
        self.checked(|device| Ok(device.mode_config().read()?.shdn()))
    }

    /// Set the acquisition mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_mode(&self, mode: Mode) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.mode_config().modify(|w| {
                w.set_mode(mode as u8);
            })?;
            Ok(())
        })
    }

    /// Get the acquisition mode
    ///
    /// # Errors
    ///
    /// Returns `InvalidMode` if the register holds a reserved value.
    pub fn mode(&self) -> Result<Mode, Error<I::Error>> {
        self.checked(|device| {
            let raw = device.mode_config().read()?.mode();
            Mode::from_bits(raw).ok_or(Error::InvalidMode(raw))
        })
    }

    /// Set the ADC full-scale range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_adc_range(&self, range: AdcRange) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.adc_config().modify(|w| {
                w.set_adc_rge(range as u8);
            })?;
            Ok(())
        })
    }

    /// Get the ADC full-scale range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn adc_range(&self) -> Result<AdcRange, Error<I::Error>> {
        self.checked(|device| Ok(AdcRange::from_bits(device.adc_config().read()?.adc_rge())))
    }

    /// Set the sample rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sample_rate(&self, rate: SampleRate) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.adc_config().modify(|w| {
                w.set_sr(rate as u8);
            })?;
            Ok(())
        })
    }

    /// Get the sample rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn sample_rate(&self) -> Result<SampleRate, Error<I::Error>> {
        self.checked(|device| Ok(SampleRate::from_bits(device.adc_config().read()?.sr())))
    }

    /// Set the ADC resolution (LED pulse width)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_adc_resolution(&self, resolution: AdcResolution) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.adc_config().modify(|w| {
                w.set_led_pw(resolution as u8);
            })?;
            Ok(())
        })
    }

    /// Get the ADC resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn adc_resolution(&self) -> Result<AdcResolution, Error<I::Error>> {
        self.checked(|device| Ok(AdcResolution::from_bits(device.adc_config().read()?.led_pw())))
    }

    /// Set the red LED pulse amplitude (raw register value)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_led_red_amplitude(&self, amplitude: u8) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.led_red_pa().write(|w| {
                w.set_amplitude(amplitude);
            })?;
            Ok(())
        })
    }

    /// Get the red LED pulse amplitude
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn led_red_amplitude(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.led_red_pa().read()?.amplitude()))
    }

    /// Set the IR LED pulse amplitude (raw register value)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_led_ir_amplitude(&self, amplitude: u8) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.led_ir_pa().write(|w| {
                w.set_amplitude(amplitude);
            })?;
            Ok(())
        })
    }

    /// Get the IR LED pulse amplitude
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn led_ir_amplitude(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.led_ir_pa().read()?.amplitude()))
    }

    /// Set the green LED pulse amplitude (raw register value)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_led_green_amplitude(&self, amplitude: u8) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.led_green_pa().write(|w| {
                w.set_amplitude(amplitude);
            })?;
            Ok(())
        })
    }

    /// Get the green LED pulse amplitude
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn led_green_amplitude(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.led_green_pa().read()?.amplitude()))
    }

    /// Set the proximity (pilot) pulse amplitude (raw register value)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_led_proximity_amplitude(&self, amplitude: u8) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.pilot_pa().write(|w| {
                w.set_amplitude(amplitude);
            })?;
            Ok(())
        })
    }

    /// Get the proximity (pilot) pulse amplitude
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn led_proximity_amplitude(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.pilot_pa().read()?.amplitude()))
    }

    /// Assign an LED to a multi-LED time slot
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_slot(&self, slot: Slot, led: Led) -> Result<(), Error<I::Error>> {
        let bits = led as u8;
        self.checked(|device| {
            match slot {
                Slot::Slot1 => device.multi_led_control_1().modify(|w| {
                    w.set_lower_slot(bits);
                })?,
                Slot::Slot2 => device.multi_led_control_1().modify(|w| {
                    w.set_upper_slot(bits);
                })?,
                Slot::Slot3 => device.multi_led_control_2().modify(|w| {
                    w.set_lower_slot(bits);
                })?,
                Slot::Slot4 => device.multi_led_control_2().modify(|w| {
                    w.set_upper_slot(bits);
                })?,
            }
            Ok(())
        })
    }

    /// Get the LED assigned to a time slot
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn slot(&self, slot: Slot) -> Result<Led, Error<I::Error>> {
        self.checked(|device| {
            let bits = match slot {
                Slot::Slot1 => device.multi_led_control_1().read()?.lower_slot(),
                Slot::Slot2 => device.multi_led_control_1().read()?.upper_slot(),
                Slot::Slot3 => device.multi_led_control_2().read()?.lower_slot(),
                Slot::Slot4 => device.multi_led_control_2().read()?.upper_slot(),
            };
            Ok(Led::from_bits(bits))
        })
    }

    /// Set the die temperature enable bit
    ///
    /// Setting it starts one conversion; the chip clears it when done. Use
    /// [`read_temperature()`](Self::read_temperature) for a complete reading.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_die_temperature(&self, enable: bool) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.die_temp_config().modify(|w| {
                w.set_temp_en(enable);
            })?;
            Ok(())
        })
    }

    /// Whether a die temperature conversion is pending
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn die_temperature(&self) -> Result<bool, Error<I::Error>> {
        self.checked(|device| Ok(device.die_temp_config().read()?.temp_en()))
    }

    /// Set the proximity interrupt threshold (raw register value)
    ///
    /// See [`ProximityThreshold`] for the ADC count conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_proximity_threshold(&self, threshold: u8) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.prox_int_thresh().write(|w| {
                w.set_prox_int_thresh(threshold);
            })?;
            Ok(())
        })
    }

    /// Get the proximity interrupt threshold (raw register value)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn proximity_threshold(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.prox_int_thresh().read()?.prox_int_thresh()))
    }

    // ==================== INTERRUPTS ====================

    /// Enable or disable a single interrupt source
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_interrupt(&self, source: InterruptSource, enable: bool) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            match source {
                InterruptSource::FifoAlmostFull => device.int_enable_1().modify(|w| {
                    w.set_a_full_en(enable);
                })?,
                InterruptSource::DataReady => device.int_enable_1().modify(|w| {
                    w.set_ppg_rdy_en(enable);
                })?,
                InterruptSource::AlcOverflow => device.int_enable_1().modify(|w| {
                    w.set_alc_ovf_en(enable);
                })?,
                InterruptSource::Proximity => device.int_enable_1().modify(|w| {
                    w.set_prox_int_en(enable);
                })?,
                InterruptSource::DieTemperatureReady => device.int_enable_2().modify(|w| {
                    w.set_die_temp_rdy_en(enable);
                })?,
            }
            Ok(())
        })
    }

    /// Whether an interrupt source is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_enabled(&self, source: InterruptSource) -> Result<bool, Error<I::Error>> {
        self.checked(|device| {
            let enabled = match source {
                InterruptSource::FifoAlmostFull => device.int_enable_1().read()?.a_full_en(),
                InterruptSource::DataReady => device.int_enable_1().read()?.ppg_rdy_en(),
                InterruptSource::AlcOverflow => device.int_enable_1().read()?.alc_ovf_en(),
                InterruptSource::Proximity => device.int_enable_1().read()?.prox_int_en(),
                InterruptSource::DieTemperatureReady => device.int_enable_2().read()?.die_temp_rdy_en(),
            };
            Ok(enabled)
        })
    }

    /// Write both interrupt enable registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure_interrupts(&self, config: &InterruptConfig) -> Result<(), Error<I::Error>> {
        self.checked(|device| Self::write_interrupt_enables(device, config))
    }

    /// Read one interrupt flag
    ///
    /// Reading a status register clears all of its flags, so events pending in
    /// the same register are lost to a later [`irq_handler()`](Self::irq_handler).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_status(&self, event: InterruptEvent) -> Result<bool, Error<I::Error>> {
        self.checked(|device| {
            let set = match event {
                InterruptEvent::FifoAlmostFull => device.int_status_1().read()?.a_full(),
                InterruptEvent::DataReady => device.int_status_1().read()?.ppg_rdy(),
                InterruptEvent::AlcOverflow => device.int_status_1().read()?.alc_ovf(),
                InterruptEvent::Proximity => device.int_status_1().read()?.prox_int(),
                InterruptEvent::PowerReady => device.int_status_1().read()?.pwr_rdy(),
                InterruptEvent::DieTemperatureReady => device.int_status_2().read()?.die_temp_rdy(),
            };
            Ok(set)
        })
    }

    /// Service the INT pin
    ///
    /// Reads status 1 and reports its flags to `on_event` in the order FIFO
    /// almost full, data ready, ALC overflow, proximity, power ready. Then reads
    /// status 2; when a die temperature conversion finished, the result is
    /// stored for [`read_temperature()`](Self::read_temperature) before
    /// `on_event(DieTemperatureReady)` runs.
    ///
    /// `on_event` runs outside the bus lock.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn irq_handler<F>(&self, mut on_event: F) -> Result<InterruptStatus, Error<I::Error>>
    where
        F: FnMut(InterruptEvent),
    {
        let mut status = self.checked(|device| {
            let mut status1 = [0u8];
            device
                .interface
                .read_register(INT_STATUS_1_ADDRESS, 8, &mut status1)?;
            Ok(InterruptStatus::from_registers(status1[0], 0))
        })?;
        status.events().for_each(&mut on_event);

        let reading = self.locked(|inner| {
            if !inner.device.int_status_2().read()?.die_temp_rdy() {
                return Ok(None);
            }
            let integer = inner.device.die_temp_integer().read()?.tint();
            let fraction = inner.device.die_temp_fraction().read()?.tfrac();
            Ok(Some(DieTemperature::from_registers(integer, fraction)))
        })?;

        if let Some(reading) = reading {
            self.raw.store(reading.raw, Ordering::Relaxed);
            self.temperature.store(reading.celsius.to_bits(), Ordering::Relaxed);
            self.finished.store(true, Ordering::Release);
            status.die_temperature_ready = true;
            on_event(InterruptEvent::DieTemperatureReady);
        }

        Ok(status)
    }

    // ==================== TEMPERATURE ====================

    /// Run one die temperature conversion and wait for it
    ///
    /// Enables the die temperature interrupt if needed and starts a conversion.
    /// Completion is signalled only by [`irq_handler()`](Self::irq_handler),
    /// so the INT pin handler must be running. `delay` is called once per
    /// millisecond for at most 5 s, without holding the bus lock.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if no conversion result arrives within 5 s.
    pub fn read_temperature<D>(&self, delay: &mut D) -> Result<DieTemperature, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.checked(|device| {
            if !device.int_enable_2().read()?.die_temp_rdy_en() {
                device.int_enable_2().modify(|w| {
                    w.set_die_temp_rdy_en(true);
                })?;
            }
            self.finished.store(false, Ordering::Release);
            device.die_temp_config().modify(|w| {
                w.set_temp_en(true);
            })?;
            Ok(())
        })?;

        for _ in 0..TEMPERATURE_TIMEOUT_MS {
            if self.finished.load(Ordering::Acquire) {
                return Ok(self.stored_temperature());
            }
            delay.delay_ms(1);
        }
        if self.finished.load(Ordering::Acquire) {
            return Ok(self.stored_temperature());
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("MAX30105: die temperature conversion timed out");

        Err(Error::Timeout)
    }

    // ==================== FIFO ====================

    /// Drain up to `max_samples` samples from the FIFO
    ///
    /// The request is clamped to what the chip holds; an empty FIFO yields an
    /// empty readout. A nonzero overflow counter is reported through
    /// [`FifoReadout::overrun`] while the drained samples are still returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMode` if the mode register holds a reserved value,
    /// otherwise an error if communication with the device fails.
    pub fn read_fifo(&self, max_samples: u8) -> Result<FifoReadout, Error<I::Error>> {
        self.ensure_initialized()?;

        self.locked(|inner| {
            let Inner { device, buffer } = inner;

            let overrun = device.overflow_counter().read()?.ovf_counter() != 0;
            if overrun {
                #[cfg(feature = "defmt")]
                defmt::warn!("MAX30105: FIFO overrun");
            }

            let read_pointer = device.fifo_read_pointer().read()?.fifo_rd_ptr();
            let write_pointer = device.fifo_write_pointer().read()?.fifo_wr_ptr();
            let count = max_samples.min(available_samples(write_pointer, read_pointer));

            let raw_mode = device.mode_config().read()?.mode();
            let Some(mode) = Mode::from_bits(raw_mode) else {
                #[cfg(feature = "defmt")]
                defmt::warn!("MAX30105: invalid mode {=u8}", raw_mode);
                return Err(Error::InvalidMode(raw_mode));
            };

            if count == 0 {
                return Ok(FifoReadout {
                    samples: heapless::Vec::new(),
                    overrun,
                });
            }

            let layout = ChannelLayout::from(mode);
            let data = &mut buffer[..usize::from(count) * layout.bytes_per_sample];
            device.interface.read_register(FIFO_DATA_ADDRESS, 8, data)?;

            let resolution = AdcResolution::from_bits(device.adc_config().read()?.led_pw());
            let samples = SampleParser::new(layout, resolution)
                .parse(data)
                .map_err(|e| e.widen())?;

            #[cfg(feature = "defmt")]
            defmt::trace!("MAX30105: drained {} samples", samples.len());

            Ok(FifoReadout { samples, overrun })
        })
    }

    /// Set the FIFO write pointer
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for values above 0x1F without touching the bus.
    pub fn set_fifo_write_pointer(&self, pointer: u8) -> Result<(), Error<I::Error>> {
        self.ensure_initialized()?;
        let pointer = check_pointer(pointer).map_err(|e| e.widen())?;
        self.locked(|inner| {
            inner.device.fifo_write_pointer().write(|w| {
                w.set_fifo_wr_ptr(pointer);
            })?;
            Ok(())
        })
    }

    /// Get the FIFO write pointer
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_write_pointer(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.fifo_write_pointer().read()?.fifo_wr_ptr()))
    }

    /// Set the FIFO read pointer
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for values above 0x1F without touching the bus.
    pub fn set_fifo_read_pointer(&self, pointer: u8) -> Result<(), Error<I::Error>> {
        self.ensure_initialized()?;
        let pointer = check_pointer(pointer).map_err(|e| e.widen())?;
        self.locked(|inner| {
            inner.device.fifo_read_pointer().write(|w| {
                w.set_fifo_rd_ptr(pointer);
            })?;
            Ok(())
        })
    }

    /// Get the FIFO read pointer
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_read_pointer(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.fifo_read_pointer().read()?.fifo_rd_ptr()))
    }

    /// Set the overflow counter
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for values above 0x1F without touching the bus.
    pub fn set_overflow_counter(&self, count: u8) -> Result<(), Error<I::Error>> {
        self.ensure_initialized()?;
        let count = check_pointer(count).map_err(|e| e.widen())?;
        self.locked(|inner| {
            inner.device.overflow_counter().write(|w| {
                w.set_ovf_counter(count);
            })?;
            Ok(())
        })
    }

    /// Get the overflow counter
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn overflow_counter(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.overflow_counter().read()?.ovf_counter()))
    }

    /// Write one byte to the FIFO data register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_fifo_data(&self, data: u8) -> Result<(), Error<I::Error>> {
        self.checked(|device| {
            device.fifo_data().write(|w| {
                w.set_fifo_data(data);
            })?;
            Ok(())
        })
    }

    /// Read one byte from the FIFO data register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_data(&self) -> Result<u8, Error<I::Error>> {
        self.checked(|device| Ok(device.fifo_data().read()?.fifo_data()))
    }

    // ==================== INTERNALS ====================

    fn ensure_initialized(&self) -> Result<(), Error<I::Error>> {
        if self.inited.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Run `f` with the bus locked
    fn locked<R>(
        &self,
        f: impl FnOnce(&mut Inner<I>) -> Result<R, Error<I::Error>>,
    ) -> Result<R, Error<I::Error>> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            f(&mut inner)
        })
    }

    /// Check initialization, then run `f` on the register device with the bus locked
    fn checked<R>(
        &self,
        f: impl FnOnce(&mut RegisterDevice<I>) -> Result<R, Error<I::Error>>,
    ) -> Result<R, Error<I::Error>> {
        self.ensure_initialized()?;
        self.locked(|inner| f(&mut inner.device))
    }

    fn soft_reset<D>(&self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.locked(|inner| {
            inner.device.mode_config().modify(|w| {
                w.set_soft_reset(true);
            })?;
            Ok(())
        })?;

        for _ in 0..(RESET_TIMEOUT_MS / POLL_INTERVAL_MS) {
            delay.delay_ms(POLL_INTERVAL_MS);
            if !self.locked(|inner| Ok(inner.device.mode_config().read()?.soft_reset()))? {
                return Ok(());
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("MAX30105: soft reset did not complete");

        Err(Error::ResetTimeout)
    }

    fn write_interrupt_enables(
        device: &mut RegisterDevice<I>,
        config: &InterruptConfig,
    ) -> Result<(), Error<I::Error>> {
        device.int_enable_1().write(|w| {
            w.set_a_full_en(config.fifo_almost_full);
            w.set_ppg_rdy_en(config.data_ready);
            w.set_alc_ovf_en(config.alc_overflow);
            w.set_prox_int_en(config.proximity);
        })?;
        device.int_enable_2().write(|w| {
            w.set_die_temp_rdy_en(config.die_temperature_ready);
        })?;
        Ok(())
    }
}
