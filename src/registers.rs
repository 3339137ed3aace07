//! Register definitions for the MAX30105
//!
//! The MAX30105 exposes a flat map of 8-bit registers. Every field below maps
//! one-to-one onto the bit layout from the datasheet register table.
//!
//! ## Register groups
//! - **0x00-0x03**: Interrupt status and enable
//! - **0x04-0x07**: FIFO ring pointers, overflow counter and data port
//! - **0x08-0x0A**: FIFO, mode and particle-sensing (ADC) configuration
//! - **0x0C-0x12**: LED pulse amplitudes and multi-LED slot control
//! - **0x1F-0x21**: Die temperature
//! - **0x30**: Proximity interrupt threshold
//! - **0xFE-0xFF**: Revision and part identification

device_driver::create_device!(
    device_name: Max30105,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        // ==================== INTERRUPTS ====================

        /// INTERRUPT STATUS 1 (0x00)
        /// Flags are cleared by reading the register.
        register IntStatus1 {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;

            /// Power ready (set after power-up or brownout)
            pwr_rdy: bool = 0,
            reserved_3_1: uint = 1..4,
            /// Proximity threshold triggered
            prox_int: bool = 4,
            /// Ambient light cancellation overflow
            alc_ovf: bool = 5,
            /// New FIFO data ready
            ppg_rdy: bool = 6,
            /// FIFO almost full
            a_full: bool = 7,
        },

        /// INTERRUPT STATUS 2 (0x01)
        register IntStatus2 {
            const ADDRESS = 0x01;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Die temperature conversion finished
            die_temp_rdy: bool = 1,
            reserved_7_2: uint = 2..8,
        },

        /// INTERRUPT ENABLE 1 (0x02)
        register IntEnable1 {
            const ADDRESS = 0x02;
            const SIZE_BITS = 8;

            reserved_3_0: uint = 0..4,
            /// Proximity interrupt enable
            prox_int_en: bool = 4,
            /// ALC overflow interrupt enable
            alc_ovf_en: bool = 5,
            /// New FIFO data ready interrupt enable
            ppg_rdy_en: bool = 6,
            /// FIFO almost full interrupt enable
            a_full_en: bool = 7,
        },

        /// INTERRUPT ENABLE 2 (0x03)
        register IntEnable2 {
            const ADDRESS = 0x03;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Die temperature ready interrupt enable
            die_temp_rdy_en: bool = 1,
            reserved_7_2: uint = 2..8,
        },

        // ==================== FIFO ====================

        /// FIFO_WR_PTR (0x04)
        /// Points to the slot where the device writes the next sample.
        register FifoWritePointer {
            const ADDRESS = 0x04;
            const SIZE_BITS = 8;

            fifo_wr_ptr: uint = 0..5,
            reserved_7_5: uint = 5..8,
        },

        /// OVF_COUNTER (0x05)
        /// Counts samples lost while the FIFO was full. Saturates at 0x1F.
        register OverflowCounter {
            const ADDRESS = 0x05;
            const SIZE_BITS = 8;

            ovf_counter: uint = 0..5,
            reserved_7_5: uint = 5..8,
        },

        /// FIFO_RD_PTR (0x06)
        register FifoReadPointer {
            const ADDRESS = 0x06;
            const SIZE_BITS = 8;

            fifo_rd_ptr: uint = 0..5,
            reserved_7_5: uint = 5..8,
        },

        /// FIFO_DATA (0x07)
        /// Reading this register does not advance the register address; burst
        /// reads keep returning successive FIFO bytes.
        register FifoData {
            const ADDRESS = 0x07;
            const SIZE_BITS = 8;

            fifo_data: uint = 0..8,
        },

        // ==================== CONFIGURATION ====================

        /// FIFO CONFIGURATION (0x08)
        register FifoConfig {
            const ADDRESS = 0x08;
            const SIZE_BITS = 8;

            /// Almost-full threshold: interrupt when `32 - value` slots remain
            fifo_a_full: uint = 0..4,
            /// Overwrite oldest samples when full
            fifo_roll_over_en: bool = 4,
            /// Sample averaging (0=1, 1=2, 2=4, 3=8, 4=16, 5..7=32)
            smp_ave: uint = 5..8,
        },

        /// MODE CONFIGURATION (0x09)
        register ModeConfig {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// LED mode (2=red, 3=red+IR, 7=multi-LED green+red+IR)
            mode: uint = 0..3,
            reserved_5_3: uint = 3..6,
            /// Soft reset, self-clearing
            soft_reset: bool = 6,
            /// Power-save shutdown
            shdn: bool = 7,
        },

        /// PARTICLE-SENSING CONFIGURATION (0x0A)
        register AdcConfig {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// LED pulse width, which fixes the ADC resolution (0=15 bit .. 3=18 bit)
            led_pw: uint = 0..2,
            /// Sample rate (0=50 Hz .. 7=3200 Hz)
            sr: uint = 2..5,
            /// ADC full-scale range (0=2048 nA .. 3=16384 nA)
            adc_rge: uint = 5..7,
            reserved_7: uint = 7..8,
        },

        // ==================== LEDS ====================

        /// LED1_PA (0x0C) - red
        register LedRedPa {
            const ADDRESS = 0x0C;
            const SIZE_BITS = 8;

            amplitude: uint = 0..8,
        },

        /// LED2_PA (0x0D) - IR
        register LedIrPa {
            const ADDRESS = 0x0D;
            const SIZE_BITS = 8;

            amplitude: uint = 0..8,
        },

        /// LED3_PA (0x0E) - green
        register LedGreenPa {
            const ADDRESS = 0x0E;
            const SIZE_BITS = 8;

            amplitude: uint = 0..8,
        },

        /// PILOT_PA (0x10) - proximity mode amplitude
        register PilotPa {
            const ADDRESS = 0x10;
            const SIZE_BITS = 8;

            amplitude: uint = 0..8,
        },

        /// MULTI-LED MODE CONTROL 1 (0x11) - slots 1 and 2
        register MultiLedControl1 {
            const ADDRESS = 0x11;
            const SIZE_BITS = 8;

            lower_slot: uint = 0..3,
            reserved_3: uint = 3..4,
            upper_slot: uint = 4..7,
            reserved_7: uint = 7..8,
        },

        /// MULTI-LED MODE CONTROL 2 (0x12) - slots 3 and 4
        register MultiLedControl2 {
            const ADDRESS = 0x12;
            const SIZE_BITS = 8;

            lower_slot: uint = 0..3,
            reserved_3: uint = 3..4,
            upper_slot: uint = 4..7,
            reserved_7: uint = 7..8,
        },

        // ==================== TEMPERATURE ====================

        /// DIE TEMPERATURE INTEGER (0x1F), two's complement degrees
        register DieTempInteger {
            const ADDRESS = 0x1F;
            const SIZE_BITS = 8;

            tint: uint = 0..8,
        },

        /// DIE TEMPERATURE FRACTION (0x20), 0.0625 degree steps
        register DieTempFraction {
            const ADDRESS = 0x20;
            const SIZE_BITS = 8;

            tfrac: uint = 0..4,
            reserved_7_4: uint = 4..8,
        },

        /// DIE TEMPERATURE CONFIG (0x21)
        register DieTempConfig {
            const ADDRESS = 0x21;
            const SIZE_BITS = 8;

            /// Start a single conversion, self-clearing
            temp_en: bool = 0,
            reserved_7_1: uint = 1..8,
        },

        // ==================== PROXIMITY ====================

        /// PROX_INT_THRESH (0x30)
        register ProxIntThresh {
            const ADDRESS = 0x30;
            const SIZE_BITS = 8;

            prox_int_thresh: uint = 0..8,
        },

        // ==================== IDENTIFICATION ====================

        /// REVISION ID (0xFE)
        register RevisionId {
            const ADDRESS = 0xFE;
            const SIZE_BITS = 8;

            rev_id: uint = 0..8,
        },

        /// PART ID (0xFF)
        /// Expected value: 0x15
        register PartId {
            const ADDRESS = 0xFF;
            const SIZE_BITS = 8;

            part_id: uint = 0..8,
        },
    }
);

/// Interrupt status 1 register address, read raw by the dispatcher
pub const INT_STATUS_1_ADDRESS: u8 = 0x00;

/// FIFO data register address, used for burst reads that bypass the field API
pub const FIFO_DATA_ADDRESS: u8 = 0x07;

pub use Max30105 as RegisterDevice;
