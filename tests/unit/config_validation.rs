//! Unit tests for configuration setters, getters and argument validation

use crate::common::{create_initialized_driver, reg};
use max30105::{
    AdcRange, AdcResolution, Error, Led, Mode, SampleAveraging, SampleRate, SensorConfig, Slot,
};

#[test]
fn test_adc_range_round_trip() {
    let (driver, _interface) = create_initialized_driver();

    for range in [
        AdcRange::Na2048,
        AdcRange::Na4096,
        AdcRange::Na8192,
        AdcRange::Na16384,
    ] {
        driver.set_adc_range(range).unwrap();
        assert_eq!(driver.adc_range().unwrap(), range);
    }
}

#[test]
fn test_sample_rate_round_trip() {
    let (driver, _interface) = create_initialized_driver();

    for bits in 0..8 {
        let rate = SampleRate::from_bits(bits);
        driver.set_sample_rate(rate).unwrap();
        assert_eq!(driver.sample_rate().unwrap(), rate);
    }
}

#[test]
fn test_adc_resolution_round_trip() {
    let (driver, _interface) = create_initialized_driver();

    for resolution in [
        AdcResolution::Bits15,
        AdcResolution::Bits16,
        AdcResolution::Bits17,
        AdcResolution::Bits18,
    ] {
        driver.set_adc_resolution(resolution).unwrap();
        assert_eq!(driver.adc_resolution().unwrap(), resolution);
    }
}

#[test]
fn test_adc_fields_do_not_clobber_each_other() {
    let (driver, interface) = create_initialized_driver();

    driver.set_adc_range(AdcRange::Na16384).unwrap();
    driver.set_sample_rate(SampleRate::Hz3200).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits16).unwrap();

    // range 0b11 << 5, rate 0b111 << 2, pulse width 0b01
    assert_eq!(interface.get_register(reg::ADC_CONFIG), 0x7D);

    driver.set_sample_rate(SampleRate::Hz50).unwrap();
    assert_eq!(interface.get_register(reg::ADC_CONFIG), 0x61);
}

#[test]
fn test_setter_is_read_modify_write() {
    let (driver, interface) = create_initialized_driver();
    interface.set_register(reg::FIFO_CONFIG, 0x1F);

    driver.set_sample_averaging(SampleAveraging::Avg4).unwrap();

    assert_eq!(interface.get_register(reg::FIFO_CONFIG), 0x5F);
    assert_eq!(interface.touched(), vec![reg::FIFO_CONFIG, reg::FIFO_CONFIG]);
}

#[test]
fn test_saturated_averaging_reads_as_32() {
    let (driver, interface) = create_initialized_driver();

    for raw in [5u8, 6, 7] {
        interface.set_register(reg::FIFO_CONFIG, raw << 5);
        assert_eq!(driver.sample_averaging().unwrap(), SampleAveraging::Avg32);
    }
}

#[test]
fn test_fifo_config_fields() {
    let (driver, interface) = create_initialized_driver();

    driver.set_fifo_rollover(true).unwrap();
    driver.set_fifo_almost_full(0x0A).unwrap();

    assert!(driver.fifo_rollover().unwrap());
    assert_eq!(driver.fifo_almost_full().unwrap(), 0x0A);
    assert_eq!(interface.get_register(reg::FIFO_CONFIG), 0x1A);
}

#[test]
fn test_almost_full_rejects_out_of_range_without_bus_access() {
    let (driver, interface) = create_initialized_driver();

    assert_eq!(driver.set_fifo_almost_full(0x10), Err(Error::InvalidConfig));
    assert_eq!(interface.transaction_count(), 0);
}

#[test]
fn test_pointer_setters_reject_out_of_range_without_bus_access() {
    let (driver, interface) = create_initialized_driver();

    for value in [0x20u8, 0x21, 0x80, 0xFF] {
        assert_eq!(driver.set_fifo_write_pointer(value), Err(Error::InvalidConfig));
        assert_eq!(driver.set_fifo_read_pointer(value), Err(Error::InvalidConfig));
        assert_eq!(driver.set_overflow_counter(value), Err(Error::InvalidConfig));
    }

    assert_eq!(interface.transaction_count(), 0);
}

#[test]
fn test_pointer_setters_accept_upper_bound() {
    let (driver, _interface) = create_initialized_driver();

    driver.set_fifo_write_pointer(0x1F).unwrap();
    driver.set_fifo_read_pointer(0x1F).unwrap();
    driver.set_overflow_counter(0x1F).unwrap();

    assert_eq!(driver.fifo_write_pointer().unwrap(), 0x1F);
    assert_eq!(driver.fifo_read_pointer().unwrap(), 0x1F);
    assert_eq!(driver.overflow_counter().unwrap(), 0x1F);
}

#[test]
fn test_pointer_getters_mask_reserved_bits() {
    let (driver, interface) = create_initialized_driver();
    interface.set_register(reg::FIFO_WR_PTR, 0xE3);
    interface.set_register(reg::OVF_COUNTER, 0xFF);

    assert_eq!(driver.fifo_write_pointer().unwrap(), 0x03);
    assert_eq!(driver.overflow_counter().unwrap(), 0x1F);
}

#[test]
fn test_mode_round_trip_and_invalid_value() {
    let (driver, interface) = create_initialized_driver();

    for mode in [Mode::Red, Mode::RedIr, Mode::GreenRedIr] {
        driver.set_mode(mode).unwrap();
        assert_eq!(driver.mode().unwrap(), mode);
    }

    interface.set_register(reg::MODE_CONFIG, 0x05);
    assert_eq!(driver.mode(), Err(Error::InvalidMode(0x05)));
}

#[test]
fn test_shutdown_keeps_mode() {
    let (driver, interface) = create_initialized_driver();

    driver.set_mode(Mode::RedIr).unwrap();
    driver.set_shutdown(true).unwrap();

    assert!(driver.shutdown().unwrap());
    assert_eq!(interface.get_register(reg::MODE_CONFIG), 0x83);

    driver.set_shutdown(false).unwrap();
    assert!(!driver.shutdown().unwrap());
    assert_eq!(driver.mode().unwrap(), Mode::RedIr);
}

#[test]
fn test_led_amplitudes_land_in_their_registers() {
    let (driver, interface) = create_initialized_driver();

    driver.set_led_red_amplitude(0x11).unwrap();
    driver.set_led_ir_amplitude(0x22).unwrap();
    driver.set_led_green_amplitude(0x33).unwrap();
    driver.set_led_proximity_amplitude(0xFF).unwrap();

    assert_eq!(interface.get_register(reg::LED1_PA), 0x11);
    assert_eq!(interface.get_register(reg::LED2_PA), 0x22);
    assert_eq!(interface.get_register(reg::LED3_PA), 0x33);
    assert_eq!(interface.get_register(reg::PILOT_PA), 0xFF);

    assert_eq!(driver.led_red_amplitude().unwrap(), 0x11);
    assert_eq!(driver.led_ir_amplitude().unwrap(), 0x22);
    assert_eq!(driver.led_green_amplitude().unwrap(), 0x33);
    assert_eq!(driver.led_proximity_amplitude().unwrap(), 0xFF);
}

#[test]
fn test_slots_pack_two_per_register() {
    let (driver, interface) = create_initialized_driver();

    driver.set_slot(Slot::Slot1, Led::Red).unwrap();
    driver.set_slot(Slot::Slot2, Led::IrPilot).unwrap();
    driver.set_slot(Slot::Slot3, Led::Green).unwrap();
    driver.set_slot(Slot::Slot4, Led::GreenPilot).unwrap();

    assert_eq!(interface.get_register(reg::MULTI_LED_1), 0x61);
    assert_eq!(interface.get_register(reg::MULTI_LED_2), 0x73);

    assert_eq!(driver.slot(Slot::Slot1).unwrap(), Led::Red);
    assert_eq!(driver.slot(Slot::Slot2).unwrap(), Led::IrPilot);
    assert_eq!(driver.slot(Slot::Slot3).unwrap(), Led::Green);
    assert_eq!(driver.slot(Slot::Slot4).unwrap(), Led::GreenPilot);
}

#[test]
fn test_reserved_slot_value_reads_as_none() {
    let (driver, interface) = create_initialized_driver();
    interface.set_register(reg::MULTI_LED_1, 0x04);

    assert_eq!(driver.slot(Slot::Slot1).unwrap(), Led::None);
}

#[test]
fn test_proximity_threshold_and_die_temperature_bits() {
    let (driver, interface) = create_initialized_driver();

    driver.set_proximity_threshold(0x42).unwrap();
    assert_eq!(driver.proximity_threshold().unwrap(), 0x42);

    driver.set_die_temperature(true).unwrap();
    assert!(driver.die_temperature().unwrap());
    assert_eq!(interface.get_register(reg::TEMP_CONFIG), 0x01);
}

#[test]
fn test_configure_default_profile() {
    let (driver, interface) = create_initialized_driver();

    driver.configure(&SensorConfig::default()).unwrap();

    assert_eq!(interface.get_register(reg::FIFO_CONFIG), 0x7F);
    assert_eq!(interface.get_register(reg::MODE_CONFIG), 0x07);
    assert_eq!(interface.get_register(reg::ADC_CONFIG), 0x27);
    assert_eq!(interface.get_register(reg::LED1_PA), 0x7F);
    assert_eq!(interface.get_register(reg::LED2_PA), 0x7F);
    assert_eq!(interface.get_register(reg::LED3_PA), 0x7F);
    assert_eq!(interface.get_register(reg::PILOT_PA), 0x7F);
    assert_eq!(interface.get_register(reg::PROX_INT_THRESH), 0x01);
    assert_eq!(interface.get_register(reg::MULTI_LED_1), 0x21);
    assert_eq!(interface.get_register(reg::MULTI_LED_2), 0x03);
    assert_eq!(interface.get_register(reg::TEMP_CONFIG), 0x00);
    assert_eq!(interface.get_register(reg::INT_ENABLE_1), 0xB0);
    assert_eq!(interface.get_register(reg::INT_ENABLE_2), 0x02);
}

#[test]
fn test_configure_brackets_writes_with_shutdown() {
    let (driver, interface) = create_initialized_driver();

    driver.configure(&SensorConfig::default()).unwrap();

    assert_eq!(interface.writes_to(reg::MODE_CONFIG), vec![0x80, 0x87, 0x07]);

    let touched = interface.touched();
    let first_other = touched.iter().position(|a| *a == reg::FIFO_CONFIG).unwrap();
    let last_mode = touched.iter().rposition(|a| *a == reg::MODE_CONFIG).unwrap();
    assert_eq!(touched[0], reg::MODE_CONFIG);
    assert!(first_other < last_mode);
    assert!(touched.contains(&reg::INT_ENABLE_2));
}

#[test]
fn test_configure_rejects_bad_almost_full_without_bus_access() {
    let (driver, interface) = create_initialized_driver();

    let config = SensorConfig {
        fifo_almost_full: 16,
        ..Default::default()
    };
    assert_eq!(driver.configure(&config), Err(Error::InvalidConfig));
    assert_eq!(interface.transaction_count(), 0);
}

#[test]
fn test_configure_truncates_proximity_threshold() {
    let (driver, interface) = create_initialized_driver();

    let config = SensorConfig {
        proximity_threshold_adc: 2000,
        ..Default::default()
    };
    driver.configure(&config).unwrap();
    assert_eq!(interface.get_register(reg::PROX_INT_THRESH), 1);
}

#[test]
fn test_configure_saturates_large_proximity_threshold() {
    let (driver, interface) = create_initialized_driver();

    let config = SensorConfig {
        proximity_threshold_adc: 261_888,
        ..Default::default()
    };
    driver.configure(&config).unwrap();
    assert_eq!(interface.get_register(reg::PROX_INT_THRESH), 0xFF);
}
