//! Unit tests for FIFO draining and decoding

use crate::common::{MockError, Operation, create_initialized_driver, create_mock_driver, reg};
use max30105::{AdcResolution, Error, Mode, Sample};

#[test]
fn test_empty_fifo_returns_no_samples() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::RedIr).unwrap();
    interface.set_fifo_pointers(5, 5);

    let readout = driver.read_fifo(32).unwrap();
    assert!(readout.is_empty());
    assert!(!readout.overrun);
}

#[test]
fn test_red_ir_16_bit_decoding() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::RedIr).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits16).unwrap();
    interface.push_fifo(&[0x01, 0x00, 0x00, 0x02, 0x00, 0x00], 1);

    let readout = driver.read_fifo(32).unwrap();

    assert_eq!(readout.len(), 1);
    assert_eq!(
        readout.samples[0],
        Sample {
            red: 0x4000,
            ir: Some(0x8000),
            green: None,
        }
    );
}

#[test]
fn test_three_channel_18_bit_decoding() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::GreenRedIr).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits18).unwrap();
    interface.push_fifo(
        &[
            0x00, 0x10, 0x00, 0x00, 0x20, 0x00, 0x03, 0xFF, 0xFF, // sample 0
            0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x03, // sample 1
        ],
        2,
    );

    let readout = driver.read_fifo(32).unwrap();

    assert_eq!(readout.len(), 2);
    assert_eq!(readout.samples[0].red, 0x1000);
    assert_eq!(readout.samples[0].ir, Some(0x2000));
    assert_eq!(readout.samples[0].green, Some(0x3FFFF));
    assert_eq!(readout.samples[1].green, Some(3));
}

#[test]
fn test_request_clamps_to_available() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::Red).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits18).unwrap();
    interface.push_fifo(&[0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x03], 3);

    let readout = driver.read_fifo(200).unwrap();
    assert_eq!(readout.len(), 3);
    assert_eq!(interface.fifo_remaining(), 0);
}

#[test]
fn test_request_smaller_than_available_leaves_rest() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::Red).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits18).unwrap();
    interface.push_fifo(&[0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x03], 3);

    let readout = driver.read_fifo(2).unwrap();
    assert_eq!(readout.len(), 2);
    assert_eq!(readout.samples[1].red, 2);
    assert_eq!(interface.fifo_remaining(), 3);
}

#[test]
fn test_wrapped_pointers() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::Red).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits18).unwrap();
    interface.set_fifo_pointers(3, 30);
    interface.push_fifo(&[0u8; 15], 0);

    let readout = driver.read_fifo(32).unwrap();
    assert_eq!(readout.len(), 5);
}

#[test]
fn test_burst_is_one_transaction() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::RedIr).unwrap();
    interface.push_fifo(&[0u8; 24], 4);
    interface.clear_operations();

    driver.read_fifo(32).unwrap();

    let fifo_reads: Vec<_> = interface
        .operations()
        .into_iter()
        .filter(|op| matches!(op, Operation::Read { address, .. } if *address == reg::FIFO_DATA))
        .collect();
    assert_eq!(fifo_reads.len(), 1);
    match &fifo_reads[0] {
        Operation::Read { data, .. } => assert_eq!(data.len(), 24),
        Operation::Write { .. } => unreachable!(),
    }

    // No explicit read pointer update after the burst
    assert!(interface.writes_to(reg::FIFO_RD_PTR).is_empty());
}

#[test]
fn test_drain_order() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::Red).unwrap();
    interface.push_fifo(&[0u8; 3], 1);
    interface.clear_operations();

    driver.read_fifo(1).unwrap();

    assert_eq!(
        interface.touched(),
        vec![
            reg::OVF_COUNTER,
            reg::FIFO_RD_PTR,
            reg::FIFO_WR_PTR,
            reg::MODE_CONFIG,
            reg::FIFO_DATA,
            reg::ADC_CONFIG,
        ]
    );
}

#[test]
fn test_overrun_still_returns_samples() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::Red).unwrap();
    driver.set_adc_resolution(AdcResolution::Bits18).unwrap();
    interface.set_register(reg::OVF_COUNTER, 4);
    interface.push_fifo(&[0x00, 0x00, 0x07], 1);

    let readout = driver.read_fifo(32).unwrap();
    assert!(readout.overrun);
    assert_eq!(readout.samples[0].red, 7);

    assert_eq!(readout.check::<MockError>(), Err(Error::FifoOverrun));
}

#[test]
fn test_invalid_mode_aborts_before_burst() {
    let (driver, interface) = create_initialized_driver();
    interface.set_register(reg::MODE_CONFIG, 0x04);
    interface.push_fifo(&[0xAA; 9], 3);
    interface.clear_operations();

    assert_eq!(driver.read_fifo(32), Err(Error::InvalidMode(0x04)));
    assert!(!interface.touched().contains(&reg::FIFO_DATA));
    assert_eq!(interface.fifo_remaining(), 9);
}

#[test]
fn test_bus_failure_during_burst() {
    let (driver, interface) = create_initialized_driver();
    driver.set_mode(Mode::Red).unwrap();
    interface.push_fifo(&[0u8; 3], 1);
    interface.fail_reads_at(reg::FIFO_DATA);

    assert_eq!(
        driver.read_fifo(32),
        Err(Error::Bus(MockError::Communication))
    );
}

#[test]
fn test_read_fifo_requires_init() {
    let (driver, interface) = create_mock_driver();

    assert_eq!(driver.read_fifo(32), Err(Error::NotInitialized));
    assert_eq!(interface.transaction_count(), 0);
}

#[test]
fn test_fifo_data_register_access() {
    let (driver, interface) = create_initialized_driver();
    interface.push_fifo(&[0x5A], 0);

    assert_eq!(driver.fifo_data().unwrap(), 0x5A);

    driver.set_fifo_data(0x33).unwrap();
    assert_eq!(interface.writes_to(reg::FIFO_DATA), vec![0x33]);
}
