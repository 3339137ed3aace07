//! Bus interface implementation for the MAX30105
//!
//! This module provides the `device-driver` register interface on top of an
//! `embedded-hal` I2C bus. The MAX30105 has a single fixed address; SPI is not
//! supported by the chip.

use crate::I2C_ADDRESS;
use device_driver::RegisterInterface;

/// Largest write the interface forwards in one transaction (register byte excluded)
const MAX_WRITE_LEN: usize = 32;

/// I2C interface for the MAX30105
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface on the fixed MAX30105 address (0x57)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let sensor = Max30105Driver::new(interface);
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// Useful behind address translators or I2C multiplexers that remap the
    /// device. Prefer [`default()`](Self::default) otherwise.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit address this interface talks to
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        buffer[0] = address;
        let len = write_data.len().min(MAX_WRITE_LEN);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}
