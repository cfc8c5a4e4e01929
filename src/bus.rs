//! Two-wire bus capability consumed by the driver.

use core::fmt::Debug;

use embedded_hal::i2c::I2c;

/// Byte-level access to an addressed two-wire bus.
///
/// Each call is one complete transfer, framed by its own start and stop
/// condition.
pub trait Transport {
    /// Associated error type for failed transfers.
    type Error: Debug;

    /// Requests a bus clock rate in hertz.
    fn set_clock_rate(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Writes `bytes` to the device at `address`.
    ///
    /// Returns an error if the device does not acknowledge.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads up to `buffer.len()` bytes from the device at `address`.
    ///
    /// Returns the number of bytes the device actually delivered.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

/// [`Transport`] over any blocking `embedded-hal` I2C bus.
///
/// `embedded-hal` reads either fill the whole buffer or fail, and the bus
/// clock is chosen when the HAL peripheral is built. The requested clock
/// rate is only recorded.
pub struct I2cBus<I2C> {
    i2c: I2C,
    clock_rate: Option<u32>,
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        I2cBus {
            i2c,
            clock_rate: None,
        }
    }

    /// Clock rate last requested by the driver.
    pub fn clock_rate(&self) -> Option<u32> {
        self.clock_rate
    }

    /// Returns the wrapped bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Transport for I2cBus<I2C> {
    type Error = I2C::Error;

    fn set_clock_rate(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.clock_rate = Some(hz);
        Ok(())
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(address, buffer)?;
        Ok(buffer.len())
    }
}
