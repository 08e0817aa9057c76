//! I2C bus abstractions
//!
//! Provides the I2C master trait used by the PWM expander driver, plus an
//! adapter for any `embedded-hal` 1.0 I2C implementation.

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::write_read(self, address, write_data, read_buf)
    }
}

/// Adapter exposing an `embedded-hal` I2C peripheral as an [`I2cBus`]
///
/// ```ignore
/// let i2c = embassy_rp::i2c::I2c::new_blocking(p.I2C0, scl, sda, config);
/// let bus = EmbeddedHalI2c::new(i2c);
/// ```
#[derive(Debug)]
pub struct EmbeddedHalI2c<I> {
    inner: I,
}

impl<I> EmbeddedHalI2c<I> {
    /// Wrap an `embedded-hal` I2C peripheral
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped peripheral
    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.inner
    }

    /// Release the wrapped peripheral
    pub fn release(self) -> I {
        self.inner
    }
}

impl<I: embedded_hal::i2c::I2c> I2cBus for EmbeddedHalI2c<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.inner.write_read(address, write_data, read_buf)
    }
}
