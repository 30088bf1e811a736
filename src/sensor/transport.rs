//! Register-addressed bus transport.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource, Operation};

use crate::error::TransportError;

/// Attempts made for a single transfer before the bus is declared busy.
pub const MAX_TRANSFER_ATTEMPTS: u8 = 5;

/// Byte-addressed register access to a device on a shared bus.
pub trait RegisterBus {
    /// Read `buf.len()` bytes starting at `register`
    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), TransportError>;

    /// Write `data` starting at `register`
    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), TransportError>;

    /// Set or clear `mask` in a single register
    fn update_bits(
        &mut self,
        address: u8,
        register: u8,
        mask: u8,
        set: bool,
    ) -> Result<(), TransportError> {
        let mut value = [0u8];
        self.read_register(address, register, &mut value)?;
        if set {
            value[0] |= mask;
        } else {
            value[0] &= !mask;
        }
        self.write_register(address, register, &value)
    }
}

/// [`RegisterBus`] over an `embedded-hal` I2C controller.
///
/// Transient faults are retried up to [`MAX_TRANSFER_ATTEMPTS`] times,
/// acknowledge failures are reported immediately.
pub struct I2cBus<I> {
    i2c: I,
}

impl<I: I2c> I2cBus<I> {
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the underlying controller
    pub fn release(self) -> I {
        self.i2c
    }

    fn with_retry(
        &mut self,
        mut transfer: impl FnMut(&mut I) -> Result<(), I::Error>,
    ) -> Result<(), TransportError> {
        let mut last = TransportError::Busy;
        for attempt in 1..=MAX_TRANSFER_ATTEMPTS {
            let Err(err) = transfer(&mut self.i2c) else {
                return Ok(());
            };
            match err.kind() {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => {
                    log::error!(target: "i2c", "address nack");
                    return Err(TransportError::AddressNack);
                }
                ErrorKind::NoAcknowledge(_) => {
                    log::error!(target: "i2c", "data nack");
                    return Err(TransportError::DataNack);
                }
                ErrorKind::ArbitrationLoss => {
                    last = TransportError::ArbitrationLost;
                }
                _ => {
                    last = TransportError::Busy;
                }
            }
            log::debug!(target: "i2c", "transfer attempt {} failed: {:?}", attempt, err.kind());
        }
        log::error!(target: "i2c", "transfer failed after {} attempts", MAX_TRANSFER_ATTEMPTS);
        Err(last)
    }
}

impl<I: I2c> RegisterBus for I2cBus<I> {
    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), TransportError> {
        self.with_retry(|i2c| i2c.write_read(address, &[register], &mut *buf))
    }

    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        self.with_retry(|i2c| {
            i2c.transaction(address, &mut [Operation::Write(&[register]), Operation::Write(data)])
        })
    }
}
