//! Ambient light sensor collaborators.

pub mod transport;
pub mod tsl2591;

pub use transport::{I2cBus, RegisterBus};
pub use tsl2591::Tsl2591;

use crate::error::SensorError;

/// Source of illuminance readings
///
/// Implement this trait to support a different sensor.
pub trait AmbientSensor {
    /// Take one blocking illuminance reading, in lux
    fn read_illuminance(&mut self) -> Result<u32, SensorError>;

    /// Read the device identification register
    fn read_device_id(&mut self) -> Result<u8, SensorError>;

    /// Identifier a present, healthy device reports
    fn expected_device_id(&self) -> u8;

    /// Check whether the expected device answers on the bus
    fn probe(&mut self) -> bool {
        matches!(self.read_device_id(), Ok(id) if id == self.expected_device_id())
    }
}
