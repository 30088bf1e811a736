//! TSL2591 ambient light sensor driver.

use super::{AmbientSensor, RegisterBus};
use crate::error::SensorError;

/// Bus address of the sensor.
pub const ADDRESS: u8 = 0x29;

/// Value of the ID register on a genuine part.
pub const DEVICE_ID: u8 = 0x50;

/// STATUS polls made while waiting for an integration cycle.
pub const MAX_VALID_POLLS: u16 = 1000;

const COMMAND_NORMAL: u8 = 0xA0;

const REG_ENABLE: u8 = 0x00;
const REG_CONTROL: u8 = 0x01;
const REG_ID: u8 = 0x12;
const REG_STATUS: u8 = 0x13;
const REG_C0_DATA_L: u8 = 0x14;

const ENABLE_PON: u8 = 0x01;
const ENABLE_AEN: u8 = 0x02;
const STATUS_AVALID: u8 = 0x01;

const CONTROL_GAIN_MASK: u8 = 0x30;
const CONTROL_ATIME_MASK: u8 = 0x07;

/// Lux device factor from the datasheet.
const LUX_DF: f32 = 408.0;

/// Analog gain of the ALS amplifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    Low = 0x00,
    Medium = 0x10,
    High = 0x20,
    Max = 0x30,
}

impl Gain {
    /// Amplification factor used by the lux formula
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 25.0,
            Self::High => 428.0,
            Self::Max => 9876.0,
        }
    }
}

/// ADC integration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum IntegrationTime {
    Ms100 = 0x00,
    Ms200 = 0x01,
    Ms300 = 0x02,
    Ms400 = 0x03,
    Ms500 = 0x04,
    Ms600 = 0x05,
}

impl IntegrationTime {
    pub const fn millis(self) -> f32 {
        match self {
            Self::Ms100 => 100.0,
            Self::Ms200 => 200.0,
            Self::Ms300 => 300.0,
            Self::Ms400 => 400.0,
            Self::Ms500 => 500.0,
            Self::Ms600 => 600.0,
        }
    }
}

/// Convert raw channel counts to lux.
///
/// `ch0` is full spectrum, `ch1` infrared. A saturated channel is reported as
/// [`SensorError::Overflow`] rather than as a value. The formula reduces to
/// `(ch0 - ch1)^2 / (ch0 * cpl)`, which is never negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_lux(
    ch0: u16,
    ch1: u16,
    gain: Gain,
    integration: IntegrationTime,
) -> Result<u32, SensorError> {
    if ch0 == u16::MAX || ch1 == u16::MAX {
        return Err(SensorError::Overflow);
    }
    if ch0 == 0 {
        return Ok(0);
    }
    let full = f32::from(ch0);
    let ir = f32::from(ch1);
    let cpl = (integration.millis() * gain.multiplier()) / LUX_DF;
    let lux = (full - ir) * (1.0 - ir / full) / cpl;
    Ok(lux as u32)
}

/// TSL2591 over any register bus.
pub struct Tsl2591<B> {
    bus: B,
    gain: Gain,
    integration: IntegrationTime,
}

impl<B: RegisterBus> Tsl2591<B> {
    /// Create a driver assuming power-on defaults (low gain, 100 ms)
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            gain: Gain::Low,
            integration: IntegrationTime::Ms100,
        }
    }

    pub const fn gain(&self) -> Gain {
        self.gain
    }

    pub const fn integration_time(&self) -> IntegrationTime {
        self.integration
    }

    pub fn set_gain(&mut self, gain: Gain) -> Result<(), SensorError> {
        self.update_control(CONTROL_GAIN_MASK, gain as u8)?;
        self.gain = gain;
        Ok(())
    }

    pub fn set_integration_time(
        &mut self,
        integration: IntegrationTime,
    ) -> Result<(), SensorError> {
        self.update_control(CONTROL_ATIME_MASK, integration as u8)?;
        self.integration = integration;
        Ok(())
    }

    /// Release the underlying bus
    pub fn release(self) -> B {
        self.bus
    }

    fn update_control(&mut self, mask: u8, bits: u8) -> Result<(), SensorError> {
        let mut control = [0u8];
        self.bus.read_register(ADDRESS, COMMAND_NORMAL | REG_CONTROL, &mut control)?;
        control[0] = (control[0] & !mask) | bits;
        self.bus.write_register(ADDRESS, COMMAND_NORMAL | REG_CONTROL, &control)?;
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), SensorError> {
        self.bus.update_bits(
            ADDRESS,
            COMMAND_NORMAL | REG_ENABLE,
            ENABLE_PON | ENABLE_AEN,
            enabled,
        )?;
        Ok(())
    }

    fn wait_valid(&mut self) -> Result<(), SensorError> {
        let mut status = [0u8];
        for _ in 0..MAX_VALID_POLLS {
            self.bus.read_register(ADDRESS, COMMAND_NORMAL | REG_STATUS, &mut status)?;
            if status[0] & STATUS_AVALID != 0 {
                return Ok(());
            }
        }
        Err(SensorError::NotReady)
    }
}

impl<B: RegisterBus> AmbientSensor for Tsl2591<B> {
    fn read_illuminance(&mut self) -> Result<u32, SensorError> {
        self.set_enabled(true)?;
        self.wait_valid()?;
        self.set_enabled(false)?;

        let mut data = [0u8; 4];
        self.bus.read_register(ADDRESS, COMMAND_NORMAL | REG_C0_DATA_L, &mut data)?;
        let ch0 = u16::from_le_bytes([data[0], data[1]]);
        let ch1 = u16::from_le_bytes([data[2], data[3]]);

        let lux = compute_lux(ch0, ch1, self.gain, self.integration)?;
        log::debug!(target: "lux", "ch0={} ch1={} lux={}", ch0, ch1, lux);
        Ok(lux)
    }

    fn read_device_id(&mut self) -> Result<u8, SensorError> {
        let mut id = [0u8];
        self.bus.read_register(ADDRESS, COMMAND_NORMAL | REG_ID, &mut id)?;
        Ok(id[0])
    }

    fn expected_device_id(&self) -> u8 {
        DEVICE_ID
    }
}
