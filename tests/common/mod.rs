#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use lumen_fixture::sensor::RegisterBus;
use lumen_fixture::{AmbientSensor, ButtonPort, ChannelId, DriveSink, SensorError, TransportError};

/// Drive sink that remembers the last value written to every channel.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub levels: [u16; 3],
    pub enabled: [bool; 3],
    pub level_writes: usize,
    pub enable_writes: usize,
}

impl DriveSink for RecordingSink {
    fn set_drive_level(&mut self, channel: ChannelId, level: u16) {
        self.levels[channel.index()] = level;
        self.level_writes += 1;
    }

    fn set_output_enabled(&mut self, channel: ChannelId, enabled: bool) {
        self.enabled[channel.index()] = enabled;
        self.enable_writes += 1;
    }

    fn is_output_enabled(&self, channel: ChannelId) -> bool {
        self.enabled[channel.index()]
    }
}

/// Sensor returning queued readings, then repeating `fallback`.
#[derive(Debug)]
pub struct ScriptedSensor {
    pub readings: VecDeque<Result<u32, SensorError>>,
    pub fallback: Result<u32, SensorError>,
    pub id: Result<u8, SensorError>,
    pub reads: usize,
}

pub const SENSOR_ID: u8 = 0x50;

impl ScriptedSensor {
    pub fn new(readings: &[Result<u32, SensorError>]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
            fallback: Ok(0),
            id: Ok(SENSOR_ID),
            reads: 0,
        }
    }

    pub fn absent() -> Self {
        Self {
            id: Err(SensorError::Transport(TransportError::AddressNack)),
            ..Self::new(&[])
        }
    }

    pub fn push(&mut self, reading: Result<u32, SensorError>) {
        self.readings.push_back(reading);
    }
}

impl AmbientSensor for ScriptedSensor {
    fn read_illuminance(&mut self) -> Result<u32, SensorError> {
        self.reads += 1;
        self.readings.pop_front().unwrap_or(self.fallback)
    }

    fn read_device_id(&mut self) -> Result<u8, SensorError> {
        self.id
    }

    fn expected_device_id(&self) -> u8 {
        SENSOR_ID
    }
}

/// Register file of a single device, addressed by the low five bits.
#[derive(Debug)]
pub struct FakeBus {
    pub registers: [u8; 32],
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail_with: Option<TransportError>,
    pub status_reads: usize,
    pub valid_after: usize,
}

const STATUS: u8 = 0x13;

impl FakeBus {
    pub fn new() -> Self {
        Self {
            registers: [0; 32],
            writes: Vec::new(),
            fail_with: None,
            status_reads: 0,
            valid_after: 0,
        }
    }

    pub fn with_counts(ch0: u16, ch1: u16) -> Self {
        let mut bus = Self::new();
        bus.registers[0x12] = 0x50;
        bus.registers[0x14..0x16].copy_from_slice(&ch0.to_le_bytes());
        bus.registers[0x16..0x18].copy_from_slice(&ch1.to_le_bytes());
        bus
    }
}

impl RegisterBus for FakeBus {
    fn read_register(
        &mut self,
        _address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), TransportError> {
        if let Some(err) = self.fail_with {
            return Err(err);
        }
        let start = usize::from(register & 0x1F);
        if start == usize::from(STATUS) {
            self.status_reads += 1;
            buf[0] = u8::from(self.status_reads > self.valid_after);
            return Ok(());
        }
        buf.copy_from_slice(&self.registers[start..start + buf.len()]);
        Ok(())
    }

    fn write_register(
        &mut self,
        _address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        if let Some(err) = self.fail_with {
            return Err(err);
        }
        let start = usize::from(register & 0x1F);
        self.registers[start..start + data.len()].copy_from_slice(data);
        self.writes.push((register, data.to_vec()));
        Ok(())
    }
}

/// Button port whose raw level is shared with the test.
#[derive(Debug, Clone, Default)]
pub struct FakePort {
    pub level: Rc<Cell<u8>>,
    pub unlocked: Rc<Cell<u8>>,
}

impl FakePort {
    pub fn new() -> Self {
        let port = Self::default();
        port.level.set(0xFF);
        port
    }

    pub fn set(&self, level: u8) {
        self.level.set(level);
    }
}

impl ButtonPort for FakePort {
    fn read(&mut self) -> u8 {
        self.level.get()
    }

    fn unlock(&mut self, mask: u8) {
        self.unlocked.set(self.unlocked.get() | mask);
    }
}
