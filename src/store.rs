//! Per-channel brightness bookkeeping.

use crate::error::FixtureError;

const CHANNEL_NAME_RED: &str = "r";
const CHANNEL_NAME_BLUE: &str = "b";
const CHANNEL_NAME_GREEN: &str = "g";

const CHANNEL_ID_RED: u8 = 0;
const CHANNEL_ID_BLUE: u8 = 1;
const CHANNEL_ID_GREEN: u8 = 2;

/// Number of output channels on the fixture.
pub const CHANNEL_COUNT: usize = 3;

/// Output channels of the fixture, in hardware order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChannelId {
    Red = CHANNEL_ID_RED,
    Blue = CHANNEL_ID_BLUE,
    Green = CHANNEL_ID_GREEN,
}

impl ChannelId {
    /// All channels, in hardware order.
    pub const ALL: [Self; CHANNEL_COUNT] = [Self::Red, Self::Blue, Self::Green];

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Some(match s {
            CHANNEL_NAME_RED => Self::Red,
            CHANNEL_NAME_BLUE => Self::Blue,
            CHANNEL_NAME_GREEN => Self::Green,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => CHANNEL_NAME_RED,
            Self::Blue => CHANNEL_NAME_BLUE,
            Self::Green => CHANNEL_NAME_GREEN,
        }
    }

    /// Position of the channel in the store.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = FixtureError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            CHANNEL_ID_RED => Ok(Self::Red),
            CHANNEL_ID_BLUE => Ok(Self::Blue),
            CHANNEL_ID_GREEN => Ok(Self::Green),
            _ => Err(FixtureError::InvalidChannel),
        }
    }
}

/// Brightness values of a single channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channel {
    /// Value last written to hardware
    pub current: u8,
    /// Target saved while the fixture is disabled
    pub previous: u8,
    /// Fade target before ambient scaling
    pub desired: u8,
}

/// Brightness of every channel.
#[derive(Debug, Clone, Default)]
pub struct BrightnessStore {
    channels: [Channel; CHANNEL_COUNT],
}

impl BrightnessStore {
    pub const fn new() -> Self {
        Self {
            channels: [Channel {
                current: 0,
                previous: 0,
                desired: 0,
            }; CHANNEL_COUNT],
        }
    }

    pub const fn get(&self, id: ChannelId) -> &Channel {
        &self.channels[id.index()]
    }

    pub const fn get_mut(&mut self, id: ChannelId) -> &mut Channel {
        &mut self.channels[id.index()]
    }

    pub fn set_desired(&mut self, id: ChannelId, brightness: u8) {
        self.get_mut(id).desired = brightness;
    }

    /// Current values of all channels, in hardware order.
    pub fn current(&self) -> [u8; CHANNEL_COUNT] {
        self.channels.map(|channel| channel.current)
    }

    /// Desired values of all channels, in hardware order.
    pub fn desired(&self) -> [u8; CHANNEL_COUNT] {
        self.channels.map(|channel| channel.desired)
    }

    /// Previous values of all channels, in hardware order.
    pub fn previous(&self) -> [u8; CHANNEL_COUNT] {
        self.channels.map(|channel| channel.previous)
    }

    /// Save every target and zero it.
    pub fn park(&mut self) {
        for channel in &mut self.channels {
            channel.previous = channel.desired;
            channel.desired = 0;
        }
    }

    /// Restore every target saved by [`Self::park`].
    pub fn restore(&mut self) {
        for channel in &mut self.channels {
            channel.desired = channel.previous;
        }
    }
}
