#![no_std]

pub mod ambient;
pub mod command;
pub mod config;
pub mod curve;
pub mod debounce;
pub mod error;
pub mod event_queue;
pub mod fade;
pub mod fixture;
pub mod input;
#[cfg(feature = "esp32-log")]
pub mod logger;
pub mod profile;
pub mod scheduler;
pub mod sensor;
pub mod store;

pub use ambient::{AmbientScaler, LuxUpdate};
pub use command::{Command, Reply};
pub use config::{FixtureConfig, TickTimings};
pub use debounce::{Debounced, Debouncer};
pub use error::{CommandError, FixtureError, SensorError, TransportError};
pub use event_queue::EventQueue;
pub use fade::{FadeEngine, FadeTick};
pub use fixture::{ControllerState, Fixture};
pub use input::{ButtonLine, ButtonPoller, ButtonPort, Edge, InputAction, InputEvent};
pub use profile::{PROFILES, Profile, ProfileManager};
pub use scheduler::{TickResult, TickScheduler};
pub use sensor::AmbientSensor;
pub use store::{BrightnessStore, Channel, ChannelId};
pub use embassy_time::{Duration, Instant};

/// Abstract output stage driver
///
/// Implement this trait to drive the PWM (or analog) output of each channel.
/// The fade engine is the only caller.
pub trait DriveSink {
    /// Set the duty of a channel (0 ..= [`curve::MAX_DRIVE_LEVEL`])
    fn set_drive_level(&mut self, channel: ChannelId, level: u16);

    /// Switch the output stage of a channel
    fn set_output_enabled(&mut self, channel: ChannelId, enabled: bool);

    /// Check whether the output stage of a channel is on
    fn is_output_enabled(&self, channel: ChannelId) -> bool;
}
