//! Fixture configuration and fixed tuning constants.

use embassy_time::Duration;

/// Highest logical brightness of a channel.
pub const MAX_BRIGHTNESS: u8 = 255;

/// Highest accepted ambient sensitivity (full ambient influence).
pub const MAX_SENSITIVITY: u8 = 255;

/// Longest fade step interval the step timer can be loaded with.
pub const MAX_FADE_INTERVAL_MS: u64 = 1000;

/// Default button poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default time between two fade steps.
pub const DEFAULT_FADE_INTERVAL: Duration = Duration::from_millis(5);

/// Default ambient light poll interval.
pub const DEFAULT_LUX_INTERVAL: Duration = Duration::from_millis(1000);

/// Default minimum lux change that is accepted as a new reading.
pub const DEFAULT_LUX_HYSTERESIS: u32 = 30;

/// Default lux ceiling used by the scale calculation.
pub const DEFAULT_MAX_LUX: u32 = 200;

/// Timings of the three periodic sources.
#[derive(Debug, Clone, Copy)]
pub struct TickTimings {
    /// Button sampling period
    pub poll: Duration,
    /// Period between two fade steps
    pub fade: Duration,
    /// Ambient sensor poll period
    pub lux: Duration,
}

impl Default for TickTimings {
    fn default() -> Self {
        Self {
            poll: DEFAULT_POLL_INTERVAL,
            fade: DEFAULT_FADE_INTERVAL,
            lux: DEFAULT_LUX_INTERVAL,
        }
    }
}

/// Configuration for the fixture controller
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub timings: TickTimings,
    /// Brightness change applied per fade tick
    pub brightness_step: u8,
    /// Lux ceiling, readings above are clamped
    pub max_lux: u32,
    /// Ambient influence (0 = none, 255 = full)
    pub sensitivity: u8,
    /// Minimum lux change to accept a reading
    pub lux_hysteresis: u32,
    /// Profile loaded on boot
    pub initial_profile: u8,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            timings: TickTimings::default(),
            brightness_step: 1,
            max_lux: DEFAULT_MAX_LUX,
            sensitivity: 0,
            lux_hysteresis: DEFAULT_LUX_HYSTERESIS,
            initial_profile: 0,
        }
    }
}

/// Clamp a requested fade interval to what the step timer supports.
pub fn clamp_fade_interval(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(1, MAX_FADE_INTERVAL_MS))
}
