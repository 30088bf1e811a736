//! Stepped brightness fades
//!
//! Each tick moves every channel one step toward its scaled target and
//! writes the result to hardware. The engine disarms itself on the first tick
//! that changes nothing and is re-armed by [`FadeEngine::start`].

use embassy_time::Duration;

use crate::config::clamp_fade_interval;
use crate::curve::drive_level;
use crate::store::{BrightnessStore, ChannelId};
use crate::DriveSink;

/// Result of a single fade tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTick {
    /// At least one channel moved, the engine stays armed
    Stepped,
    /// Every channel was on target, the engine disarmed itself
    Settled,
    /// The engine was not armed, nothing was evaluated
    Idle,
}

/// Fade stepping state.
#[derive(Debug, Clone)]
pub struct FadeEngine {
    step: u8,
    interval: Duration,
    running: bool,
}

impl FadeEngine {
    pub const fn new(step: u8, interval: Duration) -> Self {
        Self {
            step: if step == 0 { 1 } else { step },
            interval,
            running: false,
        }
    }

    /// Arm the periodic fade tick. Idempotent.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Check if the fade tick is armed
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn step(&self) -> u8 {
        self.step
    }

    /// Set the brightness change per tick. Zero is raised to one.
    pub fn set_step(&mut self, step: u8) {
        self.step = step.max(1);
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Set the time between two steps, clamped to the timer range.
    pub fn set_interval_ms(&mut self, ms: u64) {
        self.interval = clamp_fade_interval(ms);
    }

    /// Advance every channel by one step.
    ///
    /// All channels are written before the settle check, so a tick that
    /// reports [`FadeTick::Settled`] saw the final value of every channel.
    pub fn tick<D: DriveSink>(
        &mut self,
        store: &mut BrightnessStore,
        scale: f32,
        sink: &mut D,
    ) -> FadeTick {
        if !self.running {
            return FadeTick::Idle;
        }

        let mut changed = false;
        for id in ChannelId::ALL {
            let channel = store.get(id);
            let target = scaled_target(channel.desired, scale);
            let next = step_toward(channel.current, target, self.step);
            if next != channel.current {
                log::trace!(target: "led", "{} {} -> {}", id.as_str(), channel.current, next);
                write_hardware(store, sink, id, next);
                changed = true;
            }
        }

        if changed {
            FadeTick::Stepped
        } else {
            self.running = false;
            log::debug!(target: "led", "fade settled");
            FadeTick::Settled
        }
    }
}

/// Desired brightness attenuated by the ambient scale, truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scaled_target(desired: u8, scale: f32) -> u8 {
    let scale = scale.clamp(0.0, 1.0);
    libm::floorf(f32::from(desired) * scale) as u8
}

/// Move `current` one `step` toward `target` without passing it.
pub const fn step_toward(current: u8, target: u8, step: u8) -> u8 {
    if current > target {
        let next = current.saturating_sub(step);
        if next < target { target } else { next }
    } else if current < target {
        let next = current.saturating_add(step);
        if next > target { target } else { next }
    } else {
        current
    }
}

/// Write a brightness to hardware and mirror it into the store.
///
/// Zero shuts the output stage off; any other value turns it back on.
pub fn write_hardware<D: DriveSink>(
    store: &mut BrightnessStore,
    sink: &mut D,
    id: ChannelId,
    brightness: u8,
) {
    if brightness == 0 {
        sink.set_output_enabled(id, false);
    } else if !sink.is_output_enabled(id) {
        sink.set_output_enabled(id, true);
    }
    sink.set_drive_level(id, drive_level(brightness));
    store.get_mut(id).current = brightness;
}
