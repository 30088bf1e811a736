//! Ambient light adaptation
//!
//! Turns lux readings into a scale factor applied to every channel target.
//! Readings closer than the hysteresis threshold to the last accepted one are
//! ignored, so sensor noise near a boundary cannot make the lamp flicker.

use crate::config::{FixtureConfig, MAX_SENSITIVITY};
use crate::error::SensorError;
use crate::sensor::AmbientSensor;

/// Outcome of one ambient poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LuxUpdate {
    /// A fade is in flight or the fixture is disabled, the sensor was not read
    Deferred,
    /// Polling is suspended, the sensor was not read
    Suspended,
    /// The reading was within the hysteresis band
    Unchanged,
    /// The reading was accepted and the scale recomputed
    Rescaled(f32),
    /// The sensor failed; scale reset to neutral and polling suspended
    Faulted(SensorError),
}

/// Ambient light state and scale computation.
#[derive(Debug, Clone)]
pub struct AmbientScaler {
    current_lux: Option<u32>,
    max_lux: u32,
    sensitivity: u8,
    hysteresis: u32,
    scale: f32,
    polling: bool,
}

impl AmbientScaler {
    /// Create a scaler with neutral scale and polling suspended.
    pub fn new(config: &FixtureConfig) -> Self {
        Self {
            current_lux: None,
            max_lux: config.max_lux.max(1),
            sensitivity: config.sensitivity,
            hysteresis: config.lux_hysteresis,
            scale: 1.0,
            polling: false,
        }
    }

    /// Scale applied to every desired brightness (0.0 - 1.0)
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Last accepted reading
    pub const fn current_lux(&self) -> Option<u32> {
        self.current_lux
    }

    pub const fn max_lux(&self) -> u32 {
        self.max_lux
    }

    pub const fn sensitivity(&self) -> u8 {
        self.sensitivity
    }

    pub const fn is_polling(&self) -> bool {
        self.polling
    }

    /// Set ambient influence, clamped to [`MAX_SENSITIVITY`].
    ///
    /// The last reading is forgotten so the next poll applies the new weight.
    pub fn set_sensitivity(&mut self, sensitivity: u32) {
        let sensitivity = u8::try_from(sensitivity).unwrap_or(MAX_SENSITIVITY);
        self.sensitivity = sensitivity;
        self.current_lux = None;
        log::debug!(target: "lux", "sensitivity set to {}", sensitivity);
    }

    /// Set the lux ceiling. Zero is raised to one.
    pub fn set_max_lux(&mut self, max_lux: u32) {
        self.max_lux = max_lux.max(1);
        self.current_lux = None;
        log::debug!(target: "lux", "max lux set to {}", self.max_lux);
    }

    /// Resume polling from a clean slate.
    pub fn resume(&mut self) {
        self.current_lux = None;
        self.polling = true;
    }

    /// Stop polling and drop back to neutral scale.
    pub fn suspend(&mut self) {
        self.scale = 1.0;
        self.polling = false;
    }

    /// Read the sensor and update the scale.
    pub fn poll<S: AmbientSensor>(&mut self, sensor: &mut S) -> LuxUpdate {
        if !self.polling {
            return LuxUpdate::Suspended;
        }
        match sensor.read_illuminance() {
            Ok(lux) => match self.accept(lux) {
                Some(scale) => LuxUpdate::Rescaled(scale),
                None => LuxUpdate::Unchanged,
            },
            Err(err) => {
                log::error!(target: "lux", "lost connection with lux sensor: {}", err);
                self.suspend();
                LuxUpdate::Faulted(err)
            }
        }
    }

    /// Offer a reading. Returns the new scale if the reading was accepted.
    pub fn accept(&mut self, lux: u32) -> Option<f32> {
        let lux = lux.min(self.max_lux);
        if let Some(current) = self.current_lux {
            if current.abs_diff(lux) < self.hysteresis {
                return None;
            }
        }
        self.scale = compute_scale(lux, self.max_lux, self.sensitivity);
        self.current_lux = Some(lux);
        log::debug!(target: "lux", "accepted {} lux, scale {}", lux, self.scale);
        Some(self.scale)
    }
}

/// Scale for a reading: `1 - (sensitivity / 255) * (max - lux) / max`.
///
/// Clamped to `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
pub fn compute_scale(lux: u32, max_lux: u32, sensitivity: u8) -> f32 {
    let max_lux = max_lux.max(1);
    let lux = lux.min(max_lux);
    let weight = f32::from(sensitivity) / f32::from(MAX_SENSITIVITY);
    let darkness = (max_lux - lux) as f32 / max_lux as f32;
    (1.0 - weight * darkness).clamp(0.0, 1.0)
}
