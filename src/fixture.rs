//! Fixture controller
//!
//! Owns every piece of mutable control state and the hardware collaborators.
//! The periodic handlers below are expected to run in this priority order,
//! each to completion before the next:
//!
//! 1. input dispatch ([`Fixture::dispatch_pending`])
//! 2. fade stepping ([`Fixture::on_fade_tick`]), only while armed
//! 3. ambient polling ([`Fixture::on_lux_tick`]), only while the fade is idle
//!
//! [`crate::TickScheduler`] drives them in that order.

use crate::ambient::{AmbientScaler, LuxUpdate};
use crate::config::FixtureConfig;
use crate::error::{FixtureError, SensorError};
use crate::event_queue::Receiver;
use crate::fade::{FadeEngine, FadeTick, write_hardware};
use crate::input::{InputAction, InputEvent};
use crate::profile::{PROFILES, Profile, ProfileManager};
use crate::sensor::AmbientSensor;
use crate::store::{BrightnessStore, ChannelId};
use crate::DriveSink;

/// All mutable control state of the fixture.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub store: BrightnessStore,
    pub fade: FadeEngine,
    pub ambient: AmbientScaler,
    pub profiles: ProfileManager,
    enabled: bool,
}

impl ControllerState {
    pub fn new(config: &FixtureConfig, catalog: &'static [Profile]) -> Self {
        Self {
            store: BrightnessStore::new(),
            fade: FadeEngine::new(config.brightness_step, config.timings.fade),
            ambient: AmbientScaler::new(config),
            profiles: ProfileManager::new(catalog),
            enabled: true,
        }
    }

    /// Global enable
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Fixture controller - ties the control state to its hardware
pub struct Fixture<D: DriveSink, S: AmbientSensor> {
    state: ControllerState,
    sink: D,
    sensor: S,
    initial_profile: u8,
}

impl<D: DriveSink, S: AmbientSensor> Fixture<D, S> {
    /// Create a controller with the built-in profile catalog.
    ///
    /// Hardware is not touched until [`Self::init`].
    pub fn new(sink: D, sensor: S, config: &FixtureConfig) -> Self {
        Self::with_profiles(sink, sensor, config, PROFILES)
    }

    pub fn with_profiles(
        sink: D,
        sensor: S,
        config: &FixtureConfig,
        catalog: &'static [Profile],
    ) -> Self {
        Self {
            state: ControllerState::new(config, catalog),
            sink,
            sensor,
            initial_profile: config.initial_profile,
        }
    }

    /// Probe the sensor, zero every output and load the initial profile.
    ///
    /// A missing sensor is reported as [`FixtureError::SensorAbsent`], but the
    /// fixture is fully usable without ambient adaptation.
    pub fn init(&mut self) -> Result<(), FixtureError> {
        let sensor_found = self.sensor.probe();
        if sensor_found {
            self.state.ambient.resume();
        } else {
            log::error!(target: "lux", "unable to connect to lux sensor");
            self.state.ambient.suspend();
        }

        for id in ChannelId::ALL {
            self.state.store.set_desired(id, 0);
            write_hardware(&mut self.state.store, &mut self.sink, id, 0);
        }

        if let Err(err) = self.load_profile(self.initial_profile) {
            log::warn!(target: "led", "initial profile not loaded: {}", err);
        }

        if sensor_found {
            Ok(())
        } else {
            Err(FixtureError::SensorAbsent)
        }
    }

    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    pub const fn sink(&self) -> &D {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub const fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub const fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Current ambient scale factor
    pub const fn scale(&self) -> f32 {
        self.state.ambient.scale()
    }

    /// Arm the fade tick. Idempotent.
    pub fn start_fade(&mut self) {
        self.state.fade.start();
    }

    pub const fn is_fading(&self) -> bool {
        self.state.fade.is_running()
    }

    /// Fade tick handler
    pub fn on_fade_tick(&mut self) -> FadeTick {
        let scale = self.state.ambient.scale();
        self.state.fade.tick(&mut self.state.store, scale, &mut self.sink)
    }

    /// Ambient tick handler
    ///
    /// Deferred while a fade is in flight or the fixture is disabled, so the
    /// ambient scale never fights a deliberate change.
    pub fn on_lux_tick(&mut self) -> LuxUpdate {
        if self.state.fade.is_running() || !self.state.enabled {
            return LuxUpdate::Deferred;
        }
        let update = self.state.ambient.poll(&mut self.sensor);
        if matches!(update, LuxUpdate::Rescaled(_) | LuxUpdate::Faulted(_)) {
            self.start_fade();
        }
        update
    }

    /// Apply the action bound to a debounced input event.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event.action() {
            Some(InputAction::ToggleEnable) => self.toggle_enabled(),
            Some(InputAction::NextProfile) => {
                if let Err(err) = self.load_next_profile() {
                    log::debug!(target: "button", "profile button ignored: {}", err);
                }
            }
            None => {
                log::debug!(target: "button", "{} released", event.line.as_str());
            }
        }
    }

    /// Drain and dispatch every queued input event.
    pub fn dispatch_pending<const SIZE: usize>(
        &mut self,
        events: &Receiver<'_, InputEvent, SIZE>,
    ) -> usize {
        let mut count = 0;
        while let Some(event) = events.try_receive() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    /// Switch the global enable.
    ///
    /// Disabling parks every target and fades to black, enabling restores the
    /// parked targets. Setting the current value does nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.state.enabled {
            return;
        }
        if enabled {
            self.state.store.restore();
        } else {
            self.state.store.park();
        }
        self.state.enabled = enabled;
        log::debug!(target: "led", "enabled: {}", enabled);
        self.start_fade();
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.state.enabled);
    }

    /// Set the target of a single channel and fade to it.
    pub fn set_channel_brightness(&mut self, channel: ChannelId, brightness: u8) {
        self.state.store.set_desired(channel, brightness);
        log::debug!(target: "led", "{} target {}", channel.as_str(), brightness);
        self.start_fade();
    }

    /// Load a profile and fade to it. Ignored while disabled.
    pub fn load_profile(&mut self, index: u8) -> Result<(), FixtureError> {
        if !self.state.enabled {
            return Err(FixtureError::Disabled);
        }
        self.state.profiles.load(&mut self.state.store, index)?;
        self.start_fade();
        Ok(())
    }

    /// Load the profile after the current one, wrapping around.
    pub fn load_next_profile(&mut self) -> Result<(), FixtureError> {
        if !self.state.enabled {
            return Err(FixtureError::Disabled);
        }
        let next = self.state.profiles.next_index();
        self.load_profile(next)
    }

    /// Set the time between fade steps, clamped to 1..=1000 ms.
    pub fn set_fade_step_interval(&mut self, ms: u64) {
        self.state.fade.set_interval_ms(ms);
        log::debug!(
            target: "led",
            "fade interval {} ms",
            self.state.fade.interval().as_millis()
        );
    }

    pub fn set_brightness_step(&mut self, step: u8) {
        self.state.fade.set_step(step);
    }

    /// Set ambient influence (clamped to 0..=255) and refresh the outputs.
    pub fn set_sensitivity(&mut self, sensitivity: u32) {
        self.state.ambient.set_sensitivity(sensitivity);
        self.start_fade();
    }

    /// Set the lux ceiling (at least one) and refresh the outputs.
    pub fn set_max_lux(&mut self, max_lux: u32) {
        self.state.ambient.set_max_lux(max_lux);
        self.start_fade();
    }

    /// Read the sensor directly, without touching the ambient state.
    pub fn request_illuminance(&mut self) -> Result<u32, SensorError> {
        self.sensor.read_illuminance()
    }

    /// Rewrite every channel to hardware and re-arm the fade.
    pub fn force_hardware_refresh(&mut self) {
        for id in ChannelId::ALL {
            let current = self.state.store.get(id).current;
            write_hardware(&mut self.state.store, &mut self.sink, id, current);
        }
        self.start_fade();
    }

    /// Re-probe the sensor and resume ambient polling if it answers.
    pub fn reset_ambient(&mut self) -> Result<(), FixtureError> {
        if !self.sensor.probe() {
            log::error!(target: "lux", "unable to connect to lux sensor");
            return Err(FixtureError::SensorAbsent);
        }
        self.state.ambient.resume();
        Ok(())
    }
}
