//! Button sampling and input event dispatch.
//!
//! Buttons pull their line to ground when pressed, so a line that toggles to
//! low is a press and one that toggles to high is a release. Only presses
//! are turned into actions.

use heapless::Vec;

use crate::debounce::{Debounced, Debouncer};
use crate::event_queue::{QueueFull, Sender};

/// Port bit of the power button.
pub const BUTTON_POWER: u8 = 1 << 0;

/// Port bit of the profile button.
pub const BUTTON_PROFILE: u8 = 1 << 4;

/// Port bits monitored by the poller.
pub const BUTTON_MASK: u8 = BUTTON_POWER | BUTTON_PROFILE;

/// Physical input lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonLine {
    /// Toggles the global enable
    Power,
    /// Advances to the next profile
    Profile,
}

impl ButtonLine {
    pub const ALL: [Self; 2] = [Self::Power, Self::Profile];

    pub const fn mask(self) -> u8 {
        match self {
            Self::Power => BUTTON_POWER,
            Self::Profile => BUTTON_PROFILE,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Profile => "profile",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Press,
    Release,
}

/// A debounced edge on one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub line: ButtonLine,
    pub edge: Edge,
}

/// What the fixture does in response to an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    ToggleEnable,
    NextProfile,
}

impl InputEvent {
    /// Action bound to this event. Releases are never actioned.
    pub const fn action(self) -> Option<InputAction> {
        match (self.line, self.edge) {
            (ButtonLine::Power, Edge::Press) => Some(InputAction::ToggleEnable),
            (ButtonLine::Profile, Edge::Press) => Some(InputAction::NextProfile),
            (_, Edge::Release) => None,
        }
    }
}

/// Edges of the known lines contained in a debounce result.
pub fn events_from(debounced: Debounced) -> Vec<InputEvent, 2> {
    let mut events = Vec::new();
    for line in ButtonLine::ALL {
        if debounced.toggled & line.mask() == 0 {
            continue;
        }
        let edge = if debounced.state & line.mask() == 0 {
            Edge::Press
        } else {
            Edge::Release
        };
        // One slot per line, cannot overflow.
        let _ = events.push(InputEvent { line, edge });
    }
    events
}

/// Raw access to the button port
///
/// Implement this trait for the GPIO port the buttons are wired to.
pub trait ButtonPort {
    /// Sample the raw level of every line
    fn read(&mut self) -> u8;

    /// Unlock the commit register for `mask` so the pins can be reconfigured.
    ///
    /// This is a multi-register sequence and must not be interrupted.
    fn unlock(&mut self, mask: u8);
}

/// Samples the button port and queues debounced edges.
pub struct ButtonPoller<'a, P: ButtonPort, const SIZE: usize> {
    port: P,
    debouncer: Debouncer,
    events: Sender<'a, InputEvent, SIZE>,
}

impl<'a, P: ButtonPort, const SIZE: usize> ButtonPoller<'a, P, SIZE> {
    /// Take ownership of the port and unlock the button pins.
    pub fn new(mut port: P, events: Sender<'a, InputEvent, SIZE>) -> Self {
        critical_section::with(|_| port.unlock(BUTTON_MASK));
        Self {
            port,
            debouncer: Debouncer::new(),
            events,
        }
    }

    /// Sample once and queue any edges. Call at the poll interval.
    pub fn poll(&mut self) -> Debounced {
        let raw = (self.port.read() & BUTTON_MASK) | !BUTTON_MASK;
        let debounced = self.debouncer.sample(raw);
        for event in events_from(debounced) {
            log::debug!(target: "button", "{} {:?}", event.line.as_str(), event.edge);
            if let Err(QueueFull(event)) = self.events.try_send(event) {
                log::warn!(target: "button", "event queue full, dropped {:?}", event);
            }
        }
        debounced
    }

    pub const fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
