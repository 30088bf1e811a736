//! Vertical-counter switch debouncer.
//!
//! Every bit of the sampled port owns a two-bit counter spread across two
//! bytes (`cnt0` holds the low bits, `cnt1` the high bits). A counter runs
//! while its input disagrees with the debounced state and is cleared as soon
//! as the input agrees again, so all eight lines are filtered at once with a
//! handful of bitwise operations and no branches.

/// Consecutive disagreeing samples needed before a line toggles.
///
/// The two-bit counter wraps after four counts, which fixes the settle window.
pub const SETTLE_SAMPLES: u8 = 4;

/// Outcome of debouncing a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounced {
    /// Debounced level of every line
    pub state: u8,
    /// Lines whose debounced level changed on this sample
    pub toggled: u8,
}

impl Debounced {
    /// Lines that toggled to low on this sample.
    pub const fn fallen(self) -> u8 {
        self.toggled & !self.state
    }

    /// Lines that toggled to high on this sample.
    pub const fn risen(self) -> u8 {
        self.toggled & self.state
    }
}

/// Debouncer for up to eight lines sampled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    state: u8,
    cnt0: u8,
    cnt1: u8,
}

impl Debouncer {
    /// Create a debouncer with every line idle high.
    pub const fn new() -> Self {
        Self {
            state: 0xFF,
            cnt0: 0,
            cnt1: 0,
        }
    }

    /// Current debounced level.
    pub const fn state(&self) -> u8 {
        self.state
    }

    /// Feed one raw sample. Call at a fixed rate.
    pub const fn sample(&mut self, raw: u8) -> Debounced {
        let delta = raw ^ self.state;
        self.cnt1 = (self.cnt1 ^ self.cnt0) & delta;
        self.cnt0 = !self.cnt0 & delta;

        let toggled = delta & !(self.cnt0 | self.cnt1);
        self.state ^= toggled;

        Debounced {
            state: self.state,
            toggled,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
