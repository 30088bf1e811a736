//! Brightness presets
//!
//! A profile is a fixed list of channel targets. Channels a profile does
//! not list keep their current target.

use crate::error::FixtureError;
use crate::store::{BrightnessStore, ChannelId};

/// A named set of channel targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    pub levels: &'static [(ChannelId, u8)],
}

/// Built-in profile catalog.
pub const PROFILES: &[Profile] = &[
    Profile {
        name: "teal",
        levels: &[(ChannelId::Blue, 100), (ChannelId::Green, 255)],
    },
    Profile {
        name: "green",
        levels: &[(ChannelId::Blue, 0), (ChannelId::Green, 255)],
    },
    Profile {
        name: "dim_green",
        levels: &[(ChannelId::Blue, 0), (ChannelId::Green, 100)],
    },
];

/// Tracks the selected profile.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    catalog: &'static [Profile],
    index: u8,
}

impl ProfileManager {
    pub const fn new(catalog: &'static [Profile]) -> Self {
        Self { catalog, index: 0 }
    }

    /// Index of the last loaded profile
    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn len(&self) -> usize {
        self.catalog.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<&'static Profile> {
        self.catalog.get(usize::from(index))
    }

    /// Write the targets of profile `index` into the store.
    pub fn load(
        &mut self,
        store: &mut BrightnessStore,
        index: u8,
    ) -> Result<&'static Profile, FixtureError> {
        let profile = self.get(index).ok_or(FixtureError::InvalidIndex(index))?;
        for &(channel, brightness) in profile.levels {
            store.set_desired(channel, brightness);
        }
        self.index = index;
        log::debug!(target: "led", "loaded profile {} ({})", index, profile.name);
        Ok(profile)
    }

    /// Index following the current one, wrapping around.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_index(&self) -> u8 {
        if self.catalog.is_empty() {
            return 0;
        }
        ((usize::from(self.index) + 1) % self.catalog.len()) as u8
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new(PROFILES)
    }
}
