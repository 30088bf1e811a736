//! Perceptual brightness to drive level mapping.
//!
//! The eye barely notices duty changes near full output, so the curve stays
//! linear up to [`KNEE`] and grows quadratically from there on.

use crate::config::MAX_BRIGHTNESS;

/// Brightness at which the curve switches from linear to quadratic.
pub const KNEE: u8 = 100;

/// Drive level produced by full brightness, also the PWM period.
#[allow(clippy::cast_lossless)]
pub const MAX_DRIVE_LEVEL: u16 = (MAX_BRIGHTNESS as u16 * MAX_BRIGHTNESS as u16) / KNEE as u16;

/// Map a logical brightness to a hardware drive level.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn drive_level(brightness: u8) -> u16 {
    if brightness < KNEE {
        return brightness as u16;
    }
    let b = brightness as u16;
    b * b / KNEE as u16
}
