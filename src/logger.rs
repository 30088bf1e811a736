//! On-device log output.

/// Route the `log` facade to the esp-println console.
///
/// Subsystems log under the `led`, `button`, `lux`, `cmd` and `i2c` targets.
pub fn init(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
