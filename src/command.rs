//! Shell commands
//!
//! A line of user input is parsed into a [`Command`] and applied to the
//! fixture. Replies are written into a bounded buffer; text that does not
//! fit is cut off.

use core::fmt::Write;
use core::str::FromStr;

use heapless::String;

use crate::error::CommandError;
use crate::fixture::Fixture;
use crate::sensor::AmbientSensor;
use crate::store::ChannelId;
use crate::DriveSink;

/// Capacity of a command reply.
pub const REPLY_CAPACITY: usize = 1024;

/// Bounded reply text.
pub type Reply = String<REPLY_CAPACITY>;

/// Command names and their help text.
pub const COMMANDS: &[(&str, &str)] = &[
    ("ver", "Display firmware version"),
    ("setb", "Set the LED brightness to a specific level: setb <r|g|b> <0-255>"),
    ("ledoff", "Turn off LEDs"),
    ("ledon", "Turn on LEDs"),
    ("profile", "Load profile by index: profile <index>"),
    ("fadetimeint", "Set fade time interval: fadetimeint <ms>"),
    ("step", "Set fade brightness step: step <1-255>"),
    ("sens", "Set lux sensitivity: sens <0-255>"),
    ("maxlux", "Set lux ceiling: maxlux <lux>"),
    ("lux", "Read lux sensor"),
    ("uphw", "Update LED brightness"),
    ("help", ""),
];

/// A parsed shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Version,
    Help,
    SetBrightness { channel: ChannelId, level: u8 },
    LedOff,
    LedOn,
    LoadProfile(u8),
    SetFadeInterval(u64),
    SetStep(u8),
    SetSensitivity(u32),
    SetMaxLux(u32),
    ReadLux,
    UpdateHardware,
}

impl Command {
    /// Parse a whole input line, name first, arguments separated by spaces.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut args = line.split_whitespace();
        let name = args.next().ok_or(CommandError::Unknown)?;
        let command = match name {
            "ver" => Self::Version,
            "help" => Self::Help,
            "setb" => {
                let channel = args.next().ok_or(CommandError::MissingArgument)?;
                let channel =
                    ChannelId::parse_from_str(channel).ok_or(CommandError::InvalidArgument)?;
                Self::SetBrightness {
                    channel,
                    level: parse_arg(args.next())?,
                }
            }
            "ledoff" => Self::LedOff,
            "ledon" => Self::LedOn,
            "profile" => Self::LoadProfile(parse_arg(args.next())?),
            "fadetimeint" => Self::SetFadeInterval(parse_arg(args.next())?),
            "step" => Self::SetStep(parse_arg(args.next())?),
            "sens" => Self::SetSensitivity(parse_arg(args.next())?),
            "maxlux" => Self::SetMaxLux(parse_arg(args.next())?),
            "lux" => Self::ReadLux,
            "uphw" => Self::UpdateHardware,
            _ => return Err(CommandError::Unknown),
        };
        Ok(command)
    }
}

fn parse_arg<T: FromStr>(arg: Option<&str>) -> Result<T, CommandError> {
    arg.ok_or(CommandError::MissingArgument)?
        .parse()
        .map_err(|_| CommandError::InvalidArgument)
}

impl<D: DriveSink, S: AmbientSensor> Fixture<D, S> {
    /// Apply a command and describe the result.
    pub fn execute(&mut self, command: Command) -> Reply {
        log::debug!(target: "cmd", "{:?}", command);
        let mut reply = Reply::new();
        // A full reply buffer only truncates the text.
        let _ = self.write_reply(command, &mut reply);
        reply
    }

    /// Parse and apply a line; parse errors become the reply.
    pub fn execute_line(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(command) => self.execute(command),
            Err(err) => {
                log::warn!(target: "cmd", "rejected {:?}: {}", line, err);
                let mut reply = Reply::new();
                let _ = writeln!(reply, "{}", err);
                reply
            }
        }
    }

    fn write_reply(&mut self, command: Command, out: &mut Reply) -> core::fmt::Result {
        match command {
            Command::Version => writeln!(out, "Firmware Version: {}", env!("CARGO_PKG_VERSION")),
            Command::Help => {
                writeln!(out, "Available Commands")?;
                writeln!(out, "------------------")?;
                for (name, help) in COMMANDS {
                    writeln!(out, "{}\t\t{}", name, help)?;
                }
                Ok(())
            }
            Command::SetBrightness { channel, level } => {
                self.set_channel_brightness(channel, level);
                Ok(())
            }
            Command::LedOff => {
                self.set_enabled(false);
                Ok(())
            }
            Command::LedOn => {
                self.set_enabled(true);
                Ok(())
            }
            Command::LoadProfile(index) => match self.load_profile(index) {
                Ok(()) => Ok(()),
                Err(err) => writeln!(out, "{}", err),
            },
            Command::SetFadeInterval(ms) => {
                self.set_fade_step_interval(ms);
                Ok(())
            }
            Command::SetStep(step) => {
                self.set_brightness_step(step);
                Ok(())
            }
            Command::SetSensitivity(value) => {
                self.set_sensitivity(value);
                Ok(())
            }
            Command::SetMaxLux(value) => {
                self.set_max_lux(value);
                Ok(())
            }
            Command::ReadLux => match self.request_illuminance() {
                Ok(lux) => writeln!(out, "Lux: {}", lux),
                Err(err) => writeln!(out, "Unable to read lux sensor: {}", err),
            },
            Command::UpdateHardware => {
                self.force_hardware_refresh();
                Ok(())
            }
        }
    }
}
