//! Reporting channels.

use std::fmt;

/// One of the three console reporting channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Log,
    Warn,
    Error,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Log, Channel::Warn, Channel::Error];

    /// Name of the console method for this channel.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Log => "log",
            Channel::Warn => "warn",
            Channel::Error => "error",
        }
    }

    /// Prefix used when the channel is written as plain text.
    pub fn prefix(&self) -> &'static str {
        match self {
            Channel::Log => "",
            Channel::Warn => "[WARN] ",
            Channel::Error => "[ERROR] ",
        }
    }

    /// Whether native output for this channel goes to stderr.
    pub fn is_stderr(&self) -> bool {
        !matches!(self, Channel::Log)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
