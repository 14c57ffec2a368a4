//! Sinks receive dispatched reporting calls.

use crate::channel::Channel;
use crate::value::{join_args, Value};
use parking_lot::Mutex;
use std::io::{self, Write};

/// One reporting call, as delivered to a sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub channel: Channel,
    /// Arguments coerced to text and joined with single spaces.
    pub text: String,
    /// The untouched arguments.
    pub args: Vec<Value>,
}

impl Record {
    pub fn new(channel: Channel, args: Vec<Value>) -> Self {
        Self {
            channel,
            text: join_args(&args),
            args,
        }
    }
}

/// A destination for console output.
pub trait Sink: Send + Sync {
    /// Inactive sinks are skipped during dispatch.
    fn is_active(&self) -> bool {
        true
    }

    fn write(&self, record: &Record);
}

/// Plain-text output to a pair of writers, stdout and stderr by default.
///
/// This is the console the environment had before the overlay existed.
pub struct NativeSink {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
}

impl NativeSink {
    pub fn stdio() -> Self {
        Self::with_writers(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Write one line for `channel`.
    pub fn write_line(&self, channel: Channel, text: &str) {
        let writer = if channel.is_stderr() { &self.err } else { &self.out };
        let mut writer = writer.lock();
        if let Err(err) = writeln!(writer, "{}{}", channel.prefix(), text) {
            tracing::warn!("native console write failed: {}", err);
        }
    }
}

impl Default for NativeSink {
    fn default() -> Self {
        Self::stdio()
    }
}

impl Sink for NativeSink {
    fn write(&self, record: &Record) {
        self.write_line(record.channel, &record.text);
    }
}
