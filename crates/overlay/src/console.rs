//! The console facade.
//!
//! Callers report through [`Console`] instead of a rebound global. Output
//! goes to every active registered sink; when none is active it goes to the
//! fallback sink with the caller's original arguments, which keeps the facade
//! transparent until a sink such as the panel switches on.

use crate::channel::Channel;
use crate::sink::{Record, Sink};
use crate::value::Value;
use parking_lot::RwLock;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Nested dispatches deeper than this bypass the registered sinks.
pub const MAX_DISPATCH_DEPTH: usize = 4;

thread_local! {
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Handle for a registered sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

struct DepthGuard;

impl DepthGuard {
    fn enter() -> (Self, usize) {
        let depth = DISPATCH_DEPTH.with(|d| {
            let depth = d.get() + 1;
            d.set(depth);
            depth
        });
        (DepthGuard, depth)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Logging facade with a sink registry.
pub struct Console {
    sinks: RwLock<Vec<(SinkId, Arc<dyn Sink>)>>,
    fallback: Arc<dyn Sink>,
    next_id: AtomicU64,
}

impl Console {
    pub fn new(fallback: Arc<dyn Sink>) -> Self {
        Self {
            sinks: RwLock::new(Vec::new()),
            fallback,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register_sink(&self, sink: Arc<dyn Sink>) -> SinkId {
        let id = SinkId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sinks.write().push((id, sink));
        tracing::debug!(?id, "sink registered");
        id
    }

    /// Remove a sink. Returns whether it was registered.
    pub fn unregister_sink(&self, id: SinkId) -> bool {
        let mut sinks = self.sinks.write();
        let before = sinks.len();
        sinks.retain(|(sink_id, _)| *sink_id != id);
        before != sinks.len()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn fallback(&self) -> &Arc<dyn Sink> {
        &self.fallback
    }

    /// Whether output currently goes anywhere other than the fallback.
    pub fn is_intercepting(&self) -> bool {
        self.sinks.read().iter().any(|(_, sink)| sink.is_active())
    }

    pub fn log(&self, args: Vec<Value>) {
        self.print(Channel::Log, args);
    }

    pub fn warn(&self, args: Vec<Value>) {
        self.print(Channel::Warn, args);
    }

    pub fn error(&self, args: Vec<Value>) {
        self.print(Channel::Error, args);
    }

    /// Dispatch one reporting call.
    pub fn print(&self, channel: Channel, args: Vec<Value>) {
        let record = Record::new(channel, args);
        let (_guard, depth) = DepthGuard::enter();

        if depth > MAX_DISPATCH_DEPTH {
            tracing::warn!(depth, %channel, "console re-entered too deeply, using fallback");
            self.fallback.write(&record);
            return;
        }

        // Snapshot so no lock is held while sinks run.
        let active: Vec<Arc<dyn Sink>> = self
            .sinks
            .read()
            .iter()
            .filter(|(_, sink)| sink.is_active())
            .map(|(_, sink)| Arc::clone(sink))
            .collect();

        if active.is_empty() {
            tracing::trace!(%channel, "no active sink, using fallback");
            self.fallback.write(&record);
            return;
        }

        tracing::trace!(%channel, sinks = active.len(), "dispatching");
        for sink in active {
            sink.write(&record);
        }
    }
}
