//! Uncaught-error reporting.
//!
//! The environment hands every uncaught error to [`UncaughtErrorBridge::dispatch`].
//! Previously installed handlers run first, in the order they were added;
//! then the error is reported to the panel if it is attached.

use crate::console::Console;
use crate::panel::PanelController;
use crate::stack::StackFormatter;
use crate::value::Value;
use parking_lot::RwLock;
use std::sync::Arc;

/// The structured error carried by an uncaught-error notification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

/// An uncaught-error notification: info value, source, line, column and
/// the optional error itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorEvent {
    pub message: Value,
    pub source: String,
    pub line: u32,
    pub column: u32,
    pub error: Option<ErrorValue>,
}

impl ErrorEvent {
    pub fn new(message: impl Into<Value>) -> Self {
        Self {
            message: message.into(),
            source: String::new(),
            line: 0,
            column: 0,
            error: None,
        }
    }

    pub fn at(mut self, source: impl Into<String>, line: u32, column: u32) -> Self {
        self.source = source.into();
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_error(mut self, error: ErrorValue) -> Self {
        self.error = Some(error);
        self
    }

    pub fn stack(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.stack.as_deref())
    }
}

/// Something to run when an uncaught error is reported.
///
/// A panicking handler is not caught; the panic propagates to whoever
/// dispatched the error.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, event: &ErrorEvent);
}

impl<F> ErrorHandler for F
where
    F: Fn(&ErrorEvent) + Send + Sync,
{
    fn handle(&self, event: &ErrorEvent) {
        self(event)
    }
}

/// Chains error handlers and reports errors to the panel.
pub struct UncaughtErrorBridge {
    handlers: RwLock<Vec<Arc<dyn ErrorHandler>>>,
    console: Arc<Console>,
    panel: Arc<PanelController>,
    formatter: StackFormatter,
}

impl UncaughtErrorBridge {
    pub fn new(console: Arc<Console>, panel: Arc<PanelController>, formatter: StackFormatter) -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            console,
            panel,
            formatter,
        }
    }

    /// Append a handler; it runs after every handler added before it.
    pub fn add_handler(&self, handler: Arc<dyn ErrorHandler>) {
        self.handlers.write().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn formatter(&self) -> &StackFormatter {
        &self.formatter
    }

    /// Run every handler, then report. Returns whether the environment's
    /// default error reporting should be suppressed.
    pub fn dispatch(&self, event: &ErrorEvent) -> bool {
        let handlers: Vec<_> = self.handlers.read().iter().cloned().collect();
        for handler in handlers {
            handler.handle(event);
        }
        self.report(event)
    }

    /// Send the error to the console's error channel if the panel is
    /// attached. The formatted stack is used when there is one and it
    /// parses; otherwise the info value goes through unmodified.
    pub fn report(&self, event: &ErrorEvent) -> bool {
        if !self.panel.is_attached() {
            tracing::debug!(source = %event.source, "uncaught error left to the environment");
            return false;
        }

        let formatted = event.stack().and_then(|stack| self.formatter.format(stack));
        match formatted {
            Some(markup) => self.console.error(vec![Value::String(markup)]),
            None => self.console.error(vec![event.message.clone()]),
        }
        true
    }
}
