//! Script host wrapper.

use crate::console::{install_console_overrides, register_native_console, ConsoleOverrideTable};
use crate::onerror::install_error_hook;
use crate::overlay_object::register_overlay_object;
use crate::value::{script_error, to_text};
use boa_engine::{js_string, property::Attribute, Context, JsError, JsString, JsValue, Source};
use common::{OverlayError, OverlayResult};
use overlay::OverlayContext;
use std::sync::Arc;

/// A script environment with the debug overlay installed.
///
/// Construction sets up the environment (globals and the native console),
/// runs an optional prelude, then installs the console overrides, the
/// `onerror` hook and the `debugOverlay` object, each exactly once.
pub struct ScriptHost {
    /// Boa context.
    context: Context,
    overlay: Arc<OverlayContext>,
    overrides: ConsoleOverrideTable,
    /// Script counter for naming anonymous scripts.
    script_counter: u64,
}

impl ScriptHost {
    pub fn new(overlay: Arc<OverlayContext>) -> OverlayResult<Self> {
        Self::with_prelude(overlay, "")
    }

    /// Like [`new`](Self::new), running `prelude` before the overlay is
    /// installed. Prelude code sees the native console and may install its
    /// own `onerror`, which the overlay then chains after.
    pub fn with_prelude(overlay: Arc<OverlayContext>, prelude: &str) -> OverlayResult<Self> {
        let mut context = Context::default();
        Self::setup_globals(&mut context, &overlay)?;

        if !prelude.is_empty() {
            context
                .eval(Source::from_bytes(prelude))
                .map_err(|e| script_error(&e, &mut context))?;
        }

        let overrides = install_console_overrides(&mut context, overlay.clone())?;
        install_error_hook(&mut context, overlay.clone())?;
        register_overlay_object(&mut context, &overlay)?;
        tracing::debug!("script host ready");

        Ok(Self {
            context,
            overlay,
            overrides,
            script_counter: 0,
        })
    }

    fn setup_globals(context: &mut Context, overlay: &OverlayContext) -> OverlayResult<()> {
        register_native_console(context, overlay.console().fallback().clone())?;

        // Window object (self-referential global)
        let window = context.global_object();
        for name in ["window", "self"] {
            context
                .register_global_property(JsString::from(name), window.clone(), Attribute::all())
                .map_err(|e| script_error(&e, context))?;
        }
        Ok(())
    }

    /// Evaluate a script.
    ///
    /// An uncaught error goes to the current global `onerror` with the
    /// usual five arguments. If that returns true the error counts as
    /// handled and `undefined` is returned; otherwise it is returned as
    /// [`OverlayError::Script`].
    pub fn execute(&mut self, source: &str, name: &str) -> OverlayResult<JsValue> {
        match self.context.eval(Source::from_bytes(source)) {
            Ok(value) => Ok(value),
            Err(error) => self.report_uncaught(error, name),
        }
    }

    /// Evaluate an unnamed script.
    pub fn eval(&mut self, source: &str) -> OverlayResult<JsValue> {
        self.script_counter += 1;
        let name = format!("script_{}", self.script_counter);
        self.execute(source, &name)
    }

    /// Route an uncaught error through the global `onerror`.
    ///
    /// The engine attaches a position only to syntax errors, as an
    /// `at line N, col M` suffix of the message. Other errors are reported
    /// at line 0, column 0, meaning the position is unknown.
    fn report_uncaught(&mut self, error: JsError, name: &str) -> OverlayResult<JsValue> {
        let context = &mut self.context;
        let thrown = error.to_opaque(context);
        let message = format!("Uncaught {}", to_text(&thrown, context));
        let (line, column) = reported_position(&message).unwrap_or((0, 0));
        tracing::debug!(script = name, %message, line, column, "uncaught script error");

        let handler = context
            .global_object()
            .get(js_string!("onerror"), context)
            .map_err(|e| script_error(&e, context))?;

        let suppressed = match handler.as_callable() {
            Some(handler) => {
                let args = [
                    JsValue::from(JsString::from(message.as_str())),
                    JsValue::from(JsString::from(name)),
                    JsValue::from(line),
                    JsValue::from(column),
                    thrown,
                ];
                handler
                    .call(&JsValue::undefined(), &args, context)
                    .map_err(|e| script_error(&e, context))?
                    .to_boolean()
            }
            None => false,
        };

        if suppressed {
            Ok(JsValue::undefined())
        } else {
            Err(OverlayError::script(message))
        }
    }

    /// Read a global variable.
    pub fn get_global(&mut self, name: &str) -> OverlayResult<JsValue> {
        let global = self.context.global_object();
        global
            .get(JsString::from(name), &mut self.context)
            .map_err(|e| script_error(&e, &mut self.context))
    }

    pub fn overlay(&self) -> &Arc<OverlayContext> {
        &self.overlay
    }

    pub fn overrides(&self) -> &ConsoleOverrideTable {
        &self.overrides
    }
}

/// Line and column of an `... at line N, col M` error message.
fn reported_position(message: &str) -> Option<(u32, u32)> {
    let (_, position) = message.rsplit_once(" at line ")?;
    let (line, rest) = position.split_once(", col ")?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    Some((line.trim().parse().ok()?, rest[..digits].parse().ok()?))
}
