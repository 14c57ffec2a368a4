//! Console API: the environment's native console and the overlay's
//! overrides on top of it.

use crate::value::{script_error, to_overlay_value};
use boa_engine::{
    js_string,
    object::{builtins::JsFunction, FunctionObjectBuilder, ObjectInitializer},
    property::Attribute,
    Context, JsObject, JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{Finalize, Trace};
use common::{OverlayError, OverlayResult};
use overlay::{Channel, OverlayContext, Record, Sink, Value};
use std::sync::Arc;

/// Console log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    /// Channel the level is written on.
    pub fn channel(&self) -> Channel {
        match self {
            LogLevel::Log | LogLevel::Info | LogLevel::Debug => Channel::Log,
            LogLevel::Warn => Channel::Warn,
            LogLevel::Error => Channel::Error,
        }
    }

    /// Tag for levels that share a channel with plain `log`.
    fn tag(&self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG] ",
            _ => "",
        }
    }

    fn method_name(&self) -> &'static str {
        match self {
            LogLevel::Log => "log",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Debug => "debug",
        }
    }
}

#[derive(Trace, Finalize)]
struct NativeConsoleCaptures {
    #[unsafe_ignore_trace]
    sink: Arc<dyn Sink>,
    #[unsafe_ignore_trace]
    level: LogLevel,
}

/// Register the native console on the global object, writing to `sink`.
///
/// This is the console scripts see when no overlay is installed, with
/// structured formatting of objects and arrays.
pub fn register_native_console(context: &mut Context, sink: Arc<dyn Sink>) -> OverlayResult<()> {
    let mut console = ObjectInitializer::new(context);
    for level in [
        LogLevel::Log,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Debug,
    ] {
        let function = NativeFunction::from_copy_closure_with_captures(
            |_: &JsValue, args: &[JsValue], captures: &NativeConsoleCaptures, context: &mut Context| {
                native_write(captures, args, context);
                Ok(JsValue::undefined())
            },
            NativeConsoleCaptures {
                sink: sink.clone(),
                level,
            },
        );
        console.function(function, JsString::from(level.method_name()), 0);
    }
    let console = console.build();

    context
        .register_global_property(js_string!("console"), console, Attribute::all())
        .map_err(|e| script_error(&e, context))
}

fn native_write(captures: &NativeConsoleCaptures, args: &[JsValue], context: &mut Context) {
    let pieces: Vec<String> = args.iter().map(|arg| format_value(arg, context, 0)).collect();
    let record = Record {
        channel: captures.level.channel(),
        text: format!("{}{}", captures.level.tag(), pieces.join(" ")),
        args: pieces.into_iter().map(Value::String).collect(),
    };
    captures.sink.write(&record);
}

/// Format a single value.
fn format_value(value: &JsValue, context: &mut Context, depth: usize) -> String {
    if depth > 3 {
        return "[...]".to_string();
    }

    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::Null => "null".to_string(),
        JsValue::Boolean(b) => b.to_string(),
        JsValue::Integer(i) => i.to_string(),
        JsValue::Rational(r) => Value::Number(*r).to_string(),
        JsValue::String(s) => s.to_std_string_escaped(),
        JsValue::Symbol(s) => format!(
            "Symbol({})",
            s.description()
                .map(|d| d.to_std_string_escaped())
                .unwrap_or_default()
        ),
        JsValue::BigInt(b) => format!("{}n", b),
        JsValue::Object(obj) => format_object(obj, context, depth),
    }
}

fn format_object(obj: &JsObject, context: &mut Context, depth: usize) -> String {
    if obj.is_array() {
        let length = obj
            .get(js_string!("length"), context)
            .ok()
            .and_then(|v| v.to_length(context).ok())
            .unwrap_or(0);

        let mut items = Vec::new();
        for i in 0..length.min(10) {
            if let Ok(item) = obj.get(i, context) {
                items.push(format_value(&item, context, depth + 1));
            }
        }

        if length > 10 {
            items.push(format!("... {} more items", length - 10));
        }

        format!("[{}]", items.join(", "))
    } else if obj.is_callable() {
        let name = obj
            .get(js_string!("name"), context)
            .ok()
            .and_then(|v| v.as_string().map(|s| s.to_std_string_escaped()))
            .unwrap_or_default();

        if name.is_empty() {
            "[Function (anonymous)]".to_string()
        } else {
            format!("[Function: {}]", name)
        }
    } else {
        let keys = obj.own_property_keys(context).unwrap_or_default();
        let mut pairs = Vec::new();

        for (i, key) in keys.iter().enumerate() {
            if i >= 5 {
                pairs.push(format!("... {} more", keys.len() - 5));
                break;
            }

            if let Ok(value) = obj.get(key.clone(), context) {
                pairs.push(format!("{}: {}", key, format_value(&value, context, depth + 1)));
            }
        }

        format!("{{ {} }}", pairs.join(", "))
    }
}

/// One overridden console method.
pub struct ConsoleOverride {
    pub channel: Channel,
    /// The method as it was before the override.
    pub original: JsFunction,
    /// The installed wrapper, now reachable as `console.<channel>`.
    pub wrapper: JsFunction,
}

/// The console methods replaced by the overlay, one per channel.
pub struct ConsoleOverrideTable {
    entries: Vec<ConsoleOverride>,
}

impl ConsoleOverrideTable {
    pub fn get(&self, channel: Channel) -> Option<&ConsoleOverride> {
        self.entries.iter().find(|entry| entry.channel == channel)
    }

    pub fn original(&self, channel: Channel) -> Option<&JsFunction> {
        self.get(channel).map(|entry| &entry.original)
    }

    pub fn wrapper(&self, channel: Channel) -> Option<&JsFunction> {
        self.get(channel).map(|entry| &entry.wrapper)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsoleOverride> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Trace, Finalize)]
struct OverrideCaptures {
    original: JsFunction,
    #[unsafe_ignore_trace]
    overlay: Arc<OverlayContext>,
    #[unsafe_ignore_trace]
    channel: Channel,
}

fn console_override(
    this: &JsValue,
    args: &[JsValue],
    captures: &OverrideCaptures,
    context: &mut Context,
) -> JsResult<JsValue> {
    let console = captures.overlay.console();
    if !console.is_intercepting() {
        return captures.original.call(this, args, context);
    }

    let values = args
        .iter()
        .map(|arg| to_overlay_value(arg, context))
        .collect();
    console.print(captures.channel, values);
    Ok(JsValue::undefined())
}

/// Replace `console.log`, `console.warn` and `console.error` with wrappers
/// that report through the overlay's console while it intercepts and call
/// the original methods otherwise.
///
/// Each original is read once, before its wrapper is installed. Callers
/// holding a reference to an original keep calling the original.
pub fn install_console_overrides(
    context: &mut Context,
    overlay: Arc<OverlayContext>,
) -> OverlayResult<ConsoleOverrideTable> {
    let global = context.global_object();
    let console = global
        .get(js_string!("console"), context)
        .map_err(|e| script_error(&e, context))?
        .as_object()
        .cloned()
        .ok_or_else(|| OverlayError::invalid("no console object to override"))?;

    let mut entries = Vec::with_capacity(Channel::ALL.len());
    for channel in Channel::ALL {
        let key = JsString::from(channel.name());
        let original = console
            .get(key.clone(), context)
            .map_err(|e| script_error(&e, context))?
            .as_object()
            .cloned()
            .and_then(JsFunction::from_object)
            .ok_or_else(|| {
                OverlayError::invalid(format!("console.{} is not a function", channel.name()))
            })?;

        let native = NativeFunction::from_copy_closure_with_captures(
            console_override,
            OverrideCaptures {
                original: original.clone(),
                overlay: overlay.clone(),
                channel,
            },
        );
        let wrapper = FunctionObjectBuilder::new(context.realm(), native)
            .name(key.clone())
            .length(0)
            .build();

        console
            .set(key, wrapper.clone(), true, context)
            .map_err(|e| script_error(&e, context))?;
        tracing::debug!(channel = channel.name(), "console method overridden");

        entries.push(ConsoleOverride {
            channel,
            original,
            wrapper,
        });
    }

    Ok(ConsoleOverrideTable { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;
    use dom::Document;
    use overlay::testing::{RecordingSink, SharedBuffer};
    use overlay::{NativeSink, OverlayConfig};

    fn eval(context: &mut Context, source: &str) -> JsValue {
        context.eval(Source::from_bytes(source)).unwrap()
    }

    #[test]
    fn test_native_console_formatting() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let sink = Arc::new(NativeSink::with_writers(Box::new(out.clone()), Box::new(err.clone())));
        let mut context = Context::default();
        register_native_console(&mut context, sink).unwrap();

        eval(&mut context, "console.log('a', 1, [1, 2], { x: true }); console.info('i')");
        eval(&mut context, "console.warn(null, undefined); console.error(1.5)");

        assert_eq!(out.lines(), vec!["a 1 [1, 2] { x: true }", "[INFO] i"]);
        assert_eq!(err.lines(), vec!["[WARN] null undefined", "[ERROR] 1.5"]);
    }

    #[test]
    fn test_overrides_capture_originals() {
        let native = Arc::new(RecordingSink::new());
        let overlay = OverlayContext::with_native(
            Document::blank().into_shared(),
            OverlayConfig::default(),
            native.clone(),
        );
        let mut context = Context::default();
        register_native_console(&mut context, native.clone()).unwrap();
        let before = eval(&mut context, "console.log");

        let table = install_console_overrides(&mut context, overlay.clone()).unwrap();
        assert_eq!(table.len(), 3);

        let after = eval(&mut context, "console.log");
        let original = table.original(Channel::Log).unwrap();
        let wrapper = table.wrapper(Channel::Log).unwrap();
        assert!(JsObject::equals(before.as_object().unwrap(), original));
        assert!(JsObject::equals(after.as_object().unwrap(), wrapper));

        // Detached: the original receives the call.
        eval(&mut context, "console.warn('w', 2)");
        assert_eq!(native.texts(), vec!["w 2"]);
        assert_eq!(native.records()[0].channel, Channel::Warn);
    }

    #[test]
    fn test_override_requires_console() {
        let overlay = OverlayContext::with_native(
            Document::blank().into_shared(),
            OverlayConfig::default(),
            Arc::new(RecordingSink::new()),
        );
        let mut context = Context::default();
        let result = install_console_overrides(&mut context, overlay);
        assert!(matches!(result, Err(OverlayError::InvalidOperation(_))));
    }
}
