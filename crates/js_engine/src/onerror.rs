//! The global `onerror` hook.

use crate::value::{error_value, script_error, to_overlay_value, to_text};
use boa_engine::{
    js_string, object::builtins::JsFunction, object::FunctionObjectBuilder, Context, JsArgs,
    JsResult, JsValue, NativeFunction,
};
use boa_gc::{Finalize, Trace};
use common::OverlayResult;
use overlay::{ErrorEvent, OverlayContext};
use std::sync::Arc;

#[derive(Trace, Finalize)]
struct ErrorHookCaptures {
    /// Handlers that were installed before this hook, oldest first.
    previous: Vec<JsFunction>,
    #[unsafe_ignore_trace]
    overlay: Arc<OverlayContext>,
}

/// Build an [`ErrorEvent`] from the five `onerror` arguments.
pub fn error_event_from_args(args: &[JsValue], context: &mut Context) -> JsResult<ErrorEvent> {
    let message = to_overlay_value(args.get_or_undefined(0), context);
    let source = match args.get_or_undefined(1) {
        JsValue::Undefined => String::new(),
        other => to_text(other, context),
    };
    let line = args.get_or_undefined(2).to_u32(context)?;
    let column = args.get_or_undefined(3).to_u32(context)?;

    let mut event = ErrorEvent::new(message).at(source, line, column);
    event.error = error_value(args.get_or_undefined(4), context)?;
    Ok(event)
}

fn on_error(
    this: &JsValue,
    args: &[JsValue],
    captures: &ErrorHookCaptures,
    context: &mut Context,
) -> JsResult<JsValue> {
    // A throwing handler aborts the chain and the throw reaches the caller.
    for previous in &captures.previous {
        previous.call(this, args, context)?;
    }

    let event = error_event_from_args(args, context)?;
    let suppressed = captures.overlay.errors().dispatch(&event);
    Ok(JsValue::from(suppressed))
}

/// Install the overlay's global `onerror`, chained after the handler that
/// was there before.
///
/// The hook runs the previous handler with the same arguments, then hands
/// the error to the overlay's error bridge. It returns `true`, suppressing
/// default reporting, exactly when the panel is attached.
pub fn install_error_hook(context: &mut Context, overlay: Arc<OverlayContext>) -> OverlayResult<JsFunction> {
    let global = context.global_object();
    let current = global
        .get(js_string!("onerror"), context)
        .map_err(|e| script_error(&e, context))?;

    let previous: Vec<JsFunction> = current
        .as_object()
        .cloned()
        .and_then(JsFunction::from_object)
        .into_iter()
        .collect();
    tracing::debug!(chained = previous.len(), "installing onerror hook");

    let native =
        NativeFunction::from_copy_closure_with_captures(on_error, ErrorHookCaptures { previous, overlay });
    let hook = FunctionObjectBuilder::new(context.realm(), native)
        .name(js_string!("onerror"))
        .length(5)
        .build();

    global
        .set(js_string!("onerror"), hook.clone(), true, context)
        .map_err(|e| script_error(&e, context))?;
    Ok(hook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;
    use dom::Document;
    use overlay::testing::RecordingSink;
    use overlay::{OverlayConfig, Value};

    fn eval(context: &mut Context, source: &str) -> JsValue {
        context.eval(Source::from_bytes(source)).unwrap()
    }

    fn overlay() -> Arc<OverlayContext> {
        OverlayContext::with_native(
            Document::blank().into_shared(),
            OverlayConfig::default(),
            Arc::new(RecordingSink::new()),
        )
    }

    #[test]
    fn test_event_from_args() {
        let mut context = Context::default();
        let args = eval(
            &mut context,
            "var e = new Error('boom'); e.stack = 's'; ['Uncaught Error: boom', 'app.js', 3, 7, e]",
        );
        let array = args.as_object().unwrap();
        let args: Vec<JsValue> = (0..5u32)
            .map(|i| array.get(i, &mut context).unwrap())
            .collect();

        let event = error_event_from_args(&args, &mut context).unwrap();
        assert_eq!(event.message, Value::from("Uncaught Error: boom"));
        assert_eq!(event.source, "app.js");
        assert_eq!((event.line, event.column), (3, 7));
        assert_eq!(event.stack(), Some("s"));

        let bare = error_event_from_args(&[], &mut context).unwrap();
        assert_eq!(bare.message, Value::Undefined);
        assert_eq!(bare.error, None);
    }

    #[test]
    fn test_hook_chains_previous_handler() {
        let overlay = overlay();
        let mut context = Context::default();
        eval(
            &mut context,
            "var seen = []; onerror = function (msg, src, line) { seen.push(msg + '@' + line); return true; };",
        );
        install_error_hook(&mut context, overlay.clone()).unwrap();

        // Previous handler runs, but only the panel decides suppression.
        let result = eval(&mut context, "onerror('first', 'a.js', 1, 1, null)");
        assert_eq!(result.as_boolean(), Some(false));
        overlay.enable();
        let result = eval(&mut context, "onerror('second', 'a.js', 2, 1, null)");
        assert_eq!(result.as_boolean(), Some(true));

        let seen = eval(&mut context, "seen.join('|')");
        assert_eq!(seen.as_string().unwrap().to_std_string_escaped(), "first@1|second@2");
        assert_eq!(overlay.panel().line_count(), 1);
    }

    #[test]
    fn test_throwing_previous_handler_propagates() {
        let overlay = overlay();
        overlay.enable();
        let mut context = Context::default();
        eval(&mut context, "onerror = function () { throw new Error('handler broke'); };");
        install_error_hook(&mut context, overlay.clone()).unwrap();

        let result = context.eval(Source::from_bytes("onerror('x', '', 0, 0)"));
        assert!(result.is_err());
        assert_eq!(overlay.panel().line_count(), 0);
    }

    #[test]
    fn test_hook_without_previous_handler() {
        let overlay = overlay();
        let mut context = Context::default();
        let hook = install_error_hook(&mut context, overlay).unwrap();
        let current = eval(&mut context, "onerror");
        assert!(boa_engine::JsObject::equals(current.as_object().unwrap(), &hook));
    }
}
