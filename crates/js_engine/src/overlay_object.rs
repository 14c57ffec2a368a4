//! The global `debugOverlay` object.

use crate::value::{script_error, to_overlay_value};
use boa_engine::{
    js_string, object::ObjectInitializer, property::Attribute, Context, JsResult, JsValue,
    NativeFunction,
};
use boa_gc::{Finalize, Trace};
use common::OverlayResult;
use overlay::{Channel, OverlayContext, Value};
use std::sync::Arc;

type OverlayMethod = fn(&OverlayContext, &[JsValue], &mut Context) -> JsResult<JsValue>;

#[derive(Trace, Finalize)]
struct OverlayCaptures {
    #[unsafe_ignore_trace]
    overlay: Arc<OverlayContext>,
}

fn bind(overlay: &Arc<OverlayContext>, method: OverlayMethod) -> NativeFunction {
    NativeFunction::from_copy_closure_with_captures(
        move |_: &JsValue, args: &[JsValue], captures: &OverlayCaptures, context: &mut Context| {
            method(&captures.overlay, args, context)
        },
        OverlayCaptures {
            overlay: overlay.clone(),
        },
    )
}

fn report(overlay: &OverlayContext, channel: Channel, args: &[JsValue], context: &mut Context) {
    let values: Vec<Value> = args
        .iter()
        .map(|arg| to_overlay_value(arg, context))
        .collect();
    overlay.console().print(channel, values);
}

fn overlay_enable(overlay: &OverlayContext, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(overlay.enable().into())
}

fn overlay_disable(overlay: &OverlayContext, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(overlay.disable().into())
}

fn overlay_show(overlay: &OverlayContext, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(overlay.show().into())
}

fn overlay_hide(overlay: &OverlayContext, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(overlay.hide().into())
}

fn overlay_is_enabled(overlay: &OverlayContext, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(overlay.is_enabled().into())
}

fn overlay_is_shown(overlay: &OverlayContext, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(overlay.is_shown().into())
}

fn overlay_log(overlay: &OverlayContext, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    report(overlay, Channel::Log, args, context);
    Ok(JsValue::undefined())
}

fn overlay_warn(overlay: &OverlayContext, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    report(overlay, Channel::Warn, args, context);
    Ok(JsValue::undefined())
}

fn overlay_error(overlay: &OverlayContext, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    report(overlay, Channel::Error, args, context);
    Ok(JsValue::undefined())
}

/// Define the global `debugOverlay` object: panel operations plus direct
/// access to the three reporting channels.
pub fn register_overlay_object(context: &mut Context, overlay: &Arc<OverlayContext>) -> OverlayResult<()> {
    let object = ObjectInitializer::new(context)
        .function(bind(overlay, overlay_enable), js_string!("enable"), 0)
        .function(bind(overlay, overlay_disable), js_string!("disable"), 0)
        .function(bind(overlay, overlay_show), js_string!("show"), 0)
        .function(bind(overlay, overlay_hide), js_string!("hide"), 0)
        .function(bind(overlay, overlay_is_enabled), js_string!("isEnabled"), 0)
        .function(bind(overlay, overlay_is_shown), js_string!("isShown"), 0)
        .function(bind(overlay, overlay_log), js_string!("log"), 0)
        .function(bind(overlay, overlay_warn), js_string!("warn"), 0)
        .function(bind(overlay, overlay_error), js_string!("error"), 0)
        .build();

    context
        .register_global_property(
            js_string!("debugOverlay"),
            object,
            Attribute::READONLY | Attribute::NON_ENUMERABLE | Attribute::PERMANENT,
        )
        .map_err(|e| script_error(&e, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;
    use dom::Document;
    use overlay::testing::RecordingSink;
    use overlay::OverlayConfig;

    fn setup() -> (Context, Arc<OverlayContext>, Arc<RecordingSink>) {
        let native = Arc::new(RecordingSink::new());
        let overlay = OverlayContext::with_native(
            Document::blank().into_shared(),
            OverlayConfig::default(),
            native.clone(),
        );
        let mut context = Context::default();
        register_overlay_object(&mut context, &overlay).unwrap();
        (context, overlay, native)
    }

    fn eval_bool(context: &mut Context, source: &str) -> bool {
        context
            .eval(Source::from_bytes(source))
            .unwrap()
            .as_boolean()
            .unwrap()
    }

    #[test]
    fn test_operations_report_changes() {
        let (mut context, overlay, _) = setup();
        assert!(eval_bool(&mut context, "debugOverlay.enable()"));
        assert!(!eval_bool(&mut context, "debugOverlay.enable()"));
        assert!(eval_bool(&mut context, "debugOverlay.show()"));
        assert!(eval_bool(&mut context, "debugOverlay.isShown()"));
        assert!(eval_bool(&mut context, "debugOverlay.hide()"));
        assert!(eval_bool(&mut context, "debugOverlay.disable()"));
        assert!(!eval_bool(&mut context, "debugOverlay.isEnabled()"));
        assert!(!overlay.is_enabled());
    }

    #[test]
    fn test_channels_follow_panel() {
        let (mut context, overlay, native) = setup();
        context
            .eval(Source::from_bytes("debugOverlay.warn('early', 1)"))
            .unwrap();
        assert_eq!(native.texts(), vec!["early 1"]);

        overlay.enable();
        context
            .eval(Source::from_bytes("debugOverlay.error('late')"))
            .unwrap();
        assert_eq!(native.texts().len(), 1);
        assert_eq!(overlay.panel().line_count(), 1);
    }

    #[test]
    fn test_object_is_stable() {
        let (mut context, _, _) = setup();
        assert!(eval_bool(&mut context, "debugOverlay === debugOverlay"));
        assert!(eval_bool(&mut context, "debugOverlay === globalThis.debugOverlay"));
        assert!(eval_bool(
            &mut context,
            "debugOverlay = null; debugOverlay !== null"
        ));
    }
}
