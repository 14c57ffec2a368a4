//! Conversions between script values and overlay values.

use boa_engine::{Context, JsError, JsResult, JsString, JsValue};
use common::OverlayError;
use overlay::{ErrorValue, Value};

/// The script's `ToString` of a value. A throwing `toString` falls back to
/// the engine's display form, so reporting never fails.
pub fn to_text(value: &JsValue, context: &mut Context) -> String {
    match value.to_string(context) {
        Ok(text) => text.to_std_string_escaped(),
        Err(_) => value.display().to_string(),
    }
}

/// Convert an argument of a reporting call. Objects are coerced to text.
pub fn to_overlay_value(value: &JsValue, context: &mut Context) -> Value {
    match value {
        JsValue::Undefined => Value::Undefined,
        JsValue::Null => Value::Null,
        JsValue::Boolean(b) => Value::Bool(*b),
        JsValue::Integer(i) => Value::Number(f64::from(*i)),
        JsValue::Rational(r) => Value::Number(*r),
        JsValue::String(s) => Value::String(s.to_std_string_escaped()),
        other => Value::String(to_text(other, context)),
    }
}

fn string_property(value: &JsValue, name: &str, context: &mut Context) -> JsResult<Option<String>> {
    let Some(object) = value.as_object() else {
        return Ok(None);
    };
    let property = object.get(JsString::from(name), context)?;
    Ok(property.as_string().map(|s| s.to_std_string_escaped()))
}

/// Read `name`, `message` and `stack` off an error object. Non-objects give
/// `None`; a missing or non-string `stack` is left empty.
pub fn error_value(value: &JsValue, context: &mut Context) -> JsResult<Option<ErrorValue>> {
    if !value.is_object() {
        return Ok(None);
    }
    Ok(Some(ErrorValue {
        name: string_property(value, "name", context)?.unwrap_or_default(),
        message: string_property(value, "message", context)?.unwrap_or_default(),
        stack: string_property(value, "stack", context)?,
    }))
}

/// Describe a script error for the embedding side.
pub fn script_error(error: &JsError, context: &mut Context) -> OverlayError {
    let message = error
        .try_native(context)
        .map(|native| native.to_string())
        .unwrap_or_else(|_| error.to_string());
    OverlayError::script(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;

    fn eval(context: &mut Context, source: &str) -> JsValue {
        context.eval(Source::from_bytes(source)).unwrap()
    }

    #[test]
    fn test_primitive_conversion() {
        let mut context = Context::default();
        assert_eq!(to_overlay_value(&JsValue::from(3), &mut context), Value::Number(3.0));
        assert_eq!(
            to_overlay_value(&eval(&mut context, "'hi'"), &mut context),
            Value::from("hi")
        );
        assert_eq!(to_overlay_value(&JsValue::null(), &mut context), Value::Null);
    }

    #[test]
    fn test_numbers_display_like_script_to_string() {
        let mut context = Context::default();
        for source in ["1e21", "1e-7", "123456789012345680000", "-0", "2 ** 53", "1 / 3"] {
            let number = eval(&mut context, source);
            assert_eq!(
                to_overlay_value(&number, &mut context).to_string(),
                to_text(&number, &mut context),
                "{source}"
            );
        }
    }

    #[test]
    fn test_objects_coerce_to_text() {
        let mut context = Context::default();
        let object = eval(&mut context, "({})");
        assert_eq!(
            to_overlay_value(&object, &mut context),
            Value::from("[object Object]")
        );
        let array = eval(&mut context, "[1, 'a']");
        assert_eq!(to_text(&array, &mut context), "1,a");
    }

    #[test]
    fn test_throwing_to_string_does_not_fail() {
        let mut context = Context::default();
        let hostile = eval(&mut context, "({ toString() { throw new Error('no'); } })");
        assert!(!to_text(&hostile, &mut context).is_empty());
    }

    #[test]
    fn test_error_value() {
        let mut context = Context::default();
        let error = eval(&mut context, "var e = new TypeError('bad'); e.stack = 'trace'; e");
        let value = error_value(&error, &mut context).unwrap().unwrap();
        assert_eq!(value.name, "TypeError");
        assert_eq!(value.message, "bad");
        assert_eq!(value.stack.as_deref(), Some("trace"));
        assert_eq!(error_value(&JsValue::from(1), &mut context).unwrap(), None);
    }
}
