//! Typed access to feature properties.

use geojson::{JsonObject, JsonValue};
use superfund_core::LayerKind;

use crate::LayerError;

/// Where a property is being read from, for error context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldContext {
    pub(crate) layer: LayerKind,
    pub(crate) feature: usize,
}

impl FieldContext {
    const fn missing(self, field: &'static str) -> LayerError {
        LayerError::MissingField {
            layer: self.layer,
            field,
            feature: self.feature,
        }
    }

    fn invalid(self, field: &'static str, reason: impl Into<String>) -> LayerError {
        LayerError::InvalidField {
            layer: self.layer,
            field,
            feature: self.feature,
            reason: reason.into(),
        }
    }
}

fn present<'a>(properties: Option<&'a JsonObject>, field: &str) -> Option<&'a JsonValue> {
    properties
        .and_then(|props| props.get(field))
        .filter(|value| !value.is_null())
}

/// A required text property.
pub(crate) fn required_string(
    properties: Option<&JsonObject>,
    field: &'static str,
    ctx: FieldContext,
) -> Result<String, LayerError> {
    match present(properties, field) {
        None => Err(ctx.missing(field)),
        Some(JsonValue::String(text)) => Ok(text.clone()),
        Some(other) => Err(ctx.invalid(field, format!("expected text, found {other}"))),
    }
}

/// A required finite number. Numeric text such as `"42.5"` is accepted.
pub(crate) fn required_number(
    properties: Option<&JsonObject>,
    field: &'static str,
    ctx: FieldContext,
) -> Result<f64, LayerError> {
    let value = match present(properties, field) {
        None => return Err(ctx.missing(field)),
        Some(JsonValue::Number(number)) => number.as_f64(),
        Some(JsonValue::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match value {
        Some(number) if number.is_finite() => Ok(number),
        Some(number) => Err(ctx.invalid(field, format!("{number} is not finite"))),
        None => Err(ctx.invalid(field, "expected a number")),
    }
}

/// A required non-negative whole count.
///
/// Integral floats such as `1234.0` are accepted and logged. Fractional,
/// negative and non-numeric values are rejected.
pub(crate) fn required_count(
    properties: Option<&JsonObject>,
    field: &'static str,
    ctx: FieldContext,
) -> Result<u64, LayerError> {
    let number = match present(properties, field) {
        None => return Err(ctx.missing(field)),
        Some(JsonValue::Number(number)) => number.clone(),
        Some(JsonValue::String(text)) => text
            .trim()
            .parse::<serde_json::Number>()
            .map_err(|_| ctx.invalid(field, format!("{text:?} is not a number")))?,
        Some(other) => return Err(ctx.invalid(field, format!("expected a count, found {other}"))),
    };
    if let Some(count) = number.as_u64() {
        return Ok(count);
    }
    if number.as_i64().is_some() {
        return Err(ctx.invalid(field, format!("{number} is negative")));
    }
    let Some(float) = number.as_f64() else {
        return Err(ctx.invalid(field, format!("{number} is not a count")));
    };
    coerce_integral(float)
        .inspect(|count| {
            log::debug!(
                "{} feature {}: coerced {field} {float} to {count}",
                ctx.layer,
                ctx.feature
            );
        })
        .ok_or_else(|| ctx.invalid(field, format!("{float} is not a whole, non-negative count")))
}

/// Convert a float that holds an exact non-negative integer.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the value is checked to be integral and within u64 range before casting"
)]
fn coerce_integral(value: f64) -> Option<u64> {
    let in_range = value.is_finite() && value >= 0.0 && value < u64::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as u64)
}

/// An optional label, taken from text or a number.
pub(crate) fn optional_label(properties: Option<&JsonObject>, field: &str) -> Option<String> {
    match present(properties, field)? {
        JsonValue::String(text) if !text.trim().is_empty() => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
