//! dBase attribute values as JSON.

use serde_json::{Number, Value};
use shapefile::dbase::{Date, FieldValue};

/// Convert one dBase field into the JSON value written to `properties`.
///
/// Blank character fields become `null`; numeric fields holding whole
/// numbers become JSON integers.
pub(crate) fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(text) => text.map_or(Value::Null, text_value),
        FieldValue::Memo(text) => text_value(text),
        FieldValue::Numeric(number) => number.map_or(Value::Null, number_value),
        FieldValue::Float(number) => number.map_or(Value::Null, |n| number_value(f64::from(n))),
        FieldValue::Double(number) | FieldValue::Currency(number) => number_value(number),
        FieldValue::Integer(number) => Value::from(number),
        FieldValue::Logical(flag) => flag.map_or(Value::Null, Value::Bool),
        FieldValue::Date(date) => date.map_or(Value::Null, |d| Value::String(format_date(&d))),
        FieldValue::DateTime(stamp) => {
            let time = stamp.time();
            Value::String(format!(
                "{}T{:02}:{:02}:{:02}",
                format_date(&stamp.date()),
                time.hours(),
                time.minutes(),
                time.seconds()
            ))
        }
    }
}

fn text_value(text: String) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_owned())
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "whole numbers are range-checked before narrowing to i64"
)]
fn number_value(number: f64) -> Value {
    let whole = number.is_finite()
        && number.fract() == 0.0
        && number >= i64::MIN as f64
        && number < i64::MAX as f64;
    if whole {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

fn format_date(date: &Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}
