//! Map raw GeoJSON features onto [`ZoneRecord`] values.
//!
//! A feature yields a record only when its `Zona_ID`, `District` and a name
//! are all present and truthy. Every other feature is rejected with a
//! [`SkipReason`] so callers can count or report the drop.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::truthy::is_truthy;
use crate::{RawFeature, ZoneRecord};

/// Property holding the integer zone identifier.
pub const ZONE_ID_KEY: &str = "Zona_ID";
/// Property holding the district.
pub const DISTRICT_KEY: &str = "District";
/// Properties consulted for the zone name, in order of preference.
pub const NAME_KEYS: [&str; 2] = ["Zone_Nam_1", "Name"];
/// Optional property holding the screening count.
pub const SCREENED_KEY: &str = "screened";

/// Why a feature produced no [`ZoneRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SkipReason {
    /// The feature has no `properties` mapping.
    #[error("feature has no properties")]
    MissingProperties,
    /// `Zona_ID` is absent or falsy.
    #[error("missing Zona_ID")]
    MissingZoneId,
    /// `Zona_ID` is present but not convertible to an integer.
    #[error("Zona_ID is not an integer")]
    InvalidZoneId,
    /// `District` is absent or falsy.
    #[error("missing District")]
    MissingDistrict,
    /// No name property is truthy, or the first truthy one is not text or a number.
    #[error("missing zone name (Zone_Nam_1 or Name)")]
    MissingName,
    /// `screened` is present but not convertible to an integer.
    #[error("screened is not an integer")]
    InvalidScreened,
}

/// What ingestion does with a feature that fails normalisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipPolicy {
    /// Drop the feature, count it, and continue.
    #[default]
    Skip,
    /// Abort the run at the first invalid feature.
    Fail,
}

/// Error returned when parsing an unknown [`SkipPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown skip policy {0:?} (expected `skip` or `fail`)")]
pub struct ParseSkipPolicyError(String);

impl FromStr for SkipPolicy {
    type Err = ParseSkipPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            _ => Err(ParseSkipPolicyError(value.to_owned())),
        }
    }
}

impl fmt::Display for SkipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Fail => "fail",
        })
    }
}

/// Normalise one feature into a [`ZoneRecord`].
///
/// Fields are checked in a fixed order (identifier, district, name,
/// screening count), so a feature with several problems always reports the
/// first one.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use zonefeed_core::{RawFeature, SkipReason, normalise_feature};
///
/// let feature: RawFeature = serde_json::from_value(json!({
///     "properties": { "Zona_ID": 2, "Name": "Old Town" }
/// }))?;
/// assert_eq!(normalise_feature(&feature), Err(SkipReason::MissingDistrict));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn normalise_feature(feature: &RawFeature) -> Result<ZoneRecord, SkipReason> {
    let properties = feature
        .properties
        .as_ref()
        .ok_or(SkipReason::MissingProperties)?;

    let raw_zone_id = truthy_property(properties, ZONE_ID_KEY).ok_or(SkipReason::MissingZoneId)?;
    let zone_id = coerce_integer(raw_zone_id).ok_or(SkipReason::InvalidZoneId)?;
    let district = truthy_property(properties, DISTRICT_KEY).ok_or(SkipReason::MissingDistrict)?;
    let zone_name = resolve_name(properties).ok_or(SkipReason::MissingName)?;
    let screened = match truthy_property(properties, SCREENED_KEY) {
        Some(value) => coerce_integer(value).ok_or(SkipReason::InvalidScreened)?,
        None => 0,
    };

    Ok(ZoneRecord::new(zone_id, zone_name, district.clone(), screened))
}

fn truthy_property<'a>(properties: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    properties.get(key).filter(|value| is_truthy(value))
}

/// The first truthy name property decides. A truthy value that is neither
/// text nor a number yields no name; later keys are not consulted.
fn resolve_name(properties: &Map<String, Value>) -> Option<String> {
    let value = NAME_KEYS
        .iter()
        .find_map(|key| truthy_property(properties, key))?;
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer conversion accepting integers, truncated floats, booleans and
/// decimal strings.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "floats are range-checked before truncating to i64"
)]
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().and_then(|n| i64::try_from(n).ok()))
            .or_else(|| {
                number.as_f64().and_then(|n| {
                    (n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64)
                        .then(|| n.trunc() as i64)
                })
            }),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::String(text) => text.trim().parse().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn feature(properties: Value) -> RawFeature {
        serde_json::from_value(json!({ "type": "Feature", "properties": properties }))
            .expect("test feature should deserialise")
    }

    #[fixture]
    fn complete() -> Value {
        json!({
            "Zona_ID": 14,
            "District": "Centro",
            "Zone_Nam_1": "Las Palmas",
            "screened": 31
        })
    }

    #[rstest]
    fn builds_record_from_complete_feature(complete: Value) {
        let record = normalise_feature(&feature(complete)).expect("feature is complete");
        assert_eq!(record.zone_id(), 14);
        assert_eq!(record.zone_name(), "Las Palmas");
        assert_eq!(record.district(), &json!("Centro"));
        assert_eq!(record.screened(), 31);
        assert_eq!(record.priority(), None);
        assert_eq!(record.rank(), None);
    }

    #[rstest]
    #[case(ZONE_ID_KEY, SkipReason::MissingZoneId)]
    #[case(DISTRICT_KEY, SkipReason::MissingDistrict)]
    fn missing_required_field_is_skipped(
        complete: Value,
        #[case] key: &str,
        #[case] reason: SkipReason,
    ) {
        let mut properties = complete;
        properties
            .as_object_mut()
            .expect("fixture is an object")
            .remove(key);
        assert_eq!(normalise_feature(&feature(properties)), Err(reason));
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(""))]
    #[case(json!(null))]
    #[case(json!(false))]
    fn falsy_zone_id_is_treated_as_missing(complete: Value, #[case] zone_id: Value) {
        let mut properties = complete;
        properties[ZONE_ID_KEY] = zone_id;
        assert_eq!(
            normalise_feature(&feature(properties)),
            Err(SkipReason::MissingZoneId)
        );
    }

    #[rstest]
    fn missing_both_names_is_skipped(complete: Value) {
        let mut properties = complete;
        properties
            .as_object_mut()
            .expect("fixture is an object")
            .remove("Zone_Nam_1");
        assert_eq!(
            normalise_feature(&feature(properties)),
            Err(SkipReason::MissingName)
        );
    }

    #[test]
    fn missing_properties_is_skipped() {
        let raw: RawFeature =
            serde_json::from_value(json!({ "type": "Feature" })).expect("feature parses");
        assert_eq!(normalise_feature(&raw), Err(SkipReason::MissingProperties));
    }

    #[test]
    fn primary_name_wins_over_fallback() {
        let record = normalise_feature(&feature(json!({
            "Zona_ID": 1, "District": "D", "Zone_Nam_1": "A", "Name": "B"
        })))
        .expect("feature is complete");
        assert_eq!(record.zone_name(), "A");
    }

    #[test]
    fn empty_primary_name_falls_back() {
        let record = normalise_feature(&feature(json!({
            "Zona_ID": 1, "District": "D", "Zone_Nam_1": "", "Name": "B"
        })))
        .expect("fallback name resolves");
        assert_eq!(record.zone_name(), "B");
    }

    #[rstest]
    #[case(json!(true))]
    #[case(json!([1]))]
    #[case(json!({ "en": "A" }))]
    fn non_text_primary_name_does_not_fall_back(#[case] primary: Value) {
        assert_eq!(
            normalise_feature(&feature(json!({
                "Zona_ID": 1, "District": "D", "Zone_Nam_1": primary, "Name": "B"
            }))),
            Err(SkipReason::MissingName)
        );
    }

    #[test]
    fn numeric_primary_name_is_rendered_as_text() {
        let record = normalise_feature(&feature(json!({
            "Zona_ID": 1, "District": "D", "Zone_Nam_1": 7, "Name": "B"
        })))
        .expect("numeric name resolves");
        assert_eq!(record.zone_name(), "7");
    }

    #[rstest]
    #[case(json!({ "Zona_ID": 1, "District": "D", "Name": "N" }))]
    #[case(json!({ "Zona_ID": 1, "District": "D", "Name": "N", "screened": 0 }))]
    #[case(json!({ "Zona_ID": 1, "District": "D", "Name": "N", "screened": false }))]
    #[case(json!({ "Zona_ID": 1, "District": "D", "Name": "N", "screened": null }))]
    fn absent_or_falsy_screened_defaults_to_zero(#[case] properties: Value) {
        let record = normalise_feature(&feature(properties)).expect("feature is complete");
        assert_eq!(record.screened(), 0);
    }

    #[rstest]
    #[case(json!(12), Some(12))]
    #[case(json!(12.9), Some(12))]
    #[case(json!(-3.5), Some(-3))]
    #[case(json!(" 42 "), Some(42))]
    #[case(json!(true), Some(1))]
    #[case(json!("4.5"), None)]
    #[case(json!("abc"), None)]
    #[case(json!([1]), None)]
    fn coerces_integers(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(coerce_integer(&value), expected);
    }

    #[test]
    fn non_numeric_zone_id_is_invalid() {
        assert_eq!(
            normalise_feature(&feature(json!({
                "Zona_ID": "north", "District": "D", "Name": "N"
            }))),
            Err(SkipReason::InvalidZoneId)
        );
    }

    #[test]
    fn invalid_zone_id_is_reported_before_missing_district() {
        assert_eq!(
            normalise_feature(&feature(json!({ "Zona_ID": "north", "Name": "N" }))),
            Err(SkipReason::InvalidZoneId)
        );
    }

    #[test]
    fn non_numeric_screened_is_invalid() {
        assert_eq!(
            normalise_feature(&feature(json!({
                "Zona_ID": 3, "District": "D", "Name": "N", "screened": "many"
            }))),
            Err(SkipReason::InvalidScreened)
        );
    }

    #[test]
    fn numeric_district_keeps_its_type() {
        let record = normalise_feature(&feature(json!({
            "Zona_ID": 3, "District": 5, "Name": "N"
        })))
        .expect("feature is complete");
        assert_eq!(record.district(), &json!(5));
    }

    #[rstest]
    #[case("skip", SkipPolicy::Skip)]
    #[case("FAIL", SkipPolicy::Fail)]
    #[case(" fail ", SkipPolicy::Fail)]
    fn parses_skip_policy(#[case] raw: &str, #[case] expected: SkipPolicy) {
        assert_eq!(raw.parse::<SkipPolicy>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_skip_policy() {
        assert!("ignore".parse::<SkipPolicy>().is_err());
    }
}
