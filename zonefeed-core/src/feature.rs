//! Generic GeoJSON feature shapes consumed by ingestion.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One entry of a GeoJSON `features` array.
///
/// Only the attribute mapping matters to ingestion; the geometry is kept as
/// an opaque JSON value.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use zonefeed_core::RawFeature;
///
/// let feature: RawFeature = serde_json::from_value(json!({
///     "type": "Feature",
///     "properties": { "Zona_ID": 4 },
///     "geometry": null
/// }))?;
/// assert_eq!(feature.property("Zona_ID"), Some(&json!(4)));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFeature {
    /// Attribute mapping; `None` when the member is absent or `null`.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// Geometry object, ignored by ingestion.
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl RawFeature {
    /// Construct a feature from an attribute mapping without geometry.
    #[must_use]
    pub const fn with_properties(properties: Map<String, Value>) -> Self {
        Self {
            properties: Some(properties),
            geometry: None,
        }
    }

    /// Look up a single attribute.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }
}

/// Parsed GeoJSON document holding a `features` sequence.
///
/// The top-level `type` member is tolerated but not required; a missing or
/// non-array `features` member fails deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureCollection {
    /// Features in document order.
    pub features: Vec<RawFeature>,
}

impl FeatureCollection {
    /// Number of features in the collection.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over the features in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, RawFeature> {
        self.features.iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a RawFeature;
    type IntoIter = std::slice::Iter<'a, RawFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
