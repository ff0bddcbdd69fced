//! Shapefile to GeoJSON conversion for the map frontend.
//!
//! Every shape and its dBase record become one GeoJSON feature: attributes
//! land in `properties` and the shape in `geometry`. Coordinates are written
//! as stored; there is no reprojection.

mod attributes;
mod geometry;

use std::collections::BTreeSet;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use geo::{BoundingRect, Coord, Rect};
use log::{debug, info};
use serde_json::{Map, Value, json};
use shapefile::Reader;
use thiserror::Error;
use zonefeed_fs::{create_utf8_file, file_is_file};

use attributes::field_to_json;
use geometry::{geometry_to_geojson, shape_to_geometry};

/// Errors raised while converting a shapefile.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input `.shp` file does not exist.
    #[error("shapefile not found at {path}")]
    NotFound {
        /// Requested input path.
        path: Utf8PathBuf,
    },
    /// The input path could not be inspected.
    #[error("failed to inspect shapefile at {path}: {source}")]
    Inspect {
        /// Requested input path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The shapefile or its attribute table could not be decoded.
    #[error("failed to read shapefile at {path}: {source}")]
    Read {
        /// Requested input path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: shapefile::Error,
    },
    /// A shape has no GeoJSON representation.
    #[error("shape {index} is a {kind}, which GeoJSON cannot represent")]
    UnsupportedShape {
        /// Zero-based record position.
        index: usize,
        /// Shape type name.
        kind: &'static str,
    },
    /// The GeoJSON document could not be encoded.
    #[error("failed to encode GeoJSON: {0}")]
    Serialise(#[source] serde_json::Error),
    /// The output file could not be written.
    #[error("failed to write GeoJSON to {path}: {source}")]
    Write {
        /// Requested output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Summary of a completed conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    /// Features written.
    pub features: usize,
    /// Attribute column names, sorted.
    pub fields: Vec<String>,
    /// Bounding box of every geometry, if any geometry was present.
    pub bounds: Option<Rect<f64>>,
}

/// Convert the shapefile at `input` into a GeoJSON feature collection at
/// `output`, creating parent directories as needed.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use zonefeed_data::convert_shapefile;
///
/// let summary = convert_shapefile(
///     Utf8Path::new("data/Combined_residential_zones1.shp"),
///     Utf8Path::new("public/data/residential_zones.geojson"),
/// )?;
/// println!("columns: {:?}", summary.fields);
/// # Ok::<(), zonefeed_data::ConvertError>(())
/// ```
///
/// # Errors
///
/// Returns [`ConvertError`] when the input is missing or unreadable, holds a
/// multipatch shape, or the output cannot be written.
pub fn convert_shapefile(
    input: &Utf8Path,
    output: &Utf8Path,
) -> Result<ConvertSummary, ConvertError> {
    let present = file_is_file(input).map_err(|source| ConvertError::Inspect {
        path: input.to_path_buf(),
        source,
    })?;
    if !present {
        return Err(ConvertError::NotFound {
            path: input.to_path_buf(),
        });
    }

    let read_error = |source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    };
    let mut reader = Reader::from_path(input.as_std_path()).map_err(read_error)?;

    let mut features = Vec::new();
    let mut fields = BTreeSet::new();
    let mut bounds = None;
    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item.map_err(read_error)?;
        let geometry = shape_to_geometry(&shape)
            .map_err(|unsupported| ConvertError::UnsupportedShape {
                index,
                kind: unsupported.0,
            })?;

        let mut properties = Map::new();
        for (name, value) in record {
            fields.insert(name.clone());
            properties.insert(name, field_to_json(value));
        }

        let geometry_json = geometry.as_ref().map_or(Value::Null, |g| {
            bounds = merge_bounds(bounds, g.bounding_rect());
            geometry_to_geojson(g)
        });
        features.push(json!({
            "type": "Feature",
            "properties": properties,
            "geometry": geometry_json,
        }));
    }

    let summary = ConvertSummary {
        features: features.len(),
        fields: fields.into_iter().collect(),
        bounds,
    };
    debug!("shapefile columns: {:?}", summary.fields);

    let document = json!({ "type": "FeatureCollection", "features": features });
    let bytes = serde_json::to_vec(&document).map_err(ConvertError::Serialise)?;
    write_output(output, &bytes)?;

    info!(
        "converted {} features from {input} to {output}",
        summary.features
    );
    Ok(summary)
}

fn write_output(output: &Utf8Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let write_error = |source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    };
    let mut file = create_utf8_file(output).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.flush().map_err(write_error)
}

fn merge_bounds(lhs: Option<Rect<f64>>, rhs: Option<Rect<f64>>) -> Option<Rect<f64>> {
    match (lhs, rhs) {
        (Some(left), Some(right)) => Some(Rect::new(
            Coord {
                x: left.min().x.min(right.min().x),
                y: left.min().y.min(right.min().y),
            },
            Coord {
                x: left.max().x.max(right.max().x),
                y: left.max().y.max(right.max().y),
            },
        )),
        (Some(bounds), None) | (None, Some(bounds)) => Some(bounds),
        (None, None) => None,
    }
}
