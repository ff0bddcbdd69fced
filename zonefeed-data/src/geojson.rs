//! Load GeoJSON feature collections from disk.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use zonefeed_core::FeatureCollection;
use zonefeed_fs::read_utf8_to_string;

/// Errors raised while reading a GeoJSON document.
#[derive(Debug, Error)]
pub enum GeoJsonReadError {
    /// No file exists at the given path.
    #[error("GeoJSON file not found at {path}")]
    NotFound {
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read GeoJSON file at {path}: {source}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The content is not JSON or lacks a `features` array.
    #[error("failed to parse GeoJSON feature collection at {path}: {source}")]
    Parse {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse a GeoJSON feature collection.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use zonefeed_data::read_feature_collection;
///
/// let collection = read_feature_collection(Utf8Path::new("residential_zones.geojson"))?;
/// println!("{} features", collection.len());
/// # Ok::<(), zonefeed_data::GeoJsonReadError>(())
/// ```
pub fn read_feature_collection(path: &Utf8Path) -> Result<FeatureCollection, GeoJsonReadError> {
    let text = read_utf8_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            GeoJsonReadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            GeoJsonReadError::Open {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| GeoJsonReadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
