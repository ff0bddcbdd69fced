//! Submit rows to a remote relational store.
//!
//! The [`RemoteStore`] trait abstracts the REST boundary that zone ingestion
//! and the single-row insert helper write through. Implementations report
//! every outcome as a typed [`Result`] so callers decide whether to retry or
//! abort; nothing is retried here.

mod error;

pub use error::StoreError;

use serde_json::Value;

/// Shape of an insert request, which determines the accepted status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertKind {
    /// One JSON object; only `201 Created` counts as success.
    Single,
    /// A JSON array of objects; `200 OK` or `201 Created` count as success.
    Batch,
}

impl InsertKind {
    /// Whether `status` is a successful response for this kind of insert.
    ///
    /// # Examples
    /// ```
    /// use zonefeed_core::InsertKind;
    ///
    /// assert!(InsertKind::Batch.accepts(200));
    /// assert!(!InsertKind::Single.accepts(200));
    /// ```
    #[must_use]
    pub const fn accepts(self, status: u16) -> bool {
        match self {
            Self::Single => status == 201,
            Self::Batch => matches!(status, 200 | 201),
        }
    }
}

/// Successful store response.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    /// HTTP status code returned by the store.
    pub status: u16,
    /// Echoed representation of the inserted rows, `Null` when empty.
    pub body: Value,
}

impl StoreResponse {
    /// Number of rows echoed back, counting a lone object as one.
    #[must_use]
    pub fn echoed_rows(&self) -> usize {
        match &self.body {
            Value::Array(rows) => rows.len(),
            Value::Object(_) => 1,
            _ => 0,
        }
    }
}

/// Insert rows into named tables of a remote store.
///
/// # Examples
///
/// ```rust
/// use serde_json::{Value, json};
/// use zonefeed_core::{InsertKind, RemoteStore, StoreError, StoreResponse};
///
/// struct EchoStore;
///
/// impl RemoteStore for EchoStore {
///     fn insert_single(&self, _table: &str, row: &Value) -> Result<StoreResponse, StoreError> {
///         Ok(StoreResponse { status: 201, body: row.clone() })
///     }
///
///     fn insert_batch(&self, _table: &str, rows: &[Value]) -> Result<StoreResponse, StoreError> {
///         Ok(StoreResponse { status: 201, body: Value::Array(rows.to_vec()) })
///     }
/// }
///
/// let response = EchoStore.insert_batch("zones", &[json!({ "zone_id": 1 })])?;
/// assert!(InsertKind::Batch.accepts(response.status));
/// assert_eq!(response.echoed_rows(), 1);
/// # Ok::<(), StoreError>(())
/// ```
pub trait RemoteStore {
    /// Insert one row into `table`.
    ///
    /// Implementations must treat any status other than `201` as
    /// [`StoreError::Rejected`].
    fn insert_single(&self, table: &str, row: &Value) -> Result<StoreResponse, StoreError>;

    /// Insert `rows` into `table` with a single request.
    ///
    /// Implementations must treat any status other than `200` or `201` as
    /// [`StoreError::Rejected`]. The batch succeeds or fails as a whole.
    fn insert_batch(&self, table: &str, rows: &[Value]) -> Result<StoreResponse, StoreError>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for &T {
    fn insert_single(&self, table: &str, row: &Value) -> Result<StoreResponse, StoreError> {
        (**self).insert_single(table, row)
    }

    fn insert_batch(&self, table: &str, rows: &[Value]) -> Result<StoreResponse, StoreError> {
        (**self).insert_batch(table, rows)
    }
}

impl<T: RemoteStore + ?Sized> RemoteStore for Box<T> {
    fn insert_single(&self, table: &str, row: &Value) -> Result<StoreResponse, StoreError> {
        (**self).insert_single(table, row)
    }

    fn insert_batch(&self, table: &str, rows: &[Value]) -> Result<StoreResponse, StoreError> {
        (**self).insert_batch(table, rows)
    }
}
