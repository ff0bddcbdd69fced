//! Test-only, in-memory `RemoteStore` implementation used by unit and
//! behaviour tests.

use std::cell::RefCell;

use serde_json::Value;

use crate::{InsertKind, RemoteStore, StoreError, StoreResponse};

/// One call observed by a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Whether the call was a single or batch insert.
    pub kind: InsertKind,
    /// Target table.
    pub table: String,
    /// Payload as it would have been sent on the wire.
    pub payload: Value,
}

#[derive(Debug, Clone)]
enum Reply {
    Echo,
    Status { status: u16, body: Value },
    Error(StoreError),
}

/// `RemoteStore` double that records calls and replays a fixed reply.
///
/// Statuses are judged with [`InsertKind::accepts`], so a store configured
/// with `200` accepts batches but rejects single inserts, matching the HTTP
/// client.
#[derive(Debug)]
pub struct RecordingStore {
    reply: Reply,
    calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingStore {
    /// A store that accepts every insert with `201` and echoes the payload.
    #[must_use]
    pub const fn accepting() -> Self {
        Self::with_reply(Reply::Echo)
    }

    /// A store answering every call with `status` and `body`.
    #[must_use]
    pub const fn with_status(status: u16, body: Value) -> Self {
        Self::with_reply(Reply::Status { status, body })
    }

    /// A store failing every call with `error`.
    #[must_use]
    pub const fn failing(error: StoreError) -> Self {
        Self::with_reply(Reply::Error(error))
    }

    const fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Calls observed so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn record(
        &self,
        kind: InsertKind,
        table: &str,
        payload: Value,
    ) -> Result<StoreResponse, StoreError> {
        if table.trim().is_empty() {
            return Err(StoreError::InvalidTable);
        }
        self.calls.borrow_mut().push(RecordedCall {
            kind,
            table: table.to_owned(),
            payload: payload.clone(),
        });
        match &self.reply {
            Reply::Echo => Ok(StoreResponse {
                status: 201,
                body: payload,
            }),
            Reply::Status { status, body } if kind.accepts(*status) => Ok(StoreResponse {
                status: *status,
                body: body.clone(),
            }),
            Reply::Status { status, body } => Err(StoreError::Rejected {
                table: table.to_owned(),
                status: *status,
                body: body.to_string(),
            }),
            Reply::Error(error) => Err(error.clone()),
        }
    }
}

impl RemoteStore for RecordingStore {
    fn insert_single(&self, table: &str, row: &Value) -> Result<StoreResponse, StoreError> {
        self.record(InsertKind::Single, table, row.clone())
    }

    fn insert_batch(&self, table: &str, rows: &[Value]) -> Result<StoreResponse, StoreError> {
        self.record(InsertKind::Batch, table, Value::Array(rows.to_vec()))
    }
}
