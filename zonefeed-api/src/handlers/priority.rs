//! Priority list endpoint.

use axum::Json;
use tracing::debug;
use zonefeed_core::{PriorityEntry, dummy_priority_list};

/// `GET /api/priority-list`: zip codes with their score and map colour.
pub async fn priority_list_handler() -> Json<Vec<PriorityEntry>> {
    let entries = dummy_priority_list();
    debug!(entries = entries.len(), "serving priority list");
    Json(entries)
}
