//! Validated domain records: users, projects and the tasks projects own.
//!
//! Every entity checks its fields when constructed and again in each `set_*`
//! method. Records read back from disk go through the same checks via
//! `TryFrom<*Record>`, which only differs from fresh construction in keeping an
//! existing `id` and `created_at` verbatim.

mod project;
mod task;
mod user;

pub use project::{Project, ProjectRecord};
pub use task::{Task, TaskRecord, TaskStatus};
pub use user::{User, UserRecord};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::error::ValidationError;

/// Anything carrying an opaque string identity.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Returns a new random identifier.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time as an RFC 3339 string.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Keeps a stored identity, generating one only when none was supplied.
pub(crate) fn id_or_new(id: Option<String>) -> String {
    match id {
        Some(id) if !id.is_empty() => id,
        _ => new_id(),
    }
}

/// Keeps a stored creation timestamp as-is, stamping now only when absent.
pub(crate) fn timestamp_or_now(created_at: Option<String>) -> String {
    created_at.unwrap_or_else(now_timestamp)
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn non_empty(
    value: &str,
    entity: &'static str,
    field: &'static str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(trimmed.to_string())
}

/// Parses a due date given either as `YYYY-MM-DD` or as an ISO date-time.
///
/// Date-times are recognized by the `T` separator and may carry fractional
/// seconds and a `Z`/`±HH:MM` offset. The calendar date is taken in the
/// string's own offset.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let value = input.trim();
    let invalid = || ValidationError::InvalidDate(input.to_string());

    if !value.contains('T') {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt.date());
        }
    }

    // RFC 3339 requires seconds; `HH:MM` with an offset is handled here.
    let zoned = match value.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    DateTime::parse_from_str(&zoned, "%Y-%m-%dT%H:%M%:z")
        .map(|dt| dt.date_naive())
        .map_err(|_| invalid())
}
