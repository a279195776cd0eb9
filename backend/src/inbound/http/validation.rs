//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, JobStatus, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    InvalidStatus,
    InvalidUser,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidUser => "invalid_user",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const APPLIED_DATE: FieldName = FieldName::new("appliedDate");
pub(crate) const STATUS: FieldName = FieldName::new("status");

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(
    field: FieldName,
    message: impl Into<String>,
    code: ErrorCode,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Reject a missing required field using `message` as the client text.
pub(crate) fn missing_field_error(field: FieldName, message: &str) -> Error {
    field_error(field, message, ErrorCode::MissingField)
}

/// Require a non-blank string field.
pub(crate) fn require_text(
    value: Option<String>,
    field: FieldName,
    message: &str,
) -> Result<String, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field, message))
}

/// Map a user value rejection onto a 400 carrying the offending field.
pub(crate) fn user_validation_error(error: UserValidationError) -> Error {
    let field = FieldName::new(error.field());
    field_error(field, error.to_string(), ErrorCode::InvalidUser)
}

/// Parse an applied date given as an RFC 3339 timestamp or a `YYYY-MM-DD`
/// calendar date at midnight UTC.
pub(crate) fn parse_applied_date(value: &str) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            value_error(
                APPLIED_DATE,
                "Applied date must be an RFC 3339 timestamp or YYYY-MM-DD date",
                ErrorCode::InvalidTimestamp,
                value,
            )
        })
}

pub(crate) fn parse_optional_applied_date(
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_applied_date(&raw))
        .transpose()
}

/// Parse an optional status field; unknown values are rejected.
pub(crate) fn parse_optional_status(value: Option<String>) -> Result<Option<JobStatus>, Error> {
    value
        .map(|raw| {
            raw.trim().parse::<JobStatus>().map_err(|error| {
                value_error(STATUS, error.to_string(), ErrorCode::InvalidStatus, &raw)
            })
        })
        .transpose()
}

/// Lenient status filter for list queries; unknown values are ignored.
pub(crate) fn status_filter(value: Option<&str>) -> Option<JobStatus> {
    value.and_then(|raw| raw.trim().parse::<JobStatus>().ok())
}

/// Parse a path identifier. A malformed id cannot name a stored record, so
/// it answers `not_found_message` with 404.
pub(crate) fn parse_path_id(value: &str, not_found_message: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| Error::not_found(not_found_message))
}
