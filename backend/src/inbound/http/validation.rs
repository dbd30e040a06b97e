//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs carry raw strings; these helpers turn them into domain values
//! and report failures as `invalid_request` errors whose details name the
//! offending field and a stable machine-readable code.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidDate,
    InvalidEnum,
    InvalidBase64,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidEnum => "invalid_enum",
            ErrorCode::InvalidBase64 => "invalid_base64",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn with_value(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Wrap a value-object validation failure, keeping its message.
pub(crate) fn invalid_field(field: FieldName, error: impl std::fmt::Display) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    with_value(
        field,
        format!("{name} must be a valid UUID"),
        ErrorCode::InvalidUuid,
        value,
    )
}

/// Parse an identifier path segment; malformed input is a validation error,
/// never a lookup miss.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .parse::<T>()
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Parse one of a closed set of tags such as a role or status.
pub(crate) fn parse_enum<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|error| with_value(field, error.to_string(), ErrorCode::InvalidEnum, value))
}

pub(crate) fn parse_optional_enum<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T::Err: std::fmt::Display,
{
    value.map(|raw| parse_enum(raw, field)).transpose()
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    let name = field.as_str();
                    with_value(
                        field,
                        format!("{name} must be an RFC 3339 timestamp"),
                        ErrorCode::InvalidTimestamp,
                        raw,
                    )
                })
        })
        .transpose()
}

pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                let name = field.as_str();
                with_value(
                    field,
                    format!("{name} must be a YYYY-MM-DD date"),
                    ErrorCode::InvalidDate,
                    raw,
                )
            })
        })
        .transpose()
}

pub(crate) fn invalid_base64_error(field: FieldName, filename: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} content for {filename} is not valid base64"))
        .with_details(json!({
            "field": name,
            "filename": filename,
            "code": ErrorCode::InvalidBase64.as_str(),
        }))
}
