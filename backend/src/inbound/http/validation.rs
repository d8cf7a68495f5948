//! Shared validation helpers for inbound HTTP adapters.
//!
//! Raw request values become domain values here. Every failure is an
//! `invalid_request` error whose details name the offending field with a
//! dotted path such as `phone_numbers.1.phone`.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value, json};

use crate::domain::{Error, TextError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Empty,
    TooLong,
    Malformed,
    InvalidDate,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::Malformed => "malformed",
            Self::InvalidDate => "invalid_date",
            Self::InvalidId => "invalid_id",
        }
    }
}

/// Dotted path naming a request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldName(Cow<'static, str>);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Path of element `index` within this collection field.
    pub(crate) fn index(&self, index: usize) -> Self {
        Self(Cow::Owned(format!("{}.{index}", self.0)))
    }

    /// Path of `name` nested under this field.
    pub(crate) fn child(&self, name: &str) -> Self {
        Self(Cow::Owned(format!("{}.{name}", self.0)))
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validation_error(
    field: &FieldName,
    code: ErrorCode,
    message: String,
    extra: Option<(&'static str, Value)>,
) -> Error {
    let mut details = Map::new();
    details.insert("field".to_owned(), json!(field.as_str()));
    details.insert("code".to_owned(), json!(code.as_str()));
    if let Some((key, value)) = extra {
        details.insert(key.to_owned(), value);
    }
    Error::invalid_request(message).with_details(Value::Object(details))
}

pub(crate) fn missing_field_error(field: &FieldName) -> Error {
    validation_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
        None,
    )
}

pub(crate) fn text_error(field: &FieldName, error: TextError) -> Error {
    match error {
        TextError::Empty => validation_error(
            field,
            ErrorCode::Empty,
            format!("{field} must not be empty"),
            None,
        ),
        TextError::TooLong { max } => validation_error(
            field,
            ErrorCode::TooLong,
            format!("{field} must be at most {max} characters"),
            Some(("max", json!(max))),
        ),
        TextError::Malformed => validation_error(
            field,
            ErrorCode::Malformed,
            format!("{field} is not well formed"),
            None,
        ),
    }
}

/// Parse a required text value.
pub(crate) fn parse_text<T>(
    field: &FieldName,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, TextError>,
) -> Result<T, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    parse(value).map_err(|err| text_error(field, err))
}

/// Parse a nullable text value. Blank strings count as absent.
pub(crate) fn parse_optional_text<T>(
    field: &FieldName,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, TextError>,
) -> Result<Option<T>, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse(raw)
            .map(Some)
            .map_err(|err| text_error(field, err)),
        _ => Ok(None),
    }
}

/// Parse a `YYYY-MM-DD` date. Blank strings count as absent.
pub(crate) fn parse_optional_date(
    field: &FieldName,
    value: Option<String>,
) -> Result<Option<NaiveDate>, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                validation_error(
                    field,
                    ErrorCode::InvalidDate,
                    format!("{field} must be a date in YYYY-MM-DD format"),
                    Some(("value", json!(raw))),
                )
            }),
        _ => Ok(None),
    }
}

/// Require a positive database identifier.
pub(crate) fn parse_id(field: &FieldName, value: i64) -> Result<i64, Error> {
    if value > 0 {
        Ok(value)
    } else {
        Err(validation_error(
            field,
            ErrorCode::InvalidId,
            format!("{field} must be a positive integer"),
            Some(("value", json!(value))),
        ))
    }
}
