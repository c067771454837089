//! Table-driven request validation.
//!
//! A payload type lists its accepted fields as a static table of
//! [`FieldRule`]s. [`validate`] walks that table, keeps only the listed
//! fields, and reports at most one [`Violation`] per field (the first
//! constraint that fails). [`ValidatedJson`] runs this before a handler sees
//! the body.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Constraint checked against one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Value is a JSON string.
    IsString,
    /// Value is not null and, for strings, not empty.
    NotEmpty,
    /// String holds at most `max` characters; `message` is reported on failure.
    MaxLength { max: usize, message: &'static str },
    /// String is an ISBN-13 (hyphens and spaces ignored, checksum verified).
    Isbn13,
}

impl Constraint {
    fn check(&self, field: &str, value: &Value) -> Result<(), String> {
        match self {
            Constraint::IsString => match value {
                Value::String(_) => Ok(()),
                _ => Err(format!("{field} must be a string")),
            },
            Constraint::NotEmpty => match value {
                Value::Null => Err(format!("{field} should not be empty")),
                Value::String(s) if s.is_empty() => Err(format!("{field} should not be empty")),
                _ => Ok(()),
            },
            Constraint::MaxLength { max, message } => match value {
                Value::String(s) if s.chars().count() <= *max => Ok(()),
                _ => Err((*message).to_string()),
            },
            Constraint::Isbn13 => match value {
                Value::String(s) if is_isbn13(s) => Ok(()),
                _ => Err(format!("{field} must be an ISBN")),
            },
        }
    }
}

/// Accepted field and the constraints applied to it, in order.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    /// Absent or null values skip every constraint.
    pub optional: bool,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    pub const fn required(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self {
            field,
            optional: false,
            constraints,
        }
    }

    pub const fn optional(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self {
            field,
            optional: true,
            constraints,
        }
    }
}

/// Payload types that describe their own field rules.
pub trait Validate: DeserializeOwned {
    const RULES: &'static [FieldRule];
}

/// Check `payload` against `rules`.
///
/// On success returns an object holding only the fields named in `rules`.
pub fn validate(payload: &Value, rules: &[FieldRule]) -> Result<Map<String, Value>, Vec<Violation>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![Violation::new(
            "body",
            "request body must be a JSON object",
        )]);
    };

    let mut normalized = Map::new();
    let mut violations = Vec::new();

    for rule in rules {
        let value = object.get(rule.field).unwrap_or(&Value::Null);

        if value.is_null() && rule.optional {
            continue;
        }

        let failure = if value.is_null() {
            Some(format!("{} should not be empty", rule.field))
        } else {
            rule.constraints
                .iter()
                .find_map(|constraint| constraint.check(rule.field, value).err())
        };

        match failure {
            Some(message) => violations.push(Violation::new(rule.field, message)),
            None => {
                normalized.insert(rule.field.to_string(), value.clone());
            }
        }
    }

    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(violations)
    }
}

/// ISBN-13 check: 13 digits once hyphens and spaces are removed, with a
/// valid mod-10 checksum (weights alternate 1 and 3).
pub fn is_isbn13(raw: &str) -> bool {
    let digits: Vec<u32> = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if digits.len() != 13 {
        return false;
    }

    let weighted: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();

    (10 - weighted % 10) % 10 == digits[12]
}

/// JSON body extractor that validates against `T::RULES` before
/// deserializing.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        let normalized = validate(&payload, T::RULES).map_err(AppError::validation)?;

        let value = serde_json::from_value(Value::Object(normalized))
            .map_err(|e| AppError::bad_request(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor whose rejections go through [`AppError`].
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(QueryParams(params))
    }
}
