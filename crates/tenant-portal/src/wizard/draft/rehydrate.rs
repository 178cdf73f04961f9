use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::wizard::domain::iso_instant;

/// Keys whose values are date instants wherever they appear in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Dob,
    MoveInDate,
    MoveOutDate,
}

impl DateField {
    pub const ALL: [Self; 3] = [Self::Dob, Self::MoveInDate, Self::MoveOutDate];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Dob => "dob",
            Self::MoveInDate => "moveInDate",
            Self::MoveOutDate => "moveOutDate",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RehydrateError {
    #[error("'{field}' at {path} is not a recognisable date: {value:?}")]
    InvalidDate {
        field: &'static str,
        path: String,
        value: String,
    },
    #[error("'{field}' at {path} must be text, found {kind}")]
    UnexpectedType {
        field: &'static str,
        path: String,
        kind: &'static str,
    },
}

/// Rebuild a parsed draft with every [`DateField`] normalised to canonical ISO-8601
/// instant text, at any depth.
///
/// Accepts RFC 3339 instants, naive date-times (read as UTC) and bare `YYYY-MM-DD`
/// dates (midnight UTC). `null` and blank text become `null`. Anything else fails, so a
/// draft never hands raw, unparsed date text to the form.
pub fn rehydrate_dates(value: Value) -> Result<Value, RehydrateError> {
    walk(value, "$")
}

fn walk(value: Value, path: &str) -> Result<Value, RehydrateError> {
    match value {
        Value::Object(entries) => {
            let mut rebuilt = Map::with_capacity(entries.len());
            for (key, child) in entries {
                let child_path = format!("{path}.{key}");
                let child = match DateField::from_key(&key) {
                    Some(field) => rehydrate_field(field, child, &child_path)?,
                    None => walk(child, &child_path)?,
                };
                rebuilt.insert(key, child);
            }
            Ok(Value::Object(rebuilt))
        }
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| walk(item, &format!("{path}[{index}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        scalar => Ok(scalar),
    }
}

fn rehydrate_field(field: DateField, value: Value, path: &str) -> Result<Value, RehydrateError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(text) if text.trim().is_empty() => Ok(Value::Null),
        Value::String(text) => match parse_instant(&text) {
            Some(instant) => Ok(Value::String(iso_instant::format(&instant))),
            None => Err(RehydrateError::InvalidDate {
                field: field.key(),
                path: path.to_string(),
                value: text,
            }),
        },
        other => Err(RehydrateError::UnexpectedType {
            field: field.key(),
            path: path.to_string(),
            kind: kind_of(&other),
        }),
    }
}

fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
