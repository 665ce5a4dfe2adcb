use serde_json::{json, Value};

use super::MapperError;

/// Account attributes that live in page properties (everything except `id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    User,
    Niche,
    Email,
    Region,
    VideosPerDay,
    PostTime,
    Backlog,
    TargetLen,
    Caption,
    LastPost,
}

impl Field {
    /// Key used in the flat JSON record
    pub fn key(&self) -> &'static str {
        match self {
            Field::User => "user",
            Field::Niche => "niche",
            Field::Email => "email",
            Field::Region => "region",
            Field::VideosPerDay => "videosPerDay",
            Field::PostTime => "postTime",
            Field::Backlog => "backlog",
            Field::TargetLen => "targetLen",
            Field::Caption => "caption",
            Field::LastPost => "lastPost",
        }
    }
}

/// Notion property types used by the accounts database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Email,
    Date,
}

/// A single field value, independent of its property encoding
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Null,
}

impl FieldValue {
    /// Empty text, zero and null all read as "not set"
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => *n == 0,
            FieldValue::Null => true,
        }
    }

    pub fn into_text(self, field: Field) -> Result<String, MapperError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Null => Ok(String::new()),
            FieldValue::Number(_) => Err(mismatch(field, "a string")),
        }
    }

    pub fn into_number(self, field: Field) -> Result<i64, MapperError> {
        match self {
            FieldValue::Number(n) => Ok(n),
            _ => Err(mismatch(field, "an integer")),
        }
    }

    /// Empty text and null are both `None`
    pub fn into_optional_text(self, field: Field) -> Result<Option<String>, MapperError> {
        match self {
            FieldValue::Text(s) if !s.is_empty() => Ok(Some(s)),
            FieldValue::Text(_) | FieldValue::Null => Ok(None),
            FieldValue::Number(_) => Err(mismatch(field, "a string")),
        }
    }
}

fn mismatch(field: Field, expected: &'static str) -> MapperError {
    MapperError::InvalidInput { field: field.key(), expected }
}

/// Value substituted when a property is missing or falsy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Number(i64),
    Null,
}

impl FieldDefault {
    pub fn value(&self) -> FieldValue {
        match self {
            FieldDefault::Text(s) => FieldValue::Text((*s).to_string()),
            FieldDefault::Number(n) => FieldValue::Number(*n),
            FieldDefault::Null => FieldValue::Null,
        }
    }
}

/// One row of the account ↔ page mapping
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    /// Property name in the database. Case and spaces matter.
    pub property: &'static str,
    pub kind: PropertyKind,
    pub default: FieldDefault,
    /// Replace a falsy input with `default` when writing
    pub fill_on_write: bool,
}

pub const ACCOUNT_FIELDS: [FieldSpec; 10] = [
    FieldSpec { field: Field::User, property: "User", kind: PropertyKind::Title, default: FieldDefault::Text(""), fill_on_write: false },
    FieldSpec { field: Field::Niche, property: "Niche", kind: PropertyKind::RichText, default: FieldDefault::Text(""), fill_on_write: false },
    FieldSpec { field: Field::Email, property: "Email", kind: PropertyKind::Email, default: FieldDefault::Text(""), fill_on_write: false },
    FieldSpec { field: Field::Region, property: "Region", kind: PropertyKind::RichText, default: FieldDefault::Text(""), fill_on_write: false },
    FieldSpec { field: Field::VideosPerDay, property: "Videos Per Day", kind: PropertyKind::Number, default: FieldDefault::Number(1), fill_on_write: false },
    FieldSpec { field: Field::PostTime, property: "Post Time", kind: PropertyKind::RichText, default: FieldDefault::Text("12:00"), fill_on_write: false },
    FieldSpec { field: Field::Backlog, property: "Backlog", kind: PropertyKind::Number, default: FieldDefault::Number(0), fill_on_write: false },
    FieldSpec { field: Field::TargetLen, property: "Target Length", kind: PropertyKind::Number, default: FieldDefault::Number(30), fill_on_write: true },
    FieldSpec { field: Field::Caption, property: "Caption", kind: PropertyKind::RichText, default: FieldDefault::Text(""), fill_on_write: false },
    FieldSpec { field: Field::LastPost, property: "Last Post", kind: PropertyKind::Date, default: FieldDefault::Null, fill_on_write: false },
];

impl PropertyKind {
    /// Key of the value container inside a property object
    pub fn key(&self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Number => "number",
            PropertyKind::Email => "email",
            PropertyKind::Date => "date",
        }
    }

    /// Read a property object. Missing, empty and falsy values yield `None`.
    pub fn extract(&self, property: Option<&Value>) -> Option<FieldValue> {
        let container = property?.get(self.key())?;

        let value = match self {
            PropertyKind::Title | PropertyKind::RichText => {
                let first = container.as_array()?.first()?;
                let text = first
                    .pointer("/text/content")
                    .and_then(Value::as_str)
                    .or_else(|| first.get("plain_text").and_then(Value::as_str))?;
                FieldValue::Text(text.to_string())
            }
            PropertyKind::Email => FieldValue::Text(container.as_str()?.to_string()),
            PropertyKind::Number => {
                let n = container
                    .as_i64()
                    .or_else(|| container.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
                FieldValue::Number(n)
            }
            PropertyKind::Date => FieldValue::Text(container.get("start")?.as_str()?.to_string()),
        };

        if value.is_falsy() {
            None
        } else {
            Some(value)
        }
    }

    /// Build the property object written to the store. A value of the wrong
    /// type for `field` is rejected, never coerced.
    pub fn encode(&self, field: Field, value: FieldValue) -> Result<Value, MapperError> {
        let property = match self {
            PropertyKind::Title | PropertyKind::RichText => {
                json!({ self.key(): [{ "text": { "content": value.into_text(field)? } }] })
            }
            PropertyKind::Number => match value {
                FieldValue::Null => json!({ "number": null }),
                other => json!({ "number": other.into_number(field)? }),
            },
            PropertyKind::Email => json!({ "email": value.into_optional_text(field)? }),
            PropertyKind::Date => match value.into_optional_text(field)? {
                Some(start) => json!({ "date": { "start": start } }),
                None => json!({ "date": null }),
            },
        };
        Ok(property)
    }
}
