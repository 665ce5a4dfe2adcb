// accounts - flat account record and its mapping to database pages

mod fields;
mod mapper;

pub use fields::{Field, FieldDefault, FieldSpec, FieldValue, PropertyKind, ACCOUNT_FIELDS};
pub use mapper::{decode, encode};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One managed posting profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Page id assigned by the store
    pub id: String,
    pub user: String,
    pub niche: String,
    pub email: String,
    pub region: String,
    pub videos_per_day: i64,
    /// Free-form, usually "HH:MM"
    pub post_time: String,
    pub backlog: i64,
    pub target_len: i64,
    pub caption: String,
    /// ISO 8601 date of the last post
    pub last_post: Option<String>,
}

impl Account {
    /// Record with every field at its default
    pub fn with_defaults(id: impl Into<String>) -> Self {
        let mut account = Self { id: id.into(), ..Default::default() };
        for spec in ACCOUNT_FIELDS.iter() {
            if let Err(e) = account.set(spec.field, spec.default.value()) {
                tracing::warn!(property = spec.property, error = %e, "default does not fit field");
            }
        }
        account
    }

    /// Assign one field. A value of the wrong kind is an error and leaves the
    /// field unchanged.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), MapperError> {
        match field {
            Field::User => self.user = value.into_text(field)?,
            Field::Niche => self.niche = value.into_text(field)?,
            Field::Email => self.email = value.into_text(field)?,
            Field::Region => self.region = value.into_text(field)?,
            Field::VideosPerDay => self.videos_per_day = value.into_number(field)?,
            Field::PostTime => self.post_time = value.into_text(field)?,
            Field::Backlog => self.backlog = value.into_number(field)?,
            Field::TargetLen => self.target_len = value.into_number(field)?,
            Field::Caption => self.caption = value.into_text(field)?,
            Field::LastPost => self.last_post = value.into_optional_text(field)?,
        }
        Ok(())
    }
}

/// Caller-supplied account attributes for create and update. `None` means the
/// key was missing or null in the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountFields {
    pub user: Option<String>,
    pub niche: Option<String>,
    pub email: Option<String>,
    pub region: Option<String>,
    pub videos_per_day: Option<i64>,
    pub post_time: Option<String>,
    pub backlog: Option<i64>,
    pub target_len: Option<i64>,
    pub caption: Option<String>,
    pub last_post: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapperError {
    #[error("account payload must be a JSON object")]
    NotAnObject,

    #[error("invalid value for '{field}': expected {expected}")]
    InvalidInput {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid date for '{field}': {value}")]
    InvalidDate { field: &'static str, value: String },
}

impl AccountFields {
    /// Parse a request body. Unknown keys (including `id`) are ignored.
    pub fn from_json(value: Value) -> Result<Self, MapperError> {
        let Value::Object(map) = value else {
            return Err(MapperError::NotAnObject);
        };

        let mut fields = Self::default();
        for spec in ACCOUNT_FIELDS.iter() {
            let key = spec.field.key();
            let value = match spec.kind {
                PropertyKind::Number => integer_field(&map, key)?.map(FieldValue::Number),
                PropertyKind::Date => date_field(&map, key)?.map(FieldValue::Text),
                _ => string_field(&map, key)?.map(FieldValue::Text),
            };
            fields.set(spec.field, value)?;
        }
        Ok(fields)
    }

    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::User => self.user.clone().map(FieldValue::Text),
            Field::Niche => self.niche.clone().map(FieldValue::Text),
            Field::Email => self.email.clone().map(FieldValue::Text),
            Field::Region => self.region.clone().map(FieldValue::Text),
            Field::VideosPerDay => self.videos_per_day.map(FieldValue::Number),
            Field::PostTime => self.post_time.clone().map(FieldValue::Text),
            Field::Backlog => self.backlog.map(FieldValue::Number),
            Field::TargetLen => self.target_len.map(FieldValue::Number),
            Field::Caption => self.caption.clone().map(FieldValue::Text),
            Field::LastPost => self.last_post.clone().map(FieldValue::Text),
        }
    }

    /// Assign one field. `None` and `Some(FieldValue::Null)` both clear it.
    pub fn set(&mut self, field: Field, value: Option<FieldValue>) -> Result<(), MapperError> {
        let value = value.filter(|v| *v != FieldValue::Null);
        match field {
            Field::User => self.user = value.map(|v| v.into_text(field)).transpose()?,
            Field::Niche => self.niche = value.map(|v| v.into_text(field)).transpose()?,
            Field::Email => self.email = value.map(|v| v.into_text(field)).transpose()?,
            Field::Region => self.region = value.map(|v| v.into_text(field)).transpose()?,
            Field::VideosPerDay => self.videos_per_day = value.map(|v| v.into_number(field)).transpose()?,
            Field::PostTime => self.post_time = value.map(|v| v.into_text(field)).transpose()?,
            Field::Backlog => self.backlog = value.map(|v| v.into_number(field)).transpose()?,
            Field::TargetLen => self.target_len = value.map(|v| v.into_number(field)).transpose()?,
            Field::Caption => self.caption = value.map(|v| v.into_text(field)).transpose()?,
            Field::LastPost => {
                self.last_post = value.map(|v| v.into_optional_text(field)).transpose()?.flatten()
            }
        }
        Ok(())
    }
}

impl From<&Account> for AccountFields {
    fn from(account: &Account) -> Self {
        Self {
            user: Some(account.user.clone()),
            niche: Some(account.niche.clone()),
            email: Some(account.email.clone()),
            region: Some(account.region.clone()),
            videos_per_day: Some(account.videos_per_day),
            post_time: Some(account.post_time.clone()),
            backlog: Some(account.backlog),
            target_len: Some(account.target_len),
            caption: Some(account.caption.clone()),
            last_post: account.last_post.clone(),
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>, MapperError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(MapperError::InvalidInput { field: key, expected: "a string" }),
    }
}

fn integer_field(map: &Map<String, Value>, key: &'static str) -> Result<Option<i64>, MapperError> {
    let invalid = MapperError::InvalidInput { field: key, expected: "an integer" };
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                _ => Err(invalid),
            }
        }
        Some(_) => Err(invalid),
    }
}

fn date_field(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>, MapperError> {
    let Some(value) = string_field(map, key)? else {
        return Ok(None);
    };
    if value.is_empty() {
        return Ok(None);
    }

    let valid = NaiveDate::parse_from_str(&value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(&value).is_ok()
        || NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M").is_ok();
    if valid {
        Ok(Some(value))
    } else {
        Err(MapperError::InvalidDate { field: key, value })
    }
}
