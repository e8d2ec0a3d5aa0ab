use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{id_or_new, non_empty, now_timestamp, new_id, timestamp_or_now, Identified};
use crate::error::ValidationError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// A person who owns projects and can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: String,
    name: String,
    email: Option<String>,
    created_at: String,
}

/// Stored shape of a user, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRecord {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub created_at: Option<String>,
}

impl User {
    pub fn new(name: &str, email: Option<&str>) -> Result<Self, ValidationError> {
        Ok(User {
            id: new_id(),
            name: non_empty(name, "User", "name")?,
            email: normalize_email(email)?,
            created_at: now_timestamp(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = non_empty(name, "User", "name")?;
        Ok(())
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: Option<&str>) -> Result<(), ValidationError> {
        self.email = normalize_email(email)?;
        Ok(())
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<UserRecord> for User {
    type Error = ValidationError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            name: non_empty(&record.name, "User", "name")?,
            email: normalize_email(record.email.as_deref())?,
            id: id_or_new(record.id),
            created_at: timestamp_or_now(record.created_at),
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email.as_deref().unwrap_or("-"))
    }
}

/// Blank input means "no email"; anything else must look like
/// `local@domain.tld` once trimmed and lowercased.
fn normalize_email(email: Option<&str>) -> Result<Option<String>, ValidationError> {
    let value = match email.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v.to_lowercase(),
    };
    if !value.is_ascii() || !EMAIL_RE.is_match(&value) {
        return Err(ValidationError::InvalidEmail(value));
    }
    Ok(Some(value))
}
