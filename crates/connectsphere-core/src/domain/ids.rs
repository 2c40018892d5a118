use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque contact identifier.
///
/// Record stores hand out either strings or integers; both are held in their
/// textual form so ids compare the same regardless of where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("contact id cannot be empty")]
pub struct ContactIdError;

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ContactId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ContactId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContactId {
    type Err = ContactIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ContactIdError);
        }
        Ok(Self(trimmed.to_string()))
    }
}
