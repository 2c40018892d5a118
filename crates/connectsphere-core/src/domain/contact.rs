use crate::domain::avatar::placeholder_avatar;
use crate::domain::email::{is_valid_email, EmailEntry};
use crate::domain::entry::primary_of;
use crate::domain::ids::ContactId;
use crate::domain::phone::{is_valid_phone_number, PhoneEntry};
use crate::domain::tag::TagSet;
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical contact record. Field names on the wire follow the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneEntry>,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Fields this version does not know about, kept for the next writer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    pub fn new(id: ContactId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: None,
            company: None,
            job_title: None,
            website: None,
            address: None,
            notes: None,
            birthday: None,
            phone_numbers: Vec::new(),
            emails: Vec::new(),
            tags: TagSet::new(),
            is_favorite: false,
            profile_image: None,
            extra: Map::new(),
        }
    }

    /// `"first last"`, trimmed, single space between.
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }

    pub fn company_or_empty(&self) -> &str {
        self.company.as_deref().unwrap_or("")
    }

    pub fn primary_phone(&self) -> Option<&PhoneEntry> {
        primary_of(&self.phone_numbers).filter(|entry| !entry.number.is_empty())
    }

    pub fn primary_email(&self) -> Option<&EmailEntry> {
        primary_of(&self.emails).filter(|entry| !entry.email.is_empty())
    }

    /// Stored profile image, or the initials placeholder.
    pub fn avatar_uri(&self) -> String {
        match self.profile_image.as_deref() {
            Some(uri) if !uri.trim().is_empty() => uri.to_string(),
            _ => placeholder_avatar(&self.first_name, &self.last_name),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::MissingLastName);
        }
        for phone in &self.phone_numbers {
            if !is_valid_phone_number(&phone.number) {
                return Err(ValidationError::InvalidPhoneNumber(phone.number.clone()));
            }
        }
        // An empty address is the placeholder entry, not a malformed one.
        for email in &self.emails {
            if !email.email.is_empty() && !is_valid_email(&email.email) {
                return Err(ValidationError::InvalidEmail(email.email.clone()));
            }
        }
        if self.tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ValidationError::InvalidTag);
        }
        Ok(())
    }
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}
