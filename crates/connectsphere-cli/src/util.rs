use crate::error::invalid_input;
use anyhow::Result;
use chrono::NaiveDate;
use connectsphere_core::domain::{ContactId, EmailEntry, EmailType, PhoneEntry, PhoneType};
use std::str::FromStr;

pub fn parse_contact_id(raw: &str) -> Result<ContactId> {
    ContactId::from_str(raw).map_err(|_| invalid_input("contact id cannot be empty"))
}

/// `[type:]number`, e.g. `work:+1 415 555 0100`. Untyped numbers are mobile.
pub fn parse_phone(raw: &str) -> Result<PhoneEntry> {
    match raw.split_once(':') {
        Some((label, number)) => {
            let kind = PhoneType::from_label(label).ok_or_else(|| {
                invalid_input(format!(
                    "invalid phone type {label:?}: expected mobile|work|home|other"
                ))
            })?;
            Ok(PhoneEntry::new(kind, number.trim()))
        }
        None => Ok(PhoneEntry::new(PhoneType::default(), raw.trim())),
    }
}

/// `[type:]address`, e.g. `work:amy@acme.example`. Untyped addresses are personal.
pub fn parse_email(raw: &str) -> Result<EmailEntry> {
    match raw.split_once(':') {
        Some((label, email)) => {
            let kind = EmailType::from_label(label).ok_or_else(|| {
                invalid_input(format!(
                    "invalid email type {label:?}: expected personal|work|other"
                ))
            })?;
            Ok(EmailEntry::new(kind, email.trim()))
        }
        None => Ok(EmailEntry::new(EmailType::default(), raw.trim())),
    }
}

pub fn parse_birthday(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_input("invalid birthday: expected YYYY-MM-DD"))
}

/// Empty input clears an optional field.
pub fn optional_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
