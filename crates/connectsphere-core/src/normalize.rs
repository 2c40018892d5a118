//! Boundary adapter from raw record-store payloads to canonical [`Contact`]s.
//!
//! Record stores disagree on shape: phone and email fields arrive as typed
//! lists, bare string lists, or a single flat string with a companion
//! `phoneType` / `emailType` key; tags arrive as lists or comma-separated
//! strings; ids as strings or integers. Everything downstream of
//! [`normalize`] sees exactly one shape.

use crate::domain::{
    settle_primary, Contact, ContactId, EmailEntry, EmailType, PhoneEntry, PhoneType, TagSet,
};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Keys consumed by normalization that never reach `extra`.
const BOOKKEEPING_KEYS: &[&str] = &["Id", "id", "Name", "Tags", "phoneType", "emailType"];

const KNOWN_KEYS: &[&str] = &[
    "firstName",
    "lastName",
    "nickname",
    "company",
    "jobTitle",
    "website",
    "address",
    "notes",
    "birthday",
    "phoneNumbers",
    "emails",
    "tags",
    "isFavorite",
    "profileImage",
];

/// Converts any raw record into a canonical contact. Never fails: absent or
/// malformed values fall back to defaults and unknown keys are carried in
/// [`Contact::extra`].
pub fn normalize(raw: &Value) -> Contact {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    let id = record
        .get("Id")
        .or_else(|| record.get("id"))
        .and_then(id_from_value)
        .unwrap_or_default();

    let mut contact = Contact::new(
        id,
        text(record.get("firstName")).unwrap_or_default(),
        text(record.get("lastName")).unwrap_or_default(),
    );
    contact.nickname = text(record.get("nickname"));
    contact.company = text(record.get("company"));
    contact.job_title = text(record.get("jobTitle"));
    contact.website = text(record.get("website"));
    contact.address = text(record.get("address"));
    contact.notes = text(record.get("notes"));
    contact.profile_image = text(record.get("profileImage"));
    contact.is_favorite = record.get("isFavorite").map(flag).unwrap_or(false);

    let phone_hint = text(record.get("phoneType"))
        .and_then(|label| PhoneType::from_label(&label))
        .unwrap_or_default();
    contact.phone_numbers = normalize_phones(record.get("phoneNumbers"), phone_hint);

    let email_hint = text(record.get("emailType"))
        .and_then(|label| EmailType::from_label(&label))
        .unwrap_or_default();
    contact.emails = normalize_emails(record.get("emails"), email_hint);

    contact.tags = normalize_tags(record.get("tags"), record.get("Tags"));

    let raw_birthday = text(record.get("birthday"));
    contact.birthday = raw_birthday.as_deref().and_then(parse_birthday);
    if contact.birthday.is_none() {
        if let Some(raw_birthday) = raw_birthday {
            contact
                .extra
                .insert("birthday".to_string(), Value::String(raw_birthday));
        }
    }

    for (key, value) in record {
        if KNOWN_KEYS.contains(&key.as_str()) || BOOKKEEPING_KEYS.contains(&key.as_str()) {
            continue;
        }
        contact.extra.insert(key.clone(), value.clone());
    }

    contact
}

pub fn normalize_all<'a, I>(raw: I) -> Vec<Contact>
where
    I: IntoIterator<Item = &'a Value>,
{
    raw.into_iter().map(normalize).collect()
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn id_from_value(value: &Value) -> Option<ContactId> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(ContactId::from(int))
            } else if let Some(uint) = number.as_u64() {
                Some(ContactId::from(uint))
            } else {
                number.to_string().parse().ok()
            }
        }
        Value::String(raw) => raw.parse().ok(),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    let raw = match value? {
        Value::String(raw) => raw.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    }
}

fn normalize_phones(value: Option<&Value>, hint: PhoneType) -> Vec<PhoneEntry> {
    let mut entries = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| phone_entry(item, hint))
            .collect(),
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            vec![PhoneEntry::new(hint, raw.trim())]
        }
        Some(Value::Object(_)) => value
            .and_then(|item| phone_entry(item, hint))
            .into_iter()
            .collect(),
        _ => vec![PhoneEntry::new(hint, "")],
    };
    settle_primary(&mut entries);
    entries
}

fn phone_entry(item: &Value, hint: PhoneType) -> Option<PhoneEntry> {
    match item {
        Value::String(raw) => Some(PhoneEntry::new(hint, raw.trim())),
        Value::Number(number) => Some(PhoneEntry::new(hint, number.to_string())),
        Value::Object(fields) => {
            let kind = text(fields.get("type"))
                .and_then(|label| PhoneType::from_label(&label))
                .unwrap_or(hint);
            let number = text(fields.get("number"))
                .or_else(|| text(fields.get("value")))
                .or_else(|| text(fields.get("phone")))
                .unwrap_or_default();
            let mut entry = PhoneEntry::new(kind, number);
            entry.is_primary = fields.get("isPrimary").map(flag).unwrap_or(false);
            Some(entry)
        }
        _ => None,
    }
}

fn normalize_emails(value: Option<&Value>, hint: EmailType) -> Vec<EmailEntry> {
    let mut entries = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| email_entry(item, hint))
            .collect(),
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            vec![EmailEntry::new(hint, raw.trim())]
        }
        Some(Value::Object(_)) => value
            .and_then(|item| email_entry(item, hint))
            .into_iter()
            .collect(),
        _ => vec![EmailEntry::new(hint, "")],
    };
    settle_primary(&mut entries);
    entries
}

fn email_entry(item: &Value, hint: EmailType) -> Option<EmailEntry> {
    match item {
        Value::String(raw) => Some(EmailEntry::new(hint, raw.trim())),
        Value::Object(fields) => {
            let kind = text(fields.get("type"))
                .and_then(|label| EmailType::from_label(&label))
                .unwrap_or(hint);
            let email = text(fields.get("email"))
                .or_else(|| text(fields.get("value")))
                .or_else(|| text(fields.get("address")))
                .unwrap_or_default();
            let mut entry = EmailEntry::new(kind, email);
            entry.is_primary = fields.get("isPrimary").map(flag).unwrap_or(false);
            Some(entry)
        }
        _ => None,
    }
}

fn normalize_tags(tags: Option<&Value>, legacy: Option<&Value>) -> TagSet {
    let mut set = TagSet::new();
    for value in [tags, legacy].into_iter().flatten() {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(label) = text(Some(item)) {
                        set.insert(label);
                    }
                }
            }
            Value::String(raw) => {
                for label in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    set.insert(label);
                }
            }
            _ => {}
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::{normalize, parse_birthday};
    use crate::domain::{primary_count, ContactId, EmailType, PhoneType};
    use serde_json::json;

    #[test]
    fn missing_multi_values_become_single_empty_primary() {
        let contact = normalize(&json!({"Id": 7, "firstName": "Amy", "lastName": "Lee"}));
        assert_eq!(contact.id, ContactId::from(7_i64));
        assert_eq!(contact.phone_numbers.len(), 1);
        assert_eq!(contact.phone_numbers[0].number, "");
        assert!(contact.phone_numbers[0].is_primary);
        assert_eq!(contact.phone_numbers[0].kind, PhoneType::Mobile);
        assert_eq!(contact.emails.len(), 1);
        assert_eq!(contact.emails[0].kind, EmailType::Personal);
        assert!(contact.emails[0].is_primary);
        assert!(contact.primary_email().is_none());
    }

    #[test]
    fn flat_fields_use_companion_type_keys() {
        let contact = normalize(&json!({
            "firstName": "Bob",
            "lastName": "Lee",
            "emails": " bob@work.example ",
            "emailType": "work",
            "phoneNumbers": "+1 555 0100",
            "phoneType": "home"
        }));
        assert_eq!(contact.emails.len(), 1);
        assert_eq!(contact.emails[0].email, "bob@work.example");
        assert_eq!(contact.emails[0].kind, EmailType::Work);
        assert_eq!(contact.phone_numbers[0].kind, PhoneType::Home);
        assert_eq!(contact.phone_numbers[0].number, "+1 555 0100");
    }

    #[test]
    fn flat_email_defaults_to_personal() {
        let contact = normalize(&json!({"emails": "amy@example.com"}));
        assert_eq!(contact.emails[0].kind, EmailType::Personal);
    }

    #[test]
    fn typed_lists_keep_one_primary() {
        let contact = normalize(&json!({
            "phoneNumbers": [
                {"type": "work", "number": "1", "isPrimary": false},
                {"type": "home", "number": "2", "isPrimary": true},
                {"type": "mobile", "number": "3", "isPrimary": true}
            ],
            "emails": ["a@example.com", "b@example.com"]
        }));
        assert_eq!(primary_count(&contact.phone_numbers), 1);
        assert_eq!(contact.primary_phone().unwrap().number, "2");
        assert_eq!(primary_count(&contact.emails), 1);
        assert_eq!(contact.primary_email().unwrap().email, "a@example.com");
    }

    #[test]
    fn tags_accept_lists_and_legacy_strings() {
        let contact = normalize(&json!({
            "tags": ["Friend", "Team", "Friend"],
            "Tags": "Team, VIP ,"
        }));
        assert_eq!(contact.tags.as_slice(), ["Friend", "Team", "VIP"]);
    }

    #[test]
    fn favorites_accept_loose_encodings() {
        assert!(normalize(&json!({"isFavorite": true})).is_favorite);
        assert!(normalize(&json!({"isFavorite": "true"})).is_favorite);
        assert!(normalize(&json!({"isFavorite": 1})).is_favorite);
        assert!(!normalize(&json!({"isFavorite": "no"})).is_favorite);
        assert!(!normalize(&json!({})).is_favorite);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let contact = normalize(&json!({
            "firstName": "Amy",
            "Owner": {"id": 3},
            "CreatedOn": "2024-01-01T00:00:00Z",
            "Name": "Amy Lee",
            "phoneType": "work"
        }));
        assert_eq!(contact.extra["Owner"], json!({"id": 3}));
        assert_eq!(contact.extra["CreatedOn"], "2024-01-01T00:00:00Z");
        assert!(!contact.extra.contains_key("Name"));
        assert!(!contact.extra.contains_key("phoneType"));
    }

    #[test]
    fn birthday_parses_or_passes_through() {
        let parsed = normalize(&json!({"birthday": "1990-04-01T00:00:00Z"}));
        assert_eq!(parsed.birthday, parse_birthday("1990-04-01"));
        assert!(parsed.extra.get("birthday").is_none());

        let unparsed = normalize(&json!({"birthday": "April 1st"}));
        assert!(unparsed.birthday.is_none());
        assert_eq!(unparsed.extra["birthday"], "April 1st");
    }

    #[test]
    fn non_object_records_still_normalize() {
        let contact = normalize(&json!("garbage"));
        assert!(contact.first_name.is_empty());
        assert_eq!(contact.phone_numbers.len(), 1);
        assert!(contact.extra.is_empty());
    }

    #[test]
    fn explicit_empty_lists_stay_empty() {
        let contact = normalize(&json!({"phoneNumbers": [], "emails": []}));
        assert!(contact.phone_numbers.is_empty());
        assert!(contact.emails.is_empty());
    }
}
