use crate::domain::Contact;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Fields of the remote `contact` table, named as the record store names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteField {
    Id,
    /// Derived display name, `"first last"`.
    Name,
    #[serde(rename = "firstName")]
    FirstName,
    #[serde(rename = "lastName")]
    LastName,
    #[serde(rename = "nickname")]
    Nickname,
    #[serde(rename = "birthday")]
    Birthday,
    #[serde(rename = "phoneNumbers")]
    PhoneNumbers,
    #[serde(rename = "emails")]
    Emails,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "company")]
    Company,
    #[serde(rename = "jobTitle")]
    JobTitle,
    #[serde(rename = "website")]
    Website,
    #[serde(rename = "notes")]
    Notes,
    #[serde(rename = "tags")]
    Tags,
    #[serde(rename = "isFavorite")]
    IsFavorite,
    #[serde(rename = "profileImage")]
    ProfileImage,
}

/// How `Contains` / `ExactMatch` apply to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single string; `Contains` is a case-insensitive substring test.
    Text,
    /// List of strings; a predicate holds when any entry satisfies it.
    MultiText,
    /// Tag labels; `Contains` is exact, case-sensitive membership.
    TagSet,
    Boolean,
}

/// Projection requested for every contact fetch.
pub const CONTACT_FIELDS: &[RemoteField] = &[
    RemoteField::Id,
    RemoteField::Name,
    RemoteField::FirstName,
    RemoteField::LastName,
    RemoteField::Nickname,
    RemoteField::Birthday,
    RemoteField::PhoneNumbers,
    RemoteField::Emails,
    RemoteField::Address,
    RemoteField::Company,
    RemoteField::JobTitle,
    RemoteField::Website,
    RemoteField::Notes,
    RemoteField::Tags,
    RemoteField::IsFavorite,
    RemoteField::ProfileImage,
];

/// Fields the search box reaches, in the order the OR group lists them.
pub const SEARCH_FIELDS: &[RemoteField] = &[
    RemoteField::Name,
    RemoteField::FirstName,
    RemoteField::LastName,
    RemoteField::Company,
    RemoteField::JobTitle,
    RemoteField::Emails,
    RemoteField::PhoneNumbers,
];

impl RemoteField {
    pub fn name(self) -> &'static str {
        match self {
            RemoteField::Id => "Id",
            RemoteField::Name => "Name",
            RemoteField::FirstName => "firstName",
            RemoteField::LastName => "lastName",
            RemoteField::Nickname => "nickname",
            RemoteField::Birthday => "birthday",
            RemoteField::PhoneNumbers => "phoneNumbers",
            RemoteField::Emails => "emails",
            RemoteField::Address => "address",
            RemoteField::Company => "company",
            RemoteField::JobTitle => "jobTitle",
            RemoteField::Website => "website",
            RemoteField::Notes => "notes",
            RemoteField::Tags => "tags",
            RemoteField::IsFavorite => "isFavorite",
            RemoteField::ProfileImage => "profileImage",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            RemoteField::PhoneNumbers | RemoteField::Emails => FieldKind::MultiText,
            RemoteField::Tags => FieldKind::TagSet,
            RemoteField::IsFavorite => FieldKind::Boolean,
            _ => FieldKind::Text,
        }
    }

    /// Textual values a predicate on this field sees. Absent optional text
    /// reads as the empty string.
    pub fn values(self, contact: &Contact) -> Vec<Cow<'_, str>> {
        fn optional(value: &Option<String>) -> Vec<Cow<'_, str>> {
            vec![Cow::Borrowed(value.as_deref().unwrap_or(""))]
        }
        match self {
            RemoteField::Id => vec![Cow::Borrowed(contact.id.as_str())],
            RemoteField::Name => vec![Cow::Owned(contact.display_name())],
            RemoteField::FirstName => vec![Cow::Borrowed(contact.first_name.as_str())],
            RemoteField::LastName => vec![Cow::Borrowed(contact.last_name.as_str())],
            RemoteField::Nickname => optional(&contact.nickname),
            RemoteField::Birthday => vec![Cow::Owned(
                contact
                    .birthday
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            )],
            RemoteField::PhoneNumbers => contact
                .phone_numbers
                .iter()
                .map(|entry| Cow::Borrowed(entry.number.as_str()))
                .collect(),
            RemoteField::Emails => contact
                .emails
                .iter()
                .map(|entry| Cow::Borrowed(entry.email.as_str()))
                .collect(),
            RemoteField::Address => optional(&contact.address),
            RemoteField::Company => optional(&contact.company),
            RemoteField::JobTitle => optional(&contact.job_title),
            RemoteField::Website => optional(&contact.website),
            RemoteField::Notes => optional(&contact.notes),
            RemoteField::Tags => contact.tags.iter().map(Cow::Borrowed).collect(),
            RemoteField::IsFavorite => vec![Cow::Borrowed(if contact.is_favorite {
                "true"
            } else {
                "false"
            })],
            RemoteField::ProfileImage => optional(&contact.profile_image),
        }
    }

    /// Key used when ordering by this field: the first value, or empty.
    pub fn sort_value(self, contact: &Contact) -> String {
        self.values(contact)
            .into_iter()
            .next()
            .map(Cow::into_owned)
            .unwrap_or_default()
    }

    /// Raw-record value for this field, in the shape the normalizer accepts.
    pub fn project(self, contact: &Contact) -> Value {
        let optional = |value: &Option<String>| {
            value
                .as_ref()
                .map(|text| Value::String(text.clone()))
                .unwrap_or(Value::Null)
        };
        match self {
            RemoteField::Id => Value::String(contact.id.to_string()),
            RemoteField::Name => Value::String(contact.display_name()),
            RemoteField::FirstName => Value::String(contact.first_name.clone()),
            RemoteField::LastName => Value::String(contact.last_name.clone()),
            RemoteField::Nickname => optional(&contact.nickname),
            RemoteField::Birthday => contact
                .birthday
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null),
            RemoteField::PhoneNumbers => {
                serde_json::to_value(&contact.phone_numbers).unwrap_or(Value::Null)
            }
            RemoteField::Emails => serde_json::to_value(&contact.emails).unwrap_or(Value::Null),
            RemoteField::Address => optional(&contact.address),
            RemoteField::Company => optional(&contact.company),
            RemoteField::JobTitle => optional(&contact.job_title),
            RemoteField::Website => optional(&contact.website),
            RemoteField::Notes => optional(&contact.notes),
            RemoteField::Tags => Value::Array(
                contact
                    .tags
                    .iter()
                    .map(|tag| Value::String(tag.to_string()))
                    .collect(),
            ),
            RemoteField::IsFavorite => Value::Bool(contact.is_favorite),
            RemoteField::ProfileImage => optional(&contact.profile_image),
        }
    }
}

/// Builds a raw record holding only the requested fields.
pub fn project_record(contact: &Contact, fields: &[RemoteField]) -> Value {
    let mut record = Map::new();
    for field in fields {
        record.insert(field.name().to_string(), field.project(contact));
    }
    Value::Object(record)
}
