//! Pure create/update/toggle/delete over a contact snapshot.
//!
//! Every operation takes the caller's collection by reference and returns the
//! next collection; on error the caller's collection is untouched.

use crate::domain::{
    is_placeholder_avatar, normalize_tag_label, placeholder_avatar, settle_primary, Contact,
    ContactId, EmailEntry, PhoneEntry, TagSet,
};
use crate::error::{CoreError, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Creation request. The id is always assigned by [`create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone_numbers: Vec<PhoneEntry>,
    pub emails: Vec<EmailEntry>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub profile_image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update. `None` leaves a field alone; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub job_title: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub birthday: Option<Option<NaiveDate>>,
    pub phone_numbers: Option<Vec<PhoneEntry>>,
    pub emails: Option<Vec<EmailEntry>>,
    pub tags: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
    pub profile_image: Option<Option<String>>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        *self == ContactPatch::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub collection: Vec<Contact>,
    pub created: Contact,
}

pub fn create(collection: &[Contact], draft: ContactDraft) -> Result<Created, CoreError> {
    let mut contact = Contact::new(
        fresh_id(collection),
        draft.first_name.trim(),
        draft.last_name.trim(),
    );
    contact.nickname = clean(draft.nickname);
    contact.company = clean(draft.company);
    contact.job_title = clean(draft.job_title);
    contact.website = clean(draft.website);
    contact.address = clean(draft.address);
    contact.notes = clean(draft.notes);
    contact.birthday = draft.birthday;
    contact.phone_numbers = clean_phones(draft.phone_numbers);
    contact.emails = clean_emails(draft.emails);
    contact.tags = clean_tags(draft.tags)?;
    contact.is_favorite = draft.is_favorite;
    contact.profile_image = clean(draft.profile_image);
    contact.extra = draft.extra;
    contact.validate()?;

    if contact.profile_image.is_none() {
        contact.profile_image = Some(placeholder_avatar(&contact.first_name, &contact.last_name));
    }

    let mut next = collection.to_vec();
    next.push(contact.clone());
    Ok(Created {
        collection: next,
        created: contact,
    })
}

pub fn update(
    collection: &[Contact],
    id: &ContactId,
    patch: ContactPatch,
) -> Result<Vec<Contact>, CoreError> {
    let index = position(collection, id)?;
    let current = &collection[index];
    let mut merged = current.clone();

    if let Some(first_name) = patch.first_name {
        merged.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = patch.last_name {
        merged.last_name = last_name.trim().to_string();
    }
    apply_optional(&mut merged.nickname, patch.nickname);
    apply_optional(&mut merged.company, patch.company);
    apply_optional(&mut merged.job_title, patch.job_title);
    apply_optional(&mut merged.website, patch.website);
    apply_optional(&mut merged.address, patch.address);
    apply_optional(&mut merged.notes, patch.notes);
    if let Some(birthday) = patch.birthday {
        merged.birthday = birthday;
    }
    if let Some(phones) = patch.phone_numbers {
        merged.phone_numbers = clean_phones(phones);
    }
    if let Some(emails) = patch.emails {
        merged.emails = clean_emails(emails);
    }
    if let Some(tags) = patch.tags {
        merged.tags = clean_tags(tags)?;
    }
    if let Some(is_favorite) = patch.is_favorite {
        merged.is_favorite = is_favorite;
    }
    if let Some(profile_image) = patch.profile_image {
        merged.profile_image = clean(profile_image);
    }
    merged.validate()?;

    let stale_placeholder = merged
        .profile_image
        .as_deref()
        .is_some_and(is_placeholder_avatar);
    if merged.profile_image.is_none() || stale_placeholder {
        merged.profile_image = Some(placeholder_avatar(&merged.first_name, &merged.last_name));
    }

    let mut next = collection.to_vec();
    next[index] = merged;
    Ok(next)
}

pub fn toggle_favorite(collection: &[Contact], id: &ContactId) -> Result<Vec<Contact>, CoreError> {
    let index = position(collection, id)?;
    let mut next = collection.to_vec();
    next[index].is_favorite = !next[index].is_favorite;
    Ok(next)
}

pub fn delete(collection: &[Contact], id: &ContactId) -> Result<Vec<Contact>, CoreError> {
    let index = position(collection, id)?;
    let mut next = collection.to_vec();
    next.remove(index);
    Ok(next)
}

pub fn find<'a>(collection: &'a [Contact], id: &ContactId) -> Option<&'a Contact> {
    collection.iter().find(|contact| &contact.id == id)
}

fn position(collection: &[Contact], id: &ContactId) -> Result<usize, CoreError> {
    collection
        .iter()
        .position(|contact| &contact.id == id)
        .ok_or_else(|| CoreError::NotFound(id.clone()))
}

fn fresh_id(collection: &[Contact]) -> ContactId {
    loop {
        let id = ContactId::new();
        if find(collection, &id).is_none() {
            return id;
        }
    }
}

fn apply_optional(target: &mut Option<String>, change: Option<Option<String>>) {
    if let Some(value) = change {
        *target = clean(value);
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn clean_phones(mut phones: Vec<PhoneEntry>) -> Vec<PhoneEntry> {
    for phone in &mut phones {
        phone.number = phone.number.trim().to_string();
    }
    settle_primary(&mut phones);
    phones
}

fn clean_emails(mut emails: Vec<EmailEntry>) -> Vec<EmailEntry> {
    for email in &mut emails {
        email.email = email.email.trim().to_string();
    }
    settle_primary(&mut emails);
    emails
}

fn clean_tags(tags: Vec<String>) -> Result<TagSet, ValidationError> {
    tags.iter()
        .map(|tag| normalize_tag_label(tag))
        .collect::<Result<Vec<_>, _>>()
        .map(TagSet::from)
}

#[cfg(test)]
mod tests {
    use super::{create, delete, toggle_favorite, update, ContactDraft, ContactPatch};
    use crate::domain::{
        primary_count, Contact, ContactId, EmailEntry, EmailType, PhoneEntry, PhoneType,
    };
    use crate::error::{CoreError, ValidationError};

    fn draft(first: &str, last: &str) -> ContactDraft {
        ContactDraft {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Default::default()
        }
    }

    fn seeded() -> Vec<Contact> {
        let first = create(&[], draft("Bob", "Lee")).unwrap();
        create(&first.collection, draft("Amy", "Lee")).unwrap().collection
    }

    #[test]
    fn create_assigns_id_and_placeholder() {
        let created = create(&[], draft(" Amy ", "Lee")).unwrap();
        assert_eq!(created.collection.len(), 1);
        assert_eq!(created.created.first_name, "Amy");
        assert!(created
            .created
            .profile_image
            .as_deref()
            .is_some_and(|uri| uri.contains("name=AL")));
        assert_eq!(created.collection[0], created.created);
    }

    #[test]
    fn create_rejects_missing_first_name() {
        let collection = seeded();
        let err = create(&collection, draft("", "X")).unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationError::MissingFirstName));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn create_rejects_bad_phone_and_email() {
        let mut bad_phone = draft("Amy", "Lee");
        bad_phone.phone_numbers = vec![PhoneEntry::new(PhoneType::Mobile, "555-CALL")];
        assert!(matches!(
            create(&[], bad_phone),
            Err(CoreError::Validation(ValidationError::InvalidPhoneNumber(_)))
        ));

        let mut bad_email = draft("Amy", "Lee");
        bad_email.emails = vec![EmailEntry::new(EmailType::Work, "amy@localhost")];
        assert!(matches!(
            create(&[], bad_email),
            Err(CoreError::Validation(ValidationError::InvalidEmail(_)))
        ));

        let mut bad_tag = draft("Amy", "Lee");
        bad_tag.tags = vec!["  ".to_string()];
        assert!(matches!(
            create(&[], bad_tag),
            Err(CoreError::Validation(ValidationError::InvalidTag))
        ));
    }

    #[test]
    fn create_keeps_one_primary_and_dedupes_tags() {
        let mut value = draft("Amy", "Lee");
        value.emails = vec![
            EmailEntry::new(EmailType::Work, "amy@acme.example").primary(),
            EmailEntry::new(EmailType::Personal, "amy@home.example").primary(),
        ];
        value.tags = vec!["Team".to_string(), " Team".to_string()];
        let created = create(&[], value).unwrap().created;
        assert_eq!(primary_count(&created.emails), 1);
        assert_eq!(created.tags.as_slice(), ["Team"]);
    }

    #[test]
    fn update_merges_and_preserves_id() {
        let collection = seeded();
        let id = collection[1].id.clone();
        let patch = ContactPatch {
            company: Some(Some("Acme".to_string())),
            phone_numbers: Some(vec![
                PhoneEntry::new(PhoneType::Work, "555 0100").primary(),
                PhoneEntry::new(PhoneType::Home, "555 0101").primary(),
            ]),
            ..Default::default()
        };
        let next = update(&collection, &id, patch).unwrap();
        assert_eq!(next[1].id, id);
        assert_eq!(next[1].company.as_deref(), Some("Acme"));
        assert_eq!(next[1].first_name, "Amy");
        assert_eq!(primary_count(&next[1].phone_numbers), 1);
        assert!(collection[1].company.is_none());
    }

    #[test]
    fn update_refreshes_placeholder_on_rename() {
        let collection = seeded();
        let id = collection[1].id.clone();
        let patch = ContactPatch {
            first_name: Some("Zoe".to_string()),
            ..Default::default()
        };
        let next = update(&collection, &id, patch).unwrap();
        assert!(next[1]
            .profile_image
            .as_deref()
            .is_some_and(|uri| uri.contains("name=ZL")));
    }

    #[test]
    fn update_rejects_blanking_a_name() {
        let collection = seeded();
        let id = collection[0].id.clone();
        let patch = ContactPatch {
            last_name: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            update(&collection, &id, patch),
            Err(CoreError::Validation(ValidationError::MissingLastName))
        );
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let collection = seeded();
        let missing = ContactId::from(404_i64);
        let err = update(&collection, &missing, ContactPatch::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn toggle_favorite_twice_restores_value() {
        let collection = seeded();
        let id = collection[0].id.clone();
        let once = toggle_favorite(&collection, &id).unwrap();
        assert!(once[0].is_favorite);
        assert_eq!(once[0].first_name, collection[0].first_name);
        let twice = toggle_favorite(&once, &id).unwrap();
        assert_eq!(twice, collection);
    }

    #[test]
    fn delete_twice_reports_not_found() {
        let collection = seeded();
        let id = collection[0].id.clone();
        let next = delete(&collection, &id).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(delete(&next, &id), Err(CoreError::NotFound(id)));
    }

    #[test]
    fn delete_missing_leaves_collection_unchanged() {
        let collection = seeded();
        let missing: ContactId = "missing-id".parse().unwrap();
        assert!(delete(&collection, &missing).unwrap_err().is_not_found());
        assert_eq!(collection.len(), 2);
    }
}
