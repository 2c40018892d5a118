use crate::domain::{Contact, ContactId};
use crate::query::{EmptyReason, View, ViewCounts};
use serde::{Deserialize, Serialize};

/// What a contact card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCardDto {
    pub id: ContactId,
    pub display_name: String,
    pub position: Option<String>,
    pub primary_email: Option<String>,
    pub primary_phone: Option<String>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub avatar: String,
}

impl From<&Contact> for ContactCardDto {
    fn from(contact: &Contact) -> Self {
        let position = match (contact.job_title.as_deref(), contact.company.as_deref()) {
            (Some(title), Some(company)) => Some(format!("{title} at {company}")),
            (Some(title), None) => Some(title.to_string()),
            (None, Some(company)) => Some(company.to_string()),
            (None, None) => None,
        };
        Self {
            id: contact.id.clone(),
            display_name: contact.display_name(),
            position,
            primary_email: contact.primary_email().map(|entry| entry.email.clone()),
            primary_phone: contact.primary_phone().map(|entry| entry.number.clone()),
            tags: contact.tags.as_slice().to_vec(),
            is_favorite: contact.is_favorite,
            avatar: contact.avatar_uri(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListDto {
    pub items: Vec<ContactCardDto>,
    pub empty_reason: Option<EmptyReason>,
    pub counts: ViewCounts,
}

impl ContactListDto {
    pub fn new(view: &View, counts: ViewCounts) -> Self {
        Self {
            items: view.contacts.iter().map(ContactCardDto::from).collect(),
            empty_reason: view.empty_reason,
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContactCardDto;
    use crate::domain::{Contact, ContactId, EmailEntry, EmailType};

    #[test]
    fn card_combines_title_and_company() {
        let mut contact = Contact::new(ContactId::from(1_i64), "Amy", "Lee");
        contact.job_title = Some("Engineer".to_string());
        contact.company = Some("Acme".to_string());
        contact.emails = vec![
            EmailEntry::new(EmailType::Personal, "amy@home.example"),
            EmailEntry::new(EmailType::Work, "amy@acme.example").primary(),
        ];
        let card = ContactCardDto::from(&contact);
        assert_eq!(card.position.as_deref(), Some("Engineer at Acme"));
        assert_eq!(card.primary_email.as_deref(), Some("amy@acme.example"));
        assert_eq!(card.primary_phone, None);
    }
}
