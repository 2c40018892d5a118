//! In-memory query engine: favorites, tag, search, then a stable sort.
//!
//! The engine is stateless over the snapshot it is handed and never fails.

use crate::collate::CollationKey;
use crate::domain::Contact;
use crate::filter::{SortField, ViewParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyReason {
    /// The input collection had no contacts at all.
    EmptyCollection,
    /// Contacts exist, but the active filters or search excluded all of them.
    Filtered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub contacts: Vec<Contact>,
    pub empty_reason: Option<EmptyReason>,
}

impl View {
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.contacts.iter().map(|contact| contact.id.as_str()).collect()
    }
}

/// Badge counts for the "All" and "Favorites" toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    pub all: usize,
    pub favorites: usize,
}

pub fn view(contacts: &[Contact], params: &ViewParams) -> View {
    if contacts.is_empty() {
        return View {
            contacts: Vec::new(),
            empty_reason: Some(EmptyReason::EmptyCollection),
        };
    }

    let tag = params.active_tag();
    let needle = params.search_query().map(str::to_lowercase);

    let mut keyed: Vec<(CollationKey, &Contact)> = contacts
        .iter()
        .filter(|contact| !params.favorites_only || contact.is_favorite)
        .filter(|contact| tag.is_none_or(|tag| contact.tags.contains(tag)))
        .filter(|contact| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_search(contact, needle))
        })
        .map(|contact| (sort_key(contact, params.sort_field), contact))
        .collect();

    // Stable: ties keep snapshot order in both directions.
    keyed.sort_by(|(left, _), (right, _)| params.sort_direction.apply(left.cmp(right)));

    let contacts: Vec<Contact> = keyed.into_iter().map(|(_, contact)| contact.clone()).collect();
    let empty_reason = contacts.is_empty().then_some(EmptyReason::Filtered);
    View {
        contacts,
        empty_reason,
    }
}

/// `needle` must already be lowercased.
pub fn matches_search(contact: &Contact, needle: &str) -> bool {
    let hit = |value: &str| value.to_lowercase().contains(needle);
    hit(&contact.display_name())
        || hit(&contact.first_name)
        || hit(&contact.last_name)
        || contact.company.as_deref().is_some_and(hit)
        || contact.job_title.as_deref().is_some_and(hit)
        || contact.emails.iter().any(|entry| hit(&entry.email))
        || contact.phone_numbers.iter().any(|entry| hit(&entry.number))
}

pub fn sort_key(contact: &Contact, field: SortField) -> CollationKey {
    match field {
        SortField::Name => CollationKey::new(&contact.display_name()),
        SortField::Company => CollationKey::new(contact.company_or_empty()),
    }
}

pub fn counts(contacts: &[Contact]) -> ViewCounts {
    ViewCounts {
        all: contacts.len(),
        favorites: contacts.iter().filter(|contact| contact.is_favorite).count(),
    }
}

/// Tags in first-seen order with the number of contacts carrying each.
pub fn tags_in_use(contacts: &[Contact]) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = Vec::new();
    for tag in contacts.iter().flat_map(|contact| contact.tags.iter()) {
        match out.iter_mut().find(|(existing, _)| existing == tag) {
            Some((_, count)) => *count += 1,
            None => out.push((tag.to_string(), 1)),
        }
    }
    out
}
