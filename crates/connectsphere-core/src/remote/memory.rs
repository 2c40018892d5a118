use crate::collate::CollationKey;
use crate::domain::Contact;
use crate::remote::schema::{project_record, FieldKind};
use crate::remote::{
    value_text, Condition, ConditionOperator, GroupOperator, RemoteQuery, WhereGroup,
};
use serde_json::Value;
use std::convert::Infallible;

/// Executes remote descriptors and returns raw records, which callers pass
/// back through [`normalize`](crate::normalize::normalize).
///
/// Rows that tie on every `orderBy` entry come back in the store's natural
/// (insertion) order.
pub trait RecordStore {
    type Error;

    fn fetch_records(&self, query: &RemoteQuery) -> Result<Vec<Value>, Self::Error>;
}

/// Reference executor over an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Vec<Contact>,
}

impl MemoryRecordStore {
    pub fn new(records: Vec<Contact>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Contact] {
        &self.records
    }

    pub fn execute(&self, query: &RemoteQuery) -> Vec<&Contact> {
        let mut keyed: Vec<(Vec<CollationKey>, &Contact)> = self
            .records
            .iter()
            .filter(|contact| query.matches(contact))
            .map(|contact| {
                let keys = query
                    .order_by
                    .iter()
                    .map(|order| CollationKey::new(&order.field.sort_value(contact)))
                    .collect();
                (keys, contact)
            })
            .collect();

        keyed.sort_by(|(left, _), (right, _)| {
            query
                .order_by
                .iter()
                .zip(left.iter().zip(right.iter()))
                .map(|(order, (l, r))| order.direction.apply(l.cmp(r)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        keyed
            .into_iter()
            .map(|(_, contact)| contact)
            .skip(query.paging_info.offset)
            .take(query.paging_info.limit)
            .collect()
    }
}

impl RecordStore for MemoryRecordStore {
    type Error = Infallible;

    fn fetch_records(&self, query: &RemoteQuery) -> Result<Vec<Value>, Self::Error> {
        Ok(self
            .execute(query)
            .into_iter()
            .map(|contact| project_record(contact, &query.fields))
            .collect())
    }
}

impl RemoteQuery {
    pub fn matches(&self, contact: &Contact) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.holds_for(contact))
            && self.where_groups.iter().all(|group| group.holds_for(contact))
    }
}

impl WhereGroup {
    pub fn holds_for(&self, contact: &Contact) -> bool {
        let mut sub_groups = self.sub_groups.iter().map(|sub_group| {
            sub_group
                .conditions
                .iter()
                .all(|condition| condition.holds_for(contact))
        });
        match self.operator {
            GroupOperator::Or => self.sub_groups.is_empty() || sub_groups.any(|hit| hit),
            GroupOperator::And => sub_groups.all(|hit| hit),
        }
    }
}

impl Condition {
    pub fn holds_for(&self, contact: &Contact) -> bool {
        let field = self.field_name;
        let values = field.values(contact);
        self.values.iter().any(|expected| {
            let expected = value_text(expected);
            match (self.operator, field.kind()) {
                (ConditionOperator::Contains, FieldKind::Text | FieldKind::MultiText) => {
                    let needle = expected.to_lowercase();
                    values
                        .iter()
                        .any(|value| value.to_lowercase().contains(&needle))
                }
                (ConditionOperator::Contains, FieldKind::TagSet | FieldKind::Boolean)
                | (ConditionOperator::ExactMatch, _) => {
                    values.iter().any(|value| value.as_ref() == expected)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRecordStore, RecordStore};
    use crate::domain::{Contact, ContactId};
    use crate::filter::ViewParams;
    use crate::normalize::normalize;
    use crate::remote::{
        to_remote_query, Condition, GroupOperator, PagingInfo, RemoteField, SubGroup, WhereGroup,
    };

    fn contact(id: i64, first: &str, last: &str, tags: &[&str]) -> Contact {
        let mut contact = Contact::new(ContactId::from(id), first, last);
        contact.tags = tags.iter().copied().collect();
        contact
    }

    fn store() -> MemoryRecordStore {
        MemoryRecordStore::new(vec![
            contact(1, "Bob", "Lee", &["Friend"]),
            contact(2, "Amy", "Lee", &["Team"]),
            contact(3, "Cy", "Park", &["Team"]),
        ])
    }

    #[test]
    fn tag_contains_is_exact_membership() {
        let store = store();
        let mut query = to_remote_query(&ViewParams::default(), PagingInfo::default());
        query.conditions.push(Condition::contains(RemoteField::Tags, "Tea"));
        assert!(store.execute(&query).is_empty());
    }

    #[test]
    fn paging_applies_after_sort() {
        let store = store();
        let query = to_remote_query(&ViewParams::default(), PagingInfo { limit: 1, offset: 1 });
        let page: Vec<&str> = store.execute(&query).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(page, ["1"]);
    }

    #[test]
    fn and_group_requires_every_sub_group() {
        let store = store();
        let mut query = to_remote_query(&ViewParams::default(), PagingInfo::default());
        query.where_groups.push(WhereGroup {
            operator: GroupOperator::And,
            sub_groups: vec![
                SubGroup {
                    conditions: vec![Condition::contains(RemoteField::LastName, "lee")],
                },
                SubGroup {
                    conditions: vec![Condition::contains(RemoteField::Tags, "Team")],
                },
            ],
        });
        let ids: Vec<&str> = store.execute(&query).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn fetched_records_normalize_to_the_same_contacts() {
        let store = store();
        let params = ViewParams::default().search("lee");
        let query = to_remote_query(&params, PagingInfo::default());
        let records = store.fetch_records(&query).unwrap();
        let names: Vec<String> = records
            .iter()
            .map(normalize)
            .map(|contact| contact.display_name())
            .collect();
        assert_eq!(names, ["Amy Lee", "Bob Lee"]);
    }
}
