//! Declarative remote query descriptors.
//!
//! A [`RemoteQuery`] is built from the same [`ViewParams`](crate::filter::ViewParams)
//! the local engine consumes and handed, unexecuted, to a [`RecordStore`].
//! Top-level `where` conditions and every `whereGroups` entry are ANDed;
//! inside a group, sub-groups combine with the group's operator; conditions
//! inside a sub-group are ANDed; the values of one condition are ORed.

mod memory;
mod schema;
mod translate;

use crate::filter::SortDirection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use memory::{MemoryRecordStore, RecordStore};
pub use schema::{project_record, FieldKind, RemoteField, CONTACT_FIELDS, SEARCH_FIELDS};
pub use translate::to_remote_query;

pub const DEFAULT_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PagingInfo {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: RemoteField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    Contains,
    ExactMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_name: RemoteField,
    pub operator: ConditionOperator,
    pub values: Vec<Value>,
}

impl Condition {
    pub fn contains(field: RemoteField, value: impl Into<Value>) -> Self {
        Self {
            field_name: field,
            operator: ConditionOperator::Contains,
            values: vec![value.into()],
        }
    }

    pub fn exact(field: RemoteField, value: impl Into<Value>) -> Self {
        Self {
            field_name: field,
            operator: ConditionOperator::ExactMatch,
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupOperator {
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "AND")]
    And,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGroup {
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereGroup {
    pub operator: GroupOperator,
    pub sub_groups: Vec<SubGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteQuery {
    pub fields: Vec<RemoteField>,
    pub paging_info: PagingInfo,
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub where_groups: Vec<WhereGroup>,
}

/// Textual form of a condition value, as predicates compare it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
