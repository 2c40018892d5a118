//! Translation of remote query descriptors into SQL over the contacts schema.
//!
//! Predicates mirror the in-memory executor: `contains_ci` for
//! case-insensitive substrings, `EXISTS` sub-selects for multi-valued
//! fields, and the `LOCALE` collation for ordering. Rows tied on every
//! `orderBy` entry fall back to insertion order (`seq`).

use crate::db::LOCALE_COLLATION;
use connectsphere_core::remote::{
    value_text, Condition, ConditionOperator, FieldKind, GroupOperator, RemoteField, SubGroup,
    WhereGroup,
};
use connectsphere_core::{RemoteQuery, SortDirection};
use rusqlite::types::Value;

pub const CONTACT_COLUMNS: &str = "contacts.id, contacts.first_name, contacts.last_name, \
     contacts.nickname, contacts.company, contacts.job_title, contacts.website, \
     contacts.address, contacts.notes, contacts.birthday, contacts.is_favorite, \
     contacts.profile_image, contacts.extra";

pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

enum Column {
    Scalar(&'static str),
    Child {
        table: &'static str,
        column: &'static str,
    },
    Favorite,
}

fn column(field: RemoteField) -> Column {
    match field {
        RemoteField::Id => Column::Scalar("contacts.id"),
        RemoteField::Name => Column::Scalar("contacts.display_name"),
        RemoteField::FirstName => Column::Scalar("contacts.first_name"),
        RemoteField::LastName => Column::Scalar("contacts.last_name"),
        RemoteField::Nickname => Column::Scalar("COALESCE(contacts.nickname, '')"),
        RemoteField::Birthday => Column::Scalar("COALESCE(contacts.birthday, '')"),
        RemoteField::Address => Column::Scalar("COALESCE(contacts.address, '')"),
        RemoteField::Company => Column::Scalar("COALESCE(contacts.company, '')"),
        RemoteField::JobTitle => Column::Scalar("COALESCE(contacts.job_title, '')"),
        RemoteField::Website => Column::Scalar("COALESCE(contacts.website, '')"),
        RemoteField::Notes => Column::Scalar("COALESCE(contacts.notes, '')"),
        RemoteField::ProfileImage => Column::Scalar("COALESCE(contacts.profile_image, '')"),
        RemoteField::PhoneNumbers => Column::Child {
            table: "contact_phones",
            column: "number",
        },
        RemoteField::Emails => Column::Child {
            table: "contact_emails",
            column: "email",
        },
        RemoteField::Tags => Column::Child {
            table: "contact_tags",
            column: "tag",
        },
        RemoteField::IsFavorite => Column::Favorite,
    }
}

const FAVORITE_TEXT: &str = "(CASE WHEN contacts.is_favorite = 1 THEN 'true' ELSE 'false' END)";

pub fn to_sql(query: &RemoteQuery) -> SqlQuery {
    let mut params: Vec<Value> = Vec::new();
    let mut clauses: Vec<String> = Vec::new();

    for condition in &query.conditions {
        clauses.push(condition_sql(condition, &mut params));
    }
    for group in &query.where_groups {
        clauses.push(group_sql(group, &mut params));
    }

    let mut sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let mut order: Vec<String> = query
        .order_by
        .iter()
        .map(|order| {
            let direction = match order.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!(
                "{} COLLATE {LOCALE_COLLATION} {direction}",
                sort_expr(order.field)
            )
        })
        .collect();
    order.push("contacts.seq ASC".to_string());
    sql.push_str(" ORDER BY ");
    sql.push_str(&order.join(", "));

    sql.push_str(" LIMIT ? OFFSET ?");
    params.push(Value::from(clamp(query.paging_info.limit)));
    params.push(Value::from(clamp(query.paging_info.offset)));

    SqlQuery { sql, params }
}

fn clamp(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn group_sql(group: &WhereGroup, params: &mut Vec<Value>) -> String {
    if group.sub_groups.is_empty() {
        return "1".to_string();
    }
    let joiner = match group.operator {
        GroupOperator::Or => " OR ",
        GroupOperator::And => " AND ",
    };
    let parts: Vec<String> = group
        .sub_groups
        .iter()
        .map(|sub_group| sub_group_sql(sub_group, params))
        .collect();
    format!("({})", parts.join(joiner))
}

fn sub_group_sql(sub_group: &SubGroup, params: &mut Vec<Value>) -> String {
    if sub_group.conditions.is_empty() {
        return "1".to_string();
    }
    let parts: Vec<String> = sub_group
        .conditions
        .iter()
        .map(|condition| condition_sql(condition, params))
        .collect();
    format!("({})", parts.join(" AND "))
}

fn condition_sql(condition: &Condition, params: &mut Vec<Value>) -> String {
    if condition.values.is_empty() {
        return "0".to_string();
    }
    let substring = condition.operator == ConditionOperator::Contains
        && matches!(
            condition.field_name.kind(),
            FieldKind::Text | FieldKind::MultiText
        );
    let parts: Vec<String> = condition
        .values
        .iter()
        .map(|value| {
            params.push(Value::from(value_text(value)));
            predicate(condition.field_name, substring)
        })
        .collect();
    format!("({})", parts.join(" OR "))
}

fn predicate(field: RemoteField, substring: bool) -> String {
    let test = |expr: &str| {
        if substring {
            format!("contains_ci({expr}, ?)")
        } else {
            format!("{expr} = ?")
        }
    };
    match column(field) {
        Column::Scalar(expr) => test(expr),
        Column::Favorite => test(FAVORITE_TEXT),
        Column::Child { table, column } => format!(
            "EXISTS (SELECT 1 FROM {table} m WHERE m.contact_id = contacts.id AND {})",
            test(&format!("m.{column}"))
        ),
    }
}

fn sort_expr(field: RemoteField) -> String {
    match column(field) {
        Column::Scalar(expr) => expr.to_string(),
        Column::Favorite => FAVORITE_TEXT.to_string(),
        Column::Child { table, column } => format!(
            "COALESCE((SELECT m.{column} FROM {table} m WHERE m.contact_id = contacts.id \
             ORDER BY m.position LIMIT 1), '')"
        ),
    }
}
