use crate::filter::{SortField, ViewParams};
use crate::remote::schema::{RemoteField, CONTACT_FIELDS, SEARCH_FIELDS};
use crate::remote::{Condition, GroupOperator, OrderBy, PagingInfo, RemoteQuery, SubGroup, WhereGroup};

/// Describes, without running it, the fetch that yields the same contacts in
/// the same order as [`view`](crate::query::view) over the full collection.
///
/// Favorites and tag narrow through top-level conditions; the search text
/// becomes one OR group across every searched field, ANDed with them.
pub fn to_remote_query(params: &ViewParams, paging: PagingInfo) -> RemoteQuery {
    let mut conditions = Vec::new();
    if params.favorites_only {
        conditions.push(Condition::exact(RemoteField::IsFavorite, true));
    }
    if let Some(tag) = params.active_tag() {
        conditions.push(Condition::contains(RemoteField::Tags, tag));
    }

    let mut where_groups = Vec::new();
    if let Some(query) = params.search_query() {
        where_groups.push(WhereGroup {
            operator: GroupOperator::Or,
            sub_groups: SEARCH_FIELDS
                .iter()
                .map(|field| SubGroup {
                    conditions: vec![Condition::contains(*field, query)],
                })
                .collect(),
        });
    }

    let sort_field = match params.sort_field {
        SortField::Name => RemoteField::Name,
        SortField::Company => RemoteField::Company,
    };

    RemoteQuery {
        fields: CONTACT_FIELDS.to_vec(),
        paging_info: paging,
        order_by: vec![OrderBy {
            field: sort_field,
            direction: params.sort_direction,
        }],
        conditions,
        where_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::to_remote_query;
    use crate::filter::{SortDirection, SortField, ViewParams};
    use crate::remote::{
        ConditionOperator, GroupOperator, PagingInfo, RemoteField, SEARCH_FIELDS,
    };
    use serde_json::json;

    #[test]
    fn default_params_only_page_and_order() {
        let query = to_remote_query(&ViewParams::default(), PagingInfo::default());
        assert!(query.conditions.is_empty());
        assert!(query.where_groups.is_empty());
        assert_eq!(query.paging_info, PagingInfo { limit: 100, offset: 0 });
        assert_eq!(query.order_by[0].field, RemoteField::Name);
        assert_eq!(query.order_by[0].direction, SortDirection::Asc);
    }

    #[test]
    fn search_becomes_or_group_over_search_fields() {
        let params = ViewParams::default().search("  lee ");
        let query = to_remote_query(&params, PagingInfo::default());
        assert_eq!(query.where_groups.len(), 1);
        let group = &query.where_groups[0];
        assert_eq!(group.operator, GroupOperator::Or);
        assert_eq!(group.sub_groups.len(), SEARCH_FIELDS.len());
        for sub_group in &group.sub_groups {
            assert_eq!(sub_group.conditions.len(), 1);
            assert_eq!(sub_group.conditions[0].operator, ConditionOperator::Contains);
            assert_eq!(sub_group.conditions[0].values, [json!("lee")]);
        }
    }

    #[test]
    fn tag_and_favorites_are_conjunctive() {
        let params = ViewParams::default()
            .tag("Team")
            .favorites()
            .search("amy")
            .sorted_by(SortField::Company, SortDirection::Desc);
        let query = to_remote_query(&params, PagingInfo { limit: 20, offset: 40 });
        assert_eq!(query.conditions.len(), 2);
        assert_eq!(query.conditions[0].field_name, RemoteField::IsFavorite);
        assert_eq!(query.conditions[0].operator, ConditionOperator::ExactMatch);
        assert_eq!(query.conditions[1].field_name, RemoteField::Tags);
        assert_eq!(query.where_groups.len(), 1);
        assert_eq!(query.order_by[0].field, RemoteField::Company);
        assert_eq!(query.paging_info.offset, 40);
    }

    #[test]
    fn serializes_in_record_store_shape() {
        let params = ViewParams::default().tag("Team").search("lee");
        let json = serde_json::to_value(to_remote_query(&params, PagingInfo::default())).unwrap();
        assert_eq!(json["pagingInfo"], json!({"limit": 100, "offset": 0}));
        assert_eq!(json["orderBy"], json!([{"field": "Name", "direction": "asc"}]));
        assert_eq!(
            json["where"],
            json!([{"fieldName": "tags", "operator": "Contains", "values": ["Team"]}])
        );
        assert_eq!(json["whereGroups"][0]["operator"], "OR");
        assert_eq!(
            json["whereGroups"][0]["subGroups"][1]["conditions"][0]["fieldName"],
            "firstName"
        );
        assert_eq!(json["fields"][0], "Id");
    }

    #[test]
    fn blank_search_and_tag_add_nothing() {
        let params = ViewParams::default().search(" ").tag("");
        let query = to_remote_query(&params, PagingInfo::default());
        assert!(query.conditions.is_empty());
        assert!(query.where_groups.is_empty());
    }
}
