use crate::filter::params::{SortDirection, SortField, ViewParams};
use crate::filter::FilterParseError;

/// Parses the search-box syntax: `#tag`, `is:favorite`, `sort:<field>`,
/// `order:<asc|desc>`; every other token is search text.
pub fn parse_view_query(input: &str) -> Result<ViewParams, FilterParseError> {
    let mut params = ViewParams::default();
    let mut text_terms = Vec::new();

    for token in input.split_whitespace() {
        if let Some(tag_raw) = token.strip_prefix('#') {
            if tag_raw.is_empty() {
                return Err(FilterParseError::EmptyTag);
            }
            if let Some(existing) = params.tag_filter.take() {
                return Err(FilterParseError::MultipleTags(existing, tag_raw.to_string()));
            }
            params.tag_filter = Some(tag_raw.to_string());
        } else if let Some(selector) = token.strip_prefix("is:") {
            match selector {
                "favorite" | "fav" | "starred" => params.favorites_only = true,
                _ => return Err(FilterParseError::InvalidSelector(token.to_string())),
            }
        } else if let Some(field) = token.strip_prefix("sort:") {
            params.sort_field = field.parse::<SortField>()?;
        } else if let Some(direction) = token.strip_prefix("order:") {
            params.sort_direction = direction.parse::<SortDirection>()?;
        } else {
            text_terms.push(token);
        }
    }

    params.search_text = text_terms.join(" ");
    Ok(params)
}
