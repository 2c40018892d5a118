use crate::filter::FilterParseError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Company,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Company => "company",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "company" => Ok(SortField::Company),
            _ => Err(FilterParseError::InvalidSortField(s.to_string())),
        }
    }
}

impl FromStr for SortDirection {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(FilterParseError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// UI-selected view state. Drives both the local query engine and the remote
/// query translator, which read it through the same accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewParams {
    pub search_text: String,
    pub tag_filter: Option<String>,
    pub favorites_only: bool,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ViewParams {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag_filter = Some(tag.into());
        self
    }

    pub fn favorites(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    /// Trimmed search text, `None` when blank.
    pub fn search_query(&self) -> Option<&str> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Trimmed tag filter, `None` when unset or blank.
    pub fn active_tag(&self) -> Option<&str> {
        self.tag_filter
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    pub fn is_narrowing(&self) -> bool {
        self.favorites_only || self.active_tag().is_some() || self.search_query().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, SortField, ViewParams};
    use std::cmp::Ordering;

    #[test]
    fn blank_inputs_are_inactive() {
        let params = ViewParams::default().search("   ").tag(" ");
        assert_eq!(params.search_query(), None);
        assert_eq!(params.active_tag(), None);
        assert!(!params.is_narrowing());
    }

    #[test]
    fn desc_only_flips_the_comparator() {
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }

    #[test]
    fn parses_sort_labels() {
        assert_eq!("Company".parse::<SortField>().unwrap(), SortField::Company);
        assert_eq!(
            "descending".parse::<SortDirection>().unwrap(),
            SortDirection::Desc
        );
        assert!("age".parse::<SortField>().is_err());
    }
}
