use crate::domain::entry::MultiValueEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneType {
    #[default]
    Mobile,
    Work,
    Home,
    Other,
}

impl PhoneType {
    /// Lenient label lookup used at the record boundary.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mobile" | "cell" | "cellphone" => Some(PhoneType::Mobile),
            "work" | "office" => Some(PhoneType::Work),
            "home" => Some(PhoneType::Home),
            "other" => Some(PhoneType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneType::Mobile => "mobile",
            PhoneType::Work => "work",
            PhoneType::Home => "home",
            PhoneType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneEntry {
    #[serde(rename = "type", default)]
    pub kind: PhoneType,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl PhoneEntry {
    pub fn new(kind: PhoneType, number: impl Into<String>) -> Self {
        Self {
            kind,
            number: number.into(),
            is_primary: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

impl MultiValueEntry for PhoneEntry {
    fn value(&self) -> &str {
        &self.number
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

/// Phone numbers may only carry digits and the usual dialing punctuation.
pub fn is_valid_phone_number(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '(' | ')' | '-' | ' '))
}
