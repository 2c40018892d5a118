use crate::domain::entry::MultiValueEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    #[default]
    Personal,
    Work,
    Other,
}

impl EmailType {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "personal" | "home" | "private" => Some(EmailType::Personal),
            "work" | "business" | "office" => Some(EmailType::Work),
            "other" => Some(EmailType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::Personal => "personal",
            EmailType::Work => "work",
            EmailType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEntry {
    #[serde(rename = "type", default)]
    pub kind: EmailType,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl EmailEntry {
    pub fn new(kind: EmailType, email: impl Into<String>) -> Self {
        Self {
            kind,
            email: email.into(),
            is_primary: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

impl MultiValueEntry for EmailEntry {
    fn value(&self) -> &str {
        &self.email
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

/// Shape check only: `local@domain.tld`, no whitespace, one `@`.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && !tld.is_empty()
}
