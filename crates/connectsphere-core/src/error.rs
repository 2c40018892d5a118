use crate::domain::ContactId;
use thiserror::Error;

/// Problems with a contact's content; the user can fix these, retrying won't.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("first name is required")]
    MissingFirstName,
    #[error("last name is required")]
    MissingLastName,
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid tag label")]
    InvalidTag,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The caller's snapshot is stale; re-sync before retrying.
    #[error("contact not found: {0}")]
    NotFound(ContactId),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}
