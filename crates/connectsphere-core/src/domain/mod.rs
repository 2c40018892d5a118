pub mod avatar;
pub mod contact;
pub mod email;
pub mod entry;
pub mod ids;
pub mod phone;
pub mod tag;

pub use avatar::{initials, is_placeholder_avatar, placeholder_avatar};
pub use contact::{display_name, Contact};
pub use email::{is_valid_email, EmailEntry, EmailType};
pub use entry::{primary_count, settle_primary, MultiValueEntry};
pub use ids::{ContactId, ContactIdError};
pub use phone::{is_valid_phone_number, PhoneEntry, PhoneType};
pub use tag::{normalize_tag_label, TagSet, DEFAULT_TAG_PALETTE};
