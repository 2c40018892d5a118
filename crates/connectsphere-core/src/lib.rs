pub mod collate;
pub mod domain;
pub mod dto;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod query;
pub mod reducer;
pub mod remote;

pub use domain::*;
pub use dto::*;
pub use error::{CoreError, ValidationError};
pub use filter::{parse_view_query, FilterParseError, SortDirection, SortField, ViewParams};
pub use normalize::{normalize, normalize_all};
pub use query::{counts, view, EmptyReason, View, ViewCounts};
pub use reducer::{ContactDraft, ContactPatch, Created};
pub use remote::{to_remote_query, MemoryRecordStore, PagingInfo, RecordStore, RemoteQuery};
