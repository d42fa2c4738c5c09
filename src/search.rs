pub mod client;
pub mod types;
pub mod validate;

pub use client::{RepoSearch, SearchClient};
pub use types::SearchResultItem;
pub use validate::validate_response;

/// Page size requested from the search endpoint and the autocomplete row cap.
pub const PAGE_SIZE: usize = 5;
