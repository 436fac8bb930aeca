pub mod field;
pub mod issue;
pub mod search;

pub use field::{Field, FieldSelection};
pub use issue::{Changelog, History, HistoryItem, Issue};
pub use search::{FieldsParam, SearchQuery, SearchResult};
