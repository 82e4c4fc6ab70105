pub mod cache;
pub mod reference;
pub mod search;
pub mod selection;
pub mod url_sync;

pub use crate::domain::model::{ContactRow, LookupQuery, SearchResults, SelectOption};
pub use crate::domain::ports::{ConfigProvider, ContactLookup};
pub use crate::utils::error::Result;
