// Adapters layer: concrete implementations for external systems (backend http, reference data files).

pub mod http;
pub mod reference_files;

pub use http::HttpContactClient;
pub use reference_files::{load_from_config, load_reference_data};
