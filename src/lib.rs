pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod presentation;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpContactClient;
pub use config::Settings;
pub use crate::core::{cache::ResultCache, search::SearchSession, selection::SelectionController};
pub use utils::error::{DirectoryError, Result};
