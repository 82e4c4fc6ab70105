pub mod search;
pub mod shell;

pub use search::{run_search, SearchOutput, SearchRequest};
pub use shell::run_shell;

use crate::adapters::{load_from_config, HttpContactClient};
use crate::core::cache::ResultCache;
use crate::core::search::SearchSession;
use crate::core::selection::SelectionController;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DirectoryError, Result};

/// 依設定組出完整的搜尋 session (參考資料、快取、HTTP client)
pub fn build_session<C: ConfigProvider>(config: &C) -> Result<SearchSession<HttpContactClient>> {
    let backend_url = config
        .backend_url()
        .ok_or_else(|| DirectoryError::MissingConfigError {
            field: "backend_url".to_string(),
        })?;

    let reference = load_from_config(config)?;
    let controller = SelectionController::new(reference);
    let cache = ResultCache::new(config.cache_capacity());
    let client = HttpContactClient::new(backend_url);

    Ok(SearchSession::new(controller, cache, client)
        .with_share_base_url(config.share_base_url().map(str::to_string)))
}
