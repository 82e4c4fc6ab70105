use crate::config::toml_config::TomlConfig;
use crate::core::cache::DEFAULT_CACHE_CAPACITY;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// 合併命令列與 TOML 檔之後的最終設定；命令列優先
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: Option<String>,
    pub share_base_url: Option<String>,
    pub committee_data: Option<String>,
    pub constants_data: Option<String>,
    pub cache_capacity: Option<usize>,
}

impl Settings {
    pub fn merged_with(self, file: &TomlConfig) -> Self {
        Self {
            backend_url: self
                .backend_url
                .or_else(|| file.backend_url().map(str::to_string)),
            share_base_url: self
                .share_base_url
                .or_else(|| file.share_base_url().map(str::to_string)),
            committee_data: self
                .committee_data
                .or_else(|| file.committee_path().map(str::to_string)),
            constants_data: self
                .constants_data
                .or_else(|| file.constants_path().map(str::to_string)),
            cache_capacity: self.cache_capacity.or_else(|| file.cache_capacity()),
        }
    }

    /// 資料檔與快取設定檢查，不要求後端位址
    pub fn validate_local(&self) -> Result<()> {
        if let Some(path) = &self.committee_data {
            validation::validate_path("committee_data", path)?;
        }
        if let Some(path) = &self.constants_data {
            validation::validate_path("constants_data", path)?;
        }
        if let Some(base) = &self.share_base_url {
            validation::validate_url("share_base_url", base)?;
        }
        validation::validate_positive_number("cache_capacity", self.cache_capacity(), 1)
    }
}

impl ConfigProvider for Settings {
    fn backend_url(&self) -> Option<&str> {
        self.backend_url.as_deref()
    }

    fn committee_data_path(&self) -> Option<&str> {
        self.committee_data.as_deref()
    }

    fn constants_data_path(&self) -> Option<&str> {
        self.constants_data.as_deref()
    }

    fn cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY)
    }

    fn share_base_url(&self) -> Option<&str> {
        self.share_base_url.as_deref()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        // 沒有後端位址就無法查詢，直接在啟動時報錯
        let backend = validation::validate_required_field("backend_url", &self.backend_url)?;
        validation::validate_url("backend_url", backend)?;
        self.validate_local()
    }
}
