use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub backend: Option<BackendConfig>,
    pub data: Option<DataConfig>,
    pub cache: Option<CacheConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub share_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub committee: Option<String>,
    pub constants: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DirectoryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DirectoryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DIRECTORY_BACKEND_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DirectoryError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn backend_url(&self) -> Option<&str> {
        self.backend.as_ref().and_then(|b| b.url.as_deref())
    }

    pub fn share_base_url(&self) -> Option<&str> {
        self.backend.as_ref().and_then(|b| b.share_base_url.as_deref())
    }

    pub fn committee_path(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.committee.as_deref())
    }

    pub fn constants_path(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.constants.as_deref())
    }

    pub fn cache_capacity(&self) -> Option<usize> {
        self.cache.as_ref().and_then(|c| c.capacity)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.backend_url() {
            crate::utils::validation::validate_url("backend.url", url)?;
        }
        if let Some(url) = self.share_base_url() {
            crate::utils::validation::validate_url("backend.share_base_url", url)?;
        }
        if let Some(path) = self.committee_path() {
            crate::utils::validation::validate_path("data.committee", path)?;
        }
        if let Some(path) = self.constants_path() {
            crate::utils::validation::validate_path("data.constants", path)?;
        }
        if let Some(capacity) = self.cache_capacity() {
            crate::utils::validation::validate_positive_number("cache.capacity", capacity, 1)?;
        }
        Ok(())
    }
}
