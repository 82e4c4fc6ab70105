use crate::core::reference::{ReferenceData, BUNDLED_COMMITTEE_DATA, BUNDLED_CONSTANTS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DirectoryError, Result};
use std::path::Path;
use std::sync::Arc;

fn read_document(path: &str) -> Result<String> {
    std::fs::read_to_string(Path::new(path)).map_err(|e| DirectoryError::ReferenceDataError {
        message: format!("{}: {}", path, e),
    })
}

/// 載入參考資料；未指定檔案時使用內建資料
pub fn load_reference_data(
    committee_path: Option<&str>,
    constants_path: Option<&str>,
) -> Result<Arc<ReferenceData>> {
    let committee = match committee_path {
        Some(path) => {
            tracing::debug!("Loading committee data from {}", path);
            read_document(path)?
        }
        None => BUNDLED_COMMITTEE_DATA.to_string(),
    };
    let constants = match constants_path {
        Some(path) => {
            tracing::debug!("Loading constants from {}", path);
            read_document(path)?
        }
        None => BUNDLED_CONSTANTS.to_string(),
    };

    let data = ReferenceData::from_json_strs(&committee, &constants)?;
    tracing::info!(
        "📚 Loaded {} regions, {} MCs, {} LCs, {} functions, {} terms",
        data.regions().len(),
        data.all_mcs().count(),
        data.all_lcs().count(),
        data.functions().len(),
        data.terms().len()
    );
    Ok(Arc::new(data))
}

pub fn load_from_config<C: ConfigProvider>(config: &C) -> Result<Arc<ReferenceData>> {
    load_reference_data(config.committee_data_path(), config.constants_data_path())
}
