use crate::domain::model::{Lc, Mc, Region, SelectOption};
use crate::utils::error::{DirectoryError, Result};
use serde::Deserialize;

pub const BUNDLED_COMMITTEE_DATA: &str = include_str!("../../data/committee_data.json");
pub const BUNDLED_CONSTANTS: &str = include_str!("../../data/constants.json");

#[derive(Debug, Deserialize)]
struct CommitteeDocument {
    data: CommitteeData,
}

#[derive(Debug, Deserialize)]
struct CommitteeData {
    committee: Committee,
}

#[derive(Debug, Deserialize)]
struct Committee {
    regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
struct ConstantsDocument {
    functions: Vec<String>,
    terms: Vec<String>,
}

/// 委員會階層 (region → MC → LC) 與 function/term 清單。
///
/// 啟動時載入一次，之後以 `Arc<ReferenceData>` 唯讀共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    regions: Vec<Region>,
    functions: Vec<String>,
    terms: Vec<String>,
}

impl ReferenceData {
    pub fn new(regions: Vec<Region>, functions: Vec<String>, terms: Vec<String>) -> Self {
        Self {
            regions,
            functions,
            terms,
        }
    }

    /// 從委員會文件與常數文件的 JSON 字串解析
    pub fn from_json_strs(committee_json: &str, constants_json: &str) -> Result<Self> {
        let committee: CommitteeDocument =
            serde_json::from_str(committee_json).map_err(|e| DirectoryError::ReferenceDataError {
                message: format!("committee document: {}", e),
            })?;
        let constants: ConstantsDocument =
            serde_json::from_str(constants_json).map_err(|e| DirectoryError::ReferenceDataError {
                message: format!("constants document: {}", e),
            })?;

        Ok(Self::new(
            committee.data.committee.regions,
            constants.functions,
            constants.terms,
        ))
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_strs(BUNDLED_COMMITTEE_DATA, BUNDLED_CONSTANTS)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    /// 找出 MC 及其所屬 region
    pub fn mc_with_region(&self, id: &str) -> Option<(&Region, &Mc)> {
        self.regions.iter().find_map(|region| {
            region
                .mcs
                .iter()
                .find(|mc| mc.id == id)
                .map(|mc| (region, mc))
        })
    }

    /// 找出 LC 及其所屬 region 與 MC
    pub fn lc_with_ancestors(&self, id: &str) -> Option<(&Region, &Mc, &Lc)> {
        self.regions.iter().find_map(|region| {
            region.mcs.iter().find_map(|mc| {
                mc.lcs
                    .iter()
                    .find(|lc| lc.id == id)
                    .map(|lc| (region, mc, lc))
            })
        })
    }

    pub fn all_mcs(&self) -> impl Iterator<Item = &Mc> {
        self.regions.iter().flat_map(|region| region.mcs.iter())
    }

    pub fn all_lcs(&self) -> impl Iterator<Item = &Lc> {
        self.all_mcs().flat_map(|mc| mc.lcs.iter())
    }

    pub fn region_options(&self) -> Vec<SelectOption> {
        self.regions.iter().map(SelectOption::from).collect()
    }

    pub fn function_options(&self) -> Vec<SelectOption> {
        indexed_options(&self.functions)
    }

    pub fn term_options(&self) -> Vec<SelectOption> {
        indexed_options(&self.terms)
    }
}

fn indexed_options(labels: &[String]) -> Vec<SelectOption> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| SelectOption::new(index.to_string(), label))
        .collect()
}
