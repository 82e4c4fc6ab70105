use crate::domain::model::{ContactRow, LookupQuery};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> Option<&str>;
    fn committee_data_path(&self) -> Option<&str>;
    fn constants_data_path(&self) -> Option<&str>;
    fn cache_capacity(&self) -> usize;
    fn share_base_url(&self) -> Option<&str> {
        None
    }
}

/// 以 (entity, function, term) 查詢聯絡人的外部服務
#[async_trait]
pub trait ContactLookup: Send + Sync {
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<ContactRow>>;
}
