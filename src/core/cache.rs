use crate::domain::model::{ContactRow, LookupQuery};
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub entity_id: String,
    pub function: String,
    pub term: String,
}

impl From<&LookupQuery> for CacheKey {
    fn from(query: &LookupQuery) -> Self {
        Self {
            entity_id: query.entity_id.clone(),
            function: query.function.clone(),
            term: query.term.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.entity_id, self.function, self.term)
    }
}

/// 查詢結果快取：只存成功的結果，容量用完時淘汰最久未使用的項目
pub struct ResultCache {
    entries: LruCache<CacheKey, Vec<ContactRow>>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<&Vec<ContactRow>> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, rows: Vec<ContactRow>) {
        tracing::debug!("Caching {} rows for {}", rows.len(), key);
        self.entries.put(key, rows);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
