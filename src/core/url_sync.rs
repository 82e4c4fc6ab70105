use crate::domain::model::{SelectionField, SelectionState};
use crate::utils::error::{DirectoryError, Result};
use url::{form_urlencoded, Url};

/// The five shareable query parameters: `region`, `mc`, `lc`, `func`, `term`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    region: Option<String>,
    mc: Option<String>,
    lc: Option<String>,
    func: Option<String>,
    term: Option<String>,
}

impl QueryParams {
    /// 解析完整 URL 或 query 字串 (可帶 `?`)。
    ///
    /// 重複的參數以第一個為準，空值視為未提供，其他參數忽略。
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let query = if input.contains("://") {
            let url = Url::parse(input).map_err(|e| DirectoryError::InvalidConfigValueError {
                field: "query".to_string(),
                value: input.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;
            url.query().unwrap_or_default().to_string()
        } else {
            input.trim_start_matches('?').to_string()
        };

        let mut params = QueryParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let Some(field) = SelectionField::ALL
                .into_iter()
                .find(|field| field.query_key() == key)
            else {
                continue;
            };
            let slot = params.slot_mut(field);
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }

        Ok(params)
    }

    /// 從目前選擇產生參數；未選的欄位不寫入
    pub fn from_state(state: &SelectionState) -> Self {
        let mut params = QueryParams::default();
        for field in SelectionField::ALL {
            *params.slot_mut(field) = state.get(field).map(|option| option.value.clone());
        }
        params
    }

    pub fn get(&self, field: SelectionField) -> Option<&str> {
        match field {
            SelectionField::Region => self.region.as_deref(),
            SelectionField::Mc => self.mc.as_deref(),
            SelectionField::Lc => self.lc.as_deref(),
            SelectionField::Function => self.func.as_deref(),
            SelectionField::Term => self.term.as_deref(),
        }
    }

    pub fn set(&mut self, field: SelectionField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    pub fn is_empty(&self) -> bool {
        SelectionField::ALL
            .into_iter()
            .all(|field| self.get(field).is_none())
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in SelectionField::ALL {
            if let Some(value) = self.get(field) {
                serializer.append_pair(field.query_key(), value);
            }
        }
        serializer.finish()
    }

    /// 產生可分享的搜尋連結；沒有 base 時只回傳 `?query`
    pub fn share_link(&self, base: Option<&str>) -> Result<String> {
        let query = self.to_query_string();
        match base {
            Some(base) => {
                let mut url = Url::parse(base).map_err(|e| DirectoryError::InvalidConfigValueError {
                    field: "share_base_url".to_string(),
                    value: base.to_string(),
                    reason: format!("Invalid URL format: {}", e),
                })?;
                url.set_query(if query.is_empty() { None } else { Some(&query) });
                Ok(url.to_string())
            }
            None => Ok(format!("?{}", query)),
        }
    }

    fn slot_mut(&mut self, field: SelectionField) -> &mut Option<String> {
        match field {
            SelectionField::Region => &mut self.region,
            SelectionField::Mc => &mut self.mc,
            SelectionField::Lc => &mut self.lc,
            SelectionField::Function => &mut self.func,
            SelectionField::Term => &mut self.term,
        }
    }
}
