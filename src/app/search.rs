use crate::core::search::{SearchSession, SubmissionState};
use crate::core::url_sync::QueryParams;
use crate::domain::model::SelectionField;
use crate::domain::ports::ContactLookup;
use crate::presentation::{self, OutputFormat};
use crate::utils::error::{DirectoryError, Result};

/// 單次搜尋的輸入：個別欄位或一段 query 字串 / 分享連結
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub region: Option<String>,
    pub mc: Option<String>,
    pub lc: Option<String>,
    pub func: Option<String>,
    pub term: Option<String>,
}

impl SearchRequest {
    /// 個別欄位覆蓋 query 中的同名參數
    pub fn to_params(&self) -> Result<QueryParams> {
        let mut params = match &self.query {
            Some(query) => QueryParams::parse(query)?,
            None => QueryParams::default(),
        };
        let fields = [
            (SelectionField::Region, &self.region),
            (SelectionField::Mc, &self.mc),
            (SelectionField::Lc, &self.lc),
            (SelectionField::Function, &self.func),
            (SelectionField::Term, &self.term),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                params.set(field, Some(value.clone()));
            }
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutput {
    pub rendered: String,
    pub share_link: String,
}

/// 載入選擇、送出並回傳渲染後的結果。
///
/// 查詢失敗與欄位不完整都以錯誤回傳，由呼叫端決定如何顯示。
pub async fn run_search<L: ContactLookup>(
    session: &mut SearchSession<L>,
    request: &SearchRequest,
    format: OutputFormat,
) -> Result<SearchOutput> {
    let params = request.to_params()?;
    session.controller_mut().load_from_query(&params);

    let state = session.submit().await.clone();
    match state {
        SubmissionState::Success(results) => {
            let rendered = presentation::render_results(&results, format)?;
            Ok(SearchOutput {
                rendered,
                share_link: session.share_link()?,
            })
        }
        SubmissionState::Idle { notice } => Err(session
            .take_last_error()
            .unwrap_or_else(|| DirectoryError::ConfigError {
                message: notice.unwrap_or_else(|| "search was not submitted".to_string()),
            })),
        SubmissionState::Failed { message } => Err(session
            .take_last_error()
            .unwrap_or(DirectoryError::TransportError { message })),
        SubmissionState::Submitting { ticket } => Err(DirectoryError::TransportError {
            message: format!("lookup #{} did not complete", ticket),
        }),
    }
}
