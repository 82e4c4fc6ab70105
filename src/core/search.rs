use crate::core::cache::{CacheKey, ResultCache};
use crate::core::selection::SelectionController;
use crate::core::url_sync::QueryParams;
use crate::domain::model::{ContactRow, LookupQuery, SearchResults, SelectOption};
use crate::domain::ports::ContactLookup;
use crate::utils::error::{DirectoryError, Result};

/// Idle → Submitting → {Success, Failed}; the next submit starts over from
/// a cleared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle { notice: Option<String> },
    Submitting { ticket: u64 },
    Success(SearchResults),
    Failed { message: String },
}

impl Default for SubmissionState {
    fn default() -> Self {
        SubmissionState::Idle { notice: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPlan {
    /// 快取命中，結果已套用
    Cached,
    /// 需要呼叫後端；完成後以 `ticket` 呼叫 `complete`
    Fetch { ticket: u64, query: LookupQuery },
}

#[derive(Debug, Clone)]
struct PendingSearch {
    ticket: u64,
    key: CacheKey,
    entity: SelectOption,
    function: SelectOption,
    term: SelectOption,
}

/// One user's search session: selections, result cache and the submission
/// state machine.
pub struct SearchSession<L: ContactLookup> {
    controller: SelectionController,
    cache: ResultCache,
    client: L,
    state: SubmissionState,
    latest_ticket: u64,
    pending: Option<PendingSearch>,
    params: QueryParams,
    share_base_url: Option<String>,
    reveal_pending: bool,
    last_error: Option<DirectoryError>,
}

impl<L: ContactLookup> SearchSession<L> {
    pub fn new(controller: SelectionController, cache: ResultCache, client: L) -> Self {
        Self {
            controller,
            cache,
            client,
            state: SubmissionState::default(),
            latest_ticket: 0,
            pending: None,
            params: QueryParams::default(),
            share_base_url: None,
            reveal_pending: false,
            last_error: None,
        }
    }

    pub fn with_share_base_url(mut self, base: Option<String>) -> Self {
        self.share_base_url = base;
        self
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController {
        &mut self.controller
    }

    pub fn client(&self) -> &L {
        &self.client
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    pub fn results(&self) -> Option<&SearchResults> {
        match &self.state {
            SubmissionState::Success(results) => Some(results),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Idle { notice } => notice.as_deref(),
            SubmissionState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// 關閉錯誤通知
    pub fn dismiss_error(&mut self) {
        if self.error().is_some() {
            self.state = SubmissionState::default();
        }
    }

    /// Query parameters written back by the last accepted submit.
    pub fn query_params(&self) -> &QueryParams {
        &self.params
    }

    pub fn share_link(&self) -> Result<String> {
        self.params.share_link(self.share_base_url.as_deref())
    }

    /// 取出最近一次送出失敗的原始錯誤
    pub fn take_last_error(&mut self) -> Option<DirectoryError> {
        self.last_error.take()
    }

    /// 結果從無到有時回傳 true 一次，供前端捲動或印出結果區塊
    pub fn take_reveal(&mut self) -> bool {
        std::mem::take(&mut self.reveal_pending)
    }

    /// Starts a submission: validates the selection, writes the query
    /// parameters back and consults the cache.
    pub fn begin_submit(&mut self) -> Result<SubmitPlan> {
        self.state = SubmissionState::default();
        self.pending = None;
        self.reveal_pending = false;
        self.last_error = None;

        let selection = self.controller.state();
        let (Some(term), Some(entity), Some(function)) = (
            selection.term.clone(),
            selection.entity.clone(),
            selection.function.clone(),
        ) else {
            let err = DirectoryError::IncompleteSelection;
            tracing::warn!("⚠️ Submit rejected: {}", err);
            self.state = SubmissionState::Idle {
                notice: Some(err.banner_message()),
            };
            self.last_error = Some(DirectoryError::IncompleteSelection);
            return Err(err);
        };

        self.params = QueryParams::from_state(selection);
        self.latest_ticket += 1;
        let ticket = self.latest_ticket;

        let query = LookupQuery {
            entity_id: entity.value.clone(),
            function: function.label.clone(),
            term: term.label.clone(),
        };
        let key = CacheKey::from(&query);

        if let Some(rows) = self.cache.get(&key) {
            tracing::info!("📦 Cache hit for {} ({} rows)", key, rows.len());
            let results = SearchResults {
                entity,
                function,
                term,
                rows: rows.clone(),
                from_cache: true,
            };
            self.show(results);
            return Ok(SubmitPlan::Cached);
        }

        tracing::debug!("Submitting lookup #{} for {}", ticket, key);
        self.pending = Some(PendingSearch {
            ticket,
            key,
            entity,
            function,
            term,
        });
        self.state = SubmissionState::Submitting { ticket };
        Ok(SubmitPlan::Fetch { ticket, query })
    }

    /// 套用查詢結果。只有最新一次送出的結果會被套用，回傳是否已套用。
    pub fn complete(&mut self, ticket: u64, outcome: Result<Vec<ContactRow>>) -> bool {
        if ticket != self.latest_ticket {
            tracing::debug!(
                "Discarding stale lookup #{} (latest is #{})",
                ticket,
                self.latest_ticket
            );
            return false;
        }
        let Some(pending) = self.pending.take() else {
            tracing::debug!("No pending lookup for #{}", ticket);
            return false;
        };

        match outcome {
            Ok(rows) => {
                tracing::info!("✅ Lookup #{} returned {} rows", ticket, rows.len());
                self.cache.insert(pending.key, rows.clone());
                self.show(SearchResults {
                    entity: pending.entity,
                    function: pending.function,
                    term: pending.term,
                    rows,
                    from_cache: false,
                });
            }
            Err(e) => {
                tracing::warn!("❌ Lookup #{} failed: {}", ticket, e);
                self.state = SubmissionState::Failed {
                    message: e.banner_message(),
                };
                self.last_error = Some(e);
            }
        }
        true
    }

    /// 完整送出流程：驗證、快取、呼叫後端、套用結果
    pub async fn submit(&mut self) -> &SubmissionState {
        match self.begin_submit() {
            Ok(SubmitPlan::Fetch { ticket, query }) => {
                let outcome = self.client.lookup(&query).await;
                self.complete(ticket, outcome);
            }
            Ok(SubmitPlan::Cached) | Err(_) => {}
        }
        &self.state
    }

    fn show(&mut self, results: SearchResults) {
        self.reveal_pending = true;
        self.state = SubmissionState::Success(results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::ReferenceData;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingLookup {
        calls: Arc<AtomicUsize>,
        queries: Arc<Mutex<Vec<LookupQuery>>>,
        fail_with: Option<(u16, String)>,
    }

    #[async_trait]
    impl ContactLookup for RecordingLookup {
        async fn lookup(&self, query: &LookupQuery) -> Result<Vec<ContactRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            match &self.fail_with {
                Some((status, message)) => Err(DirectoryError::BackendError {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(vec![jane()]),
            }
        }
    }

    fn jane() -> ContactRow {
        ContactRow::from_iter([
            "Jane Doe",
            "jane@x.org",
            "@jane",
            "+1234567890",
            "VP",
            "Lead",
            "TM",
        ])
    }

    fn session(lookup: RecordingLookup) -> SearchSession<RecordingLookup> {
        let controller = SelectionController::new(Arc::new(ReferenceData::bundled().unwrap()));
        SearchSession::new(controller, ResultCache::default(), lookup)
    }

    fn select_acme(session: &mut SearchSession<RecordingLookup>) {
        let c = session.controller_mut();
        c.select_region(Some("region-emea"));
        c.select_mc(Some("mc-acme"));
        c.select_function(Some("0"));
        c.select_term(Some("1"));
    }

    #[tokio::test]
    async fn test_submit_issues_lookup_with_labels() {
        let lookup = RecordingLookup::default();
        let mut session = session(lookup.clone());
        select_acme(&mut session);

        session.submit().await;

        let queries = lookup.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![LookupQuery {
                entity_id: "mc-acme".to_string(),
                function: "Talent Management".to_string(),
                term: "2024.1".to_string(),
            }]
        );
        let results = session.results().unwrap();
        assert_eq!(results.entity.label, "Acme MC");
        assert_eq!(results.rows, vec![jane()]);
        assert!(!results.from_cache);
        assert!(session.take_reveal());
        assert!(!session.take_reveal());
        assert_eq!(
            session.query_params().to_query_string(),
            "region=region-emea&mc=mc-acme&func=0&term=1"
        );
    }

    #[tokio::test]
    async fn test_incomplete_selection_does_not_call_backend() {
        let lookup = RecordingLookup::default();
        let mut session = session(lookup.clone());
        session.controller_mut().select_function(Some("0"));
        session.controller_mut().select_region(Some("region-emea"));

        let state = session.submit().await.clone();

        assert_eq!(
            state,
            SubmissionState::Idle {
                notice: Some("Please complete all fields before submitting.".to_string())
            }
        );
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
        assert!(session.query_params().is_empty());
    }

    #[tokio::test]
    async fn test_second_identical_submit_is_served_from_cache() {
        let lookup = RecordingLookup::default();
        let mut session = session(lookup.clone());
        select_acme(&mut session);

        session.submit().await;
        let first = session.results().unwrap().rows.clone();
        session.submit().await;

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        let second = session.results().unwrap();
        assert!(second.from_cache);
        assert_eq!(second.rows, first);
    }

    #[tokio::test]
    async fn test_backend_failure_shows_banner_and_is_not_cached() {
        let lookup = RecordingLookup {
            fail_with: Some((404, "not found".to_string())),
            ..Default::default()
        };
        let mut session = session(lookup.clone());
        select_acme(&mut session);

        session.submit().await;
        assert_eq!(session.error(), Some("Error: not found"));
        assert!(session.results().is_none());
        assert!(session.cache().is_empty());

        session.submit().await;
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);

        session.dismiss_error();
        assert_eq!(session.state(), &SubmissionState::default());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = session(RecordingLookup::default());
        select_acme(&mut session);

        let SubmitPlan::Fetch { ticket: first, .. } = session.begin_submit().unwrap() else {
            panic!("expected a fetch plan");
        };
        session.controller_mut().select_lc(Some("lc-acme-north"));
        let SubmitPlan::Fetch { ticket: second, query } = session.begin_submit().unwrap() else {
            panic!("expected a fetch plan");
        };
        assert_eq!(query.entity_id, "lc-acme-north");
        assert!(session.is_loading());

        assert!(session.complete(second, Ok(vec![jane()])));
        assert!(!session.complete(
            first,
            Err(DirectoryError::TransportError {
                message: "late".to_string()
            })
        ));

        let results = session.results().unwrap();
        assert_eq!(results.entity.value, "lc-acme-north");
        assert_eq!(session.cache().len(), 1);
    }

    #[test]
    fn test_resubmit_clears_previous_error() {
        let mut session = session(RecordingLookup::default());
        select_acme(&mut session);

        let SubmitPlan::Fetch { ticket, .. } = session.begin_submit().unwrap() else {
            panic!("expected a fetch plan");
        };
        session.complete(
            ticket,
            Err(DirectoryError::TransportError {
                message: "connection refused".to_string(),
            }),
        );
        assert_eq!(session.error(), Some("Error: connection refused"));

        session.begin_submit().unwrap();
        assert!(session.error().is_none());
        assert!(session.is_loading());
    }
}
