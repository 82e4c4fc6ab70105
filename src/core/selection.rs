use crate::core::reference::ReferenceData;
use crate::core::url_sync::QueryParams;
use crate::domain::model::{SelectOption, SelectionField, SelectionState};
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 目前選中的查詢對象：有 LC 用 LC，否則用 MC
pub fn derive_entity(
    mc: Option<&SelectOption>,
    lc: Option<&SelectOption>,
) -> Option<SelectOption> {
    lc.or(mc).cloned()
}

/// Cascading dropdown bookkeeping for region → MC → LC plus function and term.
///
/// Every mutation keeps the hierarchy consistent: an LC always has its true
/// MC and region selected, and an MC always has its true region. Ids that do
/// not exist in the reference tree are ignored and leave the state untouched.
#[derive(Debug, Clone)]
pub struct SelectionController {
    reference: Arc<ReferenceData>,
    state: SelectionState,
}

impl SelectionController {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            state: SelectionState::default(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn entity(&self) -> Option<&SelectOption> {
        self.state.entity.as_ref()
    }

    /// term、entity、function 皆已選定才可送出
    pub fn is_complete(&self) -> bool {
        self.state.term.is_some() && self.state.entity.is_some() && self.state.function.is_some()
    }

    pub fn region_options(&self) -> Vec<SelectOption> {
        self.reference.region_options()
    }

    /// 有選 region 時為該 region 的 MC，否則為全部 MC；皆依名稱排序（不分大小寫與重音）
    pub fn mc_options(&self) -> Vec<SelectOption> {
        let mut options: Vec<SelectOption> = match &self.state.region {
            Some(region) => self
                .reference
                .region(&region.value)
                .map(|r| r.mcs.iter().map(SelectOption::from).collect())
                .unwrap_or_default(),
            None => self.reference.all_mcs().map(SelectOption::from).collect(),
        };
        options.sort_by_cached_key(|option| label_sort_key(&option.label));
        options
    }

    /// 有選 MC 時為該 MC 的 LC；否則有 region 時為該 region 底下全部 LC；
    /// 都沒選時為全部 LC。後兩者保持原始順序，不排序。
    pub fn lc_options(&self) -> Vec<SelectOption> {
        if let Some(mc) = &self.state.mc {
            return self
                .reference
                .mc_with_region(&mc.value)
                .map(|(_, mc)| mc.lcs.iter().map(SelectOption::from).collect())
                .unwrap_or_default();
        }

        if let Some(region) = &self.state.region {
            return self
                .reference
                .region(&region.value)
                .map(|r| {
                    r.mcs
                        .iter()
                        .flat_map(|mc| mc.lcs.iter())
                        .map(SelectOption::from)
                        .collect()
                })
                .unwrap_or_default();
        }

        self.reference.all_lcs().map(SelectOption::from).collect()
    }

    pub fn function_options(&self) -> Vec<SelectOption> {
        self.reference.function_options()
    }

    pub fn term_options(&self) -> Vec<SelectOption> {
        self.reference.term_options()
    }

    pub fn options_for(&self, field: SelectionField) -> Vec<SelectOption> {
        match field {
            SelectionField::Region => self.region_options(),
            SelectionField::Mc => self.mc_options(),
            SelectionField::Lc => self.lc_options(),
            SelectionField::Function => self.function_options(),
            SelectionField::Term => self.term_options(),
        }
    }

    /// 依欄位套用選擇；`None` 代表清除。回傳是否有套用。
    pub fn select(&mut self, field: SelectionField, value: Option<&str>) -> bool {
        match field {
            SelectionField::Region => self.select_region(value),
            SelectionField::Mc => self.select_mc(value),
            SelectionField::Lc => self.select_lc(value),
            SelectionField::Function => self.select_function(value),
            SelectionField::Term => self.select_term(value),
        }
    }

    pub fn select_region(&mut self, id: Option<&str>) -> bool {
        let selected = match id {
            Some(id) => match self.reference.region(id) {
                Some(region) => Some(SelectOption::from(region)),
                None => {
                    tracing::debug!("Ignoring unknown region id: {}", id);
                    return false;
                }
            },
            None => None,
        };

        let changed = self.state.region.as_ref().map(|r| r.value.as_str())
            != selected.as_ref().map(|r| r.value.as_str());
        if changed {
            self.state.mc = None;
            self.state.lc = None;
        }

        tracing::debug!(
            "Selected Region: {}",
            selected.as_ref().map(|r| r.label.as_str()).unwrap_or("<none>")
        );
        self.state.region = selected;
        self.refresh_entity();
        true
    }

    pub fn select_mc(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) => {
                let Some((region, mc)) = self.reference.mc_with_region(id) else {
                    tracing::debug!("Ignoring unknown MC id: {}", id);
                    return false;
                };
                tracing::debug!("Selected MC: {}", mc.name);
                self.state.region = Some(SelectOption::from(region));
                self.state.mc = Some(SelectOption::from(mc));
            }
            None => {
                self.state.mc = None;
            }
        }

        self.state.lc = None;
        self.refresh_entity();
        true
    }

    pub fn select_lc(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) => {
                let Some((region, mc, lc)) = self.reference.lc_with_ancestors(id) else {
                    tracing::debug!("Ignoring unknown LC id: {}", id);
                    return false;
                };
                tracing::debug!("Selected LC: {}", lc.name);
                self.state.region = Some(SelectOption::from(region));
                self.state.mc = Some(SelectOption::from(mc));
                self.state.lc = Some(SelectOption::from(lc));
            }
            None => {
                self.state.lc = None;
            }
        }

        self.refresh_entity();
        true
    }

    pub fn select_function(&mut self, value: Option<&str>) -> bool {
        match resolve_optional(value, &self.function_options()) {
            Ok(option) => {
                self.state.function = option;
                true
            }
            Err(()) => false,
        }
    }

    pub fn select_term(&mut self, value: Option<&str>) -> bool {
        match resolve_optional(value, &self.term_options()) {
            Ok(option) => {
                self.state.term = option;
                true
            }
            Err(()) => false,
        }
    }

    /// 從 URL query 參數還原選擇。
    ///
    /// 每個參數以完全相同的 value 比對對應的完整選項清單；找不到或未提供則為未選。
    /// 回傳有提供但無法解析的欄位。
    pub fn load_from_query(&mut self, params: &QueryParams) -> Vec<SelectionField> {
        let mut unresolved = Vec::new();
        let all_mcs: Vec<SelectOption> =
            self.reference.all_mcs().map(SelectOption::from).collect();
        let all_lcs: Vec<SelectOption> =
            self.reference.all_lcs().map(SelectOption::from).collect();

        let mut resolve =
            |field: SelectionField, options: &[SelectOption]| -> Option<SelectOption> {
                let value = params.get(field)?;
                let found = options.iter().find(|option| option.value == value).cloned();
                if found.is_none() {
                    unresolved.push(field);
                }
                found
            };

        let region = resolve(SelectionField::Region, &self.reference.region_options());
        let mc = resolve(SelectionField::Mc, &all_mcs);
        let lc = resolve(SelectionField::Lc, &all_lcs);
        let function = resolve(SelectionField::Function, &self.reference.function_options());
        let term = resolve(SelectionField::Term, &self.reference.term_options());

        self.state = SelectionState {
            region,
            mc: None,
            lc: None,
            function,
            term,
            entity: None,
        };

        // 子層級優先，祖先一律以階層中的真實值為準
        if let Some(lc) = lc {
            self.select_lc(Some(lc.value.as_str()));
        } else if let Some(mc) = mc {
            self.select_mc(Some(mc.value.as_str()));
        }
        self.refresh_entity();

        if !unresolved.is_empty() {
            tracing::warn!("⚠️ Unresolved query parameters: {:?}", unresolved);
        }
        unresolved
    }

    fn refresh_entity(&mut self) {
        self.state.entity = derive_entity(self.state.mc.as_ref(), self.state.lc.as_ref());
    }
}

// 去除重音並轉小寫後比較，相同時再以原字串決定順序
fn label_sort_key(label: &str) -> (String, String) {
    let folded = label
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    (folded, label.to_string())
}

fn resolve_optional(
    value: Option<&str>,
    options: &[SelectOption],
) -> std::result::Result<Option<SelectOption>, ()> {
    match value {
        None => Ok(None),
        Some(value) => match options.iter().find(|option| option.value == value) {
            Some(option) => Ok(Some(option.clone())),
            None => {
                tracing::debug!("Ignoring unknown option value: {}", value);
                Err(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SelectionController {
        SelectionController::new(Arc::new(ReferenceData::bundled().unwrap()))
    }

    fn labels(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn test_derive_entity_prefers_lc() {
        let mc = SelectOption::new("mc-acme", "Acme MC");
        let lc = SelectOption::new("lc-acme-north", "Acme North");
        assert_eq!(derive_entity(Some(&mc), Some(&lc)), Some(lc.clone()));
        assert_eq!(derive_entity(Some(&mc), None), Some(mc));
        assert_eq!(derive_entity(None, None), None);
    }

    #[test]
    fn test_mc_options_for_every_region_are_sorted_children() {
        let mut c = controller();
        let regions = c.reference().regions().to_vec();
        for region in regions {
            assert!(c.select_region(Some(region.id.as_str())));
            let mut expected: Vec<SelectOption> =
                region.mcs.iter().map(SelectOption::from).collect();
            expected.sort_by_cached_key(|option| label_sort_key(&option.label));
            assert_eq!(c.mc_options(), expected);
        }
    }

    #[test]
    fn test_mc_options_without_region_are_all_sorted() {
        let c = controller();
        assert_eq!(
            labels(&c.mc_options()),
            vec!["Acme MC", "Andes MC", "Baltic MC", "Coral MC", "Zenith MC"]
        );
    }

    #[test]
    fn test_mc_options_ignore_case_and_accents() {
        let reference = ReferenceData::from_json_strs(
            r#"{"data":{"committee":{"regions":[{"id":"r1","name":"World","mcs":[
                {"id":"cz","name":"Czech Republic","lcs":[]},
                {"id":"ci","name":"Côte d'Ivoire","lcs":[]},
                {"id":"test","name":"aiesec Test","lcs":[]},
                {"id":"br","name":"Brazil","lcs":[]}
            ]}]}}}"#,
            r#"{"functions":["Finance"],"terms":["2024.1"]}"#,
        )
        .unwrap();
        let mut c = SelectionController::new(Arc::new(reference));
        let expected = vec!["aiesec Test", "Brazil", "Côte d'Ivoire", "Czech Republic"];

        assert_eq!(labels(&c.mc_options()), expected);
        c.select_region(Some("r1"));
        assert_eq!(labels(&c.mc_options()), expected);
    }

    #[test]
    fn test_lc_options_for_every_mc_keep_original_order() {
        let mut c = controller();
        let mcs: Vec<_> = c.reference().all_mcs().cloned().collect();
        for mc in mcs {
            assert!(c.select_mc(Some(mc.id.as_str())));
            let expected: Vec<SelectOption> = mc.lcs.iter().map(SelectOption::from).collect();
            assert_eq!(c.lc_options(), expected);
        }
    }

    #[test]
    fn test_lc_options_with_region_only_and_globally() {
        let mut c = controller();
        assert_eq!(c.lc_options().len(), c.reference().all_lcs().count());

        c.select_region(Some("region-apac"));
        assert_eq!(
            labels(&c.lc_options()),
            vec!["Zenith East", "Coral Bay", "Coral Reef"]
        );
    }

    #[test]
    fn test_selecting_lc_forces_true_ancestors() {
        let mut c = controller();
        c.select_region(Some("region-americas"));
        c.select_mc(Some("mc-andes"));

        assert!(c.select_lc(Some("lc-riga")));
        let state = c.state();
        assert_eq!(state.region.as_ref().unwrap().value, "region-emea");
        assert_eq!(state.mc.as_ref().unwrap().value, "mc-baltic");
        assert_eq!(state.lc.as_ref().unwrap().value, "lc-riga");
        assert_eq!(c.entity().unwrap().value, "lc-riga");
    }

    #[test]
    fn test_selecting_mc_sets_region_and_clears_lc() {
        let mut c = controller();
        c.select_lc(Some("lc-acme-north"));

        assert!(c.select_mc(Some("mc-zenith")));
        let state = c.state();
        assert_eq!(state.region.as_ref().unwrap().label, "Asia Pacific");
        assert!(state.lc.is_none());
        assert_eq!(c.entity().unwrap().value, "mc-zenith");
    }

    #[test]
    fn test_changing_region_clears_mc_and_lc() {
        let mut c = controller();
        c.select_lc(Some("lc-acme-central"));

        c.select_region(Some("region-apac"));
        assert!(c.state().mc.is_none());
        assert!(c.state().lc.is_none());
        assert!(c.entity().is_none());

        c.select_mc(Some("mc-coral"));
        c.select_region(None);
        assert!(c.state().region.is_none());
        assert!(c.state().mc.is_none());
    }

    #[test]
    fn test_reselecting_same_region_keeps_mc() {
        let mut c = controller();
        c.select_mc(Some("mc-acme"));
        c.select_region(Some("region-emea"));
        assert_eq!(c.state().mc.as_ref().unwrap().value, "mc-acme");
    }

    #[test]
    fn test_clearing_lc_falls_back_to_mc() {
        let mut c = controller();
        c.select_lc(Some("lc-tallinn"));
        c.select_lc(None);
        assert_eq!(c.entity().unwrap().value, "mc-baltic");
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut c = controller();
        c.select_mc(Some("mc-acme"));
        let before = c.state().clone();

        assert!(!c.select_lc(Some("lc-nowhere")));
        assert!(!c.select_mc(Some("mc-nowhere")));
        assert!(!c.select_region(Some("region-nowhere")));
        assert!(!c.select_function(Some("99")));
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn test_is_complete_requires_term_entity_function() {
        let mut c = controller();
        c.select_function(Some("0"));
        c.select_term(Some("1"));
        assert!(!c.is_complete());

        c.select_region(Some("region-emea"));
        assert!(!c.is_complete());

        c.select_mc(Some("mc-acme"));
        assert!(c.is_complete());
        assert_eq!(c.state().function.as_ref().unwrap().label, "Talent Management");
        assert_eq!(c.state().term.as_ref().unwrap().label, "2024.1");
    }

    #[test]
    fn test_load_from_query_resolves_and_reconciles() {
        let mut c = controller();
        let params = QueryParams::parse("?region=region-apac&lc=lc-riga&func=1&term=nope").unwrap();

        let unresolved = c.load_from_query(&params);

        assert_eq!(unresolved, vec![SelectionField::Term]);
        let state = c.state();
        assert_eq!(state.region.as_ref().unwrap().value, "region-emea");
        assert_eq!(state.mc.as_ref().unwrap().value, "mc-baltic");
        assert_eq!(state.function.as_ref().unwrap().label, "Finance");
        assert!(state.term.is_none());
        assert_eq!(c.entity().unwrap().value, "lc-riga");
    }

    #[test]
    fn test_load_from_empty_query_clears_everything() {
        let mut c = controller();
        c.select_lc(Some("lc-riga"));
        c.load_from_query(&QueryParams::default());
        assert_eq!(c.state(), &SelectionState::default());
    }
}
