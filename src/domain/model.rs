use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lc {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lcs: Vec<Lc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mcs: Vec<Mc>,
}

/// 下拉選單中的一個選項：`value` 是 id 或索引，`label` 是顯示文字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<&Region> for SelectOption {
    fn from(region: &Region) -> Self {
        SelectOption::new(&region.id, &region.name)
    }
}

impl From<&Mc> for SelectOption {
    fn from(mc: &Mc) -> Self {
        SelectOption::new(&mc.id, &mc.name)
    }
}

impl From<&Lc> for SelectOption {
    fn from(lc: &Lc) -> Self {
        SelectOption::new(&lc.id, &lc.name)
    }
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.value)
    }
}

/// The five dropdown fields a user can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    Region,
    Mc,
    Lc,
    Function,
    Term,
}

impl SelectionField {
    pub const ALL: [SelectionField; 5] = [
        SelectionField::Region,
        SelectionField::Mc,
        SelectionField::Lc,
        SelectionField::Function,
        SelectionField::Term,
    ];

    /// URL query 參數名稱
    pub fn query_key(self) -> &'static str {
        match self {
            SelectionField::Region => "region",
            SelectionField::Mc => "mc",
            SelectionField::Lc => "lc",
            SelectionField::Function => "func",
            SelectionField::Term => "term",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "region" => Some(SelectionField::Region),
            "mc" => Some(SelectionField::Mc),
            "lc" => Some(SelectionField::Lc),
            "func" | "function" => Some(SelectionField::Function),
            "term" => Some(SelectionField::Term),
            _ => None,
        }
    }
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.query_key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub region: Option<SelectOption>,
    pub mc: Option<SelectOption>,
    pub lc: Option<SelectOption>,
    pub function: Option<SelectOption>,
    pub term: Option<SelectOption>,
    pub entity: Option<SelectOption>,
}

impl SelectionState {
    pub fn get(&self, field: SelectionField) -> Option<&SelectOption> {
        match field {
            SelectionField::Region => self.region.as_ref(),
            SelectionField::Mc => self.mc.as_ref(),
            SelectionField::Lc => self.lc.as_ref(),
            SelectionField::Function => self.function.as_ref(),
            SelectionField::Term => self.term.as_ref(),
        }
    }
}

/// 聯絡人資料列：name, email, telegram, phone, title, role, department。
/// 欄位形狀由後端決定，客戶端不做驗證。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactRow(pub Vec<String>);

impl ContactRow {
    pub const HEADERS: [&'static str; 7] = [
        "Name",
        "Email",
        "Telegram ID",
        "Contact No",
        "Title",
        "Role",
        "Department",
    ];

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.cell(0)
    }

    pub fn email(&self) -> Option<&str> {
        self.cell(1)
    }
}

impl<S: Into<String>> FromIterator<S> for ContactRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ContactRow(iter.into_iter().map(Into::into).collect())
    }
}

/// The three values sent to the backend for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupQuery {
    pub entity_id: String,
    pub function: String,
    pub term: String,
}

/// Rows shown after a successful submission, with the labels they were
/// searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub entity: SelectOption,
    pub function: SelectOption,
    pub term: SelectOption,
    pub rows: Vec<ContactRow>,
    #[serde(skip)]
    pub from_cache: bool,
}
