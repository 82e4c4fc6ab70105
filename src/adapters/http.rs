use crate::domain::model::{ContactRow, LookupQuery};
use crate::domain::ports::ContactLookup;
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// 後端回應：`status` 內嵌狀態碼，成功時帶 `data`，失敗時帶 `error`。
/// `data` 只在 status 為 200 時才解讀，缺少或為 null 都視為沒有資料。
#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: Option<u16>,
    data: Option<Value>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Contact lookup over HTTP: one GET with `entityId`, `function` and `term`
/// query parameters. No retries.
#[derive(Debug, Clone)]
pub struct HttpContactClient {
    client: Client,
    backend_url: String,
}

impl HttpContactClient {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            backend_url: backend_url.into(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    async fn fetch(&self, query: &LookupQuery) -> Result<Vec<ContactRow>> {
        tracing::debug!("Making lookup request to: {}", self.backend_url);
        let response = self
            .client
            .get(&self.backend_url)
            .query(&[
                ("entityId", query.entity_id.as_str()),
                ("function", query.function.as_str()),
                ("term", query.term.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DirectoryError::TransportError {
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Lookup response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP status {}", status));
            return Err(DirectoryError::TransportError { message });
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::TransportError {
                message: e.to_string(),
            })?;

        match body.status {
            Some(200) => rows_from_data(body.data),
            other => {
                let status = other.unwrap_or_default();
                let message = body
                    .error
                    .unwrap_or_else(|| format!("backend returned status {}", status));
                Err(DirectoryError::BackendError { status, message })
            }
        }
    }
}

#[async_trait]
impl ContactLookup for HttpContactClient {
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<ContactRow>> {
        self.fetch(query).await
    }
}

fn rows_from_data(data: Option<Value>) -> Result<Vec<ContactRow>> {
    let rows: Vec<Vec<Value>> = match data {
        None | Some(Value::Null) => Vec::new(),
        Some(data) => serde_json::from_value(data)?,
    };
    Ok(rows.into_iter().map(row_from_cells).collect())
}

// 欄位不驗證；非字串值轉成文字，null 轉成空字串
fn row_from_cells(cells: Vec<Value>) -> ContactRow {
    cells
        .into_iter()
        .map(|cell| match cell {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}
