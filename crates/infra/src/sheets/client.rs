//! Values-API client for the spreadsheet store

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Method;
use salgspuls_core::{MeetingRepository, SalesLog};
use salgspuls_domain::constants::COL_ORDER_ID;
use salgspuls_domain::{Result, SaleRecord, SalgspulsError, SheetConfig, SyncedOrder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::errors::InfraError;
use crate::http::HttpClient;
use crate::sheets::codec::{id_cell, parse_sale_row, synced_order_to_row};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Client for the spreadsheet values API.
///
/// Reads and writes A1-notation ranges on the configured document, using the
/// codec in [`super::codec`] for the sales-tab row layout.
pub struct SheetsClient {
    http: HttpClient,
    base_url: String,
    config: SheetConfig,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsClient {
    pub fn new(http: HttpClient, config: SheetConfig) -> Self {
        Self { http, base_url: DEFAULT_BASE_URL.to_string(), config }
    }

    /// Point the client at a different API host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// All parseable rows of the sales tab, in sheet order.
    ///
    /// Rows without a usable date cell are skipped, not errors.
    #[instrument(skip(self))]
    pub async fn fetch_sales(&self) -> Result<Vec<SaleRecord>> {
        let rows = self.fetch_values(&self.config.sales_range).await?;
        let first_row = first_data_row(&self.config.sales_range)?;

        let records: Vec<SaleRecord> = rows
            .iter()
            .enumerate()
            .filter_map(|(offset, cells)| parse_sale_row(first_row + offset, cells))
            .collect();

        debug!(fetched = rows.len(), parsed = records.len(), "fetched sales rows");
        Ok(records)
    }

    pub(crate) async fn fetch_values(&self, range: &str) -> Result<Vec<Vec<Value>>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.config.spreadsheet_id, range
        );
        let request = self
            .http
            .request(Method::GET, &url)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")])
            .bearer_auth(&self.config.api_token);

        let response = self.http.send(request).await?;
        let response = check_status(response, range).await?;
        let body: ValuesResponse =
            response.json().await.map_err(|err| SalgspulsError::from(InfraError::from(err)))?;
        Ok(body.values)
    }

    /// Overwrite a single range with the given rows.
    pub(crate) async fn update_values(&self, range: &str, rows: Vec<Vec<Value>>) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.config.spreadsheet_id, range
        );
        let request = self
            .http
            .request(Method::PUT, &url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.config.api_token)
            .json(&json!({ "values": rows }));

        let response = self.http.send(request).await?;
        check_status(response, range).await?;
        Ok(())
    }

    /// Append one row after the last data row of the given range.
    pub(crate) async fn append_values(&self, range: &str, rows: Vec<Vec<Value>>) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.base_url, self.config.spreadsheet_id, range
        );
        let request = self
            .http
            .request(Method::POST, &url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.config.api_token)
            .json(&json!({ "values": rows }));

        let response = self.http.send(request).await?;
        check_status(response, range).await?;
        Ok(())
    }

    fn sales_tab(&self) -> Result<String> {
        tab_title(&self.config.sales_range)
    }
}

#[async_trait]
impl MeetingRepository for SheetsClient {
    async fn list_meetings(&self) -> Result<Vec<SaleRecord>> {
        let records = self.fetch_sales().await?;
        Ok(records.into_iter().filter(|r| r.is_meeting).collect())
    }

    #[instrument(skip(self))]
    async fn write_order_link(&self, meeting_row: usize, order_id: &str) -> Result<()> {
        let tab = self.sales_tab()?;
        let range = format!("{tab}!C{meeting_row}");
        self.update_values(&range, vec![vec![Value::String(order_id.to_string())]]).await
    }
}

#[async_trait]
impl SalesLog for SheetsClient {
    /// Ids are collected from the raw rows so that rows with bad date cells
    /// still count toward the dedup set.
    async fn existing_order_ids(&self) -> Result<HashSet<String>> {
        let rows = self.fetch_values(&self.config.sales_range).await?;
        Ok(rows.iter().filter_map(|cells| id_cell(cells, COL_ORDER_ID)).collect())
    }

    async fn append_synced_order(&self, order: &SyncedOrder) -> Result<()> {
        self.append_values(&self.config.sales_range, vec![synced_order_to_row(order)]).await
    }
}

async fn check_status(response: reqwest::Response, range: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SalgspulsError::Store(format!(
        "values request for range '{range}' failed with status {status}: {body}"
    )))
}

/// Tab title part of an A1 range (`Salg!A2:N1000` -> `Salg`).
pub(crate) fn tab_title(range: &str) -> Result<String> {
    range
        .split_once('!')
        .map(|(tab, _)| tab.to_string())
        .ok_or_else(|| SalgspulsError::Config(format!("range '{range}' has no tab title")))
}

/// First data row of an A1 range (`Salg!A2:N1000` -> `2`).
pub(crate) fn first_data_row(range: &str) -> Result<usize> {
    let cells = range
        .split_once('!')
        .map(|(_, cells)| cells)
        .ok_or_else(|| SalgspulsError::Config(format!("range '{range}' has no tab title")))?;
    let start = cells.split(':').next().unwrap_or(cells);
    let digits: String = start.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse()
        .map_err(|_| SalgspulsError::Config(format!("range '{range}' has no starting row")))
}
