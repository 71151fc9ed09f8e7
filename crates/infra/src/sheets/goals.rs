//! Goal storage on the goals tab
//!
//! The goals tab is two columns: canonical salesperson name in A, monthly
//! goal amount in B. Overrides live here; absent people use the configured
//! default.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use salgspuls_core::GoalRepository;
use salgspuls_domain::{parse_kroner, Result};
use serde_json::Value;
use tracing::{info, instrument};

use crate::sheets::client::{first_data_row, tab_title, SheetsClient};

/// [`GoalRepository`] backed by the goals tab of the spreadsheet store.
pub struct GoalSheetRepository {
    client: Arc<SheetsClient>,
    goals_range: String,
}

impl GoalSheetRepository {
    pub fn new(client: Arc<SheetsClient>, goals_range: impl Into<String>) -> Self {
        Self { client, goals_range: goals_range.into() }
    }

    async fn fetch_rows(&self) -> Result<Vec<(String, f64)>> {
        let rows = self.client.fetch_values(&self.goals_range).await?;
        Ok(rows.iter().filter_map(|cells| parse_goal_row(cells)).collect())
    }
}

#[async_trait]
impl GoalRepository for GoalSheetRepository {
    async fn fetch_goals(&self) -> Result<HashMap<String, f64>> {
        Ok(self.fetch_rows().await?.into_iter().collect())
    }

    /// Updates the existing row for the name when present, otherwise appends
    /// a new one. Read-then-write without locking; concurrent updates to the
    /// same name resolve last-write-wins.
    #[instrument(skip(self))]
    async fn update_goal(&self, name: &str, amount: f64) -> Result<()> {
        let rows = self.client.fetch_values(&self.goals_range).await?;
        let first_row = first_data_row(&self.goals_range)?;
        let tab = tab_title(&self.goals_range)?;

        let existing = rows.iter().position(|cells| {
            matches!(cells.first(), Some(Value::String(s)) if s.trim() == name)
        });

        match existing {
            Some(offset) => {
                let range = format!("{tab}!B{}", first_row + offset);
                self.client.update_values(&range, vec![vec![amount.into()]]).await?;
            }
            None => {
                let row = vec![Value::String(name.to_string()), amount.into()];
                self.client.append_values(&self.goals_range, vec![row]).await?;
            }
        }

        info!(name, amount, replaced = existing.is_some(), "wrote goal override");
        Ok(())
    }
}

fn parse_goal_row(cells: &[Value]) -> Option<(String, f64)> {
    let name = match cells.first()? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return None,
    };
    let amount = match cells.get(1)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_kroner(s),
        _ => return None,
    };
    Some((name, amount))
}

#[cfg(test)]
mod tests {
    use salgspuls_domain::SheetConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::http::HttpClient;

    use super::*;

    fn repository(server: &MockServer) -> GoalSheetRepository {
        let config = SheetConfig {
            spreadsheet_id: "sheet-1".into(),
            api_token: "token-1".into(),
            sales_range: "Salg!A2:N1000".into(),
            goals_range: "Maal!A2:B100".into(),
        };
        let client = Arc::new(
            SheetsClient::new(HttpClient::new().expect("http client"), config.clone())
                .with_base_url(server.uri()),
        );
        GoalSheetRepository::new(client, config.goals_range)
    }

    #[tokio::test]
    async fn fetch_goals_reads_name_amount_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-1/values/Maal!A2:B100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [
                    ["Niels", 150000],
                    ["Robert", "kr 80.000,00"],
                    ["", 999],
                    ["No Amount"]
                ]
            })))
            .mount(&server)
            .await;

        let goals = repository(&server).fetch_goals().await.unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals.get("Niels"), Some(&150_000.0));
        assert_eq!(goals.get("Robert"), Some(&80_000.0));
    }

    #[tokio::test]
    async fn update_goal_overwrites_existing_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [["Niels", 150000], ["Robert", 80000]]
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v4/spreadsheets/sheet-1/values/Maal!B3"))
            .and(body_json(json!({ "values": [[90000.0]] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        repository(&server).update_goal("Robert", 90_000.0).await.unwrap();
    }

    #[tokio::test]
    async fn update_goal_appends_when_name_is_new() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [["Niels", 150000]]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-1/values/Maal!A2:B100:append"))
            .and(body_json(json!({ "values": [["Hannah", 120000.0]] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        repository(&server).update_goal("Hannah", 120_000.0).await.unwrap();
    }
}
