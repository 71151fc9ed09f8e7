//! Browser-function client for the order portal

use async_trait::async_trait;
use reqwest::Method;
use salgspuls_core::OrderDirectory;
use salgspuls_domain::{OrderDetails, OrderListItem, PortalConfig, Result, SalgspulsError};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// [`OrderDirectory`] implementation that drives the portal through a
/// browser-function service.
///
/// Each call uploads a small script; the service runs it in a headless
/// browser session that logs into the portal, scrapes the requested page and
/// returns the result as JSON.
pub struct PortalClient {
    http: HttpClient,
    config: PortalConfig,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupData {
    found: bool,
    #[serde(default)]
    order: Option<PortalOrder>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalOrder {
    order_id: String,
    customer: String,
    db: f64,
    salesrep: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentData {
    success: bool,
    #[serde(default)]
    orders: Vec<PortalListOrder>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalListOrder {
    order_id: String,
    customer: String,
    db: f64,
    date: String,
}

impl PortalClient {
    /// # Errors
    /// Returns `Config` when the portal credentials are incomplete.
    pub fn new(http: HttpClient, config: PortalConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SalgspulsError::Config("portal api key is empty".into()));
        }
        if config.username.trim().is_empty() || config.password.trim().is_empty() {
            return Err(SalgspulsError::Config("portal credentials are incomplete".into()));
        }
        Ok(Self { http, config })
    }

    async fn run_script<T>(&self, script: String) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/function", self.config.endpoint.trim_end_matches('/'));
        let request = self
            .http
            .request(Method::POST, &url)
            .query(&[("token", self.config.api_key.as_str())])
            .header("content-type", "application/javascript")
            .body(script);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SalgspulsError::Network(format!(
                "browser function failed with status {status}: {body}"
            )));
        }

        let envelope: Envelope<T> =
            response.json().await.map_err(|err| SalgspulsError::from(InfraError::from(err)))?;
        Ok(envelope.data)
    }

    fn login_snippet(&self) -> String {
        format!(
            r#"await page.goto(portalUrl("{site}"));
  await page.type('#username', "{username}");
  await page.type('#password', "{password}");
  await Promise.all([page.waitForNavigation(), page.click('#login')]);"#,
            site = self.config.site,
            username = self.config.username,
            password = self.config.password,
        )
    }

    fn lookup_script(&self, order_id: &str) -> String {
        format!(
            r#"export default async function ({{ page }}) {{
  {login}
  return {{ data: await scrapeOrderDetails(page, "{order_id}") }};
}}"#,
            login = self.login_snippet(),
            order_id = order_id,
        )
    }

    fn recent_orders_script(&self) -> String {
        format!(
            r#"export default async function ({{ page }}) {{
  {login}
  return {{ data: await scrapeRecentOrders(page) }};
}}"#,
            login = self.login_snippet(),
        )
    }

    fn customer_orders_script(&self, customer: &str) -> String {
        format!(
            r#"export default async function ({{ page }}) {{
  {login}
  return {{ data: await scrapeCustomerOrders(page, "{customer}") }};
}}"#,
            login = self.login_snippet(),
            customer = customer,
        )
    }
}

fn into_list_items(orders: Vec<PortalListOrder>) -> Vec<OrderListItem> {
    orders
        .into_iter()
        .map(|o| OrderListItem { order_id: o.order_id, customer: o.customer, db: o.db, date: o.date })
        .collect()
}

#[async_trait]
impl OrderDirectory for PortalClient {
    #[instrument(skip(self))]
    async fn fetch_recent_orders(&self) -> Result<Vec<OrderListItem>> {
        let data: RecentData = self.run_script(self.recent_orders_script()).await?;
        if !data.success {
            let message = data.message.unwrap_or_else(|| "unknown portal failure".into());
            return Err(SalgspulsError::Network(format!("recent order scrape failed: {message}")));
        }

        debug!(orders = data.orders.len(), "fetched recent orders from portal");
        Ok(into_list_items(data.orders))
    }

    #[instrument(skip(self))]
    async fn lookup_order(&self, order_id: &str) -> Result<Option<OrderDetails>> {
        let data: LookupData = self.run_script(self.lookup_script(order_id)).await?;
        if !data.found {
            if let Some(message) = data.message {
                debug!(order_id, message, "portal reported order as missing");
            }
            return Ok(None);
        }

        let order = data.order.ok_or_else(|| {
            SalgspulsError::Store(format!("portal claimed order {order_id} found but sent no body"))
        })?;
        Ok(Some(OrderDetails {
            order_id: order.order_id,
            customer: order.customer,
            db: order.db,
            salesrep: order.salesrep,
        }))
    }

    #[instrument(skip(self))]
    async fn search_customer_orders(&self, customer: &str) -> Result<Vec<OrderListItem>> {
        let data: RecentData = self.run_script(self.customer_orders_script(customer)).await?;
        if !data.success {
            let message = data.message.unwrap_or_else(|| "unknown portal failure".into());
            return Err(SalgspulsError::Network(format!(
                "customer order search failed: {message}"
            )));
        }

        debug!(customer, orders = data.orders.len(), "searched customer order history");
        Ok(into_list_items(data.orders))
    }
}
