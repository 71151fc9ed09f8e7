//! Shared in-memory repositories for integration tests
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use salgspuls_core::{GoalRepository, MeetingRepository};
use salgspuls_domain::{Result, SaleRecord};

/// In-memory stand-in for the spreadsheet sales tab.
pub struct InMemorySheet {
    rows: Mutex<Vec<SaleRecord>>,
}

impl InMemorySheet {
    pub fn new(rows: Vec<SaleRecord>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    pub fn records(&self) -> Vec<SaleRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MeetingRepository for InMemorySheet {
    async fn list_meetings(&self) -> Result<Vec<SaleRecord>> {
        Ok(self.rows.lock().unwrap().iter().filter(|r| r.is_meeting).cloned().collect())
    }

    async fn write_order_link(&self, meeting_row: usize, order_id: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.row == meeting_row {
                row.linked_order_id = Some(order_id.to_string());
            }
        }
        Ok(())
    }
}

/// In-memory goal override store.
pub struct InMemoryGoals {
    goals: Mutex<HashMap<String, f64>>,
}

impl InMemoryGoals {
    pub fn new(goals: HashMap<String, f64>) -> Self {
        Self { goals: Mutex::new(goals) }
    }
}

#[async_trait]
impl GoalRepository for InMemoryGoals {
    async fn fetch_goals(&self) -> Result<HashMap<String, f64>> {
        Ok(self.goals.lock().unwrap().clone())
    }

    async fn update_goal(&self, name: &str, amount: f64) -> Result<()> {
        self.goals.lock().unwrap().insert(name.to_string(), amount);
        Ok(())
    }
}

/// Row builder for test data.
pub struct RowBuilder {
    record: SaleRecord,
}

impl RowBuilder {
    pub fn sale(row: usize, date: NaiveDate, seller: &str, amount: f64) -> Self {
        Self {
            record: SaleRecord {
                row,
                date,
                raw_seller_name: seller.to_string(),
                amount,
                is_meeting: false,
                is_retention: false,
                customer_name: None,
                linked_order_id: None,
            },
        }
    }

    pub fn meeting(row: usize, date: NaiveDate, seller: &str, customer: &str) -> Self {
        let mut builder = Self::sale(row, date, seller, 0.0);
        builder.record.is_meeting = true;
        builder.record.customer_name = Some(customer.to_string());
        builder
    }

    pub fn retention(mut self) -> Self {
        self.record.is_retention = true;
        self
    }

    pub fn customer(mut self, name: &str) -> Self {
        self.record.customer_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> SaleRecord {
        self.record
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
