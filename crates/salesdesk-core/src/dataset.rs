//! Synthetic sales dataset
//!
//! Generates one record per (date, store, category) over a trailing window
//! of `window_days` dates ending on `today` (inclusive). Generation is a pure
//! function of the config and `today`, so the result is cached in a
//! [`SalesStore`] and shared read-only for the process lifetime.

use std::io::Write;
use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{Category, SalesRecord, Store};

/// Lower bound (inclusive) for generated daily sales
pub const SALES_MIN: u64 = 10_000;
/// Upper bound (exclusive) for generated daily sales
pub const SALES_MAX: u64 = 50_000;
/// Lower bound (inclusive) for generated transaction counts
pub const TRANSACTIONS_MIN: u64 = 50;
/// Upper bound (exclusive) for generated transaction counts
pub const TRANSACTIONS_MAX: u64 = 200;
/// Longest window the generator accepts (about ten years)
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Shape and seed of the synthetic dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub seed: u64,
    pub stores: Vec<Store>,
    pub categories: Vec<Category>,
    pub window_days: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            stores: Store::all().to_vec(),
            categories: Category::all().to_vec(),
            window_days: 60,
        }
    }
}

impl DatasetConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stores(mut self, stores: Vec<Store>) -> Self {
        self.stores = stores;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    /// Window length actually generated, within `1..=MAX_WINDOW_DAYS`
    pub fn effective_window_days(&self) -> u32 {
        self.window_days.clamp(1, MAX_WINDOW_DAYS)
    }

    /// Number of records a generated dataset will hold
    pub fn expected_len(&self) -> usize {
        self.stores.len() * self.categories.len() * self.effective_window_days() as usize
    }
}

/// Immutable in-memory sales table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    stores: Vec<Store>,
    categories: Vec<Category>,
}

impl Dataset {
    /// Generate the table for a window ending on `today`
    ///
    /// Order is date ascending, then store, then category (each in config
    /// order). The RNG is drawn sales-then-transactions per record in that
    /// same order.
    pub fn generate(config: &DatasetConfig, today: NaiveDate) -> Self {
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let mut records = Vec::with_capacity(config.expected_len());

        let span = u64::from(config.effective_window_days() - 1);
        let first = today.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
        for date in first.iter_days().take_while(|d| *d <= today) {
            for &store in &config.stores {
                for &category in &config.categories {
                    let sales = rng.u64(SALES_MIN..SALES_MAX);
                    let transactions = rng.u64(TRANSACTIONS_MIN..TRANSACTIONS_MAX);
                    records.push(SalesRecord {
                        date,
                        store,
                        category,
                        sales,
                        transactions,
                    });
                }
            }
        }

        debug!(
            seed = config.seed,
            records = records.len(),
            %today,
            "Generated synthetic sales dataset"
        );

        Self {
            records,
            stores: config.stores.clone(),
            categories: config.categories.clone(),
        }
    }

    /// Build a dataset from explicit records (stores/categories in first-seen order)
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut stores = Vec::new();
        let mut categories = Vec::new();
        for r in &records {
            if !stores.contains(&r.store) {
                stores.push(r.store);
            }
            if !categories.contains(&r.category) {
                categories.push(r.category);
            }
        }
        Self {
            records,
            stores,
            categories,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Descriptive statistics for display
    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            records: self.records.len(),
            first_date: self.records.iter().map(|r| r.date).min(),
            last_date: self.records.iter().map(|r| r.date).max(),
            stores: self.stores.iter().map(|s| s.to_string()).collect(),
            categories: self.categories.iter().map(|c| c.to_string()).collect(),
            total_sales: self.records.iter().map(|r| r.sales).sum(),
            total_transactions: self.records.iter().map(|r| r.transactions).sum(),
        }
    }

    /// Write the table as CSV (date, store, category, sales, transactions)
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Summary of a generated dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub stores: Vec<String>,
    pub categories: Vec<String>,
    pub total_sales: u64,
    pub total_transactions: u64,
}

/// Lazily generated, read-only dataset holder
///
/// Owned by whoever runs queries (the assistant) and passed by reference;
/// the first `get` generates, later calls return the same table.
#[derive(Debug)]
pub struct SalesStore {
    config: DatasetConfig,
    today: NaiveDate,
    cell: OnceLock<Dataset>,
}

impl SalesStore {
    pub fn new(config: DatasetConfig, today: NaiveDate) -> Self {
        Self {
            config,
            today,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> &Dataset {
        self.cell
            .get_or_init(|| Dataset::generate(&self.config, self.today))
    }

    /// Whether the dataset has been generated yet
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Anchor date of the rolling window
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}
