//! Data sources behind the query step
//!
//! Two configurations of the same flow:
//! - `synthetic`: the generated 60-day table, filtered and grouped per intent
//! - `mock`: a single fabricated current/previous data point for sales reports

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetConfig, SalesStore};
use crate::error::{Error, Result};
use crate::intent::{Intent, QueryDescriptor};
use crate::models::Summary;
use crate::query::{self, cutoff_date, QueryResult};

/// Summary message when the mock source has nothing for an intent
pub const NO_DATA_FOUND: &str = "No data found";

/// Range for fabricated mock sales figures (inclusive)
pub const MOCK_SALES_MIN: u64 = 100_000;
pub const MOCK_SALES_MAX: u64 = 500_000;

/// Which data source to query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Synthetic,
    Mock,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synthetic => "synthetic",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for DataSourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "synthetic" => Ok(Self::Synthetic),
            "mock" => Ok(Self::Mock),
            _ => Err(format!(
                "Unknown data source: {} (valid: synthetic, mock)",
                s
            )),
        }
    }
}

/// Fabricates one current/previous pair per sales report request
#[derive(Debug)]
pub struct MockSnapshotSource {
    rng: Mutex<fastrand::Rng>,
    today: NaiveDate,
}

impl MockSnapshotSource {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
            today,
        }
    }

    /// Deterministic variant for tests
    pub fn with_seed(seed: u64, today: NaiveDate) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
            today,
        }
    }

    fn fetch(&self, descriptor: &QueryDescriptor) -> Result<QueryResult> {
        let cutoff = cutoff_date(self.today, descriptor.date_range_days);

        let summary = match descriptor.intent {
            Intent::SalesReport => {
                let mut rng = self
                    .rng
                    .lock()
                    .map_err(|_| Error::InvalidData("Failed to acquire mock data lock".into()))?;
                Summary::Snapshot {
                    store: descriptor.store.map(|s| s.to_string()),
                    current_sales: rng.u64(MOCK_SALES_MIN..=MOCK_SALES_MAX),
                    previous_sales: rng.u64(MOCK_SALES_MIN..=MOCK_SALES_MAX),
                }
            }
            _ => Summary::message(NO_DATA_FOUND),
        };

        Ok(QueryResult {
            table: None,
            summary,
            matched_records: 0,
            cutoff,
        })
    }
}

/// Configured data source
#[derive(Debug)]
pub enum DataSource {
    Synthetic(SalesStore),
    Mock(MockSnapshotSource),
}

impl DataSource {
    /// Build a source anchored on `today`
    pub fn new(kind: DataSourceKind, dataset: DatasetConfig, today: NaiveDate) -> Self {
        match kind {
            DataSourceKind::Synthetic => DataSource::Synthetic(SalesStore::new(dataset, today)),
            DataSourceKind::Mock => DataSource::Mock(MockSnapshotSource::new(today)),
        }
    }

    pub fn kind(&self) -> DataSourceKind {
        match self {
            DataSource::Synthetic(_) => DataSourceKind::Synthetic,
            DataSource::Mock(_) => DataSourceKind::Mock,
        }
    }

    /// Answer a descriptor from this source
    pub fn fetch(&self, descriptor: &QueryDescriptor) -> Result<QueryResult> {
        match self {
            DataSource::Synthetic(store) => {
                Ok(query::process(descriptor, store.get(), store.today()))
            }
            DataSource::Mock(mock) => mock.fetch(descriptor),
        }
    }

    /// Date the look-back window ends on
    pub fn today(&self) -> NaiveDate {
        match self {
            DataSource::Synthetic(store) => store.today(),
            DataSource::Mock(mock) => mock.today,
        }
    }

    /// The cached dataset, if this source has one
    pub fn sales_store(&self) -> Option<&SalesStore> {
        match self {
            DataSource::Synthetic(store) => Some(store),
            DataSource::Mock(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Store;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "Synthetic".parse::<DataSourceKind>().unwrap(),
            DataSourceKind::Synthetic
        );
        assert_eq!("mock".parse::<DataSourceKind>().unwrap(), DataSourceKind::Mock);
        assert!("sqlite".parse::<DataSourceKind>().is_err());
    }

    #[test]
    fn test_mock_sales_report_snapshot() {
        let source = DataSource::Mock(MockSnapshotSource::with_seed(7, today()));
        let descriptor = QueryDescriptor::new(Intent::SalesReport).with_store(Store::Mumbai);
        let result = source.fetch(&descriptor).unwrap();

        match result.summary {
            Summary::Snapshot {
                store,
                current_sales,
                previous_sales,
            } => {
                assert_eq!(store.as_deref(), Some("Mumbai"));
                assert!((MOCK_SALES_MIN..=MOCK_SALES_MAX).contains(&current_sales));
                assert!((MOCK_SALES_MIN..=MOCK_SALES_MAX).contains(&previous_sales));
            }
            other => panic!("unexpected summary {:?}", other),
        }
        assert!(result.table.is_none());
    }

    #[test]
    fn test_mock_other_intents_have_no_data() {
        let source = DataSource::Mock(MockSnapshotSource::with_seed(7, today()));
        let result = source
            .fetch(&QueryDescriptor::new(Intent::StoreComparison))
            .unwrap();
        assert_eq!(result.summary, Summary::message(NO_DATA_FOUND));
    }

    #[test]
    fn test_synthetic_source_uses_cached_store() {
        let source = DataSource::new(DataSourceKind::Synthetic, DatasetConfig::default(), today());
        assert_eq!(source.kind(), DataSourceKind::Synthetic);
        assert!(!source.sales_store().unwrap().is_loaded());

        let result = source
            .fetch(&QueryDescriptor::new(Intent::CategoryAnalysis))
            .unwrap();
        assert!(result.table.is_some());
        assert!(source.sales_store().unwrap().is_loaded());
    }
}
