//! Query processor
//!
//! Interprets a [`QueryDescriptor`] against the sales table. Pure read-side:
//! restrict to the look-back window (and any store/category scope), then
//! total or group by the intent.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::intent::{Intent, QueryDescriptor};
use crate::models::{Dimension, GroupRow, ResultTable, SalesRecord, Summary};

/// Summary message for intents the processor does not handle
pub const INTENT_NOT_RECOGNIZED: &str = "Intent not recognized";

/// Output of one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// Grouped table for charting (grouping intents only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<ResultTable>,
    pub summary: Summary,
    /// Records that survived the window/scope filters
    pub matched_records: usize,
    /// Earliest date included
    pub cutoff: NaiveDate,
}

/// Earliest date included for a look-back of `days` from `today`
pub fn cutoff_date(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Records inside the window and the descriptor's store/category scope
pub fn filter_records<'a>(
    descriptor: &QueryDescriptor,
    dataset: &'a Dataset,
    today: NaiveDate,
) -> Vec<&'a SalesRecord> {
    let cutoff = cutoff_date(today, descriptor.date_range_days);
    dataset
        .records()
        .iter()
        .filter(|r| r.date >= cutoff)
        .filter(|r| descriptor.store.map_or(true, |s| r.store == s))
        .filter(|r| descriptor.category.map_or(true, |c| r.category == c))
        .collect()
}

/// Run a descriptor against the dataset
pub fn process(descriptor: &QueryDescriptor, dataset: &Dataset, today: NaiveDate) -> QueryResult {
    let cutoff = cutoff_date(today, descriptor.date_range_days);

    match descriptor.intent {
        Intent::SalesReport => {
            let records = filter_records(descriptor, dataset, today);
            QueryResult {
                table: None,
                summary: Summary::Totals {
                    total_sales: records.iter().map(|r| r.sales).sum(),
                    transactions: records.iter().map(|r| r.transactions).sum(),
                },
                matched_records: records.len(),
                cutoff,
            }
        }
        Intent::CategoryAnalysis => grouped(descriptor, dataset, today, Dimension::Category),
        Intent::StoreComparison => grouped(descriptor, dataset, today, Dimension::Store),
        Intent::Unrecognized(_) => QueryResult {
            table: None,
            summary: Summary::message(INTENT_NOT_RECOGNIZED),
            matched_records: 0,
            cutoff,
        },
    }
}

/// Group the filtered records by `dimension`, summing sales
///
/// Rows follow the dataset's store/category order; groups with no records
/// are omitted.
fn grouped(
    descriptor: &QueryDescriptor,
    dataset: &Dataset,
    today: NaiveDate,
    dimension: Dimension,
) -> QueryResult {
    let records = filter_records(descriptor, dataset, today);

    let key_of = |r: &SalesRecord| match dimension {
        Dimension::Category => r.category.to_string(),
        Dimension::Store => r.store.to_string(),
    };
    let order: Vec<String> = match dimension {
        Dimension::Category => dataset.categories().iter().map(|c| c.to_string()).collect(),
        Dimension::Store => dataset.stores().iter().map(|s| s.to_string()).collect(),
    };

    let mut totals: HashMap<String, u64> = HashMap::new();
    for &record in &records {
        *totals.entry(key_of(record)).or_insert(0) += record.sales;
    }

    let rows = order
        .into_iter()
        .filter_map(|key| totals.get(&key).map(|&sales| GroupRow { key, sales }))
        .collect();
    let table = ResultTable { dimension, rows };

    QueryResult {
        summary: Summary::Grouped(table.to_map()),
        table: Some(table),
        matched_records: records.len(),
        cutoff: cutoff_date(today, descriptor.date_range_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetConfig;
    use crate::models::{Category, Store};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn generated() -> Dataset {
        Dataset::generate(&DatasetConfig::default(), today())
    }

    fn record(days_ago: i64, store: Store, category: Category, sales: u64, tx: u64) -> SalesRecord {
        SalesRecord {
            date: today() - Duration::days(days_ago),
            store,
            category,
            sales,
            transactions: tx,
        }
    }

    #[test]
    fn test_sales_report_mumbai_literal_total() {
        let dataset = Dataset::from_records(vec![
            record(0, Store::Mumbai, Category::Men, 10_000, 50),
            record(3, Store::Mumbai, Category::Women, 20_000, 60),
            record(7, Store::Mumbai, Category::Kids, 15_500, 70),
            // outside the 7-day window
            record(8, Store::Mumbai, Category::Men, 99_999, 99),
        ]);
        let descriptor = QueryDescriptor::new(Intent::SalesReport)
            .with_store(Store::Mumbai)
            .with_days(7);

        let result = process(&descriptor, &dataset, today());
        assert_eq!(
            result.summary,
            Summary::Totals {
                total_sales: 45_500,
                transactions: 180,
            }
        );
        assert!(result.table.is_none());
        assert_eq!(result.matched_records, 3);
    }

    #[test]
    fn test_sales_report_matches_manual_aggregate() {
        let dataset = generated();
        let descriptor = QueryDescriptor::new(Intent::SalesReport)
            .with_store(Store::Delhi)
            .with_days(14);

        let cutoff = today() - Duration::days(14);
        let expected_sales: u64 = dataset
            .records()
            .iter()
            .filter(|r| r.date >= cutoff && r.store == Store::Delhi)
            .map(|r| r.sales)
            .sum();
        let expected_tx: u64 = dataset
            .records()
            .iter()
            .filter(|r| r.date >= cutoff && r.store == Store::Delhi)
            .map(|r| r.transactions)
            .sum();

        let result = process(&descriptor, &dataset, today());
        assert_eq!(
            result.summary,
            Summary::Totals {
                total_sales: expected_sales,
                transactions: expected_tx,
            }
        );
        // 15 dates x 4 categories
        assert_eq!(result.matched_records, 60);
    }

    #[test]
    fn test_filtered_records_respect_cutoff_for_all_ranges() {
        let dataset = generated();
        for days in [0u32, 1, 6, 7, 30, 59, 60, 365, u32::MAX] {
            let descriptor = QueryDescriptor::new(Intent::SalesReport).with_days(days);
            let cutoff = cutoff_date(today(), days);
            let records = filter_records(&descriptor, &dataset, today());
            assert!(records.iter().all(|r| r.date >= cutoff), "days {}", days);
        }
    }

    #[test]
    fn test_zero_days_is_today_only() {
        let dataset = generated();
        let descriptor = QueryDescriptor::new(Intent::SalesReport).with_days(0);
        let result = process(&descriptor, &dataset, today());
        assert_eq!(result.matched_records, 16);
        assert_eq!(result.cutoff, today());
    }

    #[test]
    fn test_grouped_totals_match_sales_report() {
        let dataset = generated();
        for days in [1u32, 7, 30, 90] {
            let report = process(
                &QueryDescriptor::new(Intent::SalesReport).with_days(days),
                &dataset,
                today(),
            );
            let total = match report.summary {
                Summary::Totals { total_sales, .. } => total_sales,
                other => panic!("unexpected summary {:?}", other),
            };

            for intent in [Intent::CategoryAnalysis, Intent::StoreComparison] {
                let result = process(
                    &QueryDescriptor::new(intent.clone()).with_days(days),
                    &dataset,
                    today(),
                );
                let grouped: u64 = match &result.summary {
                    Summary::Grouped(map) => map.values().sum(),
                    other => panic!("unexpected summary {:?}", other),
                };
                assert_eq!(grouped, total, "{} over {} days", intent, days);
                assert_eq!(result.table.as_ref().unwrap().total(), total);
            }
        }
    }

    #[test]
    fn test_grouped_totals_match_within_store_scope() {
        let dataset = generated();
        let report = process(
            &QueryDescriptor::new(Intent::SalesReport).with_store(Store::Hyderabad),
            &dataset,
            today(),
        );
        let by_category = process(
            &QueryDescriptor::new(Intent::CategoryAnalysis).with_store(Store::Hyderabad),
            &dataset,
            today(),
        );
        let total = match report.summary {
            Summary::Totals { total_sales, .. } => total_sales,
            _ => unreachable!(),
        };
        assert_eq!(by_category.table.unwrap().total(), total);
    }

    #[test]
    fn test_category_analysis_groups_in_config_order() {
        let dataset = generated();
        let result = process(
            &QueryDescriptor::new(Intent::CategoryAnalysis),
            &dataset,
            today(),
        );
        let table = result.table.unwrap();
        assert_eq!(table.dimension, Dimension::Category);
        let keys: Vec<_> = table.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Men", "Women", "Kids", "Accessories"]);
        match result.summary {
            Summary::Grouped(map) => assert_eq!(map.len(), 4),
            other => panic!("unexpected summary {:?}", other),
        }
    }

    #[test]
    fn test_store_comparison_groups_by_store() {
        let dataset = Dataset::from_records(vec![
            record(1, Store::Delhi, Category::Men, 100, 1),
            record(1, Store::Mumbai, Category::Men, 300, 1),
            record(2, Store::Delhi, Category::Kids, 50, 1),
        ]);
        let result = process(
            &QueryDescriptor::new(Intent::StoreComparison),
            &dataset,
            today(),
        );
        let table = result.table.unwrap();
        assert_eq!(table.dimension, Dimension::Store);
        assert_eq!(
            table.rows,
            vec![
                GroupRow {
                    key: "Delhi".to_string(),
                    sales: 150
                },
                GroupRow {
                    key: "Mumbai".to_string(),
                    sales: 300
                },
            ]
        );
    }

    #[test]
    fn test_unknown_intent_yields_message_and_no_table() {
        let dataset = generated();
        let result = process(
            &QueryDescriptor::new(Intent::Unrecognized("foo".to_string())),
            &dataset,
            today(),
        );
        assert_eq!(result.summary, Summary::message(INTENT_NOT_RECOGNIZED));
        assert!(result.table.is_none());
    }

    #[test]
    fn test_empty_window_gives_zero_totals() {
        let dataset = Dataset::from_records(vec![record(30, Store::Delhi, Category::Men, 100, 1)]);
        let result = process(&QueryDescriptor::new(Intent::SalesReport), &dataset, today());
        assert_eq!(
            result.summary,
            Summary::Totals {
                total_sales: 0,
                transactions: 0
            }
        );

        let grouped = process(
            &QueryDescriptor::new(Intent::StoreComparison),
            &dataset,
            today(),
        );
        assert!(grouped.table.unwrap().rows.is_empty());
    }
}
