//! Data models for SalesDesk

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Retail store location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Store {
    Mumbai,
    Delhi,
    Bangalore,
    Hyderabad,
}

impl Store {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mumbai => "Mumbai",
            Self::Delhi => "Delhi",
            Self::Bangalore => "Bangalore",
            Self::Hyderabad => "Hyderabad",
        }
    }

    pub fn all() -> &'static [Store] {
        &[Self::Mumbai, Self::Delhi, Self::Bangalore, Self::Hyderabad]
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Store {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mumbai" => Ok(Self::Mumbai),
            "delhi" | "new delhi" => Ok(Self::Delhi),
            "bangalore" | "bengaluru" => Ok(Self::Bangalore),
            "hyderabad" => Ok(Self::Hyderabad),
            _ => Err(format!(
                "Unknown store: {} (valid: Mumbai, Delhi, Bangalore, Hyderabad)",
                s
            )),
        }
    }
}

/// Merchandise category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Men,
    Women,
    Kids,
    Accessories,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Kids => "Kids",
            Self::Accessories => "Accessories",
        }
    }

    pub fn all() -> &'static [Category] {
        &[Self::Men, Self::Women, Self::Kids, Self::Accessories]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "men" | "mens" | "men's" => Ok(Self::Men),
            "women" | "womens" | "women's" => Ok(Self::Women),
            "kids" | "children" => Ok(Self::Kids),
            "accessories" => Ok(Self::Accessories),
            _ => Err(format!(
                "Unknown category: {} (valid: Men, Women, Kids, Accessories)",
                s
            )),
        }
    }
}

/// One row of the sales table: a (date, store, category) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub store: Store,
    pub category: Category,
    pub sales: u64,
    pub transactions: u64,
}

// ========== Query Results ==========

/// Dimension a result table is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Store,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Store => "store",
        }
    }
}

/// Aggregated sales for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRow {
    pub key: String,
    pub sales: u64,
}

/// Grouped result table, suitable for charting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub dimension: Dimension,
    pub rows: Vec<GroupRow>,
}

impl ResultTable {
    /// Sum of all group values
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.sales).sum()
    }

    /// Map form of the table (key -> sales)
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        self.rows
            .iter()
            .map(|r| (r.key.clone(), r.sales))
            .collect()
    }

    /// Bar chart for the presentation layer
    pub fn chart(&self) -> ChartSpec {
        let x_label = match self.dimension {
            Dimension::Category => "Category",
            Dimension::Store => "Store",
        };
        ChartSpec {
            kind: ChartKind::Bar,
            x_label: x_label.to_string(),
            y_label: "Sales".to_string(),
            labels: self.rows.iter().map(|r| r.key.clone()).collect(),
            values: self.rows.iter().map(|r| r.sales).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
}

/// Chart description handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Numeric summary forwarded to the narrator
///
/// The JSON shape depends on the intent, so the enum is untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Summary {
    /// `sales_report`: totals over the filtered subset
    Totals { total_sales: u64, transactions: u64 },
    /// Mock snapshot: current vs previous period for one store
    Snapshot {
        store: Option<String>,
        current_sales: u64,
        previous_sales: u64,
    },
    /// Nothing to report
    Message { message: String },
    /// `category_analysis` / `store_comparison`: group -> sales
    Grouped(BTreeMap<String, u64>),
}

impl Summary {
    pub fn message(msg: &str) -> Self {
        Self::Message {
            message: msg.to_string(),
        }
    }

    /// Flatten into key/value pairs for generic display
    pub fn entries(&self) -> Vec<(String, String)> {
        match self {
            Self::Totals {
                total_sales,
                transactions,
            } => vec![
                ("total_sales".to_string(), total_sales.to_string()),
                ("transactions".to_string(), transactions.to_string()),
            ],
            Self::Snapshot {
                store,
                current_sales,
                previous_sales,
            } => vec![
                (
                    "store".to_string(),
                    store.clone().unwrap_or_else(|| "all".to_string()),
                ),
                ("current_sales".to_string(), current_sales.to_string()),
                ("previous_sales".to_string(), previous_sales.to_string()),
            ],
            Self::Message { message } => vec![("message".to_string(), message.clone())],
            Self::Grouped(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
        }
    }
}
