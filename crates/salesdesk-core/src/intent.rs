//! Query descriptors and the decode-and-validate step for extracted intents
//!
//! The language model is asked to answer with a JSON object shaped like
//! `{"intent": ..., "store": ..., "category": ..., "date_range_days": ...}`.
//! Nothing guarantees it does, so the text goes through [`decode_descriptor`]
//! which returns a typed descriptor or a `MalformedInput` error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::parsing::extract_json_object;
use crate::error::{Error, Result};
use crate::models::{Category, Store};

/// Default look-back when the descriptor does not name one
pub const DEFAULT_DATE_RANGE_DAYS: u32 = 7;

/// Classified purpose of a user query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SalesReport,
    CategoryAnalysis,
    StoreComparison,
    /// Anything else the model produced (raw value kept for display)
    Unrecognized(String),
}

impl Intent {
    /// Parse a model-supplied intent string, tolerating case, spaces and hyphens
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace([' ', '-'], "_");
        match normalized.as_str() {
            "sales_report" => Self::SalesReport,
            "category_analysis" => Self::CategoryAnalysis,
            "store_comparison" => Self::StoreComparison,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SalesReport => "sales_report",
            Self::CategoryAnalysis => "category_analysis",
            Self::StoreComparison => "store_comparison",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Intent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Structured representation of a user request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub intent: Intent,
    #[serde(default)]
    pub store: Option<Store>,
    #[serde(default)]
    pub category: Option<Category>,
    pub date_range_days: u32,
    /// Free-form metric the model thought was asked about (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl QueryDescriptor {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            store: None,
            category: None,
            date_range_days: DEFAULT_DATE_RANGE_DAYS,
            metric: None,
        }
    }

    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.date_range_days = days;
        self
    }
}

/// Raw model output before validation
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    intent: Option<Value>,
    #[serde(default)]
    store: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default, alias = "date_range")]
    date_range_days: Option<Value>,
    #[serde(default)]
    metric: Option<Value>,
}

/// Decode the model's text into a validated descriptor
///
/// - `intent` is required; unknown values become [`Intent::Unrecognized`]
/// - missing/empty/"all" store or category means no filter
/// - missing `date_range_days` defaults to 7; non-integers are rejected
pub fn decode_descriptor(response: &str) -> Result<QueryDescriptor> {
    let json_str = extract_json_object(response)?;
    let raw: RawDescriptor = serde_json::from_str(json_str)
        .map_err(|e| Error::MalformedInput(format!("Invalid intent JSON: {}", e)))?;

    let intent = match raw.intent {
        Some(Value::String(s)) => Intent::parse(&s),
        Some(Value::Null) | None => {
            return Err(Error::MalformedInput(
                "Missing required key: intent".into(),
            ))
        }
        Some(other) => {
            return Err(Error::MalformedInput(format!(
                "intent must be a string, got {}",
                other
            )))
        }
    };

    let store = match filter_value("store", raw.store.as_ref())? {
        Some(s) => Some(s.parse::<Store>().map_err(Error::MalformedInput)?),
        None => None,
    };
    let category = match filter_value("category", raw.category.as_ref())? {
        Some(s) => Some(s.parse::<Category>().map_err(Error::MalformedInput)?),
        None => None,
    };
    let date_range_days = coerce_days(raw.date_range_days.as_ref())?;
    let metric = match raw.metric {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    };

    Ok(QueryDescriptor {
        intent,
        store,
        category,
        date_range_days,
        metric,
    })
}

/// Read an optional string filter; blanks and catch-alls mean "no filter"
fn filter_value<'a>(key: &str, value: Option<&'a Value>) -> Result<Option<&'a str>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            match trimmed.to_lowercase().as_str() {
                "" | "all" | "any" | "none" | "all stores" | "all categories" => Ok(None),
                _ => Ok(Some(trimmed)),
            }
        }
        Some(other) => Err(Error::MalformedInput(format!(
            "{} must be a string, got {}",
            key, other
        ))),
    }
}

/// Coerce the look-back into a positive day count
fn coerce_days(value: Option<&Value>) -> Result<u32> {
    let days: i64 = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_DATE_RANGE_DAYS),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(DEFAULT_DATE_RANGE_DAYS),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                f as i64
            } else {
                return Err(Error::MalformedInput(format!(
                    "date_range_days is not an integer: {}",
                    n
                )));
            }
        }
        Some(Value::String(s)) => parse_days_text(s)?,
        Some(other) => {
            return Err(Error::MalformedInput(format!(
                "date_range_days is not an integer: {}",
                other
            )))
        }
    };

    if days <= 0 {
        return Err(Error::MalformedInput(format!(
            "date_range_days must be positive, got {}",
            days
        )));
    }
    u32::try_from(days)
        .map_err(|_| Error::MalformedInput(format!("date_range_days too large: {}", days)))
}

/// Accept "30" or text holding exactly one integer ("last 30 days")
fn parse_days_text(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }

    let numbers: Vec<&str> = s
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .collect();

    match numbers.as_slice() {
        [only] => only
            .parse::<i64>()
            .map_err(|_| Error::MalformedInput(format!("date_range_days too large: {}", s))),
        _ => Err(Error::MalformedInput(format!(
            "date_range_days is not an integer: {:?}",
            s
        ))),
    }
}
