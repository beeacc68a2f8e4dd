//! Dataset command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use salesdesk_core::{AssistantConfig, DataSourceKind, Dataset};

/// Print dataset statistics; with `csv`, also export every record
///
/// The mock data source has no table, so there is nothing to show.
pub fn cmd_dataset(config: &AssistantConfig, today: NaiveDate, csv: Option<&Path>) -> Result<()> {
    if config.data.source == DataSourceKind::Mock {
        bail!("The mock data source has no dataset (set SALESDESK_DATA_SOURCE=synthetic)");
    }

    let dataset_config = &config.data.dataset;
    let dataset = Dataset::generate(dataset_config, today);
    let stats = dataset.stats();

    println!("📦 Synthetic sales dataset\n");
    println!("   Seed:          {}", dataset_config.seed);
    println!("   Records:       {}", stats.records);
    if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
        println!("   Dates:         {} → {}", first, last);
    }
    println!("   Stores:        {}", stats.stores.join(", "));
    println!("   Categories:    {}", stats.categories.join(", "));
    println!("   Total sales:   ₹{}", stats.total_sales);
    println!("   Transactions:  {}", stats.total_transactions);

    if let Some(path) = csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        dataset
            .write_csv(file)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\n✅ Wrote {} records to {}", dataset.len(), path.display());
    }

    Ok(())
}
