//! Dataset listing, stats and drop command implementations.

use crate::commands::Context;
use crate::error::Result;
use crate::output::{format_datasets_table, format_stats_table, DatasetRow};
use crate::OutputFormat;

/// List every dataset with its stats.
pub fn list(ctx: &Context, format: OutputFormat) -> Result<()> {
    let mut rows = Vec::new();
    let mut json = Vec::new();
    for name in ctx.registry.datasets()? {
        let stats = ctx.registry.stats(name.as_str())?;
        rows.push(DatasetRow::new(&name, &stats));
        json.push(serde_json::json!({ "dataset": name.as_str(), "stats": stats }));
    }

    match format {
        OutputFormat::Table => println!("{}", format_datasets_table(rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json)?),
    }

    Ok(())
}

/// Show record, dimension and per-class counts of a dataset.
pub fn stats(ctx: &Context, dataset: &str, format: OutputFormat) -> Result<()> {
    let stats = ctx.registry.stats(dataset)?;

    match format {
        OutputFormat::Table => println!("{}", format_stats_table(&stats)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }

    Ok(())
}

/// Delete a dataset's store.
pub fn drop(ctx: &Context, dataset: &str) -> Result<()> {
    if ctx.registry.drop_store(dataset)? {
        println!("Dropped dataset '{dataset}'");
    } else {
        println!("Dataset '{dataset}' does not exist");
    }
    Ok(())
}
