//! Describe command implementation.

use std::path::Path;
use std::sync::Arc;

use placematch::ingest::{ClassTree, IngestionPipeline};

use crate::commands::{existing_file, Context};
use crate::error::Result;
use crate::output::{format_info_table, InfoRow};
use crate::OutputFormat;

/// Run the describe command - fills a dataset from `<images>/<class>/<image>`.
pub fn run(
    ctx: &Context,
    dataset: &str,
    images: &Path,
    extractor: Option<String>,
    extractor_args: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let tree = ClassTree::from_dir(existing_file(images)?)?;
    let extractor = ctx.extractor(extractor, extractor_args)?;

    let pipeline = IngestionPipeline::new(Arc::clone(&ctx.registry), extractor);
    let appended = pipeline.describe_dataset(dataset, &tree)?;
    let stats = ctx.registry.stats(dataset)?;

    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                format_info_table(vec![
                    InfoRow::new("Dataset", dataset),
                    InfoRow::new("Appended", appended),
                    InfoRow::new("Total Records", stats.records),
                    InfoRow::new("Classes", stats.classes.len()),
                ])
            );
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "dataset": dataset,
                "appended": appended,
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
