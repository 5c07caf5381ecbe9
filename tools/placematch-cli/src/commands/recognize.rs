//! Recognize and vote command implementations.

use std::path::PathBuf;

use placematch::{DistanceMetric, RecognizeRequest, Recognizer};

use crate::commands::{existing_file, Context};
use crate::error::{CliError, Result};
use crate::output::{format_info_table, format_metric_value, format_vote_table, InfoRow};
use crate::OutputFormat;

/// Where the query descriptor comes from.
pub struct Query {
    /// JSON file holding a float array.
    pub vector: Option<PathBuf>,
    /// Image to run through the extractor.
    pub image: Option<PathBuf>,
    /// Extractor program overriding the config.
    pub extractor: Option<String>,
    /// Arguments for `extractor`.
    pub extractor_args: Vec<String>,
}

/// Run the recognize command - single best match.
pub fn recognize(
    ctx: &Context,
    dataset: &str,
    query: Query,
    metric: Option<DistanceMetric>,
    format: OutputFormat,
) -> Result<()> {
    let metric = metric.unwrap_or(ctx.config.metric);
    let request = build_request(ctx, dataset, query, metric)?;
    let response = Recognizer::new(ctx.registry.clone(), metric).recognize(&request)?;

    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                format_info_table(vec![
                    InfoRow::new("Best Match", &response.best_match_class),
                    InfoRow::new("Metric", metric),
                    InfoRow::new("Metric Value", format_metric_value(response.metric_value)),
                ])
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

/// Run the vote command - majority class among the `n` closest records.
pub fn vote(
    ctx: &Context,
    dataset: &str,
    query: Query,
    metric: Option<DistanceMetric>,
    n: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let metric = metric.unwrap_or(ctx.config.metric);
    let n = n.unwrap_or(ctx.config.top_n);
    let request = build_request(ctx, dataset, query, metric)?;
    let response = Recognizer::new(ctx.registry.clone(), metric).recognize_top_n(&request, n)?;

    match format {
        OutputFormat::Table => println!("{}", format_vote_table(&response)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

fn build_request(
    ctx: &Context,
    dataset: &str,
    query: Query,
    metric: DistanceMetric,
) -> Result<RecognizeRequest> {
    let vector = match (query.vector, query.image) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(existing_file(&path)?)?;
            serde_json::from_str::<Vec<f32>>(&content)?
        }
        (None, Some(image)) => {
            let extractor = ctx.extractor(query.extractor, query.extractor_args)?;
            extractor.extract(existing_file(&image)?).map_err(placematch::Error::from)?
        }
        (None, None) => return Err(CliError::NoQuery),
    };
    Ok(RecognizeRequest::new(dataset, vector).with_metric(metric))
}
