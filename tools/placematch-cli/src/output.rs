//! Output formatting utilities.

use placematch::{DatasetName, StoreStats, VoteResponse};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// A key-value info row.
#[derive(Tabled)]
pub struct InfoRow {
    #[tabled(rename = "Property")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl InfoRow {
    pub fn new(key: &str, value: impl ToString) -> Self {
        Self { key: key.to_string(), value: value.to_string() }
    }
}

/// Format an info table with key-value pairs.
pub fn format_info_table(rows: Vec<InfoRow>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// A dataset listing row.
#[derive(Tabled)]
pub struct DatasetRow {
    #[tabled(rename = "Dataset")]
    pub name: String,
    #[tabled(rename = "Records")]
    pub records: usize,
    #[tabled(rename = "Dimension")]
    pub dimension: String,
    #[tabled(rename = "Classes")]
    pub classes: usize,
}

impl DatasetRow {
    pub fn new(name: &DatasetName, stats: &StoreStats) -> Self {
        Self {
            name: name.to_string(),
            records: stats.records,
            dimension: format_dimension(stats.dimension),
            classes: stats.classes.len(),
        }
    }
}

/// Format the dataset listing.
pub fn format_datasets_table(rows: Vec<DatasetRow>) -> String {
    if rows.is_empty() {
        return "(no datasets)".to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// A per-class count row.
#[derive(Tabled)]
pub struct ClassRow {
    #[tabled(rename = "Class")]
    pub class: String,
    #[tabled(rename = "Records")]
    pub records: usize,
}

/// Format per-class counts of a store.
pub fn format_stats_table(stats: &StoreStats) -> String {
    let summary = format_info_table(vec![
        InfoRow::new("Records", stats.records),
        InfoRow::new("Dimension", format_dimension(stats.dimension)),
        InfoRow::new("Classes", stats.classes.len()),
    ]);
    if stats.classes.is_empty() {
        return summary;
    }

    let rows: Vec<ClassRow> = stats
        .classes
        .iter()
        .map(|(class, &records)| ClassRow { class: class.clone(), records })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{summary}\n{table}")
}

/// A ranked neighbour row.
#[derive(Tabled)]
pub struct RankRow {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Class")]
    pub class: String,
    #[tabled(rename = "Metric Value")]
    pub value: String,
}

/// Format the outcome of a vote.
pub fn format_vote_table(response: &VoteResponse) -> String {
    let rows: Vec<RankRow> = response
        .ranked_top_n
        .iter()
        .enumerate()
        .map(|(i, ranked)| RankRow {
            rank: i + 1,
            class: ranked.class_label.clone(),
            value: format_metric_value(ranked.metric_value),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("Best match: {}\n{table}", response.best_match_class)
}

/// Format a metric value with reasonable precision.
pub fn format_metric_value(value: f32) -> String {
    format!("{value:.6}")
}

fn format_dimension(dimension: Option<usize>) -> String {
    dimension.map_or_else(|| "-".to_string(), |d| d.to_string())
}
