//! placematch Command Line Interface
//!
//! Build per-dataset descriptor stores from image folders and recognize
//! places against them.

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use placematch::DistanceMetric;
use tracing_subscriber::EnvFilter;

use crate::commands::recognize::Query;
use crate::commands::{datasets, describe, recognize, Context};
use crate::error::Result;

/// placematch Command Line Interface
///
/// Visual place recognition over per-dataset descriptor stores.
#[derive(Parser, Debug)]
#[command(name = "placematch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the dataset stores
    #[arg(short, long, env = "PLACEMATCH_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "PLACEMATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    Json,
}

/// Query descriptor source and extractor options.
#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// JSON file holding the query descriptor as a float array
    #[arg(long, conflicts_with = "image", required_unless_present = "image")]
    pub vector: Option<PathBuf>,

    /// Image to describe with the extractor
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Extractor program (overrides the config)
    #[arg(long)]
    pub extractor: Option<String>,

    /// Argument passed to the extractor before the image path (repeatable)
    #[arg(long = "extractor-arg", allow_hyphen_values = true)]
    pub extractor_args: Vec<String>,

    /// Metric name, e.g. euclidean, cosine or minkowski:4
    #[arg(short, long)]
    pub metric: Option<DistanceMetric>,
}

impl QueryArgs {
    fn split(self) -> (Query, Option<DistanceMetric>) {
        let query = Query {
            vector: self.vector,
            image: self.image,
            extractor: self.extractor,
            extractor_args: self.extractor_args,
        };
        (query, self.metric)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe every image of <IMAGES>/<class>/ into a dataset
    Describe {
        /// Dataset name
        dataset: String,

        /// Directory with one subdirectory per class
        #[arg(long)]
        images: PathBuf,

        /// Extractor program (overrides the config)
        #[arg(long)]
        extractor: Option<String>,

        /// Argument passed to the extractor before the image path (repeatable)
        #[arg(long = "extractor-arg", allow_hyphen_values = true)]
        extractor_args: Vec<String>,
    },

    /// Find the class of the closest stored descriptor
    Recognize {
        /// Dataset name
        dataset: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Vote among the closest stored descriptors
    Vote {
        /// Dataset name
        dataset: String,

        #[command(flatten)]
        query: QueryArgs,

        /// Number of neighbours that vote (defaults to the config's top_n)
        #[arg(short)]
        n: Option<usize>,
    },

    /// List datasets
    Datasets,

    /// Show record and class counts of a dataset
    Stats {
        /// Dataset name
        dataset: String,
    },

    /// Delete a dataset's store
    Drop {
        /// Dataset name
        dataset: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("placematch=info".parse()?))
        .init();

    let cli = Cli::parse();
    let ctx = Context::load(cli.config.as_deref(), cli.root)?;

    match cli.command {
        Commands::Describe { dataset, images, extractor, extractor_args } => {
            describe::run(&ctx, &dataset, &images, extractor, extractor_args, cli.format)
        }
        Commands::Recognize { dataset, query } => {
            let (query, metric) = query.split();
            recognize::recognize(&ctx, &dataset, query, metric, cli.format)
        }
        Commands::Vote { dataset, query, n } => {
            let (query, metric) = query.split();
            recognize::vote(&ctx, &dataset, query, metric, n, cli.format)
        }
        Commands::Datasets => datasets::list(&ctx, cli.format),
        Commands::Stats { dataset } => datasets::stats(&ctx, &dataset, cli.format),
        Commands::Drop { dataset } => datasets::drop(&ctx, &dataset),
    }
}
