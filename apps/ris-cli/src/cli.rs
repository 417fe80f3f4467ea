use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ris - reverse image and text search over the product catalog
#[derive(Parser)]
#[command(name = "ris", version, about)]
pub struct Cli {
    /// Print results as JSON instead of a listing.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Embed the catalog and write it to the LanceDB table.
    Index {
        /// Only index the first N catalog rows.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search by image, description or both.
    Search(SearchArgs),
    /// Look up a SKU, optionally followed by a similar-products search.
    Sku {
        sku: String,
        /// Search for products that look like the SKU's image.
        #[arg(long)]
        similar: bool,
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Image,
    Text,
    Hybrid,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Product description to search for.
    #[arg(long)]
    pub text: Option<String>,

    /// Path to a query image.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Defaults to hybrid when both inputs are given.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Facet selection as field=value; repeat for several values.
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Dominant color to match, e.g. "#FF0000".
    #[arg(long)]
    pub color: Option<String>,

    /// Maximum RGB distance for --color.
    #[arg(long)]
    pub tolerance: Option<f64>,

    #[arg(long)]
    pub top_k: Option<usize>,

    /// Zero-based page of results to print.
    #[arg(long, default_value_t = 0)]
    pub page: usize,
}
