use clap::{Parser, Subcommand};
use color_search::storage::IndexWriter;
use color_search::{describe_path, index_directory, Bins, ImageIndex, IndexRow, Params};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "color-search")]
struct Cli {
    /// Index file
    #[arg(long, global = true, env = "COLOR_SEARCH_INDEX", default_value = "my_index.csv")]
    index: PathBuf,
    /// Histogram bins as hue,saturation,value
    #[arg(long, global = true, default_value_t = Bins::default())]
    bins: Bins,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe every image under a directory and write the index
    Index {
        dir: PathBuf,
        #[arg(default_value = ".png")]
        extension: String,
        /// Add rows to an existing index instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// Rank indexed images by similarity to a query image
    Search {
        path: PathBuf,
        /// Negative means no limit
        #[arg(allow_negative_numbers = true)]
        max_results: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// Print one image's descriptor as an index row
    Describe { path: PathBuf },
}

/// Omitted or negative `max_results` means every row is returned.
fn result_limit(max_results: Option<i64>) -> Option<usize> {
    match max_results {
        Some(k) if k >= 0 => Some(usize::try_from(k).unwrap_or(usize::MAX)),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Index {
            dir,
            extension,
            append,
        } => {
            let params = Params {
                bins: cli.bins,
                index_path: cli.index,
                extension,
                append,
            };
            let summary = index_directory(&dir, &params)?;
            println!("indexed {} skipped {}", summary.indexed, summary.skipped);
        }
        Commands::Search {
            path,
            max_results,
            json,
        } => {
            let index = ImageIndex::open(&cli.index, cli.bins)?;
            let limit = result_limit(max_results);
            let results = index.search_path(&path, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for r in results {
                    println!("{} {}", r.distance, r.id);
                }
            }
        }
        Commands::Describe { path } => {
            let features = describe_path(&path, &cli.bins)?;
            let mut writer = IndexWriter::from_writer(io::stdout());
            writer.append_row(&IndexRow {
                id: path.display().to_string(),
                features,
            })?;
            writer.finish()?;
        }
    }
    Ok(())
}
