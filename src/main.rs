//! cultura-etl CLI - download, transform and load the cultural datasets.
//!
//! # Main Command
//!
//! ```bash
//! cultura-etl run                  # Full pipeline: extract → transform → load
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! cultura-etl extract              # Download the source CSVs only
//! cultura-etl transform m.csv c.csv b.csv   # Transform local files to JSON
//! cultura-etl headers "Información adicional" "TipoLatitudLongitud"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cultura_etl::error::PipelineResult;
use cultura_etl::extract::{Category, Extractor};
use cultura_etl::{config::Settings, logging, pipeline, transform::standardize_header};
use serde_json::json;

#[derive(Parser)]
#[command(name = "cultura-etl")]
#[command(about = "ETL for Argentine cultural open-data datasets", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: download, transform, load into Postgres
    Run {
        /// Root directory for the dated CSV tree
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Download the source CSVs into the dated directory tree
    Extract {
        /// Root directory for the dated CSV tree
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Transform local CSV files and output the tables as JSON
    Transform {
        /// Museums CSV file
        museos: PathBuf,

        /// Cinemas CSV file
        cine: PathBuf,

        /// Popular libraries CSV file
        bibliotecas: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print standardized column names
    Headers {
        /// Raw column names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.debug);

    let result = match cli.command {
        Commands::Run { data_dir } => cmd_run(&data_dir).await,

        Commands::Extract { data_dir } => cmd_extract(&data_dir).await,

        Commands::Transform {
            museos,
            cine,
            bibliotecas,
            output,
        } => cmd_transform(museos, cine, bibliotecas, output.as_deref()),

        Commands::Headers { names } => cmd_headers(&names),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn cmd_run(data_dir: &Path) -> PipelineResult<()> {
    let settings = Settings::from_env()?;
    pipeline::run(&settings, data_dir).await
}

async fn cmd_extract(data_dir: &Path) -> PipelineResult<()> {
    let extractor = Extractor::new(data_dir)?;
    let today = chrono::Local::now().date_naive();
    let files = extractor.download_all(today).await?;

    for (category, path) in files {
        println!("{}: {}", category, path.display());
    }
    Ok(())
}

fn cmd_transform(
    museos: PathBuf,
    cine: PathBuf,
    bibliotecas: PathBuf,
    output: Option<&Path>,
) -> PipelineResult<()> {
    let files = vec![
        (Category::Museos, museos),
        (Category::Cines, cine),
        (Category::Bibliotecas, bibliotecas),
    ];

    let tables = pipeline::transform_files(&files)?;

    let mut out = serde_json::Map::new();
    for (name, frame) in &tables {
        tracing::info!(table = %name, rows = frame.len(), "built");
        out.insert(name.clone(), json!(frame.rows));
    }

    let rendered = serde_json::to_string_pretty(&out).map_err(std::io::Error::other)?;
    write_output(&rendered, output)?;
    Ok(())
}

fn cmd_headers(names: &[String]) -> PipelineResult<()> {
    for name in names {
        println!("{} -> {}", name, standardize_header(name));
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            tracing::info!(path = %p.display(), "output written");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
