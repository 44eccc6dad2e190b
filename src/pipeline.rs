//! Pipeline driver: extract → transform → load, in that order, once.
//!
//! There is no retry and no partial-failure recovery: any stage error aborts
//! the whole run. Every output table is tagged with a `dt_loaded` timestamp
//! column before loading.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde_json::json;
use tracing::{info_span, Instrument};

use crate::config::Settings;
use crate::error::PipelineResult;
use crate::extract::{Category, Extractor};
use crate::frame::Frame;
use crate::load::Database;
use crate::parser::parse_file_auto;
use crate::transform::transform;

/// Run the full pipeline against the configured database.
pub async fn run(settings: &Settings, data_root: &Path) -> PipelineResult<()> {
    let today = Local::now().date_naive();

    let extractor = Extractor::new(data_root)?;
    let files = extractor
        .download_all(today)
        .instrument(info_span!("extract"))
        .await?;

    let mut tables = {
        let _span = info_span!("transform").entered();
        transform_files(&files)?
    };
    tag_loaded_at(&mut tables, Utc::now());

    async {
        let db = Database::connect(settings).await?;
        db.ensure_schema().await?;
        db.load_all(&tables).await
    }
    .instrument(info_span!("load"))
    .await?;

    tracing::info!(tables = tables.len(), "pipeline finished");
    Ok(())
}

/// Parse the downloaded CSVs and run the transform stage.
pub fn transform_files(files: &[(Category, PathBuf)]) -> PipelineResult<Vec<(String, Frame)>> {
    let mut datasets = Vec::with_capacity(files.len());
    for (category, path) in files {
        let parsed = parse_file_auto(path)?;
        tracing::info!(
            category = %category,
            rows = parsed.frame.len(),
            encoding = %parsed.encoding,
            delimiter = %parsed.delimiter,
            "parsed"
        );
        datasets.push((*category, parsed.frame));
    }

    Ok(transform(datasets)?)
}

/// Tag every table with a `dt_loaded` column holding the same timestamp.
pub fn tag_loaded_at(tables: &mut [(String, Frame)], loaded_at: DateTime<Utc>) {
    let stamp = json!(loaded_at.to_rfc3339());
    for (_, frame) in tables {
        frame.add_constant_column("dt_loaded", stamp.clone());
    }
}
