//! Extract stage: download the three source CSVs into a dated directory tree.
//!
//! Each category has a fixed URL on the datos.cultura.gob.ar portal. Files
//! land under `<data_root>/<slug>/<YYYY-mes>/<slug>-<dd-mm-yy>.csv`, with the
//! month name in Spanish. Downloads are sequential with a fixed timeout; any
//! failure aborts the run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use crate::error::{ExtractError, ExtractResult};

/// Fixed total timeout per download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// One of the three source domains on the open-data portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Museos,
    Cines,
    Bibliotecas,
}

impl Category {
    /// All categories, in pipeline order.
    pub const ALL: [Category; 3] = [Category::Museos, Category::Cines, Category::Bibliotecas];

    /// Dataset slug, used for directories, file names and table names.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Museos => "museos_datosabiertos",
            Category::Cines => "cine",
            Category::Bibliotecas => "biblioteca_popular",
        }
    }

    /// Fixed download URL on the portal.
    pub fn url(&self) -> &'static str {
        match self {
            Category::Museos => "https://datos.cultura.gob.ar/dataset/37305de4-3cce-4d4b-9d9a-fec3ca61d09f/resource/4207def0-2ff7-41d5-9095-d42ae8207a5d/download/museos_datosabiertos.csv",
            Category::Cines => "https://datos.cultura.gob.ar/dataset/37305de4-3cce-4d4b-9d9a-fec3ca61d09f/resource/392ce1a8-ef11-4776-b280-6f1c7fae16ae/download/cine.csv",
            Category::Bibliotecas => "https://datos.cultura.gob.ar/dataset/37305de4-3cce-4d4b-9d9a-fec3ca61d09f/resource/01c6c048-dbeb-44e0-8efa-6944f73715d7/download/biblioteca_popular.csv",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Spanish month name, lowercase, as the original directory layout uses.
pub fn spanish_month(month: u32) -> &'static str {
    match month {
        1 => "enero",
        2 => "febrero",
        3 => "marzo",
        4 => "abril",
        5 => "mayo",
        6 => "junio",
        7 => "julio",
        8 => "agosto",
        9 => "septiembre",
        10 => "octubre",
        11 => "noviembre",
        _ => "diciembre",
    }
}

/// Dated file path for one category:
/// `<data_root>/<slug>/<YYYY-mes>/<slug>-<dd-mm-yy>.csv`.
pub fn dated_path(data_root: &Path, category: Category, date: NaiveDate) -> PathBuf {
    let month_dir = format!("{}-{}", date.year(), spanish_month(date.month()));
    let file_name = format!("{}-{}.csv", category.slug(), date.format("%d-%m-%y"));
    data_root.join(category.slug()).join(month_dir).join(file_name)
}

/// Downloads the source CSVs into the dated directory tree.
pub struct Extractor {
    client: reqwest::Client,
    data_root: PathBuf,
}

impl Extractor {
    /// Create an extractor writing under `data_root`.
    pub fn new(data_root: impl Into<PathBuf>) -> ExtractResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            data_root: data_root.into(),
        })
    }

    /// Download every category for the given date, sequentially.
    ///
    /// Returns `(category, path)` pairs in [`Category::ALL`] order.
    pub async fn download_all(&self, date: NaiveDate) -> ExtractResult<Vec<(Category, PathBuf)>> {
        let mut out = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let path = self.download_one(category, date).await?;
            out.push((category, path));
        }
        Ok(out)
    }

    /// Download a single category CSV to its dated path.
    pub async fn download_one(&self, category: Category, date: NaiveDate) -> ExtractResult<PathBuf> {
        let path = dated_path(&self.data_root, category, date);
        tracing::info!(category = %category, url = category.url(), "downloading");

        let response = self
            .client
            .get(category.url())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ExtractError::Download {
                category: category.slug().to_string(),
                source,
            })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ExtractError::Download {
                category: category.slug().to_string(),
                source,
            })?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ExtractError::Write {
                    path: parent.display().to_string(),
                    source,
                })?;
        }

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| ExtractError::Write {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(category = %category, path = %path.display(), size = bytes.len(), "saved");
        Ok(path)
    }
}
