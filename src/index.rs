use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::descriptor::{describe_path, FeatureVector};
use crate::error::{Error, Result};
use crate::metrics::chi2;
use crate::params::{Bins, Params};
use crate::storage::{read_rows, IndexWriter};
use crate::types::{IndexRow, IndexSummary, SearchResult};

/// Files under `dir` whose name ends with `extension`, sorted by path.
pub fn find_images<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io {
            path: e.path().unwrap_or(dir.as_ref()).to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(extension)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Describe every matching image under `dir` and write one row per image
/// to `params.index_path`. Images that fail to decode are skipped.
pub fn index_directory<P: AsRef<Path>>(dir: P, params: &Params) -> Result<IndexSummary> {
    let files = find_images(&dir, &params.extension)?;
    info!(
        dir = %dir.as_ref().display(),
        files = files.len(),
        bins = %params.bins,
        "indexing"
    );

    let described: Vec<(PathBuf, Result<FeatureVector>)> = files
        .into_par_iter()
        .map(|path| {
            let features = describe_path(&path, &params.bins);
            (path, features)
        })
        .collect();

    let mut writer = if params.append {
        IndexWriter::append(&params.index_path)?
    } else {
        IndexWriter::create(&params.index_path)?
    };
    let mut summary = IndexSummary::default();
    for (path, features) in described {
        match features {
            Ok(features) => {
                writer.append_row(&IndexRow {
                    id: path.display().to_string(),
                    features,
                })?;
                summary.indexed += 1;
            }
            Err(err @ Error::Load { .. }) => {
                warn!(error = %err, "skipping image");
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    writer.finish()?;
    info!(
        indexed = summary.indexed,
        skipped = summary.skipped,
        index = %params.index_path.display(),
        "index complete"
    );
    Ok(summary)
}

/// A loaded index, scanned linearly on every query.
pub struct ImageIndex {
    bins: Bins,
    rows: Vec<IndexRow>,
}

impl ImageIndex {
    pub fn open<P: AsRef<Path>>(path: P, bins: Bins) -> Result<Self> {
        let rows = read_rows(path, Some(bins.feature_len()))?;
        Ok(Self { bins, rows })
    }

    pub fn from_rows(rows: Vec<IndexRow>, bins: Bins) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|r| r.features.len() != bins.feature_len()) {
            return Err(Error::DimensionMismatch {
                expected: bins.feature_len(),
                actual: bad.features.len(),
            });
        }
        Ok(Self { bins, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn bins(&self) -> Bins {
        self.bins
    }

    /// Rank every row by chi-squared distance to `query`, closest first.
    /// Ties keep index order. `limit` of `None` returns all rows.
    pub fn search(&self, query: &[f32], limit: Option<usize>) -> Result<Vec<SearchResult>> {
        if query.len() != self.bins.feature_len() {
            return Err(Error::DimensionMismatch {
                expected: self.bins.feature_len(),
                actual: query.len(),
            });
        }
        let mut results = self
            .rows
            .par_iter()
            .map(|row| -> Result<SearchResult> {
                Ok(SearchResult {
                    id: row.id.clone(),
                    distance: chi2(query, &row.features)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        results.sort_by_key(|r| OrderedFloat(r.distance));
        if let Some(k) = limit {
            results.truncate(k);
        }
        debug!(rows = self.rows.len(), returned = results.len(), "search done");
        Ok(results)
    }

    /// Describe the image at `path` and search with it.
    pub fn search_path<P: AsRef<Path>>(
        &self,
        path: P,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let query = describe_path(path.as_ref(), &self.bins)?;
        self.search(&query, limit)
    }

    pub fn search_batch(
        &self,
        queries: &[FeatureVector],
        limit: Option<usize>,
    ) -> Result<Vec<Vec<SearchResult>>> {
        queries.par_iter().map(|q| self.search(q, limit)).collect()
    }
}
