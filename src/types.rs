use serde::{Deserialize, Serialize};

use crate::descriptor::FeatureVector;

/// One persisted image descriptor.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct IndexRow {
    pub id: String,
    pub features: FeatureVector,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchResult {
    pub id: String,
    pub distance: f32,
}

/// Outcome of indexing a directory.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub indexed: usize,
    pub skipped: usize,
}
