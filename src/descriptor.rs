use rayon::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::histogram::histogram;
use crate::hsv::{self, HsvImage};
use crate::params::Bins;
use crate::region::segment;

pub type FeatureVector = Vec<f32>;

/// Regional colour descriptor: one normalized histogram per region,
/// concatenated in region order.
pub fn describe(image: &HsvImage, bins: &Bins) -> Result<FeatureVector> {
    let masks = segment(image.width(), image.height());
    let parts = masks
        .par_iter()
        .map(|mask| histogram(image, mask, bins))
        .collect::<Result<Vec<_>>>()?;

    let mut features = Vec::with_capacity(bins.feature_len());
    for part in parts {
        features.extend(part);
    }
    Ok(features)
}

/// Load `path` and describe it.
pub fn describe_path(path: &Path, bins: &Bins) -> Result<FeatureVector> {
    let image = hsv::load(path)?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "describing image"
    );
    describe(&image, bins)
}
