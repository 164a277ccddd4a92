use crate::error::{Error, Result};
use crate::hsv::{HsvImage, HUE_RANGE, SAT_RANGE, VAL_RANGE};
use crate::params::Bins;
use crate::region::RegionMask;

/// Every non-empty region histogram sums to this value.
pub const NORMALIZED_SUM: f64 = 10_000.0;

fn bucket(value: u8, bins: usize, range: u32) -> usize {
    let idx = value as usize * bins / range as usize;
    idx.min(bins - 1)
}

/// Flattened joint HSV histogram of the pixels selected by `mask`,
/// indexed `(h * sat_bins + s) * val_bins + v` and scaled to sum to
/// [`NORMALIZED_SUM`]. An empty region yields all zeros.
pub fn histogram(image: &HsvImage, mask: &RegionMask, bins: &Bins) -> Result<Vec<f32>> {
    if mask.width() != image.width() || mask.height() != image.height() {
        return Err(Error::DimensionMismatch {
            expected: image.width() * image.height(),
            actual: mask.width() * mask.height(),
        });
    }

    let mut counts = vec![0u32; bins.total()];
    let mut total = 0u64;
    for (&[h, s, v], _) in image
        .pixels()
        .iter()
        .zip(mask.bits())
        .filter(|(_, included)| **included)
    {
        let hb = bucket(h, bins.hue, HUE_RANGE);
        let sb = bucket(s, bins.saturation, SAT_RANGE);
        let vb = bucket(v, bins.value, VAL_RANGE);
        counts[(hb * bins.saturation + sb) * bins.value + vb] += 1;
        total += 1;
    }

    if total == 0 {
        return Ok(vec![0.0; counts.len()]);
    }
    let scale = NORMALIZED_SUM / total as f64;
    Ok(counts.iter().map(|&c| (c as f64 * scale) as f32).collect())
}
