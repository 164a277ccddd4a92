use crate::error::{Error, Result};

pub const CHI2_EPSILON: f64 = 1e-10;

/// Chi-squared distance between two histograms of equal length.
pub fn chi2(a: &[f32], b: &[f32]) -> Result<f32> {
    chi2_with_eps(a, b, CHI2_EPSILON)
}

pub fn chi2_with_eps(a: &[f32], b: &[f32], eps: f64) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (x - y).powi(2) / (x + y + eps)
        })
        .sum();
    Ok((0.5 * sum) as f32)
}
