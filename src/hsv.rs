//! HSV pixel grids and loading from disk.
//!
//! Channels follow the 8-bit OpenCV convention: hue in `[0, 180)`,
//! saturation and value in `[0, 256)`.
use image::RgbImage;
use std::path::Path;

use crate::error::{Error, Result};

pub const HUE_RANGE: u32 = 180;
pub const SAT_RANGE: u32 = 256;
pub const VAL_RANGE: u32 = 256;

/// Owned row-major HSV image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HsvImage {
    width: usize,
    height: usize,
    data: Vec<[u8; 3]>,
}

impl HsvImage {
    /// Build from raw `[h, s, v]` pixels. Fails if `data` does not hold
    /// exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, data: Vec<[u8; 3]>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::DimensionMismatch {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image filled with a single HSV colour.
    pub fn filled(width: usize, height: usize, pixel: [u8; 3]) -> Self {
        Self {
            width,
            height,
            data: vec![pixel; width * height],
        }
    }

    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let data = rgb.pixels().map(|p| rgb_to_hsv(p.0)).collect();
        Self {
            width: rgb.width() as usize,
            height: rgb.height() as usize,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.data
    }
}

/// Decode an image file and convert it to HSV.
pub fn load(path: &Path) -> Result<HsvImage> {
    let img = image::open(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(HsvImage::from_rgb(&img.into_rgb8()))
}

/// Convert one 8-bit RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = max - min;

    let s = if max > 0.0 { 255.0 * diff / max } else { 0.0 };
    let h = if diff == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / diff
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    let h = if h < 0.0 { h + 360.0 } else { h };
    let h = (h / 2.0).round() as u32 % HUE_RANGE;

    [h as u8, s.round() as u8, max as u8]
}
