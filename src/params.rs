use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::hsv::{HUE_RANGE, SAT_RANGE, VAL_RANGE};
use crate::region::REGION_COUNT;

/// Histogram resolution per HSV channel.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "RawBins")]
pub struct Bins {
    pub(crate) hue: usize,
    pub(crate) saturation: usize,
    pub(crate) value: usize,
}

#[derive(Deserialize)]
struct RawBins {
    hue: usize,
    saturation: usize,
    value: usize,
}

impl TryFrom<RawBins> for Bins {
    type Error = Error;

    fn try_from(raw: RawBins) -> Result<Self> {
        Self::new(raw.hue, raw.saturation, raw.value)
    }
}

impl Bins {
    /// Each count must lie in `1..=range` of its channel, so a channel never
    /// has more buckets than distinct values.
    pub fn new(hue: usize, saturation: usize, value: usize) -> Result<Self> {
        let limits = [
            ("hue", hue, HUE_RANGE),
            ("saturation", saturation, SAT_RANGE),
            ("value", value, VAL_RANGE),
        ];
        for (name, count, range) in limits {
            if count == 0 || count > range as usize {
                return Err(Error::InvalidBins(format!(
                    "{name} bins must be in 1..={range}, got {count}"
                )));
            }
        }
        hue.checked_mul(saturation)
            .and_then(|n| n.checked_mul(value))
            .and_then(|n| n.checked_mul(REGION_COUNT))
            .ok_or_else(|| {
                Error::InvalidBins(format!(
                    "{hue},{saturation},{value} overflows the descriptor length"
                ))
            })?;
        Ok(Self {
            hue,
            saturation,
            value,
        })
    }

    pub fn hue(&self) -> usize {
        self.hue
    }

    pub fn saturation(&self) -> usize {
        self.saturation
    }

    pub fn value(&self) -> usize {
        self.value
    }

    /// Length of one flattened region histogram.
    pub fn total(&self) -> usize {
        self.hue * self.saturation * self.value
    }

    /// Length of a full descriptor: one histogram per region.
    pub fn feature_len(&self) -> usize {
        REGION_COUNT * self.total()
    }
}

impl Default for Bins {
    fn default() -> Self {
        Self {
            hue: 8,
            saturation: 12,
            value: 3,
        }
    }
}

impl FromStr for Bins {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(Error::InvalidBins(format!(
                "expected three comma-separated counts, got '{s}'"
            )));
        }
        let mut counts = [0usize; 3];
        for (slot, part) in counts.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| Error::InvalidBins(format!("'{part}' is not a bin count")))?;
        }
        Self::new(counts[0], counts[1], counts[2])
    }
}

impl fmt::Display for Bins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.value)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Params {
    pub bins: Bins,
    pub index_path: PathBuf,
    pub extension: String,
    /// Keep existing rows when indexing instead of replacing the file.
    pub append: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            bins: Bins::default(),
            index_path: PathBuf::from("my_index.csv"),
            extension: ".png".to_string(),
            append: false,
        }
    }
}
