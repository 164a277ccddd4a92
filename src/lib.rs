//! Regional colour-histogram image search.
//!
//! Each image is reduced to five HSV histograms (four corners and a centred
//! ellipse) and compared with the chi-squared distance.

pub mod descriptor;
pub mod error;
pub mod histogram;
pub mod hsv;
pub mod index;
pub mod metrics;
pub mod params;
pub mod region;
pub mod storage;
pub mod types;

pub use descriptor::{describe, describe_path, FeatureVector};
pub use error::{Error, Result};
pub use hsv::HsvImage;
pub use index::{find_images, index_directory, ImageIndex};
pub use metrics::{chi2, chi2_with_eps};
pub use params::{Bins, Params};
pub use region::{segment, Region, RegionMask};
pub use types::{IndexRow, IndexSummary, SearchResult};
