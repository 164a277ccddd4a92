use anyhow::Result;
use color_search::{index_directory, Bins, ImageIndex, Params};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

fn solid(path: &Path, w: u32, h: u32, rgb: [u8; 3]) -> Result<()> {
    RgbImage::from_pixel(w, h, Rgb(rgb)).save(path)?;
    Ok(())
}

fn split(path: &Path, left: [u8; 3], right: [u8; 3]) -> Result<()> {
    RgbImage::from_fn(24, 16, |x, _| if x < 12 { Rgb(left) } else { Rgb(right) }).save(path)?;
    Ok(())
}

#[test]
fn index_then_search_self() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images = dir.path().join("images");
    fs::create_dir(&images)?;
    solid(&images.join("red.png"), 32, 24, [255, 0, 0])?;
    solid(&images.join("green.png"), 20, 20, [0, 255, 0])?;
    split(&images.join("mixed.png"), [0, 0, 255], [255, 255, 255])?;

    let params = Params {
        index_path: dir.path().join("index.csv"),
        ..Params::default()
    };
    let summary = index_directory(&images, &params)?;
    assert_eq!(summary.indexed, 3);
    assert_eq!(summary.skipped, 0);

    let index = ImageIndex::open(&params.index_path, params.bins)?;
    assert_eq!(index.len(), 3);
    for name in ["red.png", "green.png", "mixed.png"] {
        let query = images.join(name);
        let results = index.search_path(&query, None)?;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, query.display().to_string());
        assert!(results[0].distance < 1e-6);
        assert!(results[1].distance > results[0].distance);
    }
    Ok(())
}

#[test]
fn limit_results() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let colors = [
        [255, 0, 0],
        [250, 10, 10],
        [0, 255, 0],
        [0, 0, 255],
        [128, 128, 128],
    ];
    for (i, rgb) in colors.iter().enumerate() {
        solid(&dir.path().join(format!("{i}.png")), 16, 16, *rgb)?;
    }
    let params = Params {
        index_path: dir.path().join("index.csv"),
        ..Params::default()
    };
    index_directory(dir.path(), &params)?;

    let index = ImageIndex::open(&params.index_path, params.bins)?;
    assert_eq!(index.len(), 5);
    let results = index.search_path(dir.path().join("0.png"), Some(2))?;
    assert_eq!(results.len(), 2);
    assert!(results[0].distance <= results[1].distance);
    assert!(results[0].id.ends_with("0.png"));
    Ok(())
}

#[test]
fn extension_and_append() -> Result<()> {
    let dir = tempfile::tempdir()?;
    solid(&dir.path().join("a.png"), 8, 8, [10, 20, 30])?;
    solid(&dir.path().join("b.bmp"), 8, 8, [200, 20, 30])?;
    let mut params = Params {
        index_path: dir.path().join("index.csv"),
        bins: Bins::new(4, 4, 2)?,
        ..Params::default()
    };
    assert_eq!(index_directory(dir.path(), &params)?.indexed, 1);

    params.extension = ".bmp".to_string();
    params.append = true;
    assert_eq!(index_directory(dir.path(), &params)?.indexed, 1);
    let index = ImageIndex::open(&params.index_path, params.bins)?;
    assert_eq!(index.len(), 2);

    params.append = false;
    index_directory(dir.path(), &params)?;
    let index = ImageIndex::open(&params.index_path, params.bins)?;
    assert_eq!(index.len(), 1);
    Ok(())
}

#[test]
fn bins_mismatch_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    solid(&dir.path().join("a.png"), 8, 8, [10, 20, 30])?;
    let params = Params {
        index_path: dir.path().join("index.csv"),
        ..Params::default()
    };
    index_directory(dir.path(), &params)?;
    let err = ImageIndex::open(&params.index_path, Bins::new(2, 2, 2)?)
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();
    assert!(err.contains("malformed index row"), "{err}");
    Ok(())
}

#[test]
fn missing_query_image() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let index = ImageIndex::from_rows(Vec::new(), Bins::default())?;
    let err = index.search_path(dir.path().join("nope.png"), None).unwrap_err();
    assert!(matches!(err, color_search::Error::Load { .. }));
    Ok(())
}
