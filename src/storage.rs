//! Text row index: one `identifier,v0,...,vN-1` record per image, no header.
use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::IndexRow;

pub struct IndexWriter<W: Write = File> {
    path: PathBuf,
    writer: Writer<W>,
    rows: usize,
}

impl IndexWriter<File> {
    /// Create the index file, replacing any existing rows.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path.as_ref(), OpenOptions::new().write(true).create(true).truncate(true))
    }

    /// Open the index file for appending, creating it if needed.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path.as_ref(), OpenOptions::new().append(true).create(true))
    }

    fn open_with(path: &Path, options: &OpenOptions) -> Result<Self> {
        let file = options.open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }
}

impl<W: Write> IndexWriter<W> {
    /// Write rows to an arbitrary stream, e.g. stdout.
    pub fn from_writer(out: W) -> Self {
        Self {
            path: PathBuf::from("-"),
            writer: WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_writer(out),
            rows: 0,
        }
    }

    pub fn append_row(&mut self, row: &IndexRow) -> Result<()> {
        let mut record = StringRecord::with_capacity(0, row.features.len() + 1);
        record.push_field(&row.id);
        for value in &row.features {
            record.push_field(&value.to_string());
        }
        self.writer.write_record(&record)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush buffered rows to disk and return how many were written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), rows = self.rows, "index written");
        Ok(self.rows)
    }
}

/// Read every row of the index. With `expected_len`, rows whose feature
/// count differs are rejected; otherwise the first row fixes the length.
pub fn read_rows<P: AsRef<Path>>(path: P, expected_len: Option<usize>) -> Result<Vec<IndexRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut expected = expected_len;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let row = parse_row(&record, line)?;
        match expected {
            Some(n) if n != row.features.len() => {
                return Err(Error::RowFormat {
                    line,
                    reason: format!("expected {n} values, found {}", row.features.len()),
                });
            }
            Some(_) => {}
            None => expected = Some(row.features.len()),
        }
        rows.push(row);
    }
    debug!(path = %path.display(), rows = rows.len(), "index loaded");
    Ok(rows)
}

fn parse_row(record: &StringRecord, line: u64) -> Result<IndexRow> {
    let mut fields = record.iter();
    let id = fields.next().ok_or_else(|| Error::RowFormat {
        line,
        reason: "empty row".to_string(),
    })?;
    let features = fields
        .enumerate()
        .map(|(i, field)| match field.trim().parse::<f32>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(Error::RowFormat {
                line,
                reason: format!("value {i} '{field}' is not a non-negative number"),
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    if features.is_empty() {
        return Err(Error::RowFormat {
            line,
            reason: format!("row for '{id}' has no values"),
        });
    }
    Ok(IndexRow {
        id: id.to_string(),
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn row(id: &str, features: &[f32]) -> IndexRow {
        IndexRow {
            id: id.to_string(),
            features: features.to_vec(),
        }
    }

    #[test]
    fn write_then_read() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.csv");
        let mut writer = IndexWriter::create(&path)?;
        writer.append_row(&row("a.png", &[0.0, 10000.0, 0.25]))?;
        writer.append_row(&row("dir/with,comma.png", &[1.5, 2.5, 9996.0]))?;
        assert_eq!(writer.finish()?, 2);

        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with("a.png,0,10000,0.25\n"));

        let rows = read_rows(&path, Some(3))?;
        assert_eq!(
            rows,
            vec![
                row("a.png", &[0.0, 10000.0, 0.25]),
                row("dir/with,comma.png", &[1.5, 2.5, 9996.0]),
            ]
        );
        Ok(())
    }

    #[test]
    fn append_keeps_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.csv");
        let mut writer = IndexWriter::create(&path)?;
        writer.append_row(&row("a", &[1.0]))?;
        writer.finish()?;
        let mut writer = IndexWriter::append(&path)?;
        writer.append_row(&row("a", &[2.0]))?;
        writer.finish()?;

        let rows = read_rows(&path, None)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].features, vec![2.0]);
        Ok(())
    }

    #[test]
    fn reads_reference_format() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.csv");
        fs::write(&path, "img/x.png,10000.0,0.0\nimg/y.png,5000.0,5000.0\n")?;
        let rows = read_rows(&path, Some(2))?;
        assert_eq!(rows[1].features, vec![5000.0, 5000.0]);
        Ok(())
    }

    #[test]
    fn rejects_short_row() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.csv");
        fs::write(&path, "a,1,2,3\nb,1,2\n")?;
        match read_rows(&path, None) {
            Err(Error::RowFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(read_rows(&path, Some(4)), Err(Error::RowFormat { line: 1, .. })));
        Ok(())
    }

    #[test]
    fn rejects_bad_values() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.csv");
        for text in ["a,1,abc\n", "a,1,-2\n", "a,NaN,1\n", "a\n"] {
            fs::write(&path, text)?;
            assert!(
                matches!(read_rows(&path, None), Err(Error::RowFormat { .. })),
                "{text:?} accepted"
            );
        }
        Ok(())
    }
}
