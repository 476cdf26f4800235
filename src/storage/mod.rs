//! CSV report persistence.
//!
//! The report is a single BOM-prefixed CSV file at a fixed path, rewritten
//! wholesale on every run. Writes go through a temp file and rename so a
//! failed run never leaves a torn report behind.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::ChannelRecord;

/// UTF-8 byte order mark; spreadsheet tools use it to detect the encoding.
pub const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Store for the channel report.
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    /// Create a store writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Report location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and write all records, replacing any previous report.
    ///
    /// The header row is always present, even for an empty run. Returns the
    /// number of data rows written.
    pub async fn write(&self, records: &[ChannelRecord]) -> Result<usize> {
        let mut buffer = Vec::with_capacity(256 + records.len() * 128);
        buffer.extend_from_slice(UTF8_BOM);

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut buffer);
            writer.write_record(ChannelRecord::HEADERS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        self.write_bytes(&buffer).await?;
        Ok(records.len())
    }

    /// Load the report back, tolerating a missing BOM.
    pub fn load(&self) -> Result<Vec<ChannelRecord>> {
        let bytes = std::fs::read(&self.path)?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let mut reader = csv::Reader::from_reader(body);
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
