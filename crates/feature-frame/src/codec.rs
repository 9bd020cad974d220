//! CSV Load/Save

use crate::error::FrameError;
use crate::frame::{Column, Frame};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

impl Frame {
    /// Load a frame from a CSV file with a header row
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let frame = Self::from_csv_reader(file)?;
        debug!(
            "Loaded {} ({} rows x {} columns)",
            path.display(),
            frame.row_count(),
            frame.column_count()
        );
        Ok(frame)
    }

    /// Load a frame from any CSV source with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, FrameError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); header.len()];
        for record in reader.records() {
            let record = record?;
            for (idx, cell) in record.iter().enumerate() {
                raw[idx].push(cell.to_string());
            }
        }

        let columns = header
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| Column::from_raw(name, cells))
            .collect();
        Frame::from_columns(columns)
    }

    /// Write the frame as CSV, creating parent directories
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), FrameError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.to_csv_writer(file)?;
        debug!("Wrote {} rows to {}", self.row_count(), path.display());
        Ok(())
    }

    /// Write the frame as CSV into any sink
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<(), FrameError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.column_names())?;
        for idx in 0..self.row_count() {
            writer.write_record(self.row(idx).iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
