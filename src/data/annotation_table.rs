// ============================================================
// Layer 4 — Annotation Table Reader
// ============================================================
// Reads the delimited annotation file with the `csv` crate:
//
//   image_name| comment_number| comment
//   1000092795.jpg| 0| Two young guys with shaggy hair ...
//
// The header row is read once up front to resolve the image
// and caption columns (trimmed comparison, so " comment"
// matches "comment"). Data rows are streamed lazily; nothing
// holds the whole file in memory.
//
// Per-row problems become RawRow::Unreadable and flow on to the
// CaptionIndex as malformed rows. Only a missing file or an
// unreadable header stops the run.
//
// Reference: csv crate documentation (ReaderBuilder, flexible)
//            Rust Book §13 (Iterators)

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ErrorKind, ReaderBuilder, StringRecordsIntoIter};
use serde::{Deserialize, Serialize};

use crate::domain::annotation::{ColumnLayout, RawRow};
use crate::domain::errors::SetupError;
use crate::domain::traits::AnnotationSource;

/// Shape of the annotation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFormat {
    /// Single-byte field delimiter
    pub delimiter: u8,

    /// Header name of the image identifier column (trimmed before matching)
    pub image_column: String,

    /// Header name of the caption column (trimmed before matching)
    pub caption_column: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter:      b'|',
            image_column:   "image_name".to_string(),
            caption_column: "comment".to_string(),
        }
    }
}

/// An opened annotation table with its header already resolved.
/// The file handle is owned by the reader and released when the
/// table (or its row iterator) is dropped.
pub struct AnnotationTable {
    path:   PathBuf,
    layout: ColumnLayout,
    reader: csv::Reader<File>,
}

impl AnnotationTable {
    /// Open `path` and resolve the column layout from its header.
    pub fn open(path: &Path, format: &TableFormat) -> Result<Self, SetupError> {
        if !path.is_file() {
            return Err(SetupError::MissingAnnotations(path.to_path_buf()));
        }

        let unreadable = |e: csv::Error| SetupError::UnreadableHeader {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        };

        // flexible(true): short or long rows still come through as
        // records so the row parser can classify them
        let mut reader = ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(unreadable)?;

        let headers = reader.headers().map_err(unreadable)?;
        let layout  = ColumnLayout::resolve(
            headers.iter(),
            &format.image_column,
            &format.caption_column,
        );

        if !layout.is_complete() {
            tracing::warn!(
                "Header of '{}' lacks column(s) {:?}/{:?}; every row will count as malformed",
                path.display(),
                format.image_column,
                format.caption_column,
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            layout,
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationSource for AnnotationTable {
    type Rows = TableRows;

    fn layout(&self) -> ColumnLayout {
        self.layout
    }

    fn into_rows(self) -> TableRows {
        TableRows {
            path:    self.path,
            records: self.reader.into_records(),
            row:     0,
            halted:  false,
        }
    }
}

/// Lazy iterator over the data rows of an AnnotationTable
pub struct TableRows {
    path:    PathBuf,
    records: StringRecordsIntoIter<File>,
    row:     usize,
    halted:  bool,
}

impl Iterator for TableRows {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        if self.halted {
            return None;
        }

        let result = self.records.next()?;
        self.row += 1;

        match result {
            Ok(record) => Some(RawRow::fields(self.row, record.iter())),

            // The underlying file failed; later reads cannot be trusted
            Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => {
                tracing::warn!(
                    "Stopped reading '{}' at row {}: {}",
                    self.path.display(),
                    self.row,
                    e
                );
                self.halted = true;
                None
            }

            // Bad UTF-8 and similar: this row only
            Err(e) => Some(RawRow::Unreadable {
                row:    self.row,
                reason: e.to_string(),
            }),
        }
    }
}

/// Rows already in memory, with a fixed layout
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnnotations {
    pub layout: ColumnLayout,
    pub rows:   Vec<RawRow>,
}

#[cfg(test)]
impl AnnotationSource for InMemoryAnnotations {
    type Rows = std::vec::IntoIter<RawRow>;

    fn layout(&self) -> ColumnLayout {
        self.layout
    }

    fn into_rows(self) -> Self::Rows {
        self.rows.into_iter()
    }
}
