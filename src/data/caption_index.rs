// ============================================================
// Layer 4 — Caption Index
// ============================================================
// Groups annotation rows into one ordered caption list per image:
//
//   1.jpg| 0| a dog runs          ┐
//   2.jpg| 0| a red car           │      1.jpg → ["a dog runs",
//   1.jpg| 1|  a cat sleeps       ├──▶            "a cat sleeps"]
//   1.jpg| 2|                     │      2.jpg → ["a red car"]
//                                 ┘      malformed = 1
//
// Captions keep source row order (stable append). A malformed
// row is counted and skipped; the scan never stops early.

use std::collections::HashMap;

use crate::domain::annotation::{parse_row, AnnotationRecord, ColumnLayout, RawRow, RowOutcome};
use crate::domain::traits::AnnotationSource;

/// image_id → captions, in the order the rows appeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionIndex {
    entries: HashMap<String, Vec<String>>,
}

impl CaptionIndex {
    /// Build the index from raw rows.
    /// Returns the index and the number of malformed rows skipped.
    pub fn build<I>(rows: I, layout: &ColumnLayout) -> (Self, usize)
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut index     = Self::default();
        let mut malformed = 0usize;

        for raw in rows {
            match parse_row(&raw, layout) {
                RowOutcome::Valid(record) => index.insert(record),
                RowOutcome::Malformed { row, reason } => {
                    tracing::debug!("Skipping annotation row {}: {}", row, reason);
                    malformed += 1;
                }
            }
        }

        (index, malformed)
    }

    /// Build the index straight from an AnnotationSource
    pub fn from_source<S: AnnotationSource>(source: S) -> (Self, usize) {
        let layout = source.layout();
        Self::build(source.into_rows(), &layout)
    }

    /// Append one caption under its image, creating the entry if needed
    pub fn insert(&mut self, record: AnnotationRecord) {
        self.entries
            .entry(record.image_id)
            .or_default()
            .push(record.caption);
    }

    pub fn captions(&self, image_id: &str) -> Option<&[String]> {
        self.entries.get(image_id).map(Vec::as_slice)
    }

    pub fn contains(&self, image_id: &str) -> bool {
        self.entries.contains_key(image_id)
    }

    /// Number of distinct images with at least one caption
    pub fn image_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of captions across all images
    pub fn caption_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
