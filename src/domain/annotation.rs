// ============================================================
// Layer 3 — Annotation Domain Types
// ============================================================
// One row of the annotation table describes one caption of one
// image. The table is pipe-delimited and looks like:
//
//   image_name| comment_number| comment
//   1000092795.jpg| 0| Two young guys with shaggy hair ...
//   1000092795.jpg| 1| Two young , White males are outside ...
//
// Header names carry incidental whitespace (" comment"), so
// columns are resolved by comparing TRIMMED names.
//
// Parsing a row is an explicit step with a tagged result:
//   RawRow ──parse_row──▶ RowOutcome::Valid(AnnotationRecord)
//                      └▶ RowOutcome::Malformed(MalformedReason)
//
// A missing column is its own branch; it is never silently
// treated as an empty string.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

/// A validated (image, caption) pair taken from one table row.
/// Both fields are non-empty and already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Image file name including extension, e.g. "1000092795.jpg"
    pub image_id: String,

    /// One free-text description of the image
    pub caption: String,
}

impl AnnotationRecord {
    pub fn new(image_id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            caption:  caption.into(),
        }
    }
}

/// One row as it came out of the table reader, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// The row decoded into string fields
    Fields {
        /// 1-based data row number (header excluded)
        row:    usize,
        fields: Vec<String>,
    },

    /// The reader could not decode the row (bad UTF-8, wrong field count)
    Unreadable {
        row:    usize,
        reason: String,
    },
}

impl RawRow {
    /// Convenience constructor used by readers and tests
    pub fn fields<I, S>(row: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawRow::Fields {
            row,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Positions of the two columns we need, resolved from the header.
/// `None` means the header had no column with that (trimmed) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnLayout {
    pub image:   Option<usize>,
    pub caption: Option<usize>,
}

impl ColumnLayout {
    /// Resolve column positions by trimmed, exact name comparison.
    /// The first matching header wins if a name appears twice.
    pub fn resolve<'a, I>(headers: I, image_key: &str, caption_key: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let image_key   = image_key.trim();
        let caption_key = caption_key.trim();
        let mut layout  = ColumnLayout::default();

        for (pos, header) in headers.into_iter().enumerate() {
            let header = header.trim();
            if layout.image.is_none() && header == image_key {
                layout.image = Some(pos);
            }
            if layout.caption.is_none() && header == caption_key {
                layout.caption = Some(pos);
            }
        }

        layout
    }

    /// True when both required columns were found in the header
    pub fn is_complete(&self) -> bool {
        self.image.is_some() && self.caption.is_some()
    }
}

/// Why a row could not be turned into an AnnotationRecord
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    /// The header has no image column, or this row is too short to reach it
    MissingImageField,
    /// The header has no caption column, or this row is too short to reach it
    MissingCaptionField,
    EmptyImageId,
    EmptyCaption,
    Unreadable(String),
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::MissingImageField   => write!(f, "missing image field"),
            MalformedReason::MissingCaptionField => write!(f, "missing caption field"),
            MalformedReason::EmptyImageId        => write!(f, "empty image id"),
            MalformedReason::EmptyCaption        => write!(f, "empty caption"),
            MalformedReason::Unreadable(reason)  => write!(f, "unreadable row: {reason}"),
        }
    }
}

/// Result of parsing a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Valid(AnnotationRecord),
    Malformed { row: usize, reason: MalformedReason },
}

/// Turn one raw row into a record, or say why it is malformed.
///
/// Depends only on the row itself and the column layout, so
/// rows can be processed in any order with the same result.
pub fn parse_row(raw: &RawRow, layout: &ColumnLayout) -> RowOutcome {
    let (row, fields) = match raw {
        RawRow::Fields { row, fields } => (*row, fields),
        RawRow::Unreadable { row, reason } => {
            return RowOutcome::Malformed {
                row:    *row,
                reason: MalformedReason::Unreadable(reason.clone()),
            };
        }
    };

    let malformed = |reason| RowOutcome::Malformed { row, reason };

    // ── Locate both fields; a missing one is an explicit branch ──────────────
    let image_id = match layout.image.and_then(|pos| fields.get(pos)) {
        Some(value) => value.trim(),
        None        => return malformed(MalformedReason::MissingImageField),
    };
    let caption = match layout.caption.and_then(|pos| fields.get(pos)) {
        Some(value) => value.trim(),
        None        => return malformed(MalformedReason::MissingCaptionField),
    };

    // ── Both must carry text after trimming ──────────────────────────────────
    if image_id.is_empty() {
        return malformed(MalformedReason::EmptyImageId);
    }
    if caption.is_empty() {
        return malformed(MalformedReason::EmptyCaption);
    }

    RowOutcome::Valid(AnnotationRecord::new(image_id, caption))
}
