// ============================================================
// Layer 3 — Conversion Results
// ============================================================
// Counters and failure records produced by one conversion run.
// Recoverable problems (bad rows, a failed copy) end up here
// instead of interrupting the run.

use serde::Serialize;

/// One image that could not be converted, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub image_id: String,
    pub reason:   String,
}

/// Outcome of the per-image loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionTally {
    pub success_count: usize,
    pub error_count:   usize,
    pub failures:      Vec<ItemFailure>,
}

impl ConversionTally {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, image_id: impl Into<String>, reason: impl Into<String>) {
        self.error_count += 1;
        self.failures.push(ItemFailure {
            image_id: image_id.into(),
            reason:   reason.into(),
        });
    }
}

/// What actually landed in the output directory after the run.
/// Diagnostic only; a mismatch here does not fail the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutputCheck {
    pub image_count:  usize,
    pub text_count:   usize,
    pub paired_count: usize,
}

impl OutputCheck {
    /// True when some image or caption in the output has no partner
    pub fn has_mismatch(&self) -> bool {
        self.paired_count != self.image_count || self.paired_count != self.text_count
    }

    pub fn unpaired_images(&self) -> usize {
        self.image_count.saturating_sub(self.paired_count)
    }

    pub fn unpaired_texts(&self) -> usize {
        self.text_count.saturating_sub(self.paired_count)
    }
}

/// Full record of a conversion run, suitable for JSON export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// Distinct image ids with at least one caption in the table
    pub indexed_images: usize,

    /// Total captions kept across all images
    pub indexed_captions: usize,

    /// Table rows skipped as malformed
    pub malformed_rows: usize,

    /// Image files found in the input image directory
    pub images_found: usize,

    /// Images that have both a file and captions
    pub valid_images: usize,

    pub tally:  ConversionTally,
    pub output: OutputCheck,
}
