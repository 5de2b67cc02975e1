// ============================================================
// Layer 3 — Progress and Diagnostic Events
// ============================================================
// The core components never print. They describe what happened
// as typed events and hand them to a ProgressObserver, which
// decides how (or whether) to show them.

use std::path::PathBuf;

use crate::domain::conversion::OutputCheck;
use crate::domain::pairing::{CaptionPreview, ImageSize, PairingReport};

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionEvent {
    IndexBuilt {
        images:         usize,
        captions:       usize,
        malformed_rows: usize,
    },
    ImagesScanned {
        found: usize,
        valid: usize,
    },
    Progress {
        processed: usize,
        total:     usize,
    },
    ItemFailed {
        image_id: String,
        reason:   String,
    },
    Finished {
        success: usize,
        errors:  usize,
    },
    OutputChecked(OutputCheck),
}

/// Which side of the pairing an unpaired sample comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpairedSide {
    Images,
    Texts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationEvent {
    DirectoryStarted {
        directory: PathBuf,
    },
    UnpairedSampled {
        side:   UnpairedSide,
        total:  usize,
        sample: Vec<String>,
    },
    CaptionPreviewed(CaptionPreview),
    ImageSized(ImageSize),
    DirectoryFinished {
        directory: PathBuf,
        report:    PairingReport,
        passed:    bool,
    },
    Finished {
        directories: usize,
        passed:      bool,
    },
}
