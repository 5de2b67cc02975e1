// ============================================================
// Layer 3 — Error Types
// ============================================================
// Two kinds of failure, kept apart:
//
//   SetupError — a precondition of the whole run is not met.
//                Checked before any per-image work; stops the run.
//
//   ItemError  — one image could not be converted. Counted and
//                logged; the loop moves on to the next image.
//
// Row-level parse problems are not errors at all: they are
// RowOutcome::Malformed values (see annotation.rs).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal precondition failures
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("annotation file not found: {}", .0.display())]
    MissingAnnotations(PathBuf),

    #[error("image directory not found: {}", .0.display())]
    MissingImageDir(PathBuf),

    #[error("dataset directory not found: {}", .0.display())]
    MissingDataset(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read annotation header in '{}': {reason}", .path.display())]
    UnreadableHeader { path: PathBuf, reason: String },

    #[error("cannot list directory '{}': {source}", .path.display())]
    UnreadableDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Recoverable failure for a single image
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("image name '{0}' has no usable stem")]
    NoStem(String),

    #[error("image '{image}' shares stem '{stem}' with an image already written")]
    StemCollision { image: String, stem: String },

    #[error("copy to '{}' failed: {source}", .target.display())]
    CopyImage {
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing captions to '{}' failed: {source}", .target.display())]
    WriteCaptions {
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}
