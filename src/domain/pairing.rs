// ============================================================
// Layer 3 — Pairing Domain Types
// ============================================================
// A well-formed output directory holds one image and one
// caption file per stem:
//
//   out/
//     1000092795.jpg   ← OutputPair { stem: "1000092795" }
//     1000092795.txt
//
// PairingReport is the quantitative view of how close a
// directory is to that ideal. It is computed fresh on every
// validation run and never written next to the data.
//
// Reference: Rust Book §8 (Collections — HashSet/BTreeSet)

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// An image and a caption file sharing the same stem
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OutputPair {
    pub stem: String,
}

/// Stem-level pairing statistics for one directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingReport {
    /// Number of distinct image stems
    pub image_count: usize,

    /// Number of distinct caption stems
    pub text_count: usize,

    /// Number of stems present on both sides
    pub paired_count: usize,

    /// Image stems with no caption file
    pub unpaired_images: BTreeSet<String>,

    /// Caption stems with no image file
    pub unpaired_texts: BTreeSet<String>,

    /// paired / images * 100, or 0.0 when there are no images
    pub pairing_rate: f64,
}

impl PairingReport {
    /// Build the report from the two stem sets of a directory.
    pub fn from_stems(image_stems: &BTreeSet<String>, text_stems: &BTreeSet<String>) -> Self {
        let paired_count    = image_stems.intersection(text_stems).count();
        let unpaired_images = image_stems.difference(text_stems).cloned().collect();
        let unpaired_texts  = text_stems.difference(image_stems).cloned().collect();

        // An empty directory has no rate to speak of; report 0 instead of NaN
        let pairing_rate = if image_stems.is_empty() {
            0.0
        } else {
            paired_count as f64 / image_stems.len() as f64 * 100.0
        };

        Self {
            image_count: image_stems.len(),
            text_count: text_stems.len(),
            paired_count,
            unpaired_images,
            unpaired_texts,
            pairing_rate,
        }
    }

    /// Pass iff every image and every caption has a partner.
    /// Two empty sets pass vacuously.
    pub fn passed(&self) -> bool {
        self.paired_count == self.image_count && self.paired_count == self.text_count
    }

    /// Stems that form complete pairs, in sorted order
    pub fn pairs<'a>(
        image_stems: &'a BTreeSet<String>,
        text_stems:  &'a BTreeSet<String>,
    ) -> impl Iterator<Item = OutputPair> + 'a {
        image_stems
            .intersection(text_stems)
            .map(|stem| OutputPair { stem: stem.clone() })
    }
}

/// First-look summary of one caption file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionPreview {
    pub file: String,

    /// Number of lines with non-whitespace content
    pub caption_count: usize,

    /// First non-empty caption, cut to the preview width
    pub first_caption: Option<String>,

    /// Set when the file could not be read as UTF-8 text
    pub error: Option<String>,
}

/// Byte size of one sampled image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub file: String,
    pub bytes: Option<u64>,
}

/// Randomly sampled diagnostics. Informational only; they never
/// change the verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosticSamples {
    pub unpaired_images: Vec<String>,
    pub unpaired_texts:  Vec<String>,
    pub caption_previews: Vec<CaptionPreview>,
    pub image_sizes:     Vec<ImageSize>,
}

/// Everything learned about one validated directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryAudit {
    pub directory: PathBuf,
    pub report:    PairingReport,
    pub samples:   DiagnosticSamples,
    pub passed:    bool,
}

/// Result of a full validation run over one or more directories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub target: PathBuf,
    pub audits: Vec<DirectoryAudit>,

    /// Logical AND of every directory verdict
    pub passed: bool,
}

impl ValidationOutcome {
    pub fn new(target: PathBuf, audits: Vec<DirectoryAudit>) -> Self {
        let passed = audits.iter().all(|audit| audit.passed);
        Self { target, audits, passed }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn stems(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partial_pairing_report() {
        // 3.jpg, 4.jpg, 3.txt
        let report = PairingReport::from_stems(&stems(&["3", "4"]), &stems(&["3"]));
        assert_eq!(report.paired_count, 1);
        assert_eq!(report.unpaired_images, stems(&["4"]));
        assert!(report.unpaired_texts.is_empty());
        assert_eq!(report.pairing_rate, 50.0);
        assert!(!report.passed());
    }

    #[test]
    fn test_empty_directory_has_zero_rate_and_passes() {
        let report = PairingReport::from_stems(&BTreeSet::new(), &BTreeSet::new());
        assert_eq!(report.pairing_rate, 0.0);
        assert!(report.passed());
    }

    #[test]
    fn test_orphan_captions_fail_without_images() {
        let report = PairingReport::from_stems(&BTreeSet::new(), &stems(&["1"]));
        assert_eq!(report.pairing_rate, 0.0);
        assert_eq!(report.unpaired_texts, stems(&["1"]));
        assert!(!report.passed());
    }

    #[test]
    fn test_full_pairing_is_one_hundred_percent() {
        let report = PairingReport::from_stems(&stems(&["1", "2"]), &stems(&["1", "2"]));
        assert_eq!(report.pairing_rate, 100.0);
        assert!(report.unpaired_images.is_empty() && report.unpaired_texts.is_empty());
        assert!(report.passed());
    }

    #[test]
    fn test_orphan_caption_fails_even_at_full_image_rate() {
        // Every image is paired, yet a stray caption breaks the verdict
        let report = PairingReport::from_stems(&stems(&["1"]), &stems(&["1", "2"]));
        assert_eq!(report.pairing_rate, 100.0);
        assert!(!report.passed());
    }

    #[test]
    fn test_pairs_lists_shared_stems() {
        let images = stems(&["1", "2", "3"]);
        let texts  = stems(&["2", "3", "9"]);
        let pairs: Vec<_> = PairingReport::pairs(&images, &texts).map(|p| p.stem).collect();
        assert_eq!(pairs, vec!["2", "3"]);
    }

    #[test]
    fn test_outcome_is_and_of_audits() {
        let pass = DirectoryAudit {
            directory: PathBuf::from("a"),
            report:    PairingReport::from_stems(&stems(&["1"]), &stems(&["1"])),
            samples:   DiagnosticSamples::default(),
            passed:    true,
        };
        let fail = DirectoryAudit { directory: PathBuf::from("b"), passed: false, ..pass.clone() };

        assert!(ValidationOutcome::new(PathBuf::from("."), vec![pass.clone()]).passed);
        assert!(!ValidationOutcome::new(PathBuf::from("."), vec![pass, fail]).passed);
    }
}
