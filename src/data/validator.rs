// ============================================================
// Layer 4 — Pairing Validator
// ============================================================
// Audits a paired directory, independent of how it was built.
//
// Target selection (one level only):
//
//   dataset/            dataset/
//     train/  ◀─ unit     1.jpg    ◀─ no sub-directories:
//     val/    ◀─ unit     1.txt       the target itself is
//       deep/ (ignored)               the single unit
//
// Per unit:
//   image_stems ∩ text_stems  → paired
//   image_stems − text_stems  → unpaired images
//   text_stems  − image_stems → unpaired texts
//   verdict: |paired| == |image_stems| == |text_stems|
//
// The overall verdict is the AND of every unit's verdict.
//
// Random diagnostics (unpaired examples, caption previews,
// image sizes) are drawn from the validator's own rng and do
// not influence any count or verdict.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::sampling::sample;
use crate::data::scanner::{list_subdirectories, StemInventory};
use crate::domain::errors::SetupError;
use crate::domain::events::{UnpairedSide, ValidationEvent};
use crate::domain::layout::FileLayout;
use crate::domain::pairing::{
    CaptionPreview, DiagnosticSamples, DirectoryAudit, ImageSize, PairingReport, ValidationOutcome,
};
use crate::domain::traits::ProgressObserver;

/// How many diagnostic examples to draw per directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleLimits {
    pub unpaired_images: usize,
    pub unpaired_texts:  usize,
    pub caption_previews: usize,
    pub image_sizes:     usize,

    /// Preview width in characters (not bytes)
    pub preview_chars: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            unpaired_images:  5,
            unpaired_texts:   5,
            caption_previews: 5,
            image_sizes:      3,
            preview_chars:    50,
        }
    }
}

pub struct PairingValidator<R> {
    rng:    R,
    layout: FileLayout,
    limits: SampleLimits,
}

impl<R: Rng> PairingValidator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            layout: FileLayout::default(),
            limits: SampleLimits::default(),
        }
    }

    pub fn with_layout(mut self, layout: FileLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_limits(mut self, limits: SampleLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validate `path`, or each of its direct sub-directories if it has any.
    pub fn validate(
        &mut self,
        path:     &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<ValidationOutcome, SetupError> {
        if !path.exists() {
            return Err(SetupError::MissingDataset(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(SetupError::NotADirectory(path.to_path_buf()));
        }

        let subdirs = list_subdirectories(path).map_err(|source| SetupError::UnreadableDir {
            path: path.to_path_buf(),
            source,
        })?;

        let units = if subdirs.is_empty() {
            vec![path.to_path_buf()]
        } else {
            subdirs
        };

        let mut audits = Vec::with_capacity(units.len());
        for unit in &units {
            audits.push(self.audit_directory(unit, observer)?);
        }

        let outcome = ValidationOutcome::new(path.to_path_buf(), audits);
        observer.on_validation(&ValidationEvent::Finished {
            directories: outcome.audits.len(),
            passed:      outcome.passed,
        });

        Ok(outcome)
    }

    /// Audit a single directory (no recursion at all).
    pub fn audit_directory(
        &mut self,
        dir:      &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DirectoryAudit, SetupError> {
        observer.on_validation(&ValidationEvent::DirectoryStarted {
            directory: dir.to_path_buf(),
        });

        let inventory = StemInventory::scan(dir, &self.layout).map_err(|source| {
            SetupError::UnreadableDir {
                path: dir.to_path_buf(),
                source,
            }
        })?;

        let report  = inventory.report();
        let samples = self.draw_samples(&inventory, &report, observer);
        let passed  = report.passed();

        observer.on_validation(&ValidationEvent::DirectoryFinished {
            directory: dir.to_path_buf(),
            report:    report.clone(),
            passed,
        });

        Ok(DirectoryAudit {
            directory: dir.to_path_buf(),
            report,
            samples,
            passed,
        })
    }

    fn draw_samples(
        &mut self,
        inventory: &StemInventory,
        report:    &PairingReport,
        observer:  &mut dyn ProgressObserver,
    ) -> DiagnosticSamples {
        let limits = self.limits;

        // ── Unpaired examples ─────────────────────────────────────────────────
        let unpaired_images = self.sample_unpaired(
            UnpairedSide::Images,
            &report.unpaired_images.iter().cloned().collect::<Vec<_>>(),
            limits.unpaired_images,
            observer,
        );
        let unpaired_texts = self.sample_unpaired(
            UnpairedSide::Texts,
            &report.unpaired_texts.iter().cloned().collect::<Vec<_>>(),
            limits.unpaired_texts,
            observer,
        );

        // ── Caption file previews ─────────────────────────────────────────────
        let caption_previews: Vec<CaptionPreview> =
            sample(&inventory.text_files, limits.caption_previews, &mut self.rng)
                .iter()
                .map(|path| preview_caption_file(path, limits.preview_chars))
                .collect();
        for preview in &caption_previews {
            observer.on_validation(&ValidationEvent::CaptionPreviewed(preview.clone()));
        }

        // ── Image sizes ───────────────────────────────────────────────────────
        let image_sizes: Vec<ImageSize> =
            sample(&inventory.image_files, limits.image_sizes, &mut self.rng)
                .iter()
                .map(|path| ImageSize {
                    file:  display_name(path),
                    bytes: fs::metadata(path).map(|m| m.len()).ok(),
                })
                .collect();
        for size in &image_sizes {
            observer.on_validation(&ValidationEvent::ImageSized(size.clone()));
        }

        DiagnosticSamples {
            unpaired_images,
            unpaired_texts,
            caption_previews,
            image_sizes,
        }
    }

    fn sample_unpaired(
        &mut self,
        side:       UnpairedSide,
        candidates: &[String],
        limit:      usize,
        observer:   &mut dyn ProgressObserver,
    ) -> Vec<String> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let picked = sample(candidates, limit, &mut self.rng);
        observer.on_validation(&ValidationEvent::UnpairedSampled {
            side,
            total:  candidates.len(),
            sample: picked.clone(),
        });
        picked
    }
}

/// Count the non-empty lines of a caption file and preview the
/// first one. A read failure is reported in the preview itself.
pub fn preview_caption_file(path: &Path, width: usize) -> CaptionPreview {
    let file = display_name(path);

    match fs::read_to_string(path) {
        Ok(text) => {
            let captions: Vec<&str> = text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();

            CaptionPreview {
                file,
                caption_count: captions.len(),
                first_caption: captions.first().map(|c| c.chars().take(width).collect()),
                error:         None,
            }
        }
        Err(e) => CaptionPreview {
            file,
            caption_count: 0,
            first_caption: None,
            error:         Some(e.to_string()),
        },
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
