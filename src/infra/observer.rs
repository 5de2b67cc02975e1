// ============================================================
// Layer 5 — Event Observers
// ============================================================
// TracingObserver turns the typed events coming out of the
// assembler and validator into log records:
//
//   progress, counts, previews   → info
//   failed items, unpaired files → warn
//   per-file detail              → debug
//
// The subscriber installed in main.rs decides what is shown
// (RUST_LOG=clip_corpus=debug for everything).

use crate::domain::events::{ConversionEvent, UnpairedSide, ValidationEvent};
use crate::domain::traits::ProgressObserver;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_conversion(&mut self, event: &ConversionEvent) {
        match event {
            ConversionEvent::IndexBuilt { images, captions, malformed_rows } => {
                tracing::info!(
                    "Indexed {} captions for {} images ({} malformed rows skipped)",
                    captions,
                    images,
                    malformed_rows
                );
            }
            ConversionEvent::ImagesScanned { found, valid } => {
                tracing::info!("Found {} image files, {} with captions", found, valid);
            }
            ConversionEvent::Progress { processed, total } => {
                tracing::info!("Processed {}/{} images", processed, total);
            }
            ConversionEvent::ItemFailed { image_id, reason } => {
                tracing::warn!("Failed to convert '{}': {}", image_id, reason);
            }
            ConversionEvent::Finished { success, errors } => {
                tracing::info!("Conversion finished: {} succeeded, {} failed", success, errors);
            }
            ConversionEvent::OutputChecked(check) => {
                tracing::info!(
                    "Output holds {} images, {} caption files, {} pairs",
                    check.image_count,
                    check.text_count,
                    check.paired_count
                );
                if check.has_mismatch() {
                    tracing::warn!(
                        "Output is not fully paired: {} images and {} caption files without a partner",
                        check.unpaired_images(),
                        check.unpaired_texts()
                    );
                }
            }
        }
    }

    fn on_validation(&mut self, event: &ValidationEvent) {
        match event {
            ValidationEvent::DirectoryStarted { directory } => {
                tracing::info!("Validating '{}'", directory.display());
            }
            ValidationEvent::UnpairedSampled { side, total, sample } => {
                let what = match side {
                    UnpairedSide::Images => "images without captions",
                    UnpairedSide::Texts  => "captions without images",
                };
                tracing::warn!("{} {}, e.g. {:?}", total, what, sample);
            }
            ValidationEvent::CaptionPreviewed(preview) => match &preview.error {
                Some(error) => tracing::warn!("Cannot read '{}': {}", preview.file, error),
                None => tracing::info!(
                    "{}: {} captions, first: {:?}",
                    preview.file,
                    preview.caption_count,
                    preview.first_caption.as_deref().unwrap_or("")
                ),
            },
            ValidationEvent::ImageSized(size) => match size.bytes {
                Some(bytes) => {
                    tracing::info!("{}: {:.1} KiB", size.file, bytes as f64 / 1024.0)
                }
                None => tracing::warn!("{}: size unavailable", size.file),
            },
            ValidationEvent::DirectoryFinished { directory, report, passed } => {
                tracing::info!(
                    "'{}': {} images, {} captions, {} paired ({:.1}%)",
                    directory.display(),
                    report.image_count,
                    report.text_count,
                    report.paired_count,
                    report.pairing_rate
                );
                if *passed {
                    tracing::info!("'{}' is correctly paired", directory.display());
                } else {
                    tracing::warn!("'{}' has pairing problems", directory.display());
                }
            }
            ValidationEvent::Finished { directories, passed } => {
                tracing::debug!("Validated {} directories, passed = {}", directories, passed);
            }
        }
    }
}

/// Keeps every event it receives, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub conversion: Vec<ConversionEvent>,
    pub validation: Vec<ValidationEvent>,
}

#[cfg(test)]
impl ProgressObserver for RecordingObserver {
    fn on_conversion(&mut self, event: &ConversionEvent) {
        self.conversion.push(event.clone());
    }

    fn on_validation(&mut self, event: &ValidationEvent) {
        self.validation.push(event.clone());
    }
}
