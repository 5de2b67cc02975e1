// ============================================================
// Layer 2 — ConvertUseCase
// ============================================================
// Orchestrates one conversion run in order:
//
//   Step 1: Check preconditions        (annotation file, image dir)
//   Step 2: Create the output dir      (std::fs)
//   Step 3: Build the caption index    (Layer 4 - data)
//   Step 4: List images on disk        (Layer 4 - data)
//   Step 5: Write image/caption pairs  (Layer 4 - data)
//   Step 6: Check the output pairing   (Layer 4 - data)
//   Step 7: Save the run summary       (Layer 5 - infra)
//
// Steps 1-2 are fatal on failure. From step 3 on, problems
// with single rows or single images are counted, not raised.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::{
    annotation_table::{AnnotationTable, TableFormat},
    assembler::{valid_images, CorpusAssembler, DEFAULT_PROGRESS_EVERY},
    caption_index::CaptionIndex,
    sampling::build_rng,
    scanner::{ImageFileSet, StemInventory},
};
use crate::domain::conversion::ConversionSummary;
use crate::domain::errors::SetupError;
use crate::domain::events::ConversionEvent;
use crate::domain::layout::FileLayout;
use crate::domain::traits::ProgressObserver;
use crate::infra::report_store::write_json;

// ─── Conversion Configuration ────────────────────────────────────────────────
// Everything a conversion run needs. Serialisable so it can be
// stored next to the run summary for later reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Dataset root holding the annotation file and image directory
    pub input_dir:        String,
    pub output_dir:       String,
    /// Annotation file, relative to input_dir
    pub annotations_file: String,
    /// Image directory, relative to input_dir
    pub images_subdir:    String,
    pub table:            TableFormat,
    pub layout:           FileLayout,
    pub shuffle:          bool,
    pub seed:             Option<u64>,
    pub progress_every:   usize,
    /// Where to write the JSON run summary, if anywhere
    pub summary_path:     Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir:        "flickr30k".to_string(),
            output_dir:       "clip_dataset".to_string(),
            annotations_file: "results.csv".to_string(),
            images_subdir:    "flickr30k_images".to_string(),
            table:            TableFormat::default(),
            layout:           FileLayout::default(),
            shuffle:          true,
            seed:             None,
            progress_every:   DEFAULT_PROGRESS_EVERY,
            summary_path:     None,
        }
    }
}

impl ConvertConfig {
    pub fn annotations_path(&self) -> PathBuf {
        Path::new(&self.input_dir).join(&self.annotations_file)
    }

    pub fn images_path(&self) -> PathBuf {
        Path::new(&self.input_dir).join(&self.images_subdir)
    }
}

/// What gets written by --summary: the settings and the results
#[derive(Debug, Serialize)]
pub struct ConversionRecord<'a> {
    pub config:  &'a ConvertConfig,
    pub summary: &'a ConversionSummary,
}

// ─── ConvertUseCase ──────────────────────────────────────────────────────────
pub struct ConvertUseCase {
    config: ConvertConfig,
}

impl ConvertUseCase {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Run the conversion end to end, reporting through `observer`
    pub fn execute(&self, observer: &mut dyn ProgressObserver) -> Result<ConversionSummary> {
        let cfg = &self.config;

        // ── Step 1: Preconditions ─────────────────────────────────────────────
        // Both inputs must exist before any output is produced
        let annotations = cfg.annotations_path();
        let images_dir  = cfg.images_path();
        if !annotations.is_file() {
            return Err(SetupError::MissingAnnotations(annotations).into());
        }
        if !images_dir.is_dir() {
            return Err(SetupError::MissingImageDir(images_dir).into());
        }

        tracing::info!("Converting dataset in '{}'", cfg.input_dir);
        tracing::info!("Writing pairs to '{}'", cfg.output_dir);

        // ── Step 2: Output directory ──────────────────────────────────────────
        let output_dir = Path::new(&cfg.output_dir);
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Cannot create output directory '{}'", cfg.output_dir))?;

        // ── Step 3: Caption index ─────────────────────────────────────────────
        // The table is streamed; its file handle closes when the rows run out
        let table = AnnotationTable::open(&annotations, &cfg.table)?;
        tracing::info!("Reading annotations from '{}'", table.path().display());
        let (index, malformed_rows) = CaptionIndex::from_source(table);
        if index.is_empty() {
            tracing::warn!("No usable captions in '{}'; nothing will be written", annotations.display());
        }
        observer.on_conversion(&ConversionEvent::IndexBuilt {
            images:   index.image_count(),
            captions: index.caption_count(),
            malformed_rows,
        });

        // ── Step 4: Images on disk ────────────────────────────────────────────
        let images = ImageFileSet::scan(&images_dir, &cfg.layout)?;

        // ── Step 5: Write pairs ───────────────────────────────────────────────
        let mut assembler = CorpusAssembler::new(build_rng(cfg.seed))
            .with_layout(cfg.layout.clone())
            .with_progress_every(cfg.progress_every);
        let tally = assembler.convert(&index, &images, output_dir, cfg.shuffle, observer);

        // ── Step 6: Check what landed on disk ─────────────────────────────────
        let output = StemInventory::scan(output_dir, &cfg.layout)
            .with_context(|| format!("Cannot list output directory '{}'", cfg.output_dir))?
            .output_check();
        observer.on_conversion(&ConversionEvent::OutputChecked(output));

        let summary = ConversionSummary {
            indexed_images:   index.image_count(),
            indexed_captions: index.caption_count(),
            malformed_rows,
            images_found:     images.len(),
            valid_images:     valid_images(&index, &images).len(),
            tally,
            output,
        };

        // ── Step 7: Optional summary file ─────────────────────────────────────
        if let Some(path) = &cfg.summary_path {
            write_json(Path::new(path), &ConversionRecord { config: cfg, summary: &summary })?;
        }

        Ok(summary)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::observer::RecordingObserver;
    use tempfile::{tempdir, TempDir};

    /// A small Flickr30k-shaped dataset:
    ///   results.csv with a padded " comment" header
    ///   flickr30k_images/{1,2,3}.jpg  (3.jpg has no captions)
    fn flickr_fixture() -> TempDir {
        let root   = tempdir().unwrap();
        let images = root.path().join("flickr30k_images");
        fs::create_dir(&images).unwrap();
        for name in ["1.jpg", "2.jpg", "3.jpg"] {
            fs::write(images.join(name), name.as_bytes()).unwrap();
        }
        fs::write(
            root.path().join("results.csv"),
            "image_name| comment_number| comment\n\
             1.jpg| 0| a dog runs\n\
             2.jpg| 0| a red car\n\
             1.jpg| 1|  a cat sleeps \n\
             2.jpg| 1|\n\
             9.jpg| 0| no such image\n",
        )
        .unwrap();
        root
    }

    fn config_for(input: &Path, output: &Path) -> ConvertConfig {
        ConvertConfig {
            input_dir:  input.display().to_string(),
            output_dir: output.display().to_string(),
            shuffle:    false,
            seed:       Some(3),
            ..ConvertConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_conversion() {
        let input  = flickr_fixture();
        let output = tempdir().unwrap();
        let out    = output.path().join("clip");

        let summary = ConvertUseCase::new(config_for(input.path(), &out))
            .execute(&mut RecordingObserver::default())
            .unwrap();

        assert_eq!(summary.malformed_rows, 1);
        assert_eq!(summary.indexed_images, 3);
        assert_eq!(summary.images_found, 3);
        assert_eq!(summary.valid_images, 2);
        assert_eq!(summary.tally.success_count, 2);
        assert_eq!(summary.tally.error_count, 0);
        assert!(!summary.output.has_mismatch());

        assert_eq!(fs::read_to_string(out.join("1.txt")).unwrap(), "a dog runs\na cat sleeps\n");
        assert_eq!(fs::read_to_string(out.join("2.txt")).unwrap(), "a red car\n");
        assert!(!out.join("3.jpg").exists());
    }

    #[test]
    fn test_missing_annotations_is_fatal_before_output() {
        let input = flickr_fixture();
        fs::remove_file(input.path().join("results.csv")).unwrap();
        let output = tempdir().unwrap();
        let out    = output.path().join("clip");

        let err = ConvertUseCase::new(config_for(input.path(), &out))
            .execute(&mut RecordingObserver::default())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::MissingAnnotations(_))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_image_dir_is_fatal() {
        let input = flickr_fixture();
        fs::remove_dir_all(input.path().join("flickr30k_images")).unwrap();
        let output = tempdir().unwrap();

        let err = ConvertUseCase::new(config_for(input.path(), output.path()))
            .execute(&mut RecordingObserver::default())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::MissingImageDir(_))
        ));
    }

    #[test]
    fn test_summary_file_written() {
        let input   = flickr_fixture();
        let output  = tempdir().unwrap();
        let summary = output.path().join("summary.json");
        let config  = ConvertConfig {
            summary_path: Some(summary.display().to_string()),
            ..config_for(input.path(), &output.path().join("clip"))
        };

        ConvertUseCase::new(config)
            .execute(&mut RecordingObserver::default())
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(value["summary"]["tally"]["success_count"], 2);
        assert_eq!(value["config"]["shuffle"], false);
    }

    #[test]
    fn test_events_reported_in_order() {
        let input  = flickr_fixture();
        let output = tempdir().unwrap();
        let mut observer = RecordingObserver::default();

        ConvertUseCase::new(config_for(input.path(), output.path()))
            .execute(&mut observer)
            .unwrap();

        assert_eq!(
            observer.conversion.first(),
            Some(&ConversionEvent::IndexBuilt { images: 3, captions: 4, malformed_rows: 1 })
        );
        assert!(matches!(
            observer.conversion.last(),
            Some(ConversionEvent::OutputChecked(check)) if check.paired_count == 2
        ));
    }
}
