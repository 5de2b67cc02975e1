// ============================================================
// Layer 4 — Corpus Assembler
// ============================================================
// Writes the paired training directory:
//
//   input/flickr30k_images/1.jpg ──copy──▶ output/1.jpg
//   CaptionIndex["1.jpg"]        ──write─▶ output/1.txt
//                                          a dog runs\n
//                                          a cat sleeps\n
//
// Only images that exist on disk AND have captions are touched
// (the "valid" set). Anything else is silently left out: it is
// neither a success nor an error.
//
// Each image is handled on its own. A failed copy or write is
// recorded in the tally and the loop moves on; one bad image
// never stops the run.
//
// Every processed image owns its stem for the whole run. When a
// second image maps to a stem already taken ("3.jpg" next to
// "3.JPG", or "3.png" with several image extensions) it is an
// item error; the first image's caption file is never replaced.
//
// Converting in place (output dir == image dir) leaves the image
// untouched and only writes the caption file.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::Rng;

use crate::data::caption_index::CaptionIndex;
use crate::data::sampling::permute;
use crate::data::scanner::ImageFileSet;
use crate::domain::conversion::ConversionTally;
use crate::domain::errors::ItemError;
use crate::domain::events::ConversionEvent;
use crate::domain::layout::{stem_of, FileLayout};
use crate::domain::traits::ProgressObserver;

/// Default number of images between Progress events
pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

/// Builds the output directory from a CaptionIndex and the images
/// on disk. Owns its rng so shuffling is reproducible under a seed.
pub struct CorpusAssembler<R> {
    rng:            R,
    layout:         FileLayout,
    progress_every: usize,
}

impl<R: Rng> CorpusAssembler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            layout:         FileLayout::default(),
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }

    /// Use a different caption extension / image extension set
    pub fn with_layout(mut self, layout: FileLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Emit a Progress event every `every` images (0 = only at the end)
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    /// Convert every valid image into an image + caption file pair
    /// inside `output_dir`, which must already exist.
    pub fn convert(
        &mut self,
        index:      &CaptionIndex,
        images:     &ImageFileSet,
        output_dir: &Path,
        shuffle:    bool,
        observer:   &mut dyn ProgressObserver,
    ) -> ConversionTally {
        let valid = valid_images(index, images);
        observer.on_conversion(&ConversionEvent::ImagesScanned {
            found: images.len(),
            valid: valid.len(),
        });

        let total     = valid.len();
        let mut tally = ConversionTally::default();
        let mut taken = HashSet::new();

        for (i, name) in valid.into_iter().enumerate() {
            // valid_images only yields indexed names
            let captions = index.captions(name).unwrap_or_default();

            match self.convert_one(name, captions, images, output_dir, shuffle, &mut taken) {
                Ok(()) => tally.record_success(),
                Err(e) => {
                    let reason = e.to_string();
                    observer.on_conversion(&ConversionEvent::ItemFailed {
                        image_id: name.to_string(),
                        reason:   reason.clone(),
                    });
                    tally.record_failure(name, reason);
                }
            }

            let processed = i + 1;
            let at_step   = self.progress_every > 0 && processed % self.progress_every == 0;
            if at_step || processed == total {
                observer.on_conversion(&ConversionEvent::Progress { processed, total });
            }
        }

        observer.on_conversion(&ConversionEvent::Finished {
            success: tally.success_count,
            errors:  tally.error_count,
        });

        tally
    }

    /// Copy one image and write its caption file.
    fn convert_one(
        &mut self,
        name:       &str,
        captions:   &[String],
        images:     &ImageFileSet,
        output_dir: &Path,
        shuffle:    bool,
        taken:      &mut HashSet<String>,
    ) -> Result<(), ItemError> {
        let stem = stem_of(Path::new(name)).ok_or_else(|| ItemError::NoStem(name.to_string()))?;
        if !taken.insert(stem.to_string()) {
            return Err(ItemError::StemCollision {
                image: name.to_string(),
                stem:  stem.to_string(),
            });
        }

        // Work on a copy so the index keeps its source order
        let mut ordered = captions.to_vec();
        if shuffle {
            permute(&mut ordered, &mut self.rng);
        }

        let image_source = images.path_of(name);
        let image_target = output_dir.join(name);
        if is_same_file(&image_source, &image_target) {
            // fs::copy onto itself would truncate the source
            tracing::debug!("'{}' is already in place", image_target.display());
        } else {
            fs::copy(&image_source, &image_target).map_err(|source| ItemError::CopyImage {
                target: image_target.clone(),
                source,
            })?;
        }

        let caption_target = output_dir.join(self.layout.caption_file_name(stem));
        write_captions(&caption_target, &ordered).map_err(|source| ItemError::WriteCaptions {
            target: caption_target.clone(),
            source,
        })?;

        Ok(())
    }
}

/// Images present on disk that also have captions, in sorted order
pub fn valid_images<'a>(index: &CaptionIndex, images: &'a ImageFileSet) -> Vec<&'a str> {
    images.names().filter(|name| index.contains(name)).collect()
}

/// Both paths exist and resolve to the same file
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write one caption per line, every line newline-terminated.
/// A line break inside a caption becomes a space so the file keeps
/// exactly one line per caption.
fn write_captions(path: &Path, captions: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    for caption in captions {
        if caption.contains(['\n', '\r']) {
            writeln!(writer, "{}", caption.replace(['\n', '\r'], " "))?;
        } else {
            writeln!(writer, "{caption}")?;
        }
    }

    writer.flush()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::AnnotationRecord;
    use crate::infra::observer::RecordingObserver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn index_of(records: &[(&str, &str)]) -> CaptionIndex {
        let mut index = CaptionIndex::default();
        for (image, caption) in records {
            index.insert(AnnotationRecord::new(*image, *caption));
        }
        index
    }

    fn assembler(seed: u64) -> CorpusAssembler<StdRng> {
        CorpusAssembler::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_unshuffled_captions_written_in_order() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("1.jpg"), b"\xff\xd8jpeg-bytes").unwrap();

        let index  = index_of(&[("1.jpg", "a dog runs"), ("1.jpg", "a cat sleeps")]);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();
        let mut observer = RecordingObserver::default();

        let tally = assembler(0).convert(&index, &images, output.path(), false, &mut observer);

        assert_eq!(tally.success_count, 1);
        assert_eq!(tally.error_count, 0);
        assert_eq!(
            fs::read_to_string(output.path().join("1.txt")).unwrap(),
            "a dog runs\na cat sleeps\n"
        );
        assert_eq!(
            fs::read(output.path().join("1.jpg")).unwrap(),
            b"\xff\xd8jpeg-bytes".to_vec()
        );
    }

    #[test]
    fn test_shuffled_captions_are_a_permutation() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("7.jpg"), b"img").unwrap();

        let captions: Vec<String> = (0..12).map(|i| format!("caption {i}")).collect();
        let records: Vec<(&str, &str)> = captions.iter().map(|c| ("7.jpg", c.as_str())).collect();
        let index  = index_of(&records);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();

        assembler(5).convert(&index, &images, output.path(), true, &mut RecordingObserver::default());

        let written = fs::read_to_string(output.path().join("7.txt")).unwrap();
        let mut lines: Vec<String> = written.lines().map(str::to_string).collect();
        assert_eq!(lines.len(), captions.len());

        lines.sort();
        let mut expected = captions.clone();
        expected.sort();
        assert_eq!(lines, expected);

        // The index itself is left in source order
        assert_eq!(index.captions("7.jpg").unwrap(), captions.as_slice());
    }

    #[test]
    fn test_same_seed_gives_same_order() {
        let input = tempdir().unwrap();
        fs::write(input.path().join("1.jpg"), b"img").unwrap();
        let records: Vec<(String, String)> =
            (0..10).map(|i| ("1.jpg".to_string(), format!("c{i}"))).collect();
        let borrowed: Vec<(&str, &str)> =
            records.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let index  = index_of(&borrowed);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();

        let first  = tempdir().unwrap();
        let second = tempdir().unwrap();
        assembler(11).convert(&index, &images, first.path(), true, &mut RecordingObserver::default());
        assembler(11).convert(&index, &images, second.path(), true, &mut RecordingObserver::default());

        assert_eq!(
            fs::read_to_string(first.path().join("1.txt")).unwrap(),
            fs::read_to_string(second.path().join("1.txt")).unwrap()
        );
    }

    #[test]
    fn test_unmatched_images_and_captions_are_excluded() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("1.jpg"), b"img").unwrap();
        fs::write(input.path().join("2.jpg"), b"img").unwrap(); // no captions

        let index  = index_of(&[("1.jpg", "one"), ("9.jpg", "no image")]);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();
        let mut observer = RecordingObserver::default();

        let tally = assembler(0).convert(&index, &images, output.path(), false, &mut observer);

        assert_eq!(tally.success_count, 1);
        assert_eq!(tally.error_count, 0);
        assert!(!output.path().join("2.jpg").exists());
        assert!(!output.path().join("9.txt").exists());
        assert!(observer
            .conversion
            .contains(&ConversionEvent::ImagesScanned { found: 2, valid: 1 }));
    }

    #[test]
    fn test_write_failure_is_isolated() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        for name in ["1.jpg", "2.jpg", "3.jpg"] {
            fs::write(input.path().join(name), b"img").unwrap();
        }
        // A directory where 2.txt should go makes the caption write fail
        fs::create_dir(output.path().join("2.txt")).unwrap();

        let index  = index_of(&[("1.jpg", "a"), ("2.jpg", "b"), ("3.jpg", "c")]);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();
        let mut observer = RecordingObserver::default();

        let tally = assembler(0).convert(&index, &images, output.path(), false, &mut observer);

        assert_eq!(tally.success_count, 2);
        assert_eq!(tally.error_count, 1);
        assert_eq!(tally.failures[0].image_id, "2.jpg");
        assert_eq!(fs::read_to_string(output.path().join("3.txt")).unwrap(), "c\n");
        assert!(observer
            .conversion
            .iter()
            .any(|e| matches!(e, ConversionEvent::ItemFailed { image_id, .. } if image_id == "2.jpg")));
        assert!(observer
            .conversion
            .contains(&ConversionEvent::Finished { success: 2, errors: 1 }));
    }

    #[test]
    fn test_copy_failure_skips_caption_file() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("1.jpg"), b"img").unwrap();

        // 2.jpg is listed but vanished from disk before conversion
        let images = ImageFileSet::from_names(input.path(), ["1.jpg", "2.jpg"]);
        let index  = index_of(&[("1.jpg", "a"), ("2.jpg", "b")]);

        let tally = assembler(0).convert(
            &index,
            &images,
            output.path(),
            false,
            &mut RecordingObserver::default(),
        );

        assert_eq!(tally.success_count, 1);
        assert_eq!(tally.error_count, 1);
        assert!(!output.path().join("2.txt").exists());
        assert!(tally.failures[0].reason.contains("copy"));
    }

    #[test]
    fn test_progress_events_follow_interval() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        for name in ["1.jpg", "2.jpg", "3.jpg"] {
            fs::write(input.path().join(name), b"img").unwrap();
        }
        let index  = index_of(&[("1.jpg", "a"), ("2.jpg", "b"), ("3.jpg", "c")]);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();
        let mut observer = RecordingObserver::default();

        assembler(0)
            .with_progress_every(2)
            .convert(&index, &images, output.path(), false, &mut observer);

        let progress: Vec<_> = observer
            .conversion
            .iter()
            .filter_map(|e| match e {
                ConversionEvent::Progress { processed, total } => Some((*processed, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![(2, 3), (3, 3)]);
    }

    #[test]
    fn test_in_place_conversion_keeps_image_bytes() {
        let dir   = tempdir().unwrap();
        let bytes = b"\xff\xd8\xff\xe0jpeg-data".to_vec();
        fs::write(dir.path().join("1.jpg"), &bytes).unwrap();

        let index  = index_of(&[("1.jpg", "a dog runs")]);
        let images = ImageFileSet::scan(dir.path(), &FileLayout::default()).unwrap();

        let tally = assembler(0).convert(
            &index,
            &images,
            dir.path(),
            false,
            &mut RecordingObserver::default(),
        );

        assert_eq!(tally.success_count, 1);
        assert_eq!(tally.error_count, 0);
        assert_eq!(fs::read(dir.path().join("1.jpg")).unwrap(), bytes);
        assert_eq!(fs::read_to_string(dir.path().join("1.txt")).unwrap(), "a dog runs\n");
    }

    #[test]
    fn test_stem_collision_keeps_first_caption_file() {
        let input  = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("3.JPG"), b"upper").unwrap();
        fs::write(input.path().join("3.jpg"), b"lower").unwrap();

        let index  = index_of(&[("3.jpg", "caption for lower"), ("3.JPG", "caption for upper")]);
        let images = ImageFileSet::scan(input.path(), &FileLayout::default()).unwrap();
        let mut observer = RecordingObserver::default();

        let tally = assembler(0).convert(&index, &images, output.path(), false, &mut observer);

        // Names are processed in sorted order, so "3.JPG" claims the stem first
        assert_eq!(tally.success_count, 1);
        assert_eq!(tally.error_count, 1);
        assert_eq!(tally.failures[0].image_id, "3.jpg");
        assert!(tally.failures[0].reason.contains("stem '3'"));
        assert_eq!(
            fs::read_to_string(output.path().join("3.txt")).unwrap(),
            "caption for upper\n"
        );
        assert!(!output.path().join("3.jpg").exists());
    }

    #[test]
    fn test_embedded_newline_stays_on_one_line() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("x.txt");
        write_captions(&path, &["two\nlines".to_string(), "plain".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two lines\nplain\n");
    }

    #[test]
    fn test_unicode_captions_round_trip() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("u.txt");
        let captions = vec!["一只狗在草地上奔跑".to_string(), "café – naïve 🐕".to_string()];
        write_captions(&path, &captions).unwrap();

        let read: Vec<String> = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(read, captions);
    }
}
