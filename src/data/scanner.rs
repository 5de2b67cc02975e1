// ============================================================
// Layer 4 — Directory Scanning
// ============================================================
// Lists what is physically on disk:
//
//   ImageFileSet  — image files in the input image directory,
//                   keyed by full file name ("1000092795.jpg")
//
//   StemInventory — image and caption files of a paired
//                   directory, keyed by stem ("1000092795")
//
// Only the top level of a directory is listed. Entries are
// sorted so later processing order does not depend on the
// filesystem's readdir order.
//
// Reference: Rust Book §12 (Reading Files)
//            std::fs::read_dir documentation

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::conversion::OutputCheck;
use crate::domain::errors::SetupError;
use crate::domain::layout::{stem_of, FileKind, FileLayout};
use crate::domain::pairing::PairingReport;

// ─── ImageFileSet ─────────────────────────────────────────────────────────────

/// Image identifiers present in one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFileSet {
    dir:   PathBuf,
    names: BTreeSet<String>,
}

impl ImageFileSet {
    /// List the image files directly inside `dir`.
    pub fn scan(dir: &Path, layout: &FileLayout) -> Result<Self, SetupError> {
        if !dir.is_dir() {
            return Err(SetupError::MissingImageDir(dir.to_path_buf()));
        }

        let files = list_files(dir).map_err(|source| SetupError::UnreadableDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let names = files
            .iter()
            .filter(|path| layout.classify(path) == Some(FileKind::Image))
            .filter_map(|path| file_name_of(path))
            .collect();

        Ok(Self {
            dir: dir.to_path_buf(),
            names,
        })
    }

    /// Build a set from known names without touching the disk
    #[cfg(test)]
    pub fn from_names<I, S>(dir: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir:   dir.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Image names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Full path of an image in this set
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

// ─── StemInventory ────────────────────────────────────────────────────────────

/// Image and caption files of one directory, with their stems
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemInventory {
    pub image_files: Vec<PathBuf>,
    pub text_files:  Vec<PathBuf>,
    pub image_stems: BTreeSet<String>,
    pub text_stems:  BTreeSet<String>,
}

impl StemInventory {
    /// Classify every file directly inside `dir`.
    pub fn scan(dir: &Path, layout: &FileLayout) -> io::Result<Self> {
        let mut inventory = Self::default();

        for path in list_files(dir)? {
            let kind = match layout.classify(&path) {
                Some(kind) => kind,
                None       => continue,
            };
            let stem = match stem_of(&path) {
                Some(stem) => stem.to_string(),
                None => {
                    tracing::warn!("Ignoring non UTF-8 file name: {}", path.display());
                    continue;
                }
            };

            match kind {
                FileKind::Image => {
                    inventory.image_stems.insert(stem);
                    inventory.image_files.push(path);
                }
                FileKind::Caption => {
                    inventory.text_stems.insert(stem);
                    inventory.text_files.push(path);
                }
            }
        }

        Ok(inventory)
    }

    /// Stem-level pairing report for this directory
    pub fn report(&self) -> PairingReport {
        PairingReport::from_stems(&self.image_stems, &self.text_stems)
    }

    /// File counts plus the number of stems present on both sides
    pub fn output_check(&self) -> OutputCheck {
        OutputCheck {
            image_count:  self.image_files.len(),
            text_count:   self.text_files.len(),
            paired_count: PairingReport::pairs(&self.image_stems, &self.text_stems).count(),
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Regular files (symlinks followed) directly inside `dir`, sorted
fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in '{}': {}", dir.display(), e);
                continue;
            }
        };
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Sub-directories directly inside `dir`, sorted
pub fn list_subdirectories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path  = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

fn file_name_of(path: &Path) -> Option<String> {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => Some(name.to_string()),
        None => {
            tracing::warn!("Ignoring non UTF-8 file name: {}", path.display());
            None
        }
    }
}
