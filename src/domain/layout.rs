// ============================================================
// Layer 3 — File Layout
// ============================================================
// Decides which files count as images and which as captions,
// and how a caption file is named for a given image.
//
// Pairing key = stem (file name without extension):
//   3.jpg  ─┐
//           ├─ stem "3" → paired
//   3.txt  ─┘
//
// Extensions are compared ASCII case-insensitively, so
// "3.JPG" is an image just like "3.jpg".

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What role a file plays in a paired directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Caption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLayout {
    /// Extensions (without the dot) that mark image files
    pub image_extensions: Vec<String>,

    /// Extension (without the dot) of caption files
    pub caption_extension: String,
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            image_extensions:  vec!["jpg".to_string()],
            caption_extension: "txt".to_string(),
        }
    }
}

impl FileLayout {
    pub fn new(image_extensions: Vec<String>, caption_extension: impl Into<String>) -> Self {
        Self {
            image_extensions,
            caption_extension: caption_extension.into(),
        }
    }

    /// Classify a path by its extension. Files with any other
    /// extension (or none) are not part of the pairing.
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let ext = path.extension().and_then(|e| e.to_str())?;

        if ext.eq_ignore_ascii_case(&self.caption_extension) {
            return Some(FileKind::Caption);
        }
        if self
            .image_extensions
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        {
            return Some(FileKind::Image);
        }
        None
    }

    /// Name of the caption file that pairs with `stem`
    pub fn caption_file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.caption_extension)
    }
}

/// Stem of a file name as UTF-8, if it has one
pub fn stem_of(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}
