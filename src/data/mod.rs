// ============================================================
// Layer 4 — Corpus Engine
// ============================================================
// Everything between the raw annotation file and a validated
// paired directory:
//
//   results.csv
//       │
//       ▼
//   AnnotationTable    → streams rows, resolves header columns
//       │
//       ▼
//   CaptionIndex       → image_id → ordered captions
//       │
//       ▼
//   CorpusAssembler    → copies images, writes caption files
//       │                 (cross-checked against ImageFileSet)
//       ▼
//   output directory
//       │
//       ▼
//   PairingValidator   → stem pairing report + diagnostics
//
// Each module does one step and can be tested on its own.

/// Delimited annotation file reader
pub mod annotation_table;

/// Groups rows into per-image caption lists
pub mod caption_index;

/// Directory listings: image sets and stem inventories
pub mod scanner;

/// Shuffling and sampling with an explicit rng
pub mod sampling;

/// Writes image/caption pairs
pub mod assembler;

/// Audits image/caption pairing
pub mod validator;
