// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing the dataset:
// annotation rows, file layout, pairing reports, conversion
// counters, events and errors.
//
// Rules for this layer:
//   - NO file I/O
//   - NO csv/clap/tracing types
//   - Only plain structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Annotation rows, column layout and the row parser
pub mod annotation;

/// Image/caption file classification and naming
pub mod layout;

/// Pairing reports and validation results
pub mod pairing;

/// Conversion counters and summary
pub mod conversion;

/// Typed progress and diagnostic events
pub mod events;

/// Fatal and per-item error types
pub mod errors;

/// Core abstractions (traits) that other layers implement
pub mod traits;
