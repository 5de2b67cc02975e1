// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer is written against these traits, not
// against concrete readers or loggers:
//
//   AnnotationSource  → AnnotationTable reads a delimited file
//                       (an in-memory Vec<RawRow> works too)
//
//   ProgressObserver  → TracingObserver logs events
//                       (tests record them instead)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::annotation::{ColumnLayout, RawRow};
use crate::domain::events::{ConversionEvent, ValidationEvent};

// ─── AnnotationSource ────────────────────────────────────────────────────────
/// Anything that can hand out annotation rows together with the
/// column layout needed to interpret them.
pub trait AnnotationSource {
    /// Row iterator type; rows are produced lazily
    type Rows: Iterator<Item = RawRow>;

    /// Positions of the image and caption columns
    fn layout(&self) -> ColumnLayout;

    /// Consume the source and stream its rows in table order
    fn into_rows(self) -> Self::Rows;
}

// ─── ProgressObserver ────────────────────────────────────────────────────────
/// Receives typed events from the assembler and the validator.
/// Both methods default to doing nothing, so an observer only
/// implements the side it cares about.
pub trait ProgressObserver {
    fn on_conversion(&mut self, _event: &ConversionEvent) {}

    fn on_validation(&mut self, _event: &ValidationEvent) {}
}
