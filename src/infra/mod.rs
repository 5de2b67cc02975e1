// ============================================================
// Layer 5 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   observer.rs     — TracingObserver
//                     Turns assembler/validator events into
//                     tracing records.
//
//   report_store.rs — JSON persistence
//                     Writes conversion summaries and
//                     validation reports with serde_json.
//
// Reference: Rust Book §7 (Modules)

/// Event observers (tracing-backed)
pub mod observer;

/// JSON report writer
pub mod report_store;
