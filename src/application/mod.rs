// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data layer to accomplish one command.
//
// Rules for this layer:
//   - No parsing or pairing logic here (that's Layer 4)
//   - No printing here (that's Layer 1); progress goes
//     through a ProgressObserver
//   - Checks fatal preconditions before any work starts
//
// Reference: Rust Book §7 (Module System)

// Annotation table + images → paired directory
pub mod convert_use_case;

// Paired directory → pairing report and verdict
pub mod validate_use_case;
