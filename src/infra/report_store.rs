// ============================================================
// Layer 5 — Report Store
// ============================================================
// Persists run results as pretty-printed JSON:
//
//   convert --summary run.json   → ConversionRecord
//   validate --report audit.json → ValidationOutcome
//
// Reports are written wherever the user points them, never into
// the paired directory itself (a stray file there would be
// harmless to the validator, but it is not part of the dataset).
//
// Reference: serde_json documentation (to_string_pretty)

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

/// Serialize `value` to pretty JSON and write it to `path`,
/// creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)?;

    fs::write(path, json)
        .with_context(|| format!("Cannot write report to '{}'", path.display()))?;

    tracing::debug!("Wrote report to '{}'", path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::{ConversionSummary, OutputCheck};
    use tempfile::tempdir;

    #[test]
    fn test_write_json_creates_parents() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("reports/nested/summary.json");

        let summary = ConversionSummary {
            indexed_images: 2,
            output: OutputCheck { image_count: 2, text_count: 2, paired_count: 2 },
            ..ConversionSummary::default()
        };
        write_json(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["indexed_images"], 2);
        assert_eq!(value["output"]["paired_count"], 2);
    }
}
