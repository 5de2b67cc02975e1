// ============================================================
// Layer 2 — ValidateUseCase
// ============================================================
// Audits a paired directory (or each of its sub-directories):
//   1. Build the rng (seeded if asked)
//   2. Run the PairingValidator
//   3. Optionally save the outcome as JSON
//
// A failing verdict is a normal result, not an error; the CLI
// turns it into a non-zero exit status.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    sampling::build_rng,
    validator::{PairingValidator, SampleLimits},
};
use crate::domain::layout::FileLayout;
use crate::domain::pairing::ValidationOutcome;
use crate::domain::traits::ProgressObserver;
use crate::infra::report_store::write_json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateConfig {
    pub dataset_dir: String,
    pub layout:      FileLayout,
    pub seed:        Option<u64>,
    pub limits:      SampleLimits,
    pub report_path: Option<String>,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            dataset_dir: "clip_dataset".to_string(),
            layout:      FileLayout::default(),
            seed:        None,
            limits:      SampleLimits::default(),
            report_path: None,
        }
    }
}

pub struct ValidateUseCase {
    config: ValidateConfig,
}

impl ValidateUseCase {
    pub fn new(config: ValidateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, observer: &mut dyn ProgressObserver) -> Result<ValidationOutcome> {
        let cfg = &self.config;

        let mut validator = PairingValidator::new(build_rng(cfg.seed))
            .with_layout(cfg.layout.clone())
            .with_limits(cfg.limits);
        let outcome = validator.validate(Path::new(&cfg.dataset_dir), observer)?;

        if let Some(path) = &cfg.report_path {
            write_json(Path::new(path), &outcome)?;
        }

        Ok(outcome)
    }
}
