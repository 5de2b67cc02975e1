// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands the work to Layer 2, prints the final summary and
// picks the process exit status.
//
// Two commands are supported:
//   1. `convert`  — annotation table + images → paired directory
//   2. `validate` — checks a paired directory; exit 1 on failure

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ConvertArgs, ValidateArgs};
use std::io::{self, Write};
use std::process::ExitCode;

use crate::application::convert_use_case::ConvertUseCase;
use crate::application::validate_use_case::ValidateUseCase;
use crate::domain::pairing::ValidationOutcome;
use crate::infra::observer::TracingObserver;

#[derive(Parser, Debug)]
#[command(
    name = "clip-corpus",
    version,
    about = "Build image/caption pairs for contrastive training, and validate them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<ExitCode> {
        match self.command {
            Commands::Convert(args)  => run_convert(args),
            Commands::Validate(args) => run_validate(args),
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<ExitCode> {
    let output_dir = args.output_dir.clone();
    let summary    = ConvertUseCase::new(args.into()).execute(&mut TracingObserver)?;

    println!("\nConversion complete!");
    println!("Succeeded: {} images", summary.tally.success_count);
    println!("Failed:    {} images", summary.tally.error_count);
    println!("Skipped:   {} malformed annotation rows", summary.malformed_rows);
    println!("Output:    {}", output_dir);
    println!(
        "Pairs:     {} images / {} caption files / {} paired",
        summary.output.image_count, summary.output.text_count, summary.output.paired_count
    );

    // Per-item failures are reported above; the run itself completed
    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode> {
    let json    = args.json;
    let outcome = ValidateUseCase::new(args.into()).execute(&mut TracingObserver)?;

    print_outcome(&outcome, json, &mut io::stdout().lock())?;

    if outcome.passed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Human-readable lines, or (with `json`) nothing but the JSON document
fn print_outcome(outcome: &ValidationOutcome, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?;
        return Ok(());
    }

    for audit in &outcome.audits {
        let r = &audit.report;
        writeln!(
            out,
            "{}: {} images, {} captions, {} paired ({:.1}%) [{}]",
            audit.directory.display(),
            r.image_count,
            r.text_count,
            r.paired_count,
            r.pairing_rate,
            if audit.passed { "OK" } else { "FAILED" }
        )?;
    }

    if outcome.passed {
        writeln!(out, "\nDataset validation passed.")?;
    } else {
        writeln!(out, "\nDataset validation failed.")?;
    }
    Ok(())
}
