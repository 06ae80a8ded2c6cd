//! # Process Subcommand
//!
//! Drives one cheque image through the full workflow. The delegated
//! model services are stood in by the deterministic mocks, with the
//! extraction result supplied as a JSON fixture file, so a complete run
//! can be exercised end to end from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;

use cheq_audit::PlainTextFormatter;
use cheq_core::{AccountNumber, ExtractedFields, ImagePayload};
use cheq_enrich::mock::{
    MockBehavior, MockReadability, MockSignatures, MockTampering, ScriptedExtractor,
    SubstringAccountValidator,
};
use cheq_enrich::{Extraction, InMemoryPayerDirectory, Verdict};
use cheq_workflow::{CaseOrchestrator, CaseOutcome, EnrichmentSuite};

/// Arguments for the process subcommand.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Path to the scanned cheque image.
    #[arg(long)]
    pub image: PathBuf,

    /// Path to the payer directory JSON file.
    #[arg(long)]
    pub directory: PathBuf,

    /// Base directory for signature assets (defaults to the directory
    /// file's parent).
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Extraction fixture JSON standing in for the vision service.
    #[arg(long)]
    pub fields: PathBuf,

    /// Pin the date-rule reference date (YYYY-MM-DD, defaults to today).
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Output machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Extraction fixture file format, mirroring the vision service's
/// response fields.
#[derive(Debug, Deserialize)]
pub struct ExtractionFixture {
    /// Payee name.
    pub payee: String,
    /// Courtesy amount.
    pub amount: f64,
    /// Legal amount, when legible.
    #[serde(default)]
    pub amount_in_words: Option<String>,
    /// Raw date digits.
    pub date: String,
    /// Payer account number from the MICR line.
    pub account_number: String,
    /// Path to a cropped signature image, relative to the base dir.
    #[serde(default)]
    pub signature_image: Option<PathBuf>,
    /// Amount-consistency verdict flag.
    #[serde(default = "default_true")]
    pub is_amount_consistent: bool,
    /// Amount-consistency justification.
    #[serde(default)]
    pub validation_reason: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ExtractionFixture {
    /// Turn the fixture into the extraction the scripted extractor will
    /// return, loading the signature crop when one is named.
    pub fn into_extraction(self, base_dir: &Path) -> anyhow::Result<Extraction> {
        let account_number = AccountNumber::new(&self.account_number)
            .with_context(|| format!("fixture account number {:?}", self.account_number))?;

        let signature_region = match &self.signature_image {
            Some(rel) => {
                let path = base_dir.join(rel);
                Some(
                    ImagePayload::read_from(&path)
                        .with_context(|| format!("signature image {}", path.display()))?,
                )
            }
            None => None,
        };

        let reason = self.validation_reason.unwrap_or_else(|| {
            if self.is_amount_consistent {
                "Amounts are consistent.".to_string()
            } else {
                "Amounts do not match.".to_string()
            }
        });
        let amount_check = if self.is_amount_consistent {
            Verdict::pass(reason)
        } else {
            Verdict::fail(reason)
        };

        Ok(Extraction {
            fields: ExtractedFields {
                payee: self.payee,
                amount: self.amount,
                amount_in_words: self.amount_in_words,
                date_raw: self.date,
                account_number,
                signature_region,
                metadata: Default::default(),
            },
            amount_check,
        })
    }
}

/// Run one case and print the outcome.
pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let image = ImagePayload::read_from(&args.image)
        .with_context(|| format!("cheque image {}", args.image.display()))?;

    let base_dir = args.base_dir.clone().unwrap_or_else(|| {
        args.directory
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let directory = InMemoryPayerDirectory::load(&args.directory, &base_dir)
        .with_context(|| format!("payer directory {}", args.directory.display()))?;

    let fixture_text = std::fs::read_to_string(&args.fields)
        .with_context(|| format!("extraction fixture {}", args.fields.display()))?;
    let fixture: ExtractionFixture = serde_json::from_str(&fixture_text)
        .with_context(|| format!("extraction fixture {}", args.fields.display()))?;
    let extraction = fixture.into_extraction(&base_dir)?;

    let suite = EnrichmentSuite {
        readability: Arc::new(MockReadability::approving()),
        extractor: Arc::new(ScriptedExtractor::new(extraction)),
        tampering: Arc::new(MockTampering::clean()),
        behavior: Arc::new(MockBehavior::normal()),
        signatures: Arc::new(MockSignatures::matching()),
        accounts: Arc::new(SubstringAccountValidator::default()),
    };

    let mut orchestrator =
        CaseOrchestrator::new(suite, Arc::new(directory), Box::new(PlainTextFormatter));
    if let Some(reference) = args.reference_date {
        orchestrator = orchestrator.with_reference_date(reference);
    }

    let outcome = orchestrator.run(image);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &CaseOutcome) {
    println!("{}", "=".repeat(50));
    println!("           FINAL CHEQUE PROCESSING OUTCOME");
    println!("{}", "=".repeat(50));
    println!("Case: {}", outcome.case_id);
    println!("Final Decision: {}", outcome.decision);
    println!("Feedback: {:?}", outcome.feedback);
    println!();
    println!("--- Audit Summary ---");
    println!("{}", outcome.audit_summary);
    println!("{}", "=".repeat(50));
}
