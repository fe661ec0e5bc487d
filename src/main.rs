//! Codex Merkle root CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use codex_merkle::{
    commit, run_config, CodexFile, DocumentSource, EpochId, HashAlgorithm, TracingReporter,
    VerificationReport, VerifierConfig,
};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codex-merkle")]
#[command(about = "Merkle commitments over a codex of laws", long_about = None)]
struct Cli {
    /// Hash function for leaves and nodes (keccak256, sha3-256, blake2s256)
    #[arg(short, long, global = true)]
    algorithm: Option<HashAlgorithm>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Merkle root of a codex
    Root {
        /// Codex file
        codex: PathBuf,

        /// Also print every leaf
        #[arg(long)]
        leaves: bool,
    },

    /// Verify a codex against a published root
    Verify {
        /// Codex file (ignored when --config is given)
        codex: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Published root to compare against
        #[arg(short, long)]
        expected_root: Option<String>,

        /// Epoch the attestation is issued for
        #[arg(long)]
        epoch: Option<String>,

        /// Transaction expected to carry the root (repeatable)
        #[arg(long = "tx")]
        tx_ids: Vec<String>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(
    codex: Option<PathBuf>,
    config: Option<PathBuf>,
    expected_root: Option<String>,
    epoch: Option<String>,
    tx_ids: Vec<String>,
) -> Result<VerifierConfig> {
    let mut verifier_config = match config {
        Some(path) => VerifierConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let Some(codex) = codex else {
                bail!("either a codex file or --config is required");
            };
            let Some(expected_root) = expected_root.clone() else {
                bail!("--expected-root is required without --config");
            };
            let Some(epoch) = epoch.clone() else {
                bail!("--epoch is required without --config");
            };
            VerifierConfig::new(codex, expected_root, EpochId::new(epoch))
        }
    };
    if let Some(expected_root) = expected_root {
        verifier_config.expected_root = expected_root;
    }
    if let Some(epoch) = epoch {
        verifier_config.epoch_id = EpochId::new(epoch);
    }
    verifier_config.ledger_tx_ids.extend(tx_ids);
    Ok(verifier_config)
}

fn print_report(report: &VerificationReport) {
    println!("Computed Merkle Root: {}", report.computed_root);
    println!("Expected Root:        {}", report.expected_root);
    println!("Leaves:               {}", report.leaf_count);
    println!("Root Match:           {}", report.matches);
    for (tx_id, corroboration) in &report.corroborations {
        println!("Tx {tx_id}: {corroboration}");
    }
    println!(
        "Attestation:          {} (epoch {})",
        if report.attestation.attested { "ATTESTED" } else { "NOT ATTESTED" },
        report.attestation.epoch
    );
}

fn execute(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Root { codex, leaves } => {
            let documents = CodexFile::new(&codex).load_documents()?;
            let commitment = commit(cli.algorithm.unwrap_or_default(), &documents)?;
            if leaves {
                for (index, leaf) in commitment.leaves.iter().enumerate() {
                    println!("Leaf {index}: {leaf}");
                }
            }
            println!("Merkle Root: {}", commitment.root);
            Ok(true)
        }

        Commands::Verify {
            codex,
            config,
            expected_root,
            epoch,
            tx_ids,
        } => {
            let mut verifier_config = build_config(codex, config, expected_root, epoch, tx_ids)?;
            if let Some(algorithm) = cli.algorithm {
                verifier_config.hash_algorithm = algorithm;
            }
            let report = run_config(&verifier_config, &TracingReporter)?;
            print_report(&report);
            Ok(report.attestation.attested)
        }
    }
}

/// 0 when attested, 1 when not attested, 2 when the run aborted
fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = execute(cli);
    if let Err(e) = &outcome {
        eprintln!("error: {e:#}");
    }
    ExitCode::from(exit_status(&outcome))
}
