use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

/// Checksum of the default 3600-frame run.
const REFERENCE_CHECKSUM: &str = "620925302.216833";

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for tilesim")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, reference checksum, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run the frame-loop benchmark
    Bench,
    /// Run the default simulation in release mode and compare its checksum
    Reference,
    /// Build rustdoc for the workspace
    Doc,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            reference()?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => cargo(
            "frame-loop benchmark",
            &["bench", "-p", "tilesim-kernel", "--bench", "bench_frame_loop"],
        )?,
        Commands::Reference => reference()?,
        Commands::Doc => doc()?,
    }

    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("tests", &["test", "--workspace"])
}

fn doc() -> Result<()> {
    cargo("rustdoc", &["doc", "--workspace", "--no-deps"])
}

/// Run one cargo invocation, failing with `step` in the message.
fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}

fn reference() -> Result<()> {
    println!("==> reference run (expect {REFERENCE_CHECKSUM})");
    let output = Command::new("cargo")
        .args(["run", "--release", "-q", "-p", "tilesim-cli", "--", "run"])
        .output()?;
    if !output.status.success() {
        anyhow::bail!(
            "reference run failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let checksum = stdout.trim();
    if checksum != REFERENCE_CHECKSUM {
        anyhow::bail!("reference checksum mismatch: expected {REFERENCE_CHECKSUM}, got {checksum}");
    }
    println!("    checksum {checksum} OK");
    Ok(())
}
