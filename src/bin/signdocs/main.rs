use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use signdocs::flow::InputFlow;
use signdocs::{driver, Address, RecoverFlow, SignFlow, Terminal, Verifier, VerifyFlow};

mod output;
mod terminal;

use output::{print_error, print_info, print_success};
use terminal::StdioTerminal;

#[derive(Parser)]
#[command(name = "signdocs")]
#[command(about = "ECDSA signature tool for documents")]
#[command(version)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "SIGNDOCS_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a file
    Sign(SignArgs),
    /// Recover an address from a signature and hash
    Recover,
    /// Recover the signer and optionally compare it with an expected address
    Verify(VerifyArgs),
    /// Check a signature envelope against a document
    Check(CheckArgs),
}

#[derive(Args)]
struct SignArgs {
    /// Document to sign
    file: PathBuf,
    /// Write the envelope to this file instead of printing it
    #[arg(short = 'f', long = "file")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Address the signature is expected to recover to
    #[arg(long)]
    expect: Option<Address>,
}

#[derive(Args)]
struct CheckArgs {
    /// Signed document
    file: PathBuf,
    /// Envelope produced by `signdocs sign`
    envelope: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "signdocs=debug"
    } else if cli.verbose {
        "signdocs=info"
    } else {
        "signdocs=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut terminal = StdioTerminal;
    let result = match cli.command {
        Commands::Sign(args) => sign(args, &mut terminal),
        Commands::Recover => recover(&mut terminal),
        Commands::Verify(args) => verify(args, &mut terminal),
        Commands::Check(args) => check(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn sign(args: SignArgs, terminal: &mut impl Terminal) -> Result<()> {
    let data = fs::read(&args.file)
        .with_context(|| format!("Failed to read file {}", args.file.display()))?;
    let name = file_name(&args.file);
    debug!(file = %name, bytes = data.len(), "file loaded");

    let flow = driver::run(InputFlow::new(SignFlow::for_bytes(name, &data)), terminal)?;
    let Some(envelope) = flow.into_stage().into_envelope() else {
        print_info("Cancelled, nothing was signed");
        return Ok(());
    };

    match args.output {
        Some(path) => {
            envelope
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(format!("Envelope written to {}", path.display()));
        }
        None => println!("{}", envelope.to_json()?),
    }
    Ok(())
}

fn recover(terminal: &mut impl Terminal) -> Result<()> {
    driver::run(InputFlow::new(RecoverFlow::new()), terminal)?;
    Ok(())
}

fn verify(args: VerifyArgs, terminal: &mut impl Terminal) -> Result<()> {
    let stage = match args.expect {
        Some(expected) => VerifyFlow::expecting(expected),
        None => VerifyFlow::new(),
    };
    let flow = driver::run(InputFlow::new(stage), terminal)?;
    if flow.stage().matches() == Some(false) {
        anyhow::bail!("Signature was not produced by the expected signer");
    }
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let result = Verifier::verify_file(&args.file, &args.envelope)
        .with_context(|| format!("Failed to check {}", args.file.display()))?
        .into_result()?;
    print_success(format!(
        "{} was signed by {}",
        args.file.display(),
        result.recovered
    ));
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
