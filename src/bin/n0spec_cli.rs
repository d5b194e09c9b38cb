//! n0spec CLI - Spec0 -> Spec1
//!
//! Reads one Spec0 document and prints the expanded Spec1 document to stdout.
//! Returns 2 on structural validation failure, 1 on any other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use n0spec_core::{compile_file, fingerprint, Spec1Document, TransformError, TransformOptions};

#[derive(Parser)]
#[command(name = "n0spec-cli")]
#[command(about = "n0spec CLI - expand a Spec0 document into Spec1")]
#[command(version)]
struct Cli {
    /// Spec0 document (YAML or JSON)
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Skip the structural check before expansion
    #[arg(long)]
    no_check: bool,

    /// Print the SHA-256 fingerprint of the output to stderr
    #[arg(long)]
    digest: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn render(doc: &Spec1Document, format: Format) -> Result<String, TransformError> {
    Ok(match format {
        Format::Yaml => doc.to_yaml()?,
        Format::Json => doc.to_json()?,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = TransformOptions::new().with_structure_check(!cli.no_check);

    let result = compile_file(&cli.file, &options).and_then(|spec1| {
        let output = render(&spec1, cli.format)?;
        let digest = if cli.digest {
            Some(fingerprint(&spec1)?)
        } else {
            None
        };
        Ok((output, digest))
    });

    match result {
        Ok((output, digest)) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            if let Some(digest) = digest {
                eprintln!("sha256:{}", digest);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(file = %cli.file.display(), "transform failed");
            eprintln!("Error: {}", e);
            if e.is_structural() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
