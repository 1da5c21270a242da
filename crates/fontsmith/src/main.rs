//! `fontsmith`: generate a bitmap font atlas from a font file.
//!
//! ```text
//! fontsmith DejaVuSans.ttf --height 32 --style outlined --value1 2 -o out/dejavu
//! ```

mod cli;
mod config;
mod error;

use std::error::Error as _;
use std::process::ExitCode;

use clap::Parser;
use fontsmith_core::{FontAtlasBuilder, SaveOutcome};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliResult;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

/// `-v` wins over `RUST_LOG`; without either, log at info.
fn init_logging(cli: &Cli) {
    let filter = match cli.log_level() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> CliResult<()> {
    let params = config::resolve_params(cli)?;
    let output = config::output_path(cli)?;

    let atlas = FontAtlasBuilder::new().generate_from_file(&cli.font, &params)?;
    println!("{}: {}", atlas.face_name(), atlas.stats());

    match atlas.save(&output)? {
        SaveOutcome::Saved { descriptor, pages } => {
            println!("wrote {}", descriptor.display());
            for page in pages {
                println!("wrote {}", page.display());
            }
        }
        SaveOutcome::NothingToSave => println!("no glyphs generated, nothing written"),
    }
    Ok(())
}
