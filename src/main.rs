//! # joplin-zola CLI (`jz`)
//!
//! ## Usage
//!
//! ```bash
//! jz --config ./jz.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `jz run` | Convert every note, copy images, delete the export |
//! | `jz run --dry-run` | Parse everything and check images, write nothing |
//! | `jz check` | Show whether the configured directories exist |
//! | `jz convert <file>` | Print one converted note to stdout |
//!
//! Set `RUST_LOG=debug` to log every file written.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use joplin_zola::progress::ProgressMode;
use joplin_zola::transcode::{self, RunOptions};
use joplin_zola::{check, config};

/// Convert a Joplin markdown export into Zola content.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file describing the export and site directories.
#[derive(Parser)]
#[command(
    name = "jz",
    about = "Convert a Joplin markdown export into Zola content",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./jz.toml")]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` on a terminal, `off` otherwise.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the whole export.
    ///
    /// Writes every note into the content tree, copies referenced images,
    /// then deletes the export root. Stops at the first error; anything
    /// already written stays in place.
    Run {
        /// Parse every note and check referenced images without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Do not delete the export root after a successful run.
        #[arg(long)]
        keep_source: bool,
    },

    /// Show whether the configured directories exist.
    Check,

    /// Convert a single note and print the result to stdout.
    Convert {
        /// Path to a Joplin markdown note.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match try_main(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Run {
            dry_run,
            keep_source,
        } => {
            let mode = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
            let reporter = mode.reporter();
            transcode::run(
                &cfg,
                RunOptions {
                    dry_run,
                    keep_source,
                },
                reporter.as_ref(),
            )
        }
        Commands::Check => check::print_layout(&cfg),
        Commands::Convert { file } => {
            transcode::convert_file(&cfg, &file).map(|page| print!("{}", page))
        }
    }
}
