//! `gotfiles` — keep dotfiles in a git repository, symlinked back into home.
//!
//! # Overview
//!
//! Run from the root of a git repository that contains a `config.json`
//! listing paths relative to the home directory.  Each listed item is moved
//! into `./dotfiles/<item>` and replaced by a symlink to that copy, then the
//! repository is committed and pushed.
//!
//! # Usage
//!
//! ```text
//! gotfiles init            # create dotfiles/, migrate and link, commit, push
//! gotfiles sync            # same, but dotfiles/ must already exist
//! gotfiles --no-push sync  # commit without pushing
//! gotfiles --print-config  # show parsed config without running anything
//! ```
//!
//! # Module layout
//!
//! | Module                   | Responsibility                              |
//! |--------------------------|---------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap               |
//! | [`config`]               | `Config` struct + JSON loader               |
//! | [`error`]                | Fatal and per-item error types              |
//! | [`copy`]                 | Recursive copy into the repository          |
//! | [`reconcile`]            | Per-item backup / skip / symlink logic      |
//! | [`git`]                  | `git add` / `commit` / `push`               |
//! | [`ui`]                   | Result lines and summary                    |
//! | [`commands::init`]       | `gotfiles init` subcommand                  |
//! | [`commands::sync`]       | `gotfiles sync` subcommand                  |

mod cli;
mod commands;
mod config;
mod copy;
mod error;
mod git;
mod reconcile;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Subcommand};
use commands::Workspace;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    // Without a subcommand there is nothing to run, unless only the config
    // should be printed.
    if cli.command.is_none() && !cli.print_config {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    }

    let cfg = config::load_config(&cli.config)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let ws = Workspace::resolve()?;

    match cli.command {
        // ── gotfiles init ─────────────────────────────────────────────────────
        Some(Subcommand::Init) => commands::init::run(&cli, &cfg, &ws)?,

        // ── gotfiles sync ─────────────────────────────────────────────────────
        Some(Subcommand::Sync) => commands::sync::run(&cli, &cfg, &ws)?,

        None => {},
    }

    Ok(())
}

/// Parse arguments, exiting with status 1 on any usage error.
///
/// clap's default for usage errors is status 2; `--help` and `--version`
/// still exit 0.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        },
        Err(e) => e.exit(),
    }
}

/// Log to stderr.  Defaults to warnings and errors; `-v` adds detail and
/// `RUST_LOG` overrides both.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

/// Filter used when `RUST_LOG` is unset.
const fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
