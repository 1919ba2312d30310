//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File       | Invocation       | Description                                |
//! |------------|------------------|--------------------------------------------|
//! | `init.rs`  | `gotfiles init`  | Create `dotfiles/`, migrate, link, push    |
//! | `sync.rs`  | `gotfiles sync`  | Same, against an existing `dotfiles/`      |
//!
//! Both share [`Workspace`] and [`run_pipeline`]; they differ only in how
//! they treat a missing `dotfiles/` and in their wording.

pub mod init;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{
    cli::Cli,
    config::Config,
    error::Error,
    git,
    reconcile::{ItemOutcome, RunMode, process_path},
    ui::{StepOutcome, print_item, print_summary},
};

/// Name of the directory inside the repository that holds the backups.
pub const DOTFILES_DIR: &str = "dotfiles";

/// The three directories a run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Home directory the tracked items are relative to.
    pub home: PathBuf,
    /// Repository root: the current directory.  Git runs here.
    pub root: PathBuf,
    /// `<root>/dotfiles`, where the backups live.
    pub dotfiles: PathBuf,
}

impl Workspace {
    pub fn new(home: PathBuf, root: PathBuf) -> Self {
        let dotfiles = root.join(DOTFILES_DIR);
        Self {
            home,
            root,
            dotfiles,
        }
    }

    /// Resolve the home directory and use the current directory as root.
    pub fn resolve() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeDirUnresolved)?;
        let root = std::env::current_dir().context("reading the current directory")?;
        Ok(Self::new(home, root))
    }
}

/// Reconcile every configured item in order, then run the git sequence.
///
/// Per-item and git failures are reported but never returned as errors.
pub fn run_pipeline(cli: &Cli, cfg: &Config, ws: &Workspace, mode: RunMode) -> Vec<ItemOutcome> {
    tracing::info!(
        home = %ws.home.display(),
        dotfiles = %ws.dotfiles.display(),
        "processing {} item(s)",
        cfg.dotfiles.len()
    );
    println!();

    let items: Vec<ItemOutcome> = cfg
        .dotfiles
        .iter()
        .map(|item| {
            let outcome = process_path(item, &ws.home, &ws.dotfiles, mode);
            print_item(&outcome);
            outcome
        })
        .collect();

    let steps: Vec<StepOutcome> = if cli.no_git {
        tracing::info!("--no-git: skipping git steps");
        Vec::new()
    } else {
        println!();
        let outcomes = git::run_steps(&ws.root, &git::steps(mode.commit_message(), !cli.no_push));
        for o in &outcomes {
            o.print();
        }
        outcomes
    };

    print_summary(&items, &steps);
    items
}
