//! `gotfiles sync` — reconcile against an existing `dotfiles/`.

use anyhow::Result;

use super::{Workspace, run_pipeline};
use crate::{cli::Cli, config::Config, error::Error, reconcile::RunMode};

/// Fails before touching the filesystem when `dotfiles/` does not exist.
pub fn run(cli: &Cli, cfg: &Config, ws: &Workspace) -> Result<()> {
    if !ws.dotfiles.exists() {
        return Err(Error::RepoMissing {
            path: ws.dotfiles.clone(),
        }
        .into());
    }

    run_pipeline(cli, cfg, ws, RunMode::Sync);
    Ok(())
}
