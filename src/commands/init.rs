//! `gotfiles init` — create `dotfiles/` (or reuse it) and migrate every
//! tracked item into it.

use anyhow::Result;

use super::{Workspace, run_pipeline};
use crate::{
    cli::Cli,
    config::Config,
    copy::{DEFAULT_DIR_MODE, create_dirs},
    error::Error,
    reconcile::RunMode,
};

pub fn run(cli: &Cli, cfg: &Config, ws: &Workspace) -> Result<()> {
    create_dirs(&ws.dotfiles, DEFAULT_DIR_MODE).map_err(|source| Error::RepoCreate {
        path: ws.dotfiles.clone(),
        source,
    })?;

    run_pipeline(cli, cfg, ws, RunMode::Init);
    Ok(())
}
