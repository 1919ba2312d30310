//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and then
//! passed (by reference) into the command handlers.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "gotfiles",
    about   = "Move dotfiles into a git repository and symlink them back into place",
    version,
    override_usage = "gotfiles [OPTIONS] <init|sync>",
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Path to the configuration file.
    ///
    /// Defaults to `config.json` in the current working directory, which is
    /// also the repository root.
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Subcommand>,

    /// Print the parsed configuration and exit without running anything.
    #[arg(long)]
    pub print_config: bool,

    /// Commit but do not push.
    #[arg(long)]
    pub no_push: bool,

    /// Skip `git add`, `git commit` and `git push` entirely.
    ///
    /// Only the home directory and `dotfiles/` are touched.
    #[arg(long, conflicts_with = "no_push")]
    pub no_git: bool,

    /// Increase log verbosity (`-v` info, `-vv` debug, `-vvv` trace).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Explicit subcommands.
#[derive(clap::Subcommand, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Subcommand {
    /// Create `dotfiles/` if needed, move every tracked item into it, link
    /// the originals back, then commit and push.
    Init,

    /// Like `init`, but requires `dotfiles/` to exist already.
    ///
    /// Use it on a machine that cloned the repository to restore the links,
    /// or to pick up items added to `config.json` since the last run.
    Sync,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gotfiles").chain(extra.iter().copied()))
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&["init"]).unwrap();
        assert_eq!(cli.command, Some(Subcommand::Init));
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.no_push && !cli.no_git && !cli.print_config);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn subcommand_is_optional_at_parse_time() {
        assert_eq!(parse(&[]).unwrap().command, None);
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(parse(&["backup"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv", "sync"]).unwrap().verbose, 2);
    }

    #[test]
    fn no_git_conflicts_with_no_push() {
        assert!(parse(&["--no-git", "--no-push", "sync"]).is_err());
    }

    #[test]
    fn usage_names_both_commands() {
        use clap::CommandFactory;
        let usage = Cli::command().render_usage().to_string();
        assert!(usage.contains("<init|sync>"), "got: {usage}");
    }
}
