//! Integration tests for the `gotfiles` binary.
//!
//! These tests spawn the compiled binary with an isolated `HOME` and working
//! directory and assert on exit codes, output, and the resulting filesystem.
//! Most runs pass `--no-git`; the one that does not points git at a
//! directory that is not a repository, so every git step fails harmlessly.
//!
//! # Running
//!
//! ```sh
//! cargo test --test integration
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

/// Absolute path to the compiled `gotfiles` binary, resolved at compile time
/// by Cargo.
const BIN: &str = env!("CARGO_BIN_EXE_gotfiles");

// ─── Fixture ──────────────────────────────────────────────────────────────────

/// A fake home directory next to a repository working directory.
struct Fixture {
    root: tempfile::TempDir,
    home: PathBuf,
    work: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let home = root.path().join("home");
        let work = root.path().join("work");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&work).unwrap();
        Self { root, home, work }
    }

    /// Write `config.json` tracking `items`.
    fn track(&self, items: &[&str]) -> &Self {
        let cfg = serde_json::json!({ "dotfiles": items });
        fs::write(self.work.join("config.json"), cfg.to_string()).unwrap();
        self
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(BIN)
            .args(args)
            .current_dir(&self.work)
            .env("HOME", &self.home)
            .env("GIT_CEILING_DIRECTORIES", self.root.path())
            .env("GIT_TERMINAL_PROMPT", "0")
            .env_remove("RUST_LOG")
            .output()
            .unwrap_or_else(|e| panic!("failed to spawn {BIN}: {e}"))
    }

    fn dotfiles(&self) -> PathBuf {
        self.work.join("dotfiles")
    }

    fn is_symlink(&self, item: &str) -> bool {
        fs::symlink_metadata(self.home.join(item))
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

// ─── --help / --version / usage ───────────────────────────────────────────────

#[test]
fn help_exits_zero() {
    let fx = Fixture::new();
    let out = fx.run(&["--help"]);
    assert!(out.status.success(), "gotfiles --help should exit 0");
    assert!(stdout(&out).contains("gotfiles"));
}

#[test]
fn version_exits_zero() {
    let fx = Fixture::new();
    let out = fx.run(&["--version"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("0.1.0"));
}

#[test]
fn no_subcommand_prints_usage_and_exits_one() {
    let fx = Fixture::new();
    fx.track(&[".vimrc"]);
    let out = fx.run(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr(&out).contains("init|sync"),
        "usage should name the commands; got: {}",
        stderr(&out)
    );
}

#[test]
fn unknown_subcommand_exits_one() {
    let fx = Fixture::new();
    fx.track(&[]);
    let out = fx.run(&["backup"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unknown_flag_exits_nonzero() {
    let fx = Fixture::new();
    assert!(!fx.run(&["--this-flag-does-not-exist"]).status.success());
}

// ─── config loading ───────────────────────────────────────────────────────────

#[test]
fn missing_config_is_fatal() {
    let fx = Fixture::new();
    let out = fx.run(&["--no-git", "init"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("config.json"));
    assert!(!fx.dotfiles().exists(), "nothing should be created");
}

#[test]
fn malformed_config_is_fatal() {
    let fx = Fixture::new();
    fs::write(fx.work.join("config.json"), "{ not json").unwrap();
    let out = fx.run(&["--no-git", "init"]);
    assert!(!out.status.success());
    assert!(!fx.dotfiles().exists());
}

#[test]
fn parent_dir_entry_is_fatal() {
    let fx = Fixture::new();
    fx.track(&["../outside"]);
    let out = fx.run(&["--no-git", "init"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("../outside"));
}

#[test]
fn config_flag_reads_specified_file() {
    let fx = Fixture::new();
    fs::write(
        fx.work.join("other.json"),
        r#"{"dotfiles": [".custom-item"]}"#,
    )
    .unwrap();
    let out = fx.run(&["--config", "other.json", "--print-config"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains(".custom-item"));
}

#[test]
fn print_config_does_not_touch_anything() {
    let fx = Fixture::new();
    fx.track(&[".vimrc"]);
    write(&fx.home.join(".vimrc"), "set nu");

    let out = fx.run(&["--print-config"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains(".vimrc"));
    assert!(!fx.is_symlink(".vimrc"));
    assert!(!fx.dotfiles().exists());
}

// ─── init ─────────────────────────────────────────────────────────────────────

#[test]
fn init_moves_file_and_links_it() {
    let fx = Fixture::new();
    fx.track(&[".vimrc"]);
    write(&fx.home.join(".vimrc"), "set number\n");

    let out = fx.run(&["--no-git", "init"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let backup = fx.dotfiles().join(".vimrc");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "set number\n");
    assert!(fx.is_symlink(".vimrc"));
    assert_eq!(fs::read_link(fx.home.join(".vimrc")).unwrap(), backup);
}

#[test]
fn init_moves_directory_tree() {
    let fx = Fixture::new();
    fx.track(&[".config/nvim"]);
    write(&fx.home.join(".config/nvim/init.lua"), "-- init");
    write(&fx.home.join(".config/nvim/lua/keys.lua"), "-- keys");

    let out = fx.run(&["--no-git", "init"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let copy = fx.dotfiles().join(".config/nvim");
    assert_eq!(fs::read_to_string(copy.join("init.lua")).unwrap(), "-- init");
    assert_eq!(
        fs::read_to_string(copy.join("lua/keys.lua")).unwrap(),
        "-- keys"
    );
    assert!(fx.is_symlink(".config/nvim"), "original tree should be replaced");
    // Only the tracked directory is replaced, not its parent.
    assert!(fx.home.join(".config").is_dir());
}

#[test]
fn init_twice_copies_nothing_the_second_time() {
    let fx = Fixture::new();
    fx.track(&[".gitconfig"]);
    write(&fx.home.join(".gitconfig"), "[user]");

    assert!(fx.run(&["--no-git", "init"]).status.success());
    // A second copy would clobber this edit.
    fs::write(fx.dotfiles().join(".gitconfig"), "[user]\n\tname = x").unwrap();

    let out = fx.run(&["--no-git", "init"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("already a symlink"));
    assert_eq!(
        fs::read_to_string(fx.dotfiles().join(".gitconfig")).unwrap(),
        "[user]\n\tname = x"
    );
}

#[test]
fn init_continues_past_missing_items() {
    let fx = Fixture::new();
    fx.track(&[".missing", ".bashrc"]);
    write(&fx.home.join(".bashrc"), "alias ll='ls -l'");

    let out = fx.run(&["--no-git", "init"]);
    assert!(out.status.success());
    assert!(fs::symlink_metadata(fx.home.join(".missing")).is_err());
    assert!(!fx.dotfiles().join(".missing").exists());
    assert!(fx.is_symlink(".bashrc"));
}

#[test]
fn git_failures_do_not_change_exit_status() {
    let fx = Fixture::new();
    fx.track(&[".vimrc"]);
    write(&fx.home.join(".vimrc"), "set nu");

    // `work` is not a git repository, so every git step fails.
    let out = fx.run(&["init"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert!(fx.is_symlink(".vimrc"));
    assert!(stderr(&out).contains("git add"));
}

// ─── sync ─────────────────────────────────────────────────────────────────────

#[test]
fn sync_without_init_fails_and_changes_nothing() {
    let fx = Fixture::new();
    fx.track(&[".vimrc"]);
    write(&fx.home.join(".vimrc"), "set nu");

    let out = fx.run(&["--no-git", "sync"]);
    assert!(!out.status.success());
    assert!(
        stderr(&out).contains("Run 'gotfiles init' first"),
        "got: {}",
        stderr(&out)
    );
    assert!(!fx.dotfiles().exists());
    assert!(!fx.is_symlink(".vimrc"));
    assert_eq!(fs::read_to_string(fx.home.join(".vimrc")).unwrap(), "set nu");
}

#[test]
fn sync_links_items_from_an_existing_backup() {
    let fx = Fixture::new();
    fx.track(&[".zshrc", ".config/fish"]);
    write(&fx.dotfiles().join(".zshrc"), "export EDITOR=vim");
    write(&fx.dotfiles().join(".config/fish/config.fish"), "set -g x 1");

    let out = fx.run(&["--no-git", "sync"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    assert!(fx.is_symlink(".zshrc"));
    assert!(fx.is_symlink(".config/fish"));
    assert_eq!(
        fs::read_to_string(fx.home.join(".config/fish/config.fish")).unwrap(),
        "set -g x 1"
    );
}

#[test]
fn sync_picks_up_newly_tracked_files() {
    let fx = Fixture::new();
    fx.track(&[".tmux.conf"]);
    fs::create_dir(fx.dotfiles()).unwrap();
    write(&fx.home.join(".tmux.conf"), "set -g mouse on");

    let out = fx.run(&["--no-git", "sync"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("updated file"));
    assert!(fx.is_symlink(".tmux.conf"));
}
