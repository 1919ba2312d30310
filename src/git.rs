//! Git driver.
//!
//! Argument vectors are built by pure functions (so they can be tested
//! without a `git` binary) and executed by [`run_steps`].  Each step runs in
//! the repository root with stdout/stderr inherited, so git's own progress
//! and error output reach the terminal unchanged.
//!
//! A failing step is logged and recorded; the remaining steps still run.
//! `git commit` with nothing to commit exits non-zero, and `git push` still
//! pushes any earlier unpushed commits, so stopping early would only lose
//! work.

use std::{path::Path, process::Command};

use anyhow::{Context, Result, bail};

use crate::ui::StepOutcome;

/// The executable every step is run with.
pub const GIT: &str = "git";

/// One git invocation: a label for output plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStep {
    pub label: &'static str,
    pub args: Vec<String>,
}

// ─── Argument builders ────────────────────────────────────────────────────────

/// `git add .`
pub fn add_args() -> Vec<String> {
    vec!["add".into(), ".".into()]
}

/// `git commit -m <message>`
pub fn commit_args(message: &str) -> Vec<String> {
    vec!["commit".into(), "-m".into(), message.into()]
}

/// `git push`
pub fn push_args() -> Vec<String> {
    vec!["push".into()]
}

/// The full sequence run after reconciliation, in order.
pub fn steps(message: &str, push: bool) -> Vec<GitStep> {
    let mut steps = vec![
        GitStep {
            label: "git add",
            args: add_args(),
        },
        GitStep {
            label: "git commit",
            args: commit_args(message),
        },
    ];
    if push {
        steps.push(GitStep {
            label: "git push",
            args: push_args(),
        });
    }
    steps
}

// ─── Execution ────────────────────────────────────────────────────────────────

/// Run `program args…` in `dir`, inheriting stdout/stderr.
///
/// Fails if the process cannot be spawned or exits non-zero.
pub fn run_in(program: &str, dir: &Path, args: &[String]) -> Result<()> {
    tracing::debug!(dir = %dir.display(), "running {program} {}", args.join(" "));

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("failed to spawn {program}"))?;

    if !status.success() {
        bail!("{program} {} exited with {status}", args.join(" "));
    }
    Ok(())
}

/// Run every step with `program` in `dir`, one after another.
pub fn run_steps_with(program: &str, dir: &Path, steps: &[GitStep]) -> Vec<StepOutcome> {
    steps
        .iter()
        .map(|step| match run_in(program, dir, &step.args) {
            Ok(()) => StepOutcome::ok(step.label),
            Err(e) => {
                tracing::error!("error running {}: {e:#}", step.label);
                StepOutcome::failed_with(step.label, format!("{e:#}"))
            },
        })
        .collect()
}

/// Run every step with `git` in `dir`.
pub fn run_steps(dir: &Path, steps: &[GitStep]) -> Vec<StepOutcome> {
    run_steps_with(GIT, dir, steps)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
