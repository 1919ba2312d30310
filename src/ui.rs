//! Terminal output: one result line per item, one per git step, and a final
//! summary.
//!
//! Log records from `tracing` go to stderr as they happen.  The lines printed
//! here are the condensed view: a ✓/–/✗ icon, the item or step label, and a
//! short description.  Failures are repeated in the summary so they are not
//! lost among the git output.

use console::style;

use crate::reconcile::{ItemOutcome, LinkState};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Green ✓  — the item or step succeeded.
fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
/// Yellow – — nothing to do, or nothing could be done.
fn icon_idle() -> console::StyledObject<&'static str> {
    style("–").yellow().bold()
}
/// Red ✗    — something failed.
fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
/// Cyan ✓   — printed next to the final success summary.
fn icon_done() -> console::StyledObject<&'static str> {
    style("✓").cyan().bold()
}

// ─── Git step result ──────────────────────────────────────────────────────────

/// The outcome of a single git step.
///
/// Git's own output is not captured (it goes straight to the terminal), so
/// only the error message is kept.
#[derive(Debug)]
pub struct StepOutcome {
    /// Human-readable step label, e.g. `"git commit"`.
    pub label: String,
    /// Whether the step completed without error.
    pub success: bool,
    /// The error message, if any.
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn ok(label: &str) -> Self {
        Self {
            label: label.to_string(),
            success: true,
            error: None,
        }
    }

    pub fn failed_with(label: &str, error: String) -> Self {
        Self {
            label: label.to_string(),
            success: false,
            error: Some(error),
        }
    }

    /// Print the one-line summary (✓/✗ + label) to stdout.
    pub fn print(&self) {
        println!("{}", self.line());
        if let Some(ref msg) = self.error {
            eprintln!("     {} {}", style("Error:").red().bold(), msg);
        }
    }

    fn line(&self) -> String {
        let icon = if self.success { icon_ok() } else { icon_err() };
        format!("  {}  {}", icon, style(&self.label).bold())
    }

    /// Returns `true` if the step did not succeed.
    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Items ────────────────────────────────────────────────────────────────────

/// The one-line rendering of an item, without a trailing newline.
pub fn item_line(outcome: &ItemOutcome) -> String {
    let icon = if outcome.failed() {
        icon_err()
    } else if outcome.link == LinkState::NoBackup {
        icon_idle()
    } else {
        icon_ok()
    };
    format!(
        "  {}  {}  {}",
        icon,
        style(&outcome.item).bold(),
        style(outcome.describe()).dim()
    )
}

/// Print an item's result line, followed by its errors.
pub fn print_item(outcome: &ItemOutcome) {
    println!("{}", item_line(outcome));
    for err in &outcome.errors {
        eprintln!("     {} {}", style("Error:").red().bold(), err);
    }
}

// ─── Summary banner ───────────────────────────────────────────────────────────

/// The summary lines, and whether anything failed.
pub fn summary_lines(items: &[ItemOutcome], steps: &[StepOutcome]) -> (Vec<String>, bool) {
    let failed_items: Vec<&ItemOutcome> = items.iter().filter(|o| o.failed()).collect();
    let failed_steps: Vec<&StepOutcome> = steps.iter().filter(|o| o.failed()).collect();

    if failed_items.is_empty() && failed_steps.is_empty() {
        let done = style(format!("{} item(s) processed.", items.len()))
            .cyan()
            .bold();
        return (vec![format!("  {} {}", icon_done(), done)], false);
    }

    let mut lines = vec![format!(
        "  {}  {}",
        icon_err(),
        style("Finished with errors.").red().bold()
    )];
    for o in &failed_items {
        lines.push(format!("    {} {}", icon_err(), style(&o.item).red()));
    }
    for o in &failed_steps {
        lines.push(format!("    {} {}", icon_err(), style(&o.label).red()));
    }
    (lines, true)
}

/// Print the final summary after every item and git step has run.  Failures
/// go to stderr.
pub fn print_summary(items: &[ItemOutcome], steps: &[StepOutcome]) {
    let (lines, failed) = summary_lines(items, steps);
    println!();
    for line in &lines {
        if failed {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
    println!();
}

// ─── Tests ────────────────────────────────────────────────────────────────────
