//! services/docvault/src/adapters/confirm.rs
//!
//! Implementations of the `Confirm` port used to gate destructive actions.

use docvault_core::ports::Confirm;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Prompts on stdout and reads a `y`/`yes` answer from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = io::stdout();
        if write!(stdout, "{} [y/N] ", prompt).and_then(|_| stdout.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut answer) {
            warn!("Could not read confirmation: {}", e);
            return false;
        }
        is_yes(&answer)
    }
}

/// Answers every prompt with a fixed decision, for non-interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
