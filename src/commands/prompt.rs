use std::io::{BufRead, Write};

use tracing::warn;

/// Asks the user a yes/no question
pub trait Prompt: Send {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Reads answers from stdin
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        confirm_with(std::io::stdin().lock(), std::io::stdout(), message).unwrap_or_else(|e| {
            warn!("Failed to read confirmation: {}", e);
            false
        })
    }
}

/// Answers yes to everything (`--force`)
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// `y` or an empty line means yes, `n` means no, anything else asks again.
/// End of input counts as no.
pub fn confirm_with<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    message: &str,
) -> std::io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(output, "{}", message)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "" => return Ok(true),
            "n" => return Ok(false),
            _ => {}
        }
    }
}
