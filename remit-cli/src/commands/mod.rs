//! CLI command implementations.

pub mod auth;
pub mod config;
pub mod device;
pub mod forex;
pub mod payments;
pub mod prefs;
pub mod wallets;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Reads one line from stdin after printing `prompt` to stderr.
pub(crate) fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Returns `value` or prompts for it.
pub(crate) fn value_or_prompt(value: Option<&String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value.clone()),
        None => prompt_line(prompt),
    }
}
