//! Output formatting for CLI.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use anyhow::Result;
use serde::Serialize;

use crate::{Cli, OutputFormat};

/// Prints `data` as JSON or through the text renderer.
pub fn emit<T, F>(cli: &Cli, data: &T, render: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&TextFormatter) -> String,
{
    match cli.format {
        OutputFormat::Text => println!("{}", render(&TextFormatter::new(!cli.no_color))),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(data)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests;
