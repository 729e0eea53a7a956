//! Report command handler
//!
//! Opens one session, writes the selector if one was given, and copies the
//! report to the output.

use anyhow::{Context, Result};
use std::io::Write;
use structinfo::{Inspector, ProcessDirectory, REPORT_CAPACITY};

/// Print the report for `selector` (or for the current selector when `None`)
pub fn report<D, W>(inspector: &Inspector<D>, selector: Option<&str>, out: &mut W) -> Result<()>
where
    D: ProcessDirectory,
    W: Write,
{
    let mut session = inspector.open();

    if let Some(selector) = selector {
        session
            .write(selector.as_bytes())
            .with_context(|| format!("Failed to select \"{selector}\""))?;
    }

    session
        .read_to(REPORT_CAPACITY, out)
        .context("Failed to read report")?;
    session.close();

    out.flush().context("Failed to flush output")?;
    Ok(())
}
