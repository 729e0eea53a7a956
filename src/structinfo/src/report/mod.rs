//! Report Generator
//!
//! Resolves the selected process and renders one of the two report views
//! into a buffer capped at [`REPORT_CAPACITY`] bytes.

mod buffer;
mod memory_map;
mod registers;

pub use buffer::ReportBuffer;
pub use memory_map::{
    displayed_permission_bits, write_memory_map, PLAUSIBLE_PROTECTION_LIMIT, TRAILER,
};
pub use registers::write_registers;

use crate::source::ProcessDirectory;
use crate::{Error, Result, Selector, View, DEFAULT_REGION_LIMIT, REPORT_CAPACITY};
use serde::Deserialize;

/// Tunables for report generation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Memory regions listed before the trailer
    pub region_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            region_limit: DEFAULT_REGION_LIMIT,
        }
    }
}

/// Text reported when the selected process does not exist
pub fn missing_process_report(pid: crate::Pid) -> String {
    format!("no such process with pid {pid}\n")
}

/// Generate the report for `selector`.
///
/// A missing process is not an error: the report is the diagnostic line from
/// [`missing_process_report`].
pub fn generate<D>(directory: &D, selector: Selector, options: &Options) -> Result<Vec<u8>>
where
    D: ProcessDirectory + ?Sized,
{
    let mut buf = ReportBuffer::new(REPORT_CAPACITY);

    let task = match directory.lookup(selector.target_pid) {
        Ok(task) => task,
        Err(Error::ProcessNotFound(pid)) => {
            tracing::debug!(pid, "selected process not found");
            buf.push_str(&missing_process_report(pid))?;
            return Ok(buf.into_bytes());
        }
        Err(err) => return Err(err),
    };

    match selector.view() {
        View::RegisterContext => {
            let ctx = task.registers()?;
            write_registers(&mut buf, &ctx)?;
        }
        View::MemoryMap => {
            let listed = write_memory_map(&mut buf, task.regions()?, options.region_limit)?;
            tracing::debug!(pid = task.pid(), listed, "listed memory regions");
        }
    }

    Ok(buf.into_bytes())
}
