//! Memory map report: a header, at most `limit` region lines, then `...`.

use super::ReportBuffer;
use crate::source::MemoryRegion;
use crate::Result;

/// Column width for every field of the table
pub const COLUMN_WIDTH: usize = 16;

/// Fixed last line of every memory map report
pub const TRAILER: &str = "...\n";

/// Protection values at or above this are not a page protection encoding
/// and are shown as 0
pub const PLAUSIBLE_PROTECTION_LIMIT: u64 = 32768;

/// Permission bits as they appear in the report
pub fn displayed_permission_bits(bits: u64) -> u64 {
    if bits >= PLAUSIBLE_PROTECTION_LIMIT {
        0
    } else {
        bits
    }
}

/// Write the table for `regions`, consuming at most `limit` of them.
/// Returns the number of region lines written.
pub fn write_memory_map<I>(buf: &mut ReportBuffer, regions: I, limit: usize) -> Result<usize>
where
    I: IntoIterator<Item = MemoryRegion>,
{
    const W: usize = COLUMN_WIDTH;

    buf.push_fmt(format_args!(
        "{:>W$} {:>W$} {:>W$} {:>W$} {:>W$}\n",
        "start", "end", "permissions", "flags", "offset"
    ))?;

    let mut listed = 0;
    for region in regions.into_iter().take(limit) {
        buf.push_fmt(format_args!(
            "{:>W$x} {:>W$x} {:>W$o} {:>W$} {:>W$}\n",
            region.start,
            region.end,
            displayed_permission_bits(region.permission_bits),
            region.flags,
            region.page_offset
        ))?;
        listed += 1;
    }

    buf.push_str(TRAILER)?;
    Ok(listed)
}
