//! Register context report: seven `label value` lines, values in hex.

use super::ReportBuffer;
use crate::source::RegisterContext;
use crate::Result;

/// Width the labels are right-aligned to
pub const LABEL_WIDTH: usize = 16;

pub fn write_registers(buf: &mut ReportBuffer, ctx: &RegisterContext) -> Result<()> {
    let fields: [(&str, u64); 7] = [
        ("stack pointer:", ctx.stack_pointer),
        ("es:", ctx.es.into()),
        ("ds:", ctx.ds.into()),
        ("fsindex:", ctx.fs_index.into()),
        ("gsindex:", ctx.gs_index.into()),
        ("fsbase:", ctx.fs_base),
        ("gsbase:", ctx.gs_base),
    ];

    for (label, value) in fields {
        buf.push_fmt(format_args!("{label:>LABEL_WIDTH$} {value:x}\n"))?;
    }
    Ok(())
}
