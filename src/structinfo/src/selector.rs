//! Selector State
//!
//! The target process and report view chosen by the last successful write.

use crate::{Error, Pid, Result, DEFAULT_PID, REPORT_CAPACITY};
use std::fmt;

/// Report view, normalized from the raw integer written by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// Saved CPU context of the target
    RegisterContext,
    /// Virtual memory region layout of the target
    #[default]
    MemoryMap,
}

impl View {
    pub const REGISTER_CONTEXT: i32 = 0;
    pub const MEMORY_MAP: i32 = 1;

    /// Map a raw view code to a view. Unknown codes fall back to `MemoryMap`.
    pub fn from_raw(code: i32) -> Self {
        match code {
            Self::REGISTER_CONTEXT => View::RegisterContext,
            _ => View::MemoryMap,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            View::RegisterContext => Self::REGISTER_CONTEXT,
            View::MemoryMap => Self::MEMORY_MAP,
        }
    }
}

/// Target process and view, stored exactly as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    /// Raw view code; see [`Selector::view`] for the normalized form
    pub view: i32,
    pub target_pid: Pid,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            view: View::MEMORY_MAP,
            target_pid: DEFAULT_PID,
        }
    }
}

impl Selector {
    pub fn new(view: i32, target_pid: Pid) -> Self {
        Self { view, target_pid }
    }

    /// The view this selector resolves to
    pub fn view(&self) -> View {
        View::from_raw(self.view)
    }

    /// Parse `"<view> <pid>"`.
    ///
    /// Leading whitespace before each integer is skipped and anything after
    /// the second integer is ignored. Returns the selector and the number of
    /// bytes consumed (the input length up to the first NUL byte).
    pub fn parse(input: &[u8]) -> Result<(Self, usize)> {
        if input.len() > REPORT_CAPACITY {
            return Err(Error::MalformedInput(format!(
                "input is {} bytes, limit is {}",
                input.len(),
                REPORT_CAPACITY
            )));
        }

        let consumed = input.iter().position(|&b| b == 0).unwrap_or(input.len());
        let text = &input[..consumed];

        let mut cursor = 0;
        let view = scan_int(text, &mut cursor)
            .ok_or_else(|| Error::MalformedInput("expected a view code".to_string()))?;
        let target_pid = scan_int(text, &mut cursor)
            .ok_or_else(|| Error::MalformedInput("expected a process id".to_string()))?;

        Ok((Self { view, target_pid }, consumed))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.view, self.target_pid)
    }
}

/// Scan one `%d` conversion starting at `cursor`, advancing past it.
fn scan_int(bytes: &[u8], cursor: &mut usize) -> Option<i32> {
    let mut pos = *cursor;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let digits_start = pos;
    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        value = value * 10 + i64::from(digit - b'0');
        // Past i32 range either way; stop accumulating before i64 overflows
        if value > i64::from(i32::MAX) + 1 {
            return None;
        }
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }

    let value = if negative { -value } else { value };
    let value = i32::try_from(value).ok()?;
    *cursor = pos;
    Some(value)
}
