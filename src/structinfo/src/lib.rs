//! Register context and memory map reports for a selected process.
//!
//! A caller opens a [`Session`] on a shared [`Inspector`], optionally writes a
//! selector (`"<view> <pid>"`), and reads back a formatted text report:
//!
//! - view `0`: the saved register context (stack pointer, segment selectors,
//!   segment bases)
//! - view `1` (and any unknown value): the memory region layout, capped at
//!   [`DEFAULT_REGION_LIMIT`] entries and terminated by a `...` line
//!
//! Reports never exceed [`REPORT_CAPACITY`] bytes and are handed out once per
//! selector write.
//!
//! # Example
//! ```
//! use structinfo::mock::{MockDirectory, MockTask};
//! use structinfo::{Inspector, MemoryRegion, Options, REPORT_CAPACITY};
//!
//! let mut directory = MockDirectory::new();
//! directory.insert(MockTask::new(42).with_region(MemoryRegion::new(0x1000, 0x2000)));
//!
//! let inspector = Inspector::new(directory, Options::default());
//! let mut session = inspector.open();
//! session.write(b"1 42").unwrap();
//!
//! let mut buf = [0u8; REPORT_CAPACITY];
//! let len = session.read(&mut buf).unwrap();
//! assert!(std::str::from_utf8(&buf[..len]).unwrap().ends_with("...\n"));
//! ```

mod error;
pub mod mock;
pub mod report;
mod selector;
mod session;
pub mod source;

pub use error::{Error, Result};
pub use report::{generate, Options};
pub use selector::{Selector, View};
pub use session::{Inspector, Session};
pub use source::{MemoryRegion, Pid, ProcDirectory, ProcessDirectory, RegisterContext, TaskHandle};

/// Hard cap on the size of a single report, and the minimum read capacity.
pub const REPORT_CAPACITY: usize = 4096;

/// Number of memory regions listed before the trailer.
pub const DEFAULT_REGION_LIMIT: usize = 30;

/// Process selected before the first write.
pub const DEFAULT_PID: Pid = 1;
