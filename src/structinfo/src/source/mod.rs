//! Process Source Abstraction
//!
//! The seam between report generation and the live process state:
//! - [`ProcessDirectory`] resolves a process id to a [`TaskHandle`]
//! - [`ProcDirectory`] reads live Linux processes through procfs and ptrace
//! - [`crate::mock::MockDirectory`] serves plain data for tests

mod context;
mod procfs;
mod region;
mod traits;

pub use context::RegisterContext;
pub use procfs::{ProcDirectory, ProcTask};
pub use region::{page_prot, vm_flags, MemoryRegion, PAGE_SIZE};
pub use traits::{ProcessDirectory, TaskHandle};

/// Process identifier as accepted by the selector
pub type Pid = i32;
