//! Process Directory Traits
//!
//! Core abstraction for resolving a process and reading its state.

use super::{MemoryRegion, Pid, RegisterContext};
use crate::Result;

/// Maps a process id to a live handle
pub trait ProcessDirectory: Send + Sync {
    /// Resolve `pid`, failing with [`crate::Error::ProcessNotFound`] when no
    /// live process has that id
    fn lookup(&self, pid: Pid) -> Result<Box<dyn TaskHandle + '_>>;
}

/// A resolved process whose state can be captured
pub trait TaskHandle {
    fn pid(&self) -> Pid;

    /// Capture the saved register context
    fn registers(&self) -> Result<RegisterContext>;

    /// Memory regions in ascending start address order.
    ///
    /// The sequence is lazy; callers bound how much of it they consume.
    fn regions(&self) -> Result<Box<dyn Iterator<Item = MemoryRegion> + '_>>;
}
