//! In-memory process directory, for tests and embedders that already hold
//! process state.

use crate::source::{MemoryRegion, Pid, ProcessDirectory, RegisterContext, TaskHandle};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// A process described by plain data
#[derive(Debug, Clone, Default)]
pub struct MockTask {
    pub pid: Pid,
    pub registers: RegisterContext,
    pub regions: Vec<MemoryRegion>,
}

impl MockTask {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            ..Default::default()
        }
    }

    pub fn with_registers(mut self, registers: RegisterContext) -> Self {
        self.registers = registers;
        self
    }

    pub fn with_region(mut self, region: MemoryRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Add `count` adjacent one-page regions starting at `base`
    pub fn with_page_regions(mut self, base: u64, count: usize) -> Self {
        let page = crate::source::PAGE_SIZE;
        self.regions.extend((0..count as u64).map(|i| {
            MemoryRegion::new(base + i * page, base + (i + 1) * page).with_page_offset(i)
        }));
        self
    }
}

impl TaskHandle for MockTask {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn registers(&self) -> Result<RegisterContext> {
        Ok(self.registers)
    }

    fn regions(&self) -> Result<Box<dyn Iterator<Item = MemoryRegion> + '_>> {
        Ok(Box::new(self.regions.iter().cloned()))
    }
}

/// Process directory over a fixed set of [`MockTask`]s
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    tasks: BTreeMap<Pid, MockTask>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, task: MockTask) -> Option<MockTask> {
        self.tasks.insert(task.pid, task)
    }

    pub fn remove(&mut self, pid: Pid) -> Option<MockTask> {
        self.tasks.remove(&pid)
    }
}

impl FromIterator<MockTask> for MockDirectory {
    fn from_iter<T: IntoIterator<Item = MockTask>>(iter: T) -> Self {
        Self {
            tasks: iter.into_iter().map(|t| (t.pid, t)).collect(),
        }
    }
}

impl ProcessDirectory for MockDirectory {
    fn lookup(&self, pid: Pid) -> Result<Box<dyn TaskHandle + '_>> {
        self.tasks
            .get(&pid)
            .map(|task| Box::new(task.clone()) as Box<dyn TaskHandle>)
            .ok_or(Error::ProcessNotFound(pid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_lookup() {
        let directory: MockDirectory = [MockTask::new(1), MockTask::new(42)].into_iter().collect();

        assert_eq!(directory.lookup(42).unwrap().pid(), 42);
        assert!(matches!(directory.lookup(43), Err(Error::ProcessNotFound(43))));
    }

    #[test]
    fn test_mock_regions_in_insertion_order() {
        let task = MockTask::new(5).with_page_regions(0x10000, 3);
        let regions: Vec<_> = task.regions().unwrap().collect();

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].start, 0x10000);
        assert_eq!(regions[2].end, 0x13000);
        assert_eq!(regions[2].page_offset, 2);
    }

    #[test]
    fn test_mock_remove() {
        let mut directory = MockDirectory::new();
        directory.insert(MockTask::new(3));
        assert!(directory.remove(3).is_some());
        assert!(directory.lookup(3).is_err());
    }
}
