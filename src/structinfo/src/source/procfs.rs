//! Live Process Directory
//!
//! Resolves processes through procfs. Memory regions come from
//! `/proc/<pid>/smaps` (or `maps` when smaps is not readable); register
//! context is captured with ptrace.

use super::context;
use super::region::{page_prot, vm_flags, PAGE_SIZE};
use super::{MemoryRegion, Pid, ProcessDirectory, RegisterContext, TaskHandle};
use crate::{Error, Result};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Process directory backed by a procfs mount
#[derive(Debug, Clone)]
pub struct ProcDirectory {
    root: PathBuf,
}

impl Default for ProcDirectory {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProcessDirectory for ProcDirectory {
    fn lookup(&self, pid: Pid) -> Result<Box<dyn TaskHandle + '_>> {
        if pid <= 0 {
            return Err(Error::ProcessNotFound(pid));
        }

        let dir = self.root.join(pid.to_string());
        if !dir.is_dir() {
            return Err(Error::ProcessNotFound(pid));
        }

        Ok(Box::new(ProcTask { pid, dir }))
    }
}

/// A process resolved through procfs
#[derive(Debug, Clone)]
pub struct ProcTask {
    pid: Pid,
    dir: PathBuf,
}

impl ProcTask {
    fn open_regions(&self) -> io::Result<File> {
        File::open(self.dir.join("smaps")).or_else(|_| File::open(self.dir.join("maps")))
    }
}

impl TaskHandle for ProcTask {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn registers(&self) -> Result<RegisterContext> {
        context::capture(self.pid)
    }

    fn regions(&self) -> Result<Box<dyn Iterator<Item = MemoryRegion> + '_>> {
        let inspect = |source: io::Error| Error::Inspect {
            pid: self.pid,
            source,
        };

        let file = self.open_regions().map_err(inspect)?;
        let mut regions = RegionIter::new(BufReader::new(file));
        regions.prime().map_err(inspect)?;
        Ok(Box::new(regions))
    }
}

/// Lazily parses mapping headers (and their `VmFlags:` lines) from smaps or maps
pub struct RegionIter<R> {
    lines: Lines<R>,
    pending: Option<MemoryRegion>,
}

impl<R: BufRead> RegionIter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: None,
        }
    }

    /// Read up to the first mapping header. An unreadable listing then fails
    /// here instead of looking like a process with no regions.
    fn prime(&mut self) -> io::Result<()> {
        while self.pending.is_none() {
            let Some(line) = self.lines.next() else {
                break;
            };
            self.pending = parse_mapping(&line?);
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for RegionIter<R> {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // A read error ends the sequence; the target may have exited mid-read
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    tracing::warn!(%err, "region listing cut short");
                    return self.pending.take();
                }
                None => return self.pending.take(),
            };

            if let Some(mnemonics) = line.strip_prefix("VmFlags:") {
                if let Some(region) = self.pending.as_mut() {
                    region.flags = vm_flags::from_mnemonics(mnemonics);
                }
                continue;
            }

            if let Some(region) = parse_mapping(&line) {
                if let Some(previous) = self.pending.replace(region) {
                    return Some(previous);
                }
            }
        }
    }
}

/// Parse a `start-end perms offset dev inode [path]` line
fn parse_mapping(line: &str) -> Option<MemoryRegion> {
    let mut split = line.split_whitespace();
    let (start, end) = split.next()?.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    let perms = split.next().filter(|p| p.len() == 4)?;
    let offset = u64::from_str_radix(split.next()?, 16).ok()?;
    split.next().filter(|dev| dev.contains(':'))?;
    split.next()?.parse::<u64>().ok()?;

    if start > end {
        return None;
    }

    Some(
        MemoryRegion::new(start, end)
            .with_permission_bits(page_prot::from_perms(perms))
            .with_flags(vm_flags::from_perms(perms))
            .with_page_offset(offset / PAGE_SIZE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SMAPS: &str = "\
55d0c0a00000-55d0c0a02000 r--p 00000000 08:01 1048602                    /usr/bin/cat
Size:                  8 kB
Rss:                   8 kB
VmFlags: rd mr mw me dw sd
55d0c0a02000-55d0c0a07000 r-xp 00002000 08:01 1048602                    /usr/bin/cat
Size:                 20 kB
VmFlags: rd ex mr mw me dw sd
7ffd4a1e0000-7ffd4a201000 rw-p 00000000 00:00 0                          [stack]
Size:                132 kB
VmFlags: rd wr mr mw me gd ac
";

    const MAPS: &str = "\
00400000-00452000 r-xp 00000000 08:02 173521      /usr/bin/dbus-daemon
00e03000-00e24000 rw-p 00000000 00:00 0           [heap]
7f2c3d4e0000-7f2c3d4e2000 rw-s 00003000 00:05 4097   /dev/shm/ring
";

    fn fake_proc(pid: Pid, file: &str, contents: &str) -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(pid.to_string());
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
        root
    }

    #[test]
    fn test_lookup_missing_process() {
        let root = TempDir::new().unwrap();
        let directory = ProcDirectory::new(root.path());
        assert!(matches!(
            directory.lookup(999_999),
            Err(Error::ProcessNotFound(999_999))
        ));
        assert!(matches!(directory.lookup(0), Err(Error::ProcessNotFound(0))));
        assert!(matches!(directory.lookup(-5), Err(Error::ProcessNotFound(-5))));
    }

    #[test]
    fn test_regions_from_smaps() {
        let root = fake_proc(42, "smaps", SMAPS);
        let directory = ProcDirectory::new(root.path());
        let task = directory.lookup(42).unwrap();
        assert_eq!(task.pid(), 42);

        let regions: Vec<_> = task.regions().unwrap().collect();
        assert_eq!(regions.len(), 3);

        assert_eq!(regions[0].start, 0x55d0c0a00000);
        assert_eq!(regions[0].end, 0x55d0c0a02000);
        assert_ne!(regions[0].permission_bits & page_prot::NX, 0);
        assert_eq!(
            regions[0].flags,
            vm_flags::from_mnemonics("rd mr mw me dw sd")
        );

        assert_eq!(regions[1].permission_bits, 0x25);
        assert_eq!(regions[1].page_offset, 2);
        assert_ne!(regions[1].flags & vm_flags::EXEC, 0);

        assert_ne!(regions[2].flags & vm_flags::GROWSDOWN, 0);
        assert_ne!(regions[2].flags & vm_flags::ACCOUNT, 0);
    }

    #[test]
    fn test_regions_fall_back_to_maps() {
        let root = fake_proc(7, "maps", MAPS);
        let directory = ProcDirectory::new(root.path());
        let task = directory.lookup(7).unwrap();

        let regions: Vec<_> = task.regions().unwrap().collect();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].flags, vm_flags::READ | vm_flags::EXEC);
        assert_eq!(regions[1].flags, vm_flags::READ | vm_flags::WRITE);
        assert_eq!(regions[2].page_offset, 3);
        assert_ne!(regions[2].flags & vm_flags::SHARED, 0);
        assert_ne!(regions[2].permission_bits & page_prot::RW, 0);
    }

    #[test]
    fn test_regions_unreadable_is_inspect_error() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("9")).unwrap();
        let directory = ProcDirectory::new(root.path());
        let task = directory.lookup(9).unwrap();

        assert!(matches!(task.regions(), Err(Error::Inspect { pid: 9, .. })));
    }

    #[test]
    fn test_regions_read_failure_is_inspect_error() {
        // Opening a directory succeeds but reading it fails
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("11").join("smaps")).unwrap();
        let directory = ProcDirectory::new(root.path());
        let task = directory.lookup(11).unwrap();

        assert!(matches!(task.regions(), Err(Error::Inspect { pid: 11, .. })));
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::InvalidData))
        }
    }

    #[test]
    fn test_prime_reports_early_failure() {
        let mut iter = RegionIter::new(BufReader::new(FailingReader));
        assert!(iter.prime().is_err());

        let mut iter = RegionIter::new(BufReader::new(io::Read::chain(
            "Size: 8 kB\n".as_bytes(),
            FailingReader,
        )));
        assert!(iter.prime().is_err());
    }

    #[test]
    fn test_failure_after_first_region_ends_listing() {
        let reader = io::Read::chain(MAPS.as_bytes(), FailingReader);
        let mut iter = RegionIter::new(BufReader::new(reader));
        iter.prime().unwrap();

        let regions: Vec<_> = iter.collect();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[2].start, 0x7f2c3d4e0000);
    }

    #[test]
    fn test_prime_on_empty_listing() {
        let mut iter = RegionIter::new("".as_bytes());
        iter.prime().unwrap();
        assert_eq!(iter.count(), 0);
    }

    #[test]
    fn test_region_iter_is_lazy() {
        let mut iter = RegionIter::new(MAPS.as_bytes());
        let first = iter.next().unwrap();
        assert_eq!(first.start, 0x400000);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_parse_mapping_rejects_field_lines() {
        assert!(parse_mapping("Size:                  8 kB").is_none());
        assert!(parse_mapping("THPeligible:    0").is_none());
        assert!(parse_mapping("").is_none());
        assert!(parse_mapping("2000-1000 r--p 00000000 00:00 0").is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_own_process_regions() {
        let directory = ProcDirectory::default();
        let task = directory.lookup(std::process::id() as Pid).unwrap();
        let regions: Vec<_> = task.regions().unwrap().collect();

        assert!(!regions.is_empty());
        assert!(regions.windows(2).all(|w| w[0].start <= w[1].start));
        assert!(regions.iter().all(|r| r.start <= r.end));
    }
}
