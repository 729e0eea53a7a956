//! Memory Region Types
//!
//! One virtual memory area of a process, with its protection and flags in
//! the kernel's numeric encodings.

/// Page size used to express file offsets in pages
pub const PAGE_SIZE: u64 = 4096;

/// A memory region of the target process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: u64,
    pub end: u64,
    /// Page-table protection bits installed for the region
    pub permission_bits: u64,
    /// `VM_*` flag bitmask
    pub flags: u64,
    /// Offset into the backing file, in pages
    pub page_offset: u64,
}

impl MemoryRegion {
    /// Create a region with no protection, flags or offset
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            permission_bits: 0,
            flags: 0,
            page_offset: 0,
        }
    }

    pub fn with_permission_bits(mut self, permission_bits: u64) -> Self {
        self.permission_bits = permission_bits;
        self
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_page_offset(mut self, page_offset: u64) -> Self {
        self.page_offset = page_offset;
        self
    }
}

/// x86-64 page-table bits
pub mod page_prot {
    pub const PRESENT: u64 = 1 << 0;
    pub const RW: u64 = 1 << 1;
    pub const USER: u64 = 1 << 2;
    pub const ACCESSED: u64 = 1 << 5;
    pub const PROTNONE: u64 = 1 << 8;
    pub const NX: u64 = 1 << 63;

    /// Protection the kernel installs for a mapping with the given
    /// `/proc/<pid>/maps` permission string (`"r-xp"`, `"rw-s"`, ...).
    ///
    /// Private writable mappings are copy-on-write and get no `RW` bit.
    pub fn from_perms(perms: &str) -> u64 {
        let bytes = perms.as_bytes();
        let read = bytes.first() == Some(&b'r');
        let write = bytes.get(1) == Some(&b'w');
        let exec = bytes.get(2) == Some(&b'x');
        let shared = bytes.get(3) == Some(&b's');

        if !read && !write && !exec {
            return PROTNONE | ACCESSED;
        }

        let mut prot = PRESENT | USER | ACCESSED;
        if write && shared {
            prot |= RW;
        }
        if !exec {
            prot |= NX;
        }
        prot
    }
}

/// Kernel `VM_*` flags
pub mod vm_flags {
    pub const READ: u64 = 0x0000_0001;
    pub const WRITE: u64 = 0x0000_0002;
    pub const EXEC: u64 = 0x0000_0004;
    pub const SHARED: u64 = 0x0000_0008;
    pub const MAYREAD: u64 = 0x0000_0010;
    pub const MAYWRITE: u64 = 0x0000_0020;
    pub const MAYEXEC: u64 = 0x0000_0040;
    pub const MAYSHARE: u64 = 0x0000_0080;
    pub const GROWSDOWN: u64 = 0x0000_0100;
    pub const UFFD_MISSING: u64 = 0x0000_0200;
    pub const PFNMAP: u64 = 0x0000_0400;
    pub const UFFD_WP: u64 = 0x0000_1000;
    pub const LOCKED: u64 = 0x0000_2000;
    pub const IO: u64 = 0x0000_4000;
    pub const SEQ_READ: u64 = 0x0000_8000;
    pub const RAND_READ: u64 = 0x0001_0000;
    pub const DONTCOPY: u64 = 0x0002_0000;
    pub const DONTEXPAND: u64 = 0x0004_0000;
    pub const LOCKONFAULT: u64 = 0x0008_0000;
    pub const ACCOUNT: u64 = 0x0010_0000;
    pub const NORESERVE: u64 = 0x0020_0000;
    pub const HUGETLB: u64 = 0x0040_0000;
    pub const SYNC: u64 = 0x0080_0000;
    pub const ARCH_1: u64 = 0x0100_0000;
    pub const WIPEONFORK: u64 = 0x0200_0000;
    pub const DONTDUMP: u64 = 0x0400_0000;
    pub const SOFTDIRTY: u64 = 0x0800_0000;
    pub const MIXEDMAP: u64 = 0x1000_0000;
    pub const HUGEPAGE: u64 = 0x2000_0000;
    pub const NOHUGEPAGE: u64 = 0x4000_0000;
    pub const MERGEABLE: u64 = 0x8000_0000;

    /// Two-letter mnemonics printed on the `VmFlags:` line of smaps
    const MNEMONICS: [(&str, u64); 31] = [
        ("rd", READ),
        ("wr", WRITE),
        ("ex", EXEC),
        ("sh", SHARED),
        ("mr", MAYREAD),
        ("mw", MAYWRITE),
        ("me", MAYEXEC),
        ("ms", MAYSHARE),
        ("gd", GROWSDOWN),
        ("um", UFFD_MISSING),
        ("pf", PFNMAP),
        ("uw", UFFD_WP),
        ("lo", LOCKED),
        ("io", IO),
        ("sr", SEQ_READ),
        ("rr", RAND_READ),
        ("dc", DONTCOPY),
        ("de", DONTEXPAND),
        ("lf", LOCKONFAULT),
        ("ac", ACCOUNT),
        ("nr", NORESERVE),
        ("ht", HUGETLB),
        ("sf", SYNC),
        ("ar", ARCH_1),
        ("wf", WIPEONFORK),
        ("dd", DONTDUMP),
        ("sd", SOFTDIRTY),
        ("mm", MIXEDMAP),
        ("hg", HUGEPAGE),
        ("nh", NOHUGEPAGE),
        ("mg", MERGEABLE),
    ];

    /// Rebuild the bitmask from a `VmFlags:` value such as `"rd ex mr mw me dw"`.
    /// Unknown mnemonics are ignored.
    pub fn from_mnemonics(line: &str) -> u64 {
        line.split_whitespace()
            .filter_map(|m| MNEMONICS.iter().find(|(name, _)| *name == m))
            .fold(0, |flags, (_, bit)| flags | bit)
    }

    /// Best-effort bitmask from a maps permission string when smaps is unavailable
    pub fn from_perms(perms: &str) -> u64 {
        let bytes = perms.as_bytes();
        let mut flags = 0;
        if bytes.first() == Some(&b'r') {
            flags |= READ;
        }
        if bytes.get(1) == Some(&b'w') {
            flags |= WRITE;
        }
        if bytes.get(2) == Some(&b'x') {
            flags |= EXEC;
        }
        if bytes.get(3) == Some(&b's') {
            flags |= SHARED | MAYSHARE;
        }
        flags
    }
}
