//! Sessions over the shared selector.
//!
//! An [`Inspector`] owns the selector and the process directory. Opening a
//! [`Session`] takes the one lock and holds it until the session is closed,
//! so at most one session is open at a time.

use crate::report::{generate, Options};
use crate::source::ProcessDirectory;
use crate::{Error, Result, Selector, REPORT_CAPACITY};

use std::io::{Read, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared selector state plus the directory reports are generated from
#[derive(Debug)]
pub struct Inspector<D> {
    directory: D,
    options: Options,
    selector: Mutex<Selector>,
}

impl<D: ProcessDirectory> Inspector<D> {
    /// Create an inspector with the default selector (memory map of pid 1)
    pub fn new(directory: D, options: Options) -> Self {
        Self {
            directory,
            options,
            selector: Mutex::new(Selector::default()),
        }
    }

    /// Open a session, blocking until no other session is open
    pub fn open(&self) -> Session<'_, D> {
        // The selector is plain data; a panicked holder cannot leave it torn
        let selector = self.selector.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!("session opened");

        Session {
            directory: &self.directory,
            options: &self.options,
            selector,
            read_offset: 0,
            write_offset: 0,
        }
    }

    /// Current selector. Blocks while a session is open.
    pub fn selector(&self) -> Selector {
        *self.selector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An open session. Dropping it (or calling [`Session::close`]) releases the lock.
pub struct Session<'a, D> {
    directory: &'a D,
    options: &'a Options,
    selector: MutexGuard<'a, Selector>,
    read_offset: usize,
    write_offset: usize,
}

impl<D: ProcessDirectory> Session<'_, D> {
    pub fn selector(&self) -> Selector {
        *self.selector
    }

    /// Read the report into `buf`.
    ///
    /// Returns 0 when the report was already read since the last write, or
    /// when `buf` is smaller than [`REPORT_CAPACITY`].
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let capacity = buf.len();
        let mut out = buf;
        self.read_to(capacity, &mut out)
    }

    /// Like [`Session::read`], transferring into any writer that accepts
    /// `capacity` bytes
    pub fn read_to<W>(&mut self, capacity: usize, out: &mut W) -> Result<usize>
    where
        W: Write + ?Sized,
    {
        if self.read_offset > 0 {
            tracing::debug!(offset = self.read_offset, "report already read");
            return Ok(0);
        }
        if capacity < REPORT_CAPACITY {
            tracing::debug!(capacity, "read buffer smaller than a report");
            return Ok(0);
        }

        let selector = *self.selector;
        let report = generate(self.directory, selector, self.options)?;
        out.write_all(&report).map_err(Error::TransferFault)?;

        self.read_offset = report.len();
        tracing::info!(%selector, len = report.len(), "report read");
        Ok(report.len())
    }

    /// Parse and store a new selector. Allowed once per session; a successful
    /// write re-arms [`Session::read`].
    pub fn write(&mut self, input: &[u8]) -> Result<usize> {
        if self.write_offset > 0 {
            return Err(Error::InvalidOffset(self.write_offset));
        }

        let (selector, consumed) = Selector::parse(input).inspect_err(|err| {
            tracing::debug!(%err, "selector rejected");
        })?;

        *self.selector = selector;
        self.write_offset = consumed;
        self.read_offset = 0;
        tracing::info!(%selector, "selector written");
        Ok(consumed)
    }

    /// Drain `input` (up to one byte past the limit) and write it as a selector
    pub fn write_from<R>(&mut self, input: &mut R) -> Result<usize>
    where
        R: Read + ?Sized,
    {
        let mut raw = Vec::with_capacity(REPORT_CAPACITY + 1);
        Read::take(input, REPORT_CAPACITY as u64 + 1)
            .read_to_end(&mut raw)
            .map_err(Error::TransferFault)?;
        self.write(&raw)
    }

    pub fn close(self) {}
}

impl<D> Drop for Session<'_, D> {
    fn drop(&mut self) {
        tracing::info!("session closed");
    }
}
