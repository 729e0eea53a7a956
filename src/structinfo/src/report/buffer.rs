//! Capacity-checked text buffer for a single report.

use crate::{Error, Result};
use std::fmt::{self, Write};

/// Growable report text with a hard byte limit
#[derive(Debug)]
pub struct ReportBuffer {
    text: String,
    capacity: usize,
}

impl ReportBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity,
        }
    }

    /// Append formatted text. On overflow nothing is appended.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let start = self.text.len();
        // Formatting into a String cannot fail
        let _ = self.text.write_fmt(args);
        self.check(start)
    }

    pub fn push_str(&mut self, s: &str) -> Result<()> {
        let start = self.text.len();
        self.text.push_str(s);
        self.check(start)
    }

    fn check(&mut self, start: usize) -> Result<()> {
        if self.text.len() > self.capacity {
            let needed = self.text.len();
            self.text.truncate(start);
            return Err(Error::BufferOverflow {
                needed,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut buf = ReportBuffer::new(16);
        buf.push_str("0123456789").unwrap();
        buf.push_fmt(format_args!("{:>6}", "ab")).unwrap();
        assert_eq!(buf.len(), 16);
        assert_eq!(buf.as_str(), "0123456789    ab");
    }

    #[test]
    fn test_overflow_leaves_buffer_unchanged() {
        let mut buf = ReportBuffer::new(8);
        buf.push_str("abcd").unwrap();

        let err = buf.push_fmt(format_args!("{}", "efghi")).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferOverflow {
                needed: 9,
                capacity: 8
            }
        ));
        assert_eq!(buf.as_str(), "abcd");
    }

    #[test]
    fn test_empty_buffer() {
        let buf = ReportBuffer::new(4096);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 4096);
        assert!(buf.into_bytes().is_empty());
    }
}
