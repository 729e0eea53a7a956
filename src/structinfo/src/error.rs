//! Error types shared by the selector, sessions and report generation.

use crate::Pid;
use std::io;

/// Errors surfaced by structinfo operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed selector: {0}")]
    MalformedInput(String),

    #[error("Invalid offset: {0} (selector may be written once per session)")]
    InvalidOffset(usize),

    #[error("No such process with pid {0}")]
    ProcessNotFound(Pid),

    #[error("Report overflow: need {needed} bytes, capacity is {capacity}")]
    BufferOverflow { needed: usize, capacity: usize },

    #[error("Transfer fault: {0}")]
    TransferFault(#[source] io::Error),

    #[error("Failed to inspect pid {pid}: {source}")]
    Inspect {
        pid: Pid,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_message_names_sizes() {
        let err = Error::BufferOverflow {
            needed: 5000,
            capacity: 4096,
        };
        assert_eq!(
            err.to_string(),
            "Report overflow: need 5000 bytes, capacity is 4096"
        );
    }

    #[test]
    fn test_inspect_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::Inspect {
            pid: 7,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("Failed to inspect pid 7"));
        assert!(err.source().is_some());
    }
}
