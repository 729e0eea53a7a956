//! CLI argument definitions for structinfo

use clap::Parser;
use structinfo::Pid;

#[derive(Parser, Debug)]
#[command(name = "structinfo")]
#[command(about = "Print the register context or memory map of a process", long_about = None)]
pub struct Cli {
    /// Report view: 0 = register context, 1 = memory map (any other value: memory map)
    #[arg(allow_negative_numbers = true, requires = "pid")]
    pub view: Option<i32>,

    /// Target process id
    #[arg(allow_negative_numbers = true)]
    pub pid: Option<Pid>,
}

impl Cli {
    /// The selector to write before reading, if one was given
    pub fn selector(&self) -> Option<String> {
        match (self.view, self.pid) {
            (Some(view), Some(pid)) => Some(format!("{view} {pid}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["structinfo"]).unwrap();
        assert!(cli.selector().is_none());
    }

    #[test]
    fn test_view_and_pid() {
        let cli = Cli::try_parse_from(["structinfo", "0", "1234"]).unwrap();
        assert_eq!(cli.selector().as_deref(), Some("0 1234"));
    }

    #[test]
    fn test_negative_view() {
        let cli = Cli::try_parse_from(["structinfo", "-1", "1"]).unwrap();
        assert_eq!(cli.view, Some(-1));
    }

    #[test]
    fn test_view_requires_pid() {
        assert!(Cli::try_parse_from(["structinfo", "0"]).is_err());
    }

    #[test]
    fn test_rejects_non_integer() {
        assert!(Cli::try_parse_from(["structinfo", "abc", "1"]).is_err());
    }
}
