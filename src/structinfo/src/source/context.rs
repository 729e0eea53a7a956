//! Saved CPU context of a process.

use super::Pid;
use crate::Result;

/// Register fields captured from a stopped thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterContext {
    pub stack_pointer: u64,
    pub es: u16,
    pub ds: u16,
    pub fs_index: u16,
    pub gs_index: u16,
    pub fs_base: u64,
    pub gs_base: u64,
}

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
impl From<libc::user_regs_struct> for RegisterContext {
    fn from(regs: libc::user_regs_struct) -> Self {
        // Segment selectors are 16 bits wide; the upper bits are always zero
        Self {
            stack_pointer: regs.rsp,
            es: regs.es as u16,
            ds: regs.ds as u16,
            fs_index: regs.fs as u16,
            gs_index: regs.gs as u16,
            fs_base: regs.fs_base,
            gs_base: regs.gs_base,
        }
    }
}

/// Stop `pid` with ptrace, copy its registers and let it run again
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub(crate) fn capture(pid: Pid) -> Result<RegisterContext> {
    use crate::Error;
    use nix::errno::Errno;
    use nix::sys::ptrace;
    use nix::unistd::Pid as RawPid;

    let inspect = |err: Errno| Error::Inspect {
        pid,
        source: err.into(),
    };

    let target = RawPid::from_raw(pid);
    ptrace::attach(target).map_err(inspect)?;

    let regs = wait_for_stop(target).and_then(|()| ptrace::getregs(target));

    // Detach even when the stop or GETREGS failed
    let detached = ptrace::detach(target, None);

    let regs = regs.map_err(inspect)?;
    detached.map_err(inspect)?;
    tracing::debug!(pid, "captured register context");

    Ok(regs.into())
}

/// Wait for the SIGSTOP raised by the attach. Stops for other signals that
/// arrive first are resumed with the signal injected, so it is still delivered
/// and the SIGSTOP is not left pending past the detach.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
fn wait_for_stop(target: nix::unistd::Pid) -> nix::Result<()> {
    use nix::errno::Errno;
    use nix::sys::ptrace;
    use nix::sys::signal::Signal;
    use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};

    loop {
        match waitpid(target, Some(WaitPidFlag::__WALL))? {
            WaitStatus::Stopped(_, Signal::SIGSTOP) => return Ok(()),
            WaitStatus::Stopped(_, signal) => {
                tracing::trace!(?signal, "re-injecting signal while attaching");
                ptrace::cont(target, signal)?;
            }
            WaitStatus::Exited(..) | WaitStatus::Signaled(..) => return Err(Errno::ESRCH),
            _ => continue,
        }
    }
}

#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
pub(crate) fn capture(_pid: Pid) -> Result<RegisterContext> {
    Err(crate::Error::Unsupported(
        "register capture requires x86-64 Linux",
    ))
}
