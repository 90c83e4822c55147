use std::process::Command;

/// Start the child as the leader of a new process group so that a timeout can
/// kill the shell together with everything it started.
#[cfg(unix)]
pub(crate) fn isolate_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;

    command.process_group(0);
}

#[cfg(not(unix))]
pub(crate) fn isolate_process_group(_command: &mut Command) {}

/// Forcefully terminate a child started by [`isolate_process_group`].
///
/// On Unix, sends SIGKILL to the whole process group.
/// On Windows, uses TerminateProcess on the shell process.
pub(crate) fn terminate_process_tree(pid: u32) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Ok(raw) = i32::try_from(pid) else {
            return;
        };
        if let Err(errno) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
            tracing::debug!(pid, %errno, "Failed to kill process group");
        }
    }

    #[cfg(windows)]
    {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

        unsafe {
            if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
                let _ = TerminateProcess(handle, 1);
                let _ = CloseHandle(handle);
            }
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
    }
}
