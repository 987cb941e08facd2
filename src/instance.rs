use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const PID_FILE_NAME: &str = "clipman.pid";

/// Location of the PID record: $XDG_RUNTIME_DIR, else the system temp dir
pub fn default_pid_path() -> PathBuf {
    env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(env::temp_dir)
        .join(PID_FILE_NAME)
}

/// Cooperative single-instance guard
///
/// Not a lock: two launches racing each other can both survive. On drop the
/// record is removed if it still names this process.
pub struct InstanceGuard {
    path: PathBuf,
    pid: u32,
}

impl InstanceGuard {
    /// Ask a previous instance to terminate, then record our own PID
    pub fn acquire(path: PathBuf) -> Result<Self> {
        let pid = std::process::id();

        if let Some(old_pid) = read_pid(&path)
            && old_pid != pid
        {
            if process_alive(old_pid) && same_program(old_pid) {
                log::info!("Terminating previous instance, pid: {}", old_pid);
                send_terminate(old_pid);
            } else {
                log::debug!("Stale PID record for {}, ignoring", old_pid);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        fs::write(&path, pid.to_string())
            .with_context(|| format!("Failed to write PID record {:?}", path))?;

        Ok(InstanceGuard { path, pid })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        if read_pid(&self.path) == Some(self.pid) {
            if let Err(e) = fs::remove_file(&self.path) {
                log::debug!("Failed to remove PID record {:?}: {}", self.path, e);
            }
        }
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn process_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }
    // Signal 0 only checks for existence and permission
    unsafe { libc::kill(pid, 0) == 0 }
}

/// Command name of a process, from procfs
fn program_name(pid: &str) -> Option<String> {
    let comm = fs::read_to_string(format!("/proc/{}/comm", pid)).ok()?;
    Some(comm.trim_end().to_string())
}

/// Whether `pid` runs the same program as we do
/// A recycled PID from a crashed run belongs to something else and must not be signalled.
fn same_program(pid: u32) -> bool {
    match (program_name("self"), program_name(&pid.to_string())) {
        (Some(ours), Some(theirs)) => ours == theirs,
        _ => false,
    }
}

fn send_terminate(pid: u32) {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return;
    };
    if pid <= 0 {
        return;
    }
    if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
        log::warn!(
            "Failed to signal previous instance {}: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_own_pid_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipman.pid");

        let guard = InstanceGuard::acquire(path.clone()).unwrap();
        assert_eq!(read_pid(&path), Some(std::process::id()));
        assert_eq!(guard.path(), path);

        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn test_own_pid_in_record_is_not_signalled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipman.pid");
        fs::write(&path, std::process::id().to_string()).unwrap();

        // Would terminate the test runner if it signalled itself
        let _guard = InstanceGuard::acquire(path.clone()).unwrap();
        assert_eq!(read_pid(&path), Some(std::process::id()));
    }

    #[test]
    fn test_garbage_record_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipman.pid");
        fs::write(&path, "not a pid").unwrap();

        let _guard = InstanceGuard::acquire(path.clone()).unwrap();
        assert_eq!(read_pid(&path), Some(std::process::id()));
    }

    #[test]
    fn test_recycled_pid_of_other_program_is_not_signalled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipman.pid");
        let mut bystander = std::process::Command::new("sleep").arg("30").spawn().unwrap();
        fs::write(&path, bystander.id().to_string()).unwrap();

        let _guard = InstanceGuard::acquire(path.clone()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));
        let still_running = bystander.try_wait().unwrap().is_none();

        let _ = bystander.kill();
        let _ = bystander.wait();
        assert!(still_running, "unrelated process was terminated");
        assert_eq!(read_pid(&path), Some(std::process::id()));
    }

    #[test]
    fn test_same_program_check() {
        assert!(same_program(std::process::id()));
        assert!(!same_program(999_999_999));
    }

    #[test]
    fn test_record_taken_over_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipman.pid");

        let guard = InstanceGuard::acquire(path.clone()).unwrap();
        fs::write(&path, "999999999").unwrap();
        drop(guard);
        assert_eq!(read_pid(&path), Some(999_999_999));
    }
}
