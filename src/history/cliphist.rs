use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use super::{HistoryError, HistoryTool};

/// History backend that shells out to cliphist
/// Each operation is one short-lived blocking subprocess
pub struct CliphistTool {
    program: PathBuf,
    display_name: String,
}

impl CliphistTool {
    /// Resolve `program` on PATH
    pub fn new(program: &str) -> Result<Self> {
        let resolved = which::which(program)
            .with_context(|| format!("{} not found. Install cliphist", program))?;

        log::debug!("CliphistTool resolved {} to {:?}", program, resolved);
        Ok(CliphistTool {
            program: resolved,
            display_name: program.to_string(),
        })
    }

    fn run(&self, op: &'static str, input: Option<&[u8]>) -> Result<Output, HistoryError> {
        let spawn_err = |source| HistoryError::Spawn {
            program: self.display_name.clone(),
            op,
            source,
        };

        let mut child = Command::new(&self.program)
            .arg(op)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(input) = input
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin.write_all(input).map_err(spawn_err)?;
            stdin.write_all(b"\n").map_err(spawn_err)?;
            // stdin dropped here so the tool sees EOF
        }

        let output = child.wait_with_output().map_err(spawn_err)?;

        if !output.stderr.is_empty() {
            log::debug!(
                "{} {} stderr: {}",
                self.display_name,
                op,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        Ok(output)
    }

    /// Run an operation whose exit status we do not trust
    fn run_opaque(&self, op: &'static str, input: Option<&[u8]>) -> Result<Vec<u8>, HistoryError> {
        let output = self.run(op, input)?;
        if !output.status.success() {
            log::warn!("{} {} exited with {}", self.display_name, op, output.status);
        }
        Ok(output.stdout)
    }
}

impl HistoryTool for CliphistTool {
    fn list(&self) -> Result<Vec<u8>, HistoryError> {
        let output = self.run("list", None)?;
        if !output.status.success() {
            return Err(HistoryError::Status {
                program: self.display_name.clone(),
                op: "list",
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    fn decode(&self, raw_line: &[u8]) -> Result<Vec<u8>, HistoryError> {
        self.run_opaque("decode", Some(raw_line))
    }

    fn delete(&mut self, raw_line: &[u8]) -> Result<(), HistoryError> {
        self.run_opaque("delete", Some(raw_line)).map(|_| ())
    }

    fn wipe(&mut self) -> Result<(), HistoryError> {
        self.run_opaque("wipe", None).map(|_| ())
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Write a shell script standing in for cliphist and return a tool bound to it
    fn scripted_tool(dir: &tempfile::TempDir, body: &str) -> CliphistTool {
        let path = dir.path().join("fake-cliphist");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        CliphistTool::new(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_missing_program_is_an_error() {
        assert!(CliphistTool::new("definitely-not-a-real-cliphist-binary").is_err());
    }

    #[test]
    fn test_list_reads_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let tool = scripted_tool(&dir, r#"[ "$1" = list ] && printf '1\thello\n2\tworld\n'"#);
        assert_eq!(tool.list().unwrap(), b"1\thello\n2\tworld\n");
    }

    #[test]
    fn test_list_trusts_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let tool = scripted_tool(&dir, "printf '1\\tx\\n'; exit 3");
        assert!(matches!(tool.list(), Err(HistoryError::Status { .. })));
    }

    #[test]
    fn test_decode_ignores_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let tool = scripted_tool(&dir, "printf 'payload'; exit 1");
        assert_eq!(tool.decode(b"17\tx").unwrap(), b"payload");
    }

    #[test]
    fn test_decode_sends_full_listing_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stdin.log");
        let body = format!(r#"cat > "{}""#, log.display());
        let tool = scripted_tool(&dir, &body);
        tool.decode(b" 17\t  padded preview ").unwrap();
        assert_eq!(std::fs::read(&log).unwrap(), b" 17\t  padded preview \n");
    }

    #[test]
    fn test_delete_sends_raw_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stdin.log");
        let body = format!(r#"cat > "{}""#, log.display());
        let mut tool = scripted_tool(&dir, &body);
        tool.delete(b"1\thello").unwrap();
        assert_eq!(std::fs::read(&log).unwrap(), b"1\thello\n");
    }
}
