//! Command execution utilities

use crate::error::{QuickfetchError, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Execute a command and return stdout as String.
///
/// A `timeout_ms` of zero waits forever; otherwise the child is killed once the
/// timeout elapses and a detection error is returned.
pub fn run_command(program: &str, args: &[&str], timeout_ms: u32) -> Result<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    // Drain stdout on a helper thread so a chatty child can't fill the pipe
    let mut stdout = child.stdout.take();
    let reader = thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(out) = stdout.as_mut() {
            let _ = out.read_to_end(&mut buffer);
        }
        buffer
    });

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if timeout_ms > 0 && started.elapsed() >= Duration::from_millis(u64::from(timeout_ms)) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(QuickfetchError::Detection(format!(
                "Command '{}' timed out after {}ms",
                program, timeout_ms
            )));
        }
        thread::sleep(Duration::from_millis(2));
    };

    let output = reader.join().unwrap_or_default();

    if status.success() {
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    } else {
        Err(QuickfetchError::Detection(format!(
            "Command '{}' failed with exit code: {:?}",
            program,
            status.code()
        )))
    }
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    use std::env;

    if let Ok(path) = env::var("PATH") {
        for dir in path.split(':') {
            let full_path = std::path::Path::new(dir).join(program);
            if full_path.is_file() {
                return true;
            }
        }
    }
    false
}
