//! File reading utilities

use crate::error::{QuickfetchError, Result};
use std::fs;
use std::path::Path;

/// Safely read a file to string with error handling
pub fn read_file_safe<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path).map_err(QuickfetchError::from)
}

/// Read first line of a file, trimmed
/// Optimized for single-line files like /proc/sys/kernel/hostname
/// Uses direct syscalls for maximum performance
pub fn read_first_line<P: AsRef<Path>>(path: P) -> Result<String> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path_cstr = CString::new(path.as_ref().as_os_str().as_bytes())
        .map_err(|_| QuickfetchError::Parse("Invalid path".to_string()))?;

    let mut buffer = [0u8; 256];

    // SAFETY: `path_cstr` is a valid NUL-terminated string and `buffer` outlives the read
    let bytes_read = unsafe {
        let fd = libc::open(path_cstr.as_ptr(), libc::O_RDONLY | libc::O_CLOEXEC);
        if fd < 0 {
            return Err(QuickfetchError::from(std::io::Error::last_os_error()));
        }

        let bytes_read = libc::read(fd, buffer.as_mut_ptr() as *mut libc::c_void, buffer.len());
        libc::close(fd);
        bytes_read
    };

    if bytes_read < 0 {
        return Err(QuickfetchError::from(std::io::Error::last_os_error()));
    }

    // Multi-byte characters may be cut at the buffer end; keep what decodes
    let content = String::from_utf8_lossy(&buffer[..bytes_read as usize]);
    Ok(content.lines().next().unwrap_or("").trim().to_string())
}

/// Check if a file exists safely
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}
