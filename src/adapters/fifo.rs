//! Named-pipe command channel.
//!
//! Creates the FIFO (`mkfifo`, mode 0600), opens it `O_RDONLY | O_NONBLOCK`
//! and hands out one line per poll. The FIFO is removed from the
//! filesystem when the channel is dropped.
//!
//! With no writer attached the kernel reports EOF on every read; with a
//! writer but no data it reports `EAGAIN`. Both mean "no data now". A
//! writer hanging up flushes any unterminated tail as a final line, so
//! `echo -n "ON 5" > /tmp/gpiod.fifo` works.

use std::ffi::CString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::app::commands::{LineAssembler, MAX_LINE_LEN};
use crate::app::ports::CommandSource;
use crate::error::StartupError;

/// Failure while setting up the channel.
#[derive(Debug)]
pub enum FifoError {
    /// `mkfifo` failed, or a non-FIFO file occupies the path.
    Create(io::Error),
    /// The FIFO exists but could not be opened.
    Open(io::Error),
}

impl FifoError {
    /// Startup stage this failure belongs to.
    pub fn stage(&self) -> StartupError {
        match self {
            Self::Create(_) => StartupError::ChannelCreate,
            Self::Open(_) => StartupError::ChannelOpen,
        }
    }
}

impl fmt::Display for FifoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(e) => write!(f, "mkfifo: {e}"),
            Self::Open(e) => write!(f, "open: {e}"),
        }
    }
}

impl std::error::Error for FifoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Create(e) | Self::Open(e) => Some(e),
        }
    }
}

/// Non-blocking reader over a FIFO it owns on the filesystem.
pub struct FifoChannel {
    path: PathBuf,
    file: File,
    lines: LineAssembler,
}

impl FifoChannel {
    /// Create (or reuse) the FIFO at `path` and open it for reading.
    pub fn create(path: &Path) -> Result<Self, FifoError> {
        let created = make_fifo(path).map_err(FifoError::Create)?;
        let file = open_or_clean_up(path, created, |p| {
            OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(p)
        })?;

        info!("Command channel ready at '{}'", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
            lines: LineAssembler::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandSource for FifoChannel {
    fn poll_line(&mut self) -> Option<String> {
        if let Some(line) = self.lines.next_line() {
            return Some(line);
        }

        let mut chunk = [0u8; MAX_LINE_LEN];
        match self.file.read(&mut chunk) {
            // No writer attached (or it just hung up).
            Ok(0) => self.lines.flush(),
            Ok(n) => self.lines.push(&chunk[..n]),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
            Err(e) => warn!("error reading fifo '{}': {}", self.path.display(), e),
        }
        self.lines.next_line()
    }
}

impl Drop for FifoChannel {
    fn drop(&mut self) {
        remove_fifo(&self.path);
    }
}

/// Run `open`; on failure remove the FIFO again, but only if `created`.
fn open_or_clean_up(
    path: &Path,
    created: bool,
    open: impl FnOnce(&Path) -> io::Result<File>,
) -> Result<File, FifoError> {
    open(path).map_err(|e| {
        if created {
            remove_fifo(path);
        }
        FifoError::Open(e)
    })
}

fn remove_fifo(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!("Removed fifo '{}'", path.display()),
        Err(e) => error!("error removing fifo '{}': {}", path.display(), e),
    }
}

/// `mkfifo(path, 0600)`. An existing FIFO is reused; any other existing
/// file is an error. Returns whether the FIFO was created by this call.
fn make_fifo(path: &Path) -> io::Result<bool> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;

    // SAFETY: `c_path` is a valid NUL-terminated string for the call's duration.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), libc::S_IRUSR | libc::S_IWUSR) };
    if rc == 0 {
        return Ok(true);
    }

    let err = io::Error::last_os_error();
    if err.kind() == ErrorKind::AlreadyExists {
        if fs::metadata(path)?.file_type().is_fifo() {
            warn!("fifo '{}' already exists, reusing it", path.display());
            return Ok(false);
        }
        return Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("'{}' exists and is not a fifo", path.display()),
        ));
    }
    Err(err)
}
