//! Retrying file opener.
//!
//! Opens a source file for shared read and retries lock contention a fixed
//! number of times with a fixed backoff. The retry decision is a pure
//! function over (attempt, error, policy) so the bounds are testable without
//! real sleeps; only [`FileOpener::open`] touches the clock. Every terminal
//! outcome emits one tracing event with the path, attempt count and elapsed
//! time.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gridport_core::{Error, Result};

/// Bounded retry configuration for lock contention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempt ceiling; attempt numbers start at 1
    pub max_attempts: u32,
    /// Fixed sleep between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// Decision taken after a failed open attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Sleep the backoff, then run the numbered attempt
    Retry { next_attempt: u32 },
    /// Missing file, terminal without retry
    FailNotFound,
    /// Lock contention exhausted or any other I/O failure, terminal
    FailLocked,
}

/// Whether an I/O error is lock contention worth retrying.
///
/// `WouldBlock` covers advisory-lock failures; 32 and 33 are the Windows
/// sharing-violation and lock-violation codes.
pub fn is_lock_contention(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    matches!(err.raw_os_error(), Some(32) | Some(33))
}

/// Pure retry decision, no I/O and no sleeping
pub fn next_step(attempt: u32, err: &io::Error, policy: &RetryPolicy) -> RetryStep {
    if err.kind() == io::ErrorKind::NotFound {
        return RetryStep::FailNotFound;
    }
    if is_lock_contention(err) && attempt < policy.max_attempts {
        return RetryStep::Retry {
            next_attempt: attempt + 1,
        };
    }
    RetryStep::FailLocked
}

/// Cooperative cancellation flag, checked between attempts only
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Opens source files for shared read under a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct FileOpener {
    policy: RetryPolicy,
    cancel: Option<CancelToken>,
}

impl FileOpener {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            cancel: None,
        }
    }

    /// Attach a cancellation token checked before each attempt
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Open `path` for reading, retrying lock contention.
    ///
    /// Classification: missing file fails `FileNotFound` without retrying,
    /// a zero-length file fails `EmptyFile`, lock contention retries up to
    /// the policy ceiling and then fails `FileLocked`, and any other I/O
    /// error fails `FileLocked` immediately.
    pub fn open(&self, path: &Path) -> Result<File> {
        let started = Instant::now();
        let mut attempt = 1u32;
        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    tracing::warn!(
                        attempts = attempt - 1,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "open cancelled: {}",
                        path.display()
                    );
                    return Err(Error::Cancelled);
                }
            }

            match File::open(path) {
                Ok(file) => {
                    let empty = file.metadata().map(|m| m.len() == 0).unwrap_or(false);
                    if empty {
                        tracing::warn!(
                            attempts = attempt,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "file is empty: {}",
                            path.display()
                        );
                        return Err(Error::EmptyFile(path.display().to_string()));
                    }
                    tracing::info!(
                        attempts = attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "opened {}",
                        path.display()
                    );
                    return Ok(file);
                }
                Err(err) => match next_step(attempt, &err, &self.policy) {
                    RetryStep::Retry { next_attempt } => {
                        std::thread::sleep(self.policy.backoff);
                        attempt = next_attempt;
                    }
                    RetryStep::FailNotFound => {
                        tracing::warn!(
                            attempts = attempt,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "file not found: {}",
                            path.display()
                        );
                        return Err(Error::FileNotFound {
                            path: path.display().to_string(),
                        });
                    }
                    RetryStep::FailLocked => {
                        tracing::warn!(
                            attempts = attempt,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            error = %err,
                            "giving up on {}",
                            path.display()
                        );
                        return Err(Error::FileLocked {
                            path: path.display().to_string(),
                            attempts: attempt,
                        });
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lock_error() -> io::Error {
        io::Error::new(io::ErrorKind::WouldBlock, "locked")
    }

    #[test]
    fn test_retry_steps_are_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(
            next_step(1, &lock_error(), &policy),
            RetryStep::Retry { next_attempt: 2 }
        );
        assert_eq!(
            next_step(2, &lock_error(), &policy),
            RetryStep::Retry { next_attempt: 3 }
        );
        // The third attempt is the last.
        assert_eq!(next_step(3, &lock_error(), &policy), RetryStep::FailLocked);
    }

    #[test]
    fn test_non_lock_errors_do_not_retry() {
        let policy = RetryPolicy::default();
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(next_step(1, &err, &policy), RetryStep::FailLocked);

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(next_step(1, &missing, &policy), RetryStep::FailNotFound);
    }

    #[test]
    fn test_windows_sharing_violation_is_contention() {
        assert!(is_lock_contention(&io::Error::from_raw_os_error(32)));
        assert!(is_lock_contention(&io::Error::from_raw_os_error(33)));
        assert!(!is_lock_contention(&io::Error::from_raw_os_error(13)));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileOpener::default()
            .open(&dir.path().join("absent.csv"))
            .unwrap_err();
        assert_eq!(err.kind(), gridport_core::ErrorKind::FileNotFound);
    }

    #[test]
    fn test_open_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        File::create(&path).unwrap();
        let err = FileOpener::default().open(&path).unwrap_err();
        assert_eq!(err.kind(), gridport_core::ErrorKind::EmptyFile);
    }

    #[test]
    fn test_open_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "a,b").unwrap();
        assert!(FileOpener::default().open(&path).is_ok());
    }

    #[test]
    fn test_cancelled_before_first_attempt() {
        let token = CancelToken::new();
        token.cancel();
        let dir = tempfile::tempdir().unwrap();
        let err = FileOpener::default()
            .with_cancel(token)
            .open(&dir.path().join("anything.csv"))
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
