// SPDX-License-Identifier: AGPL-3.0-only
//! JSON state file for a deployed ledger.
//!
//! Writes go to `<path>.tmp` first, are synced to disk and then renamed into
//! place, so an interrupted save never leaves a truncated state file behind.
//! Loads re-run [`TokenLedger::check_invariants`] and refuse a file that
//! fails it.
//!
//! A load → mutate → save cycle should hold a [`StoreLock`] (an exclusive
//! `flock` on `<path>.lock`) so two processes cannot interleave and drop
//! each other's writes.

use crate::error::TokenError;
use crate::token::TokenLedger;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no ledger deployed at {0}")]
    NotFound(PathBuf),
    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("state file is corrupt: {0}")]
    Corrupt(#[from] TokenError),
    #[error("state file {0} is locked by another process")]
    Locked(PathBuf),
}

/// Exclusive advisory lock on a state file; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            // SAFETY: the fd is owned by `self.file` and still open.
            unsafe { libc::flock(self.file.as_raw_fd(), libc::LOCK_UN) };
        }
        debug!("released lock {}", self.path.display());
    }
}

#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<TokenLedger, StoreError> {
        if !self.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }
        let data = fs::read_to_string(&self.path)?;
        let ledger: TokenLedger = serde_json::from_str(&data)?;
        ledger.check_invariants()?;
        info!(
            "loaded {} ledger from {} ({} events)",
            ledger.symbol(),
            self.path.display(),
            ledger.event_log().len()
        );
        Ok(ledger)
    }

    pub fn save(&self, ledger: &TokenLedger) -> Result<(), StoreError> {
        self.create_parent()?;
        let json = serde_json::to_string_pretty(ledger)?;
        let tmp = self.sibling("tmp");

        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        debug!("saved ledger to {}", self.path.display());
        Ok(())
    }

    /// Take the exclusive lock without blocking; fails with
    /// [`StoreError::Locked`] when another holder has it.
    pub fn lock(&self) -> Result<StoreLock, StoreError> {
        self.create_parent()?;
        let path = self.sibling("lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        #[cfg(unix)]
        {
            // SAFETY: the fd is owned by `file` and still open.
            let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
            if ret != 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::WouldBlock {
                    warn!("{} is held by another process", path.display());
                    return Err(StoreError::Locked(self.path.clone()));
                }
                return Err(err.into());
            }
        }

        debug!("acquired lock {}", path.display());
        Ok(StoreLock { file, path })
    }

    fn create_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }
}
