//! SD card storage adapter.
//!
//! Implements [`FileStoragePort`] over a directory on a mounted FAT
//! volume.  ESP-IDF exposes the card through its VFS layer, so the same
//! `std::fs` code runs on the device (rooted at `/sdcard`) and on the host
//! (rooted at any directory, e.g. a tempdir in tests).
//!
//! The card is probed once at boot with [`SdCardAdapter::probe`].  If the
//! probe fails the controller runs for the whole session without
//! persistence; there is no hot-plug.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::{FileStoragePort, StorageError};

pub struct SdCardAdapter {
    root: PathBuf,
}

impl SdCardAdapter {
    /// Wrap the directory at `root`.  Nothing is touched until
    /// [`probe`](Self::probe) or the first port call.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Check that the root is a usable directory.
    ///
    /// Returns `Err(StorageError::Unavailable)` when the volume is not
    /// mounted (or the directory does not exist on the host).
    pub fn probe(&self) -> Result<(), StorageError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {
                info!("SD: volume ready at {}", self.root.display());
                Ok(())
            }
            Ok(_) => {
                warn!("SD: {} is not a directory", self.root.display());
                Err(StorageError::Unavailable)
            }
            Err(e) => {
                warn!("SD: {} not accessible ({})", self.root.display(), e);
                Err(StorageError::Unavailable)
            }
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn map_io(e: &std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        _ => StorageError::IoError,
    }
}

impl FileStoragePort for SdCardAdapter {
    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        fs::read(self.path(name)).map_err(|e| map_io(&e))
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        fs::write(self.path(name), data).map_err(|e| {
            warn!("SD: write {} failed: {}", name, e);
            map_io(&e)
        })
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!("SD: remove {} failed: {}", name, e);
                Err(StorageError::IoError)
            }
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }
}
