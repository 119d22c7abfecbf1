use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{path:?} exists but is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("cannot write under {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory that receives downloaded images.
///
/// Each image lands via a temp file in the same directory followed by a
/// rename, so a reader sees either the previous file or the complete new one.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if needed.
    pub fn prepare(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| self.io_error(source))?;
        if !self.dir.is_dir() {
            return Err(PersistError::NotADirectory {
                path: self.dir.clone(),
            });
        }
        Ok(())
    }

    /// Stores `bytes` as `filename`, replacing any earlier file of that name.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        self.prepare()?;

        let target = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(|source| self.io_error(source))?;
        staged
            .write_all(bytes)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|source| self.io_error(source))?;
        staged
            .persist(&target)
            .map_err(|err| self.io_error(err.error))?;
        Ok(target)
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.dir.clone(),
            source,
        }
    }
}
