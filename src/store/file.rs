//! JsonFileStore - the collection as a pretty-printed JSON array in one file.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{StoreError, UserStore};
use crate::user::User;

/// File-backed user store.
///
/// Reads fall back to an optional backup file when the primary file does not
/// exist. Writes go to a sibling `.tmp` file that is then renamed over the
/// primary, so readers never see a half-written collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    backup_path: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_path: None,
        }
    }

    /// Read from `backup_path` when the primary file is missing.
    pub fn with_backup(mut self, backup_path: impl Into<PathBuf>) -> Self {
        self.backup_path = Some(backup_path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Write `bytes` and flush them to disk before returning.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// `Ok(None)` when the file does not exist.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::Io(format!("{}: {}", path.display(), err))),
    }
}

fn decode(path: &Path, bytes: &[u8]) -> Result<Vec<User>, StoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes)
        .map_err(|err| StoreError::Corrupt(format!("{}: {}", path.display(), err)))
}

impl UserStore for JsonFileStore {
    fn read(&self) -> Result<Vec<User>, StoreError> {
        if let Some(bytes) = read_optional(&self.path)? {
            let users = decode(&self.path, &bytes)?;
            debug!(path = %self.path.display(), count = users.len(), "read users");
            return Ok(users);
        }

        if let Some(backup) = &self.backup_path {
            if let Some(bytes) = read_optional(backup)? {
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "primary users file missing, reading backup"
                );
                return decode(backup, &bytes);
            }
        }

        info!(path = %self.path.display(), "no users file yet, starting empty");
        Ok(Vec::new())
    }

    fn write(&self, users: &[User]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(users)?;
        let tmp_path = self.tmp_path();
        write_synced(&tmp_path, &json)
            .map_err(|err| StoreError::Io(format!("{}: {}", tmp_path.display(), err)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|err| StoreError::Io(format!("{}: {}", self.path.display(), err)))?;

        debug!(path = %self.path.display(), count = users.len(), "wrote users");
        Ok(())
    }
}
