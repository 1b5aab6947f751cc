//! FileKeyValueStore - one JSON document per key inside a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// File-backed key-value store.
///
/// Each key maps to `<root>/<encoded key>.json`. Writes go to a staging file
/// that is renamed into place, so readers never observe a half-written
/// document. A batch that fails part way through its renames puts back the
/// documents it already replaced.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::io(&root.to_string_lossy(), &e))?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }

    fn staging_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.json.tmp", encode_key(key)))
    }

    fn stage(&self, key: &str, value: &str) -> Result<PathBuf, StorageError> {
        let staging = self.staging_path(key);
        fs::write(&staging, value).map_err(|e| StorageError::io(key, &e))?;
        Ok(staging)
    }

    /// Stage `value` and rename it over the live document. Caller holds the
    /// write lock.
    fn replace(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let staging = self.stage(key, value)?;
        fs::rename(&staging, self.document_path(key)).map_err(|e| StorageError::io(key, &e))
    }

    /// Put back what each document held before a batch started landing,
    /// newest first.
    fn restore(&self, landed: Vec<(&str, Option<String>)>) {
        for (key, previous) in landed.into_iter().rev() {
            let restored = match previous {
                Some(value) => self.replace(key, &value),
                None => fs::remove_file(self.document_path(key))
                    .map_err(|e| StorageError::io(key, &e)),
            };
            if let Err(err) = restored {
                warn!(key, error = %err, "batch rollback failed, document left at new value");
            }
        }
    }
}

fn discard<'p>(staging: impl IntoIterator<Item = &'p PathBuf>) {
    for path in staging {
        if let Err(err) = fs::remove_file(path) {
            debug!(path = %path.display(), error = %err, "staging file not removed");
        }
    }
}

/// Encode a key into a portable file stem.
///
/// ASCII alphanumerics, `-`, `_` and `.` pass through; every other byte
/// becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.document_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, &e)),
        }
    }

    fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned("write"))?;
        self.replace(key, &value)
    }

    fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned("write_batch"))?;

        // Stage everything before touching a live document.
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in &entries {
            match self.stage(key, value) {
                Ok(path) => staged.push((key.as_str(), path)),
                Err(err) => {
                    discard(staged.iter().map(|(_, path)| path));
                    return Err(err);
                }
            }
        }

        // Keep each document's previous contents so a failed rename can be
        // undone.
        let mut landed = Vec::with_capacity(staged.len());
        for (index, (key, path)) in staged.iter().enumerate() {
            let renamed = self.read(key).and_then(|previous| {
                fs::rename(path, self.document_path(key))
                    .map(|()| previous)
                    .map_err(|e| StorageError::io(key, &e))
            });
            match renamed {
                Ok(previous) => landed.push((*key, previous)),
                Err(err) => {
                    discard(staged[index..].iter().map(|(_, path)| path));
                    self.restore(landed);
                    return Err(err);
                }
            }
        }
        debug!(keys = entries.len(), root = %self.root.display(), "batch written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned("remove"))?;
        match fs::remove_file(self.document_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(key, &e)),
        }
    }
}
