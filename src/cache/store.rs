//! Persistent key/value backends for the cache
//!
//! The cache only needs a synchronous, string-only store that can enumerate its
//! keys. Every operation may fail (quota, permissions, disabled storage), so all
//! of them return `Result`.

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// File extension used for entries in a [`FileStore`]
const FILE_EXTENSION: &str = "json";

/// Longest escaped key used directly as a file stem; `NAME_MAX` is 255 bytes
const MAX_STEM_LEN: usize = 200;

/// Stem prefix for hashed file names; `escape_key` never emits it
const HASHED_STEM_PREFIX: char = '~';

/// Errors raised by a [`KeyValueStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The write would exceed the store's size limit
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    /// The store cannot be used at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous string key/value store shared with other writers
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    /// Lists every key currently stored, including ones this crate did not write
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store with an optional byte quota
///
/// The quota counts the UTF-8 length of every key and value, the same way
/// browser storage limits are usually accounted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty, unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses writes beyond `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.items
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.lock()?;

        if let Some(limit) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// Durable store keeping one JSON file per key in a directory
///
/// Uses `~/.cache/podcaster/` on Linux (or the platform equivalent) unless a
/// directory is given explicitly. Keys are escaped into file names so any
/// string is a legal key. Keys whose escaped form is too long for a file name
/// are stored as `~<sha256>.json`, with the escaped key on the file's first
/// line ahead of the value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "podcaster")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the entry files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> ItemPath {
        let escaped = escape_key(key);
        if escaped.len() <= MAX_STEM_LEN {
            ItemPath::Plain(self.dir.join(format!("{}.{}", escaped, FILE_EXTENSION)))
        } else {
            let mut hasher = Sha256::new();
            hasher.update(key.as_bytes());
            let stem = format!("{}{:x}", HASHED_STEM_PREFIX, hasher.finalize());
            ItemPath::Hashed {
                path: self.dir.join(format!("{}.{}", stem, FILE_EXTENSION)),
                header: escaped,
            }
        }
    }

    /// Reads the key recorded on the first line of a hashed file
    fn hashed_file_key(path: &Path) -> Result<Option<String>, StoreError> {
        let content = fs::read_to_string(path)?;
        Ok(content
            .split_once('\n')
            .and_then(|(header, _)| unescape_key(header)))
    }
}

/// Where a key lives on disk
enum ItemPath {
    /// File named after the escaped key
    Plain(PathBuf),
    /// File named after the key's hash, starting with `header` and a newline
    Hashed { path: PathBuf, header: String },
}

impl ItemPath {
    fn path(&self) -> &Path {
        match self {
            ItemPath::Plain(path) | ItemPath::Hashed { path, .. } => path,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let item = self.item_path(key);
        let content = match fs::read_to_string(item.path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match item {
            ItemPath::Plain(_) => Ok(Some(content)),
            ItemPath::Hashed { header, .. } => Ok(content
                .split_once('\n')
                .filter(|(stored, _)| *stored == header)
                .map(|(_, value)| value.to_string())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        match self.item_path(key) {
            ItemPath::Plain(path) => fs::write(path, value)?,
            ItemPath::Hashed { path, header } => fs::write(path, format!("{}\n{}", header, value))?,
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.item_path(key).path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let key = if stem.starts_with(HASHED_STEM_PREFIX) {
                match Self::hashed_file_key(&path) {
                    Ok(key) => key,
                    // Removed by another writer since the directory was listed
                    Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
                    Err(e) => return Err(e),
                }
            } else {
                unescape_key(stem)
            };
            if let Some(key) = key {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Escapes every byte outside `[A-Za-z0-9_-]` as `%XX`
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}

/// Reverses [`escape_key`]; returns `None` for names it could not have produced
fn unescape_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
                return None;
            }
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
