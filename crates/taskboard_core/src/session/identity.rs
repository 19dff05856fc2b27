//! Durable local identity storage.
//!
//! # Responsibility
//! - Define the durable store contract for the serialized active-user
//!   copy: read, replace, clear.
//! - Provide a JSON-file store for real use and a shared in-memory store
//!   for tests.
//!
//! # Invariants
//! - The store holds at most one serialized identity.
//! - An absent value is a normal state, not an error.

use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

pub type IdentityResult<T> = Result<T, IdentityStoreError>;

/// Failure while reading or writing the durable identity copy.
#[derive(Debug)]
pub enum IdentityStoreError {
    Io(io::Error),
}

impl Display for IdentityStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "identity store io failure: {err}"),
        }
    }
}

impl Error for IdentityStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for IdentityStoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Durable store contract consumed by the session manager.
///
/// Contents are opaque at this layer; (de)serialization of the user copy
/// belongs to the session manager.
pub trait IdentityStore {
    /// Returns the stored serialized identity, or `None` when absent.
    fn get(&self) -> IdentityResult<Option<String>>;

    /// Replaces the stored identity.
    fn set(&self, serialized: &str) -> IdentityResult<()>;

    /// Removes the stored identity; clearing an empty store succeeds.
    fn clear(&self) -> IdentityResult<()>;
}

/// Identity store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn get(&self) -> IdentityResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, serialized: &str) -> IdentityResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn clear(&self) -> IdentityResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Shared in-memory identity store.
///
/// Clones share one cell, so a test can hand a clone to the session
/// manager and still observe persisted/cleared state afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    value: Rc<RefCell<Option<String>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-loads a serialized identity, as if persisted by a previous run.
    pub fn with_value(serialized: &str) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(serialized.to_string()))),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn get(&self) -> IdentityResult<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn set(&self, serialized: &str) -> IdentityResult<()> {
        *self.value.borrow_mut() = Some(serialized.to_string());
        Ok(())
    }

    fn clear(&self) -> IdentityResult<()> {
        *self.value.borrow_mut() = None;
        Ok(())
    }
}
