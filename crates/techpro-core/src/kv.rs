//! The key/value persistence adapter.
//!
//! A [`KvStore`] is a string-keyed, string-valued host (an in-memory map, a
//! SQLite table, ...). [`JsonKv`] layers JSON encoding on top and absorbs
//! every read failure into `None`.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  sync::{Arc, Mutex},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

// ─── Host trait ──────────────────────────────────────────────────────────────

/// A string-keyed, string-valued persistent store.
pub trait KvStore {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, overwriting any prior value.
  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

  /// Delete `key`. Removing an absent key is not an error.
  fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
  type Error = T::Error;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    (**self).set(key, value)
  }

  fn remove(&self, key: &str) -> Result<(), Self::Error> {
    (**self).remove(key)
  }
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
  type Error = T::Error;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    (**self).set(key, value)
  }

  fn remove(&self, key: &str) -> Result<(), Self::Error> {
    (**self).remove(key)
  }
}

// ─── In-memory host ──────────────────────────────────────────────────────────

/// A process-local store. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKv {
  entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKv {
  pub fn new() -> Self { Self::default() }

  fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl KvStore for MemoryKv {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.entries().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Infallible> {
    self.entries().insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), Infallible> {
    self.entries().remove(key);
    Ok(())
  }
}

// ─── JSON adapter ────────────────────────────────────────────────────────────

/// JSON values over a [`KvStore`].
#[derive(Debug, Default)]
pub struct JsonKv<K> {
  host: K,
}

impl<K: KvStore> JsonKv<K> {
  pub fn new(host: K) -> Self { Self { host } }

  pub fn host(&self) -> &K { &self.host }

  /// Read and decode `key`.
  ///
  /// Never fails: a missing key, a host error, or a value that does not
  /// decode as `T` all yield `None`.
  pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let raw = match self.host.get(key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        tracing::warn!(key, error = %e, "storage read failed; treating as absent");
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!(key, error = %e, "stored value does not decode; treating as absent");
        None
      }
    }
  }

  /// Encode `value` as JSON and store it under `key`.
  pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    self
      .host
      .set(key, &raw)
      .map_err(|e| Error::Storage(Box::new(e)))?;
    tracing::debug!(key, bytes = raw.len(), "wrote value");
    Ok(())
  }

  pub fn remove(&self, key: &str) -> Result<()> {
    self
      .host
      .remove(key)
      .map_err(|e| Error::Storage(Box::new(e)))
  }
}
