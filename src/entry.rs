//! Chain nodes and their lifecycle.
//!
//! An entry starts unpopulated (no key) when it is linked into a chain,
//! and becomes populated once its key and value have been copied into
//! owned buffers. Destroying an entry is removing it from the arena,
//! which drops both buffers; unlinking it first is the caller's job.

use crate::error::MapError;
use slotmap::DefaultKey;

#[derive(Debug, Default)]
pub(crate) struct Entry {
    key: Option<String>,
    value: Option<String>,
    pub(crate) next: Option<DefaultKey>,
}

impl Entry {
    /// A fresh, unpopulated, unlinked entry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn is_populated(&self) -> bool {
        self.key.is_some()
    }

    #[inline]
    pub(crate) fn matches(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    pub(crate) fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub(crate) fn pair(&self) -> Option<(&str, &str)> {
        Some((self.key.as_deref()?, self.value.as_deref()?))
    }

    /// Copy `key` and `value` into the entry. Only valid on an unpopulated
    /// entry. On failure the entry is left unpopulated.
    pub(crate) fn populate(&mut self, key: &str, value: &str) -> Result<(), MapError> {
        debug_assert!(!self.is_populated(), "populate on a populated entry");
        let key = copy_str(key)?;
        // `key` is dropped here if the value copy fails.
        let value = copy_str(value)?;
        self.key = Some(key);
        self.value = Some(value);
        Ok(())
    }

    /// Replace the value of a populated entry. The current buffer is reused
    /// when it can hold `value`; otherwise a new one is reserved first, so
    /// a failed reservation leaves the old value in place.
    pub(crate) fn replace_value(&mut self, value: &str) -> Result<(), MapError> {
        debug_assert!(self.is_populated(), "replace_value on an unpopulated entry");
        if let Some(buf) = self
            .value
            .as_mut()
            .filter(|buf| buf.capacity() >= value.len())
        {
            buf.clear();
            buf.push_str(value);
            return Ok(());
        }
        self.value = Some(copy_str(value)?);
        Ok(())
    }
}

/// Owned copy of `src` with a fallible reservation.
pub(crate) fn copy_str(src: &str) -> Result<String, MapError> {
    let mut buf = String::new();
    buf.try_reserve_exact(src.len())?;
    buf.push_str(src);
    Ok(buf)
}
