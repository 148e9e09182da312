//! # Protocol-Data Name Table
//!
//! Well-known protocol-data entry names appear in nearly every packet, so
//! their var-octet-string encodings are computed once and reused. The table
//! is an explicit value: build it, optionally register extra names, then
//! hand it to the codec. Entries are immutable once built, which makes a
//! shared table safe for any number of concurrent readers.
//!
//! A process-wide default covering the common names is available through
//! [`NameTable::common`]; it is initialized on first use and read-only
//! afterwards.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{CodecError, Result};
use crate::oer::Writer;

/// Names pre-registered in the default table.
const COMMON_NAMES: &[&str] = &[
    "auth",
    "auth_token",
    "auth_username",
    "balance",
    "from",
    "ilp",
    "info",
    "json",
    "to",
    "vouch",
];

static COMMON: Lazy<NameTable> = Lazy::new(NameTable::with_common_names);

/// Read-only lookup table from entry name to its pre-encoded
/// var-octet-string bytes (length prefix included).
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: HashMap<String, Vec<u8>>,
}

impl NameTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table seeded with the well-known names.
    pub fn with_common_names() -> Self {
        let mut table = Self::new();
        for name in COMMON_NAMES {
            // Names in COMMON_NAMES are ASCII by construction.
            table
                .register(name)
                .unwrap_or_else(|_| unreachable!("common names are ASCII"));
        }
        table
    }

    /// The shared default table. Built on first access, never mutated after.
    pub fn common() -> &'static NameTable {
        &COMMON
    }

    /// Pre-encode `name` and add it to the table.
    pub fn register(&mut self, name: &str) -> Result<()> {
        if !name.is_ascii() {
            return Err(CodecError::InvalidArgument(format!(
                "protocol-data name must be ASCII: {name:?}"
            )));
        }
        let mut writer = Writer::with_capacity(name.len() + 1);
        writer.write_var_octet_string(name.as_bytes());
        self.entries.insert(name.to_owned(), writer.into_vec());
        Ok(())
    }

    /// The pre-encoded bytes for `name`, if registered.
    pub fn lookup(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
