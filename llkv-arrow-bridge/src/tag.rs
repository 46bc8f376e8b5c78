//! Extension tags and the Arrow field metadata keys that carry them.

use std::borrow::Borrow;
use std::fmt;

use llkv_result::{Error, Result};

/// Field metadata key holding the extension name.
pub const EXTENSION_NAME_KEY: &str = "ARROW:extension:name";
/// Field metadata key holding the serialized extension parameters.
pub const EXTENSION_METADATA_KEY: &str = "ARROW:extension:metadata";

/// Canonical UUID extension: 16-byte fixed-size binary storage.
pub const UUID_TAG: &str = "arrow.uuid";
/// Canonical JSON extension: UTF-8 text storage.
pub const JSON_TAG: &str = "arrow.json";

/// Namespaced identifier of an extension type family, e.g. `arrow.uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionTag(String);

impl ExtensionTag {
    /// Validate and wrap `name`. Tags must be non-empty and free of
    /// surrounding whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgumentError(
                "extension tag must not be empty".into(),
            ));
        }
        if name.trim() != name {
            return Err(Error::InvalidArgumentError(format!(
                "extension tag '{name}' has surrounding whitespace"
            )));
        }
        Ok(Self(name))
    }

    /// Wrap a name read from Arrow field metadata. Only the empty name is
    /// refused; any other name is kept verbatim so the array can pass
    /// through and be written back unchanged.
    pub fn from_field_name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgumentError(
                "extension tag must not be empty".into(),
            ));
        }
        Ok(Self(name))
    }

    /// Wrap a compile-time tag known to be well formed.
    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(name.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the canonical tags every Arrow implementation
    /// agrees on.
    pub fn is_canonical(&self) -> bool {
        matches!(self.0.as_str(), UUID_TAG | JSON_TAG)
    }
}

impl fmt::Display for ExtensionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ExtensionTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExtensionTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ExtensionTag {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}
