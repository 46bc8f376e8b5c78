//! Physical storage requirements for extension tags.
//!
//! Every registered tag has exactly one [`StorageSpec`]. Incoming arrays are
//! checked against it before any value is decoded; a mismatch aborts the
//! conversion and storage is never coerced.

use arrow::datatypes::DataType;
use llkv_result::{Error, Result};

/// Required physical encoding of an extension tag's storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageSpec {
    /// Fixed-size binary of exactly this many bytes per value.
    FixedSizeBinary(i32),
    /// Any Arrow UTF-8 layout: `Utf8`, `LargeUtf8` or `Utf8View`.
    Varchar,
    /// Exactly this Arrow type.
    Exact(DataType),
}

impl StorageSpec {
    pub fn matches(&self, data_type: &DataType) -> bool {
        match self {
            StorageSpec::FixedSizeBinary(width) => {
                matches!(data_type, DataType::FixedSizeBinary(w) if w == width)
            }
            StorageSpec::Varchar => matches!(
                data_type,
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
            ),
            StorageSpec::Exact(expected) => expected == data_type,
        }
    }

    /// Requirement text, completing the sentence "`<tag>` must be ...".
    pub fn describe(&self) -> String {
        match self {
            StorageSpec::FixedSizeBinary(width) => {
                format!("a fixed-size binary of {width} bytes")
            }
            StorageSpec::Varchar => "of a varchar format".to_string(),
            StorageSpec::Exact(expected) => format!("of type {expected:?}"),
        }
    }

    /// Check `data_type` against this spec for an array tagged `tag`.
    pub fn validate(&self, tag: &str, data_type: &DataType) -> Result<()> {
        if self.matches(data_type) {
            return Ok(());
        }
        Err(Error::type_mismatch(tag, self.describe(), data_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_binary_width_is_exact() {
        let spec = StorageSpec::FixedSizeBinary(16);
        assert!(spec.matches(&DataType::FixedSizeBinary(16)));
        assert!(!spec.matches(&DataType::FixedSizeBinary(4)));
        assert!(!spec.matches(&DataType::Binary));

        let err = spec
            .validate("arrow.uuid", &DataType::FixedSizeBinary(4))
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("arrow.uuid must be a fixed-size binary of 16 bytes")
        );
    }

    #[test]
    fn varchar_accepts_every_string_layout() {
        let spec = StorageSpec::Varchar;
        for dt in [DataType::Utf8, DataType::LargeUtf8, DataType::Utf8View] {
            assert!(spec.validate("arrow.json", &dt).is_ok());
        }
        let err = spec.validate("arrow.json", &DataType::Int32).unwrap_err();
        assert!(
            err.to_string()
                .contains("arrow.json must be of a varchar format ")
        );
        assert!(!spec.matches(&DataType::Binary));
    }

    #[test]
    fn exact_requires_identical_type() {
        let spec = StorageSpec::Exact(DataType::Int16);
        assert!(spec.matches(&DataType::Int16));
        let err = spec.validate("acme.small", &DataType::Int32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: acme.small must be of type Int16 but storage is Int32"
        );
    }
}
