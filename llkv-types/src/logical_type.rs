//! The engine's logical type catalog.
//!
//! Every native column is typed by a [`LogicalType`]. Most variants are plain
//! engine types with a fixed physical representation. Two variants exist only
//! to carry Arrow extension annotations through the engine:
//!
//! - [`LogicalType::Extension`] for tags a codec was registered for; the
//!   values are held in the engine representation of the `storage` type and
//!   the serialized parameters are kept verbatim.
//! - [`LogicalType::Opaque`] for tags nothing was registered for; the engine
//!   does not interpret the values at all.

use std::fmt;

use arrow::datatypes::DataType;

/// Logical type of a native column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Boolean,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    BigInt,
    /// 64-bit IEEE-754 float.
    Double,
    Varchar,
    Blob,
    /// 128-bit UUID held in canonical byte order.
    Uuid,
    /// JSON document held as its UTF-8 text. The text is not re-parsed.
    ///
    /// The layout is the Arrow string layout the column must be exported
    /// in; `None` defers to the exporter's configured offset width.
    Json(Option<TextLayout>),
    Extension(ExtensionType),
    Opaque(OpaqueType),
}

/// Arrow UTF-8 string layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextLayout {
    /// `Utf8`: 32-bit offsets.
    Utf8,
    /// `LargeUtf8`: 64-bit offsets.
    LargeUtf8,
    /// `Utf8View`: inline/view representation.
    Utf8View,
}

impl TextLayout {
    pub fn from_data_type(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Utf8 => Some(TextLayout::Utf8),
            DataType::LargeUtf8 => Some(TextLayout::LargeUtf8),
            DataType::Utf8View => Some(TextLayout::Utf8View),
            _ => None,
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            TextLayout::Utf8 => DataType::Utf8,
            TextLayout::LargeUtf8 => DataType::LargeUtf8,
            TextLayout::Utf8View => DataType::Utf8View,
        }
    }
}

/// A registered extension tag layered over an engine storage type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionType {
    pub tag: String,
    /// Serialized type parameters exactly as received.
    pub metadata: Vec<u8>,
    pub storage: Box<LogicalType>,
}

/// An unregistered extension tag; values stay in their Arrow form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueType {
    pub tag: String,
    pub metadata: Vec<u8>,
    pub storage: DataType,
}

impl LogicalType {
    pub fn extension(tag: impl Into<String>, metadata: Vec<u8>, storage: LogicalType) -> Self {
        LogicalType::Extension(ExtensionType {
            tag: tag.into(),
            metadata,
            storage: Box::new(storage),
        })
    }

    pub fn opaque(tag: impl Into<String>, metadata: Vec<u8>, storage: DataType) -> Self {
        LogicalType::Opaque(OpaqueType {
            tag: tag.into(),
            metadata,
            storage,
        })
    }

    /// The type whose representation holds this type's values.
    ///
    /// Extension types resolve (recursively) to their storage type; every
    /// other type is its own storage.
    pub fn storage_type(&self) -> &LogicalType {
        match self {
            LogicalType::Extension(ext) => ext.storage.storage_type(),
            other => other,
        }
    }

    /// Extension tag carried by this type, if any.
    pub fn extension_tag(&self) -> Option<&str> {
        match self {
            LogicalType::Extension(ext) => Some(&ext.tag),
            LogicalType::Opaque(opaque) => Some(&opaque.tag),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Boolean => f.write_str("BOOLEAN"),
            LogicalType::Integer => f.write_str("INTEGER"),
            LogicalType::BigInt => f.write_str("BIGINT"),
            LogicalType::Double => f.write_str("DOUBLE"),
            LogicalType::Varchar => f.write_str("VARCHAR"),
            LogicalType::Blob => f.write_str("BLOB"),
            LogicalType::Uuid => f.write_str("UUID"),
            LogicalType::Json(_) => f.write_str("JSON"),
            LogicalType::Extension(ext) => write!(f, "{}({})", ext.tag, ext.storage),
            LogicalType::Opaque(opaque) => write!(f, "{}({:?})", opaque.tag, opaque.storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_type_resolves_nested_extensions() {
        let inner = LogicalType::extension("acme.inner", Vec::new(), LogicalType::Blob);
        let outer = LogicalType::extension("acme.outer", b"v1".to_vec(), inner);
        assert_eq!(outer.storage_type(), &LogicalType::Blob);
        assert_eq!(outer.extension_tag(), Some("acme.outer"));
        assert_eq!(outer.to_string(), "acme.outer(acme.inner(BLOB))");
    }

    #[test]
    fn opaque_keeps_arrow_storage() {
        let ty = LogicalType::opaque("acme.point", Vec::new(), DataType::Int64);
        assert_eq!(ty.storage_type(), &ty);
        assert_eq!(ty.to_string(), "acme.point(Int64)");
        assert_eq!(LogicalType::Uuid.extension_tag(), None);
    }

    #[test]
    fn text_layouts_map_to_string_types_only() {
        for layout in [TextLayout::Utf8, TextLayout::LargeUtf8, TextLayout::Utf8View] {
            assert_eq!(TextLayout::from_data_type(&layout.data_type()), Some(layout));
        }
        assert_eq!(TextLayout::from_data_type(&DataType::Binary), None);
        assert_eq!(
            LogicalType::Json(Some(TextLayout::Utf8View)).to_string(),
            "JSON"
        );
    }
}
