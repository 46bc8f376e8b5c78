//! Arrow arrays paired with an optional extension annotation.
//!
//! On the wire the annotation lives in the owning field's metadata under
//! [`EXTENSION_NAME_KEY`] and [`EXTENSION_METADATA_KEY`]. Inside the bridge it
//! travels with the array so a single column can be converted on its own.

use std::collections::HashMap;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{DataType, Field};
use llkv_result::{Error, Result};

use crate::tag::{EXTENSION_METADATA_KEY, EXTENSION_NAME_KEY, ExtensionTag};

/// Extension tag plus its opaque serialized parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAnnotation {
    tag: ExtensionTag,
    metadata: Vec<u8>,
}

impl ExtensionAnnotation {
    pub fn new(tag: ExtensionTag, metadata: Vec<u8>) -> Self {
        Self { tag, metadata }
    }

    #[inline]
    pub fn tag(&self) -> &ExtensionTag {
        &self.tag
    }

    #[inline]
    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }
}

/// A physical Arrow array, optionally tagged with an extension type.
///
/// The array is never modified by the bridge; conversions build new arrays
/// or share the immutable buffers.
#[derive(Debug, Clone)]
pub struct AnnotatedArray {
    array: ArrayRef,
    extension: Option<ExtensionAnnotation>,
}

impl AnnotatedArray {
    /// An untagged array.
    pub fn new(array: ArrayRef) -> Self {
        Self {
            array,
            extension: None,
        }
    }

    /// `array` tagged with `tag` and its serialized parameters.
    pub fn with_extension(array: ArrayRef, tag: ExtensionTag, metadata: Vec<u8>) -> Self {
        Self {
            array,
            extension: Some(ExtensionAnnotation::new(tag, metadata)),
        }
    }

    /// Read the annotation from `field` and pair it with `array`.
    ///
    /// The field must describe the array's physical type. A metadata key
    /// without a name key is ignored, as Arrow does.
    pub fn from_field(field: &Field, array: ArrayRef) -> Result<Self> {
        if field.data_type() != array.data_type() {
            return Err(Error::InvalidArgumentError(format!(
                "field '{}' declares {:?} but the array is {:?}",
                field.name(),
                field.data_type(),
                array.data_type()
            )));
        }

        let Some(name) = field.metadata().get(EXTENSION_NAME_KEY) else {
            return Ok(Self::new(array));
        };
        let tag = ExtensionTag::from_field_name(name.as_str())?;
        let metadata = field
            .metadata()
            .get(EXTENSION_METADATA_KEY)
            .map(|m| m.as_bytes().to_vec())
            .unwrap_or_default();
        Ok(Self::with_extension(array, tag, metadata))
    }

    /// Render a nullable field named `name` describing this array, with the
    /// annotation written to the field metadata.
    ///
    /// Arrow field metadata is text, so parameters that are not valid UTF-8
    /// cannot be represented and are reported as malformed.
    pub fn to_field(&self, name: &str) -> Result<Field> {
        let field = Field::new(name, self.array.data_type().clone(), true);
        let Some(ext) = &self.extension else {
            return Ok(field);
        };
        let metadata = String::from_utf8(ext.metadata.clone()).map_err(|_| {
            Error::malformed_metadata(
                ext.tag.as_str(),
                "parameters are not valid UTF-8 and cannot be stored in field metadata",
            )
        })?;
        let mut entries = HashMap::with_capacity(2);
        entries.insert(EXTENSION_NAME_KEY.to_string(), ext.tag.to_string());
        entries.insert(EXTENSION_METADATA_KEY.to_string(), metadata);
        Ok(field.with_metadata(entries))
    }

    #[inline]
    pub fn array(&self) -> &ArrayRef {
        &self.array
    }

    #[inline]
    pub fn data_type(&self) -> &DataType {
        self.array.data_type()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    #[inline]
    pub fn extension(&self) -> Option<&ExtensionAnnotation> {
        self.extension.as_ref()
    }

    pub fn tag(&self) -> Option<&ExtensionTag> {
        self.extension.as_ref().map(ExtensionAnnotation::tag)
    }

    /// Serialized parameters; empty for untagged arrays.
    pub fn metadata(&self) -> &[u8] {
        match &self.extension {
            Some(ext) => ext.metadata(),
            None => &[],
        }
    }

    pub fn into_parts(self) -> (ArrayRef, Option<ExtensionAnnotation>) {
        (self.array, self.extension)
    }
}

impl PartialEq for AnnotatedArray {
    fn eq(&self, other: &Self) -> bool {
        self.extension == other.extension && self.array.to_data() == other.array.to_data()
    }
}
