//! Decode/encode capabilities attached to registered extension tags.
//!
//! A codec only ever sees storage that already passed the tag's
//! [`StorageSpec`](crate::storage::StorageSpec) check. It is responsible for
//! the metadata blob (rejecting what it cannot parse) and for turning storage
//! values into engine values and back. `encode` must be the exact inverse of
//! `decode` for every value `decode` can produce.

use std::fmt;

use arrow::array::{Array, ArrayRef};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use llkv_result::{Error, Result};
use llkv_types::{ColumnData, LogicalType, NativeColumn, TextLayout};

use crate::options::BridgeOptions;
use crate::physical;
use crate::tag::ExtensionTag;

/// Conversion between one extension tag's storage and engine values.
pub trait ExtensionCodec: Send + Sync + fmt::Debug {
    /// Decode validated `storage` tagged `tag` with serialized parameters
    /// `metadata`. Null slots become nulls without being decoded.
    fn decode(
        &self,
        tag: &ExtensionTag,
        metadata: &[u8],
        storage: &dyn Array,
        options: &BridgeOptions,
    ) -> Result<NativeColumn>;

    /// Encode `column` back into storage for `tag`, returning the storage
    /// array and the serialized parameters (empty when the tag has none).
    fn encode(
        &self,
        tag: &ExtensionTag,
        column: &NativeColumn,
        options: &BridgeOptions,
    ) -> Result<(ArrayRef, Vec<u8>)>;
}

fn unexpected_column(tag: &ExtensionTag, column: &NativeColumn) -> Error {
    Error::Internal(format!(
        "{tag} codec cannot encode a {} column",
        column.logical_type()
    ))
}

/// `arrow.uuid`: 16-byte fixed-size binary ↔ UUID. Takes no parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidCodec;

impl ExtensionCodec for UuidCodec {
    fn decode(
        &self,
        tag: &ExtensionTag,
        metadata: &[u8],
        storage: &dyn Array,
        _options: &BridgeOptions,
    ) -> Result<NativeColumn> {
        if !metadata.is_empty() {
            return Err(Error::malformed_metadata(
                tag.as_str(),
                format!("expected no parameters, got {} bytes", metadata.len()),
            ));
        }
        Ok(NativeColumn::uuid(physical::uuid_values(storage)?))
    }

    fn encode(
        &self,
        tag: &ExtensionTag,
        column: &NativeColumn,
        _options: &BridgeOptions,
    ) -> Result<(ArrayRef, Vec<u8>)> {
        match column.data() {
            ColumnData::Uuid(values) => Ok((physical::uuid_storage(values)?, Vec::new())),
            _ => Err(unexpected_column(tag, column)),
        }
    }
}

/// `arrow.json`: UTF-8 text ↔ JSON text.
///
/// Parameters must be empty or an empty JSON object. Values are taken as
/// text; they are only parsed when [`BridgeOptions::validate_json`] is set.
/// The incoming string layout is re-emitted on export.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    fn check_metadata(tag: &ExtensionTag, metadata: &[u8]) -> Result<()> {
        if metadata.is_empty() {
            return Ok(());
        }
        match serde_json::from_slice::<serde_json::Value>(metadata) {
            Ok(serde_json::Value::Object(members)) if members.is_empty() => Ok(()),
            Ok(other) => Err(Error::malformed_metadata(
                tag.as_str(),
                format!("expected an empty JSON object, got {other}"),
            )),
            Err(err) => Err(Error::malformed_metadata(tag.as_str(), err)),
        }
    }
}

impl ExtensionCodec for JsonCodec {
    fn decode(
        &self,
        tag: &ExtensionTag,
        metadata: &[u8],
        storage: &dyn Array,
        options: &BridgeOptions,
    ) -> Result<NativeColumn> {
        Self::check_metadata(tag, metadata)?;
        let values = physical::string_values(storage)?;
        if options.validate_json {
            for (row, text) in values.iter().enumerate() {
                if let Some(text) = text
                    && let Err(err) = serde_json::from_str::<serde_json::Value>(text)
                {
                    return Err(Error::InvalidArgumentError(format!(
                        "{tag} value at row {row} is not valid JSON: {err}"
                    )));
                }
            }
        }
        // Only a layout the exporter would not choose on its own is recorded.
        let layout = TextLayout::from_data_type(storage.data_type())
            .filter(|layout| *layout != options.offset_size.text_layout());
        Ok(NativeColumn::json_with_layout(values, layout))
    }

    fn encode(
        &self,
        tag: &ExtensionTag,
        column: &NativeColumn,
        options: &BridgeOptions,
    ) -> Result<(ArrayRef, Vec<u8>)> {
        match (column.logical_type(), column.data()) {
            (LogicalType::Json(layout), ColumnData::Json(values)) => {
                let layout = layout.unwrap_or_else(|| options.offset_size.text_layout());
                Ok((physical::text_array(values, layout), Vec::new()))
            }
            _ => Err(unexpected_column(tag, column)),
        }
    }
}

/// Generic codec for user-defined tags: the values are the engine's plain
/// conversion of the storage, and the parameters are kept byte-for-byte.
///
/// Encoding casts back to `storage` so the exported array has exactly the
/// registered storage type even when the engine widened it on import.
#[derive(Debug, Clone)]
pub struct StorageCodec {
    storage: DataType,
}

impl StorageCodec {
    pub fn new(storage: DataType) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &DataType {
        &self.storage
    }
}

impl ExtensionCodec for StorageCodec {
    fn decode(
        &self,
        tag: &ExtensionTag,
        metadata: &[u8],
        storage: &dyn Array,
        _options: &BridgeOptions,
    ) -> Result<NativeColumn> {
        let (plain_type, data) = physical::import_array(storage)?.into_parts();
        NativeColumn::try_new(
            LogicalType::extension(tag.as_str(), metadata.to_vec(), plain_type),
            data,
        )
    }

    fn encode(
        &self,
        tag: &ExtensionTag,
        column: &NativeColumn,
        options: &BridgeOptions,
    ) -> Result<(ArrayRef, Vec<u8>)> {
        let LogicalType::Extension(ext) = column.logical_type() else {
            return Err(unexpected_column(tag, column));
        };
        let array = physical::export_data(column.data(), options)?;
        let array = if array.data_type() == &self.storage {
            array
        } else {
            cast(array.as_ref(), &self.storage)?
        };
        Ok((array, ext.metadata.clone()))
    }
}
