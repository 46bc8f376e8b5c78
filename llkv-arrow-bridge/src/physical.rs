//! Untagged conversion between Arrow arrays and native columns.
//!
//! Import maps each Arrow physical type onto the engine type that holds it
//! without loss. Export maps each engine representation onto one Arrow type,
//! honoring the offset width and UUID settings in [`BridgeOptions`].

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BinaryViewArray, BooleanArray, FixedSizeBinaryArray,
    Float32Array, Float64Array, Int8Array, Int16Array, Int32Array, Int64Array, LargeBinaryArray,
    LargeStringArray, StringArray, StringViewArray, UInt8Array, UInt16Array, UInt32Array,
    UInt64Array,
};
use arrow::buffer::{Buffer, NullBuffer};
use arrow::datatypes::DataType;
use llkv_result::{Error, Result};
use llkv_types::internal::FixedWidth;
use llkv_types::{ColumnData, LogicalType, NativeColumn, TextLayout, Uuid};

use crate::options::{ArrowOffsetSize, BridgeOptions};

/// Downcast `array` to its concrete type, reporting a mismatch between the
/// declared `DataType` and the concrete array as an internal error.
pub(crate) fn downcast<T: Array + 'static>(array: &dyn Array) -> Result<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::Internal(format!(
            "{:?} array is not a {}",
            array.data_type(),
            std::any::type_name::<T>()
        ))
    })
}

/* ============================== IMPORT ============================== */

/// Whether [`import_array`] has a native counterpart for `data_type`.
pub fn has_native_counterpart(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Utf8View
            | DataType::Binary
            | DataType::LargeBinary
            | DataType::BinaryView
            | DataType::FixedSizeBinary(_)
    )
}

/// Convert an untagged array by its physical type.
pub fn import_array(array: &dyn Array) -> Result<NativeColumn> {
    macro_rules! widen {
        ($arrow:ty, $variant:ident, $logical:expr) => {{
            let a = downcast::<$arrow>(array)?;
            (
                $logical,
                ColumnData::$variant(a.iter().map(|v| v.map(Into::into)).collect()),
            )
        }};
    }

    let (logical_type, data) = match array.data_type() {
        DataType::Boolean => {
            let a = downcast::<BooleanArray>(array)?;
            (LogicalType::Boolean, ColumnData::Boolean(a.iter().collect()))
        }
        DataType::Int8 => widen!(Int8Array, Integer, LogicalType::Integer),
        DataType::Int16 => widen!(Int16Array, Integer, LogicalType::Integer),
        DataType::Int32 => widen!(Int32Array, Integer, LogicalType::Integer),
        DataType::UInt8 => widen!(UInt8Array, Integer, LogicalType::Integer),
        DataType::UInt16 => widen!(UInt16Array, Integer, LogicalType::Integer),
        DataType::Int64 => widen!(Int64Array, BigInt, LogicalType::BigInt),
        DataType::UInt32 => widen!(UInt32Array, BigInt, LogicalType::BigInt),
        DataType::UInt64 => {
            let a = downcast::<UInt64Array>(array)?;
            let values = a
                .iter()
                .map(|v| {
                    v.map(|x| {
                        i64::try_from(x).map_err(|_| {
                            Error::InvalidArgumentError(format!(
                                "UInt64 value {x} does not fit in BIGINT"
                            ))
                        })
                    })
                    .transpose()
                })
                .collect::<Result<Vec<_>>>()?;
            (LogicalType::BigInt, ColumnData::BigInt(values))
        }
        DataType::Float32 => widen!(Float32Array, Double, LogicalType::Double),
        DataType::Float64 => widen!(Float64Array, Double, LogicalType::Double),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            (LogicalType::Varchar, ColumnData::Varchar(string_values(array)?))
        }
        DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => {
            (LogicalType::Blob, ColumnData::Blob(binary_values(array)?))
        }
        other => {
            return Err(Error::InvalidArgumentError(format!(
                "unsupported Arrow type {other:?}: no native counterpart"
            )));
        }
    };

    tracing::trace!(
        "[BRIDGE] untagged {:?} -> {} ({} rows)",
        array.data_type(),
        logical_type,
        array.len()
    );
    NativeColumn::try_new(logical_type, data)
}

/// Owned text of any UTF-8 layout. Null slots stay `None`.
pub(crate) fn string_values(array: &dyn Array) -> Result<Vec<Option<String>>> {
    let owned = |v: Option<&str>| v.map(str::to_owned);
    match array.data_type() {
        DataType::Utf8 => Ok(downcast::<StringArray>(array)?.iter().map(owned).collect()),
        DataType::LargeUtf8 => Ok(downcast::<LargeStringArray>(array)?
            .iter()
            .map(owned)
            .collect()),
        DataType::Utf8View => Ok(downcast::<StringViewArray>(array)?
            .iter()
            .map(owned)
            .collect()),
        other => Err(Error::Internal(format!("{other:?} is not a string layout"))),
    }
}

fn binary_values(array: &dyn Array) -> Result<Vec<Option<Vec<u8>>>> {
    let owned = |v: Option<&[u8]>| v.map(<[u8]>::to_vec);
    match array.data_type() {
        DataType::Binary => Ok(downcast::<BinaryArray>(array)?.iter().map(owned).collect()),
        DataType::LargeBinary => Ok(downcast::<LargeBinaryArray>(array)?
            .iter()
            .map(owned)
            .collect()),
        DataType::BinaryView => Ok(downcast::<BinaryViewArray>(array)?
            .iter()
            .map(owned)
            .collect()),
        DataType::FixedSizeBinary(_) => Ok(downcast::<FixedSizeBinaryArray>(array)?
            .iter()
            .map(owned)
            .collect()),
        other => Err(Error::Internal(format!("{other:?} is not a binary layout"))),
    }
}

/// Decode 16-byte fixed-size binary storage into UUIDs.
///
/// Null slots are not decoded, whatever bytes they hold.
pub(crate) fn uuid_values(array: &dyn Array) -> Result<Vec<Option<Uuid>>> {
    let a = downcast::<FixedSizeBinaryArray>(array)?;
    if a.value_length() as usize != Uuid::WIDTH {
        return Err(Error::Internal(format!(
            "UUID storage has width {}",
            a.value_length()
        )));
    }
    a.iter()
        .map(|v| {
            v.map(Uuid::read_bytes)
                .transpose()
                .map_err(|e| Error::Internal(format!("UUID decode failed: {e:?}")))
        })
        .collect()
}

/* ============================== EXPORT ============================== */

/// Encode UUIDs as 16-byte fixed-size binary storage.
///
/// Null slots are zero-filled and marked invalid; the validity buffer is
/// only attached when at least one slot is null.
pub(crate) fn uuid_storage(values: &[Option<Uuid>]) -> Result<ArrayRef> {
    let mut bytes = Vec::with_capacity(values.len() * Uuid::WIDTH);
    let mut validity = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Some(uuid) => {
                uuid.write_bytes(&mut bytes);
                validity.push(true);
            }
            None => {
                Uuid::write_null(&mut bytes);
                validity.push(false);
            }
        }
    }
    let nulls = validity
        .contains(&false)
        .then(|| NullBuffer::from(validity));
    let array = FixedSizeBinaryArray::try_new(
        Uuid::WIDTH as i32,
        Buffer::from_vec(bytes),
        nulls,
    )?;
    Ok(Arc::new(array))
}

pub(crate) fn text_array(values: &[Option<String>], layout: TextLayout) -> ArrayRef {
    let iter = values.iter().map(Option::as_deref);
    match layout {
        TextLayout::Utf8 => Arc::new(iter.collect::<StringArray>()),
        TextLayout::LargeUtf8 => Arc::new(iter.collect::<LargeStringArray>()),
        TextLayout::Utf8View => Arc::new(iter.collect::<StringViewArray>()),
    }
}

fn binary_array(values: &[Option<Vec<u8>>], offset_size: ArrowOffsetSize) -> ArrayRef {
    let iter = values.iter().map(Option::as_deref);
    match offset_size {
        ArrowOffsetSize::Regular => Arc::new(iter.collect::<BinaryArray>()),
        ArrowOffsetSize::Large => Arc::new(iter.collect::<LargeBinaryArray>()),
    }
}

/// Export native values without any extension annotation.
pub fn export_data(data: &ColumnData, options: &BridgeOptions) -> Result<ArrayRef> {
    let array: ArrayRef = match data {
        ColumnData::Boolean(v) => Arc::new(v.iter().collect::<BooleanArray>()),
        ColumnData::Integer(v) => Arc::new(v.iter().collect::<Int32Array>()),
        ColumnData::BigInt(v) => Arc::new(v.iter().collect::<Int64Array>()),
        ColumnData::Double(v) => Arc::new(v.iter().collect::<Float64Array>()),
        ColumnData::Varchar(v) | ColumnData::Json(v) => {
            text_array(v, options.offset_size.text_layout())
        }
        ColumnData::Blob(v) => binary_array(v, options.offset_size),
        ColumnData::Uuid(v) if options.lossless_conversion => uuid_storage(v)?,
        ColumnData::Uuid(v) => {
            let text: Vec<Option<String>> = v
                .iter()
                .map(|u| u.map(|u| u.hyphenated().to_string()))
                .collect();
            text_array(&text, options.offset_size.text_layout())
        }
        ColumnData::Opaque(array) => Arc::clone(array),
    };
    Ok(array)
}
