//! Native column storage.
//!
//! A [`NativeColumn`] is one column of a query result in the engine's own
//! representation: a [`LogicalType`] plus a typed vector of optional values.
//! Opaque (unregistered extension) columns keep their Arrow array instead.

use arrow::array::{Array, ArrayRef};
use llkv_result::{Error, Result};
use uuid::Uuid;

use crate::logical_type::{LogicalType, TextLayout};

/// Values of one native column. `None` is a null slot.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Boolean(Vec<Option<bool>>),
    Integer(Vec<Option<i32>>),
    BigInt(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Varchar(Vec<Option<String>>),
    Blob(Vec<Option<Vec<u8>>>),
    Uuid(Vec<Option<Uuid>>),
    Json(Vec<Option<String>>),
    Opaque(ArrayRef),
}

/// Applies `$body` to the value vector of every non-opaque variant and
/// rebuilds the same variant from the result.
macro_rules! map_values {
    ($data:expr, $v:ident => $body:expr, $arr:ident => $opaque:expr) => {
        match $data {
            ColumnData::Boolean($v) => ColumnData::Boolean($body),
            ColumnData::Integer($v) => ColumnData::Integer($body),
            ColumnData::BigInt($v) => ColumnData::BigInt($body),
            ColumnData::Double($v) => ColumnData::Double($body),
            ColumnData::Varchar($v) => ColumnData::Varchar($body),
            ColumnData::Blob($v) => ColumnData::Blob($body),
            ColumnData::Uuid($v) => ColumnData::Uuid($body),
            ColumnData::Json($v) => ColumnData::Json($body),
            ColumnData::Opaque($arr) => ColumnData::Opaque($opaque),
        }
    };
}

/// Evaluates `$body` against the value vector of every non-opaque variant.
macro_rules! with_values {
    ($data:expr, $v:ident => $body:expr, $arr:ident => $opaque:expr) => {
        match $data {
            ColumnData::Boolean($v) => $body,
            ColumnData::Integer($v) => $body,
            ColumnData::BigInt($v) => $body,
            ColumnData::Double($v) => $body,
            ColumnData::Varchar($v) => $body,
            ColumnData::Blob($v) => $body,
            ColumnData::Uuid($v) => $body,
            ColumnData::Json($v) => $body,
            ColumnData::Opaque($arr) => $opaque,
        }
    };
}

#[inline]
fn window<T: Clone>(values: &[T], offset: usize, len: usize) -> Vec<T> {
    let start = offset.min(values.len());
    let end = offset.saturating_add(len).min(values.len());
    values[start..end].to_vec()
}

impl ColumnData {
    pub fn len(&self) -> usize {
        with_values!(self, v => v.len(), a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        with_values!(self, v => v.iter().filter(|x| x.is_none()).count(), a => a.null_count())
    }

    pub fn is_null(&self, idx: usize) -> bool {
        with_values!(self, v => v.get(idx).is_some_and(Option::is_none), a => idx < a.len() && a.is_null(idx))
    }

    /// Copy of the `[offset, offset + len)` window, clamped to the column.
    pub fn slice(&self, offset: usize, len: usize) -> ColumnData {
        map_values!(self, v => window(v, offset, len), a => {
            let start = offset.min(a.len());
            let len = len.min(a.len() - start);
            a.slice(start, len)
        })
    }

    fn matches(&self, logical_type: &LogicalType) -> bool {
        matches!(
            (logical_type.storage_type(), self),
            (LogicalType::Boolean, ColumnData::Boolean(_))
                | (LogicalType::Integer, ColumnData::Integer(_))
                | (LogicalType::BigInt, ColumnData::BigInt(_))
                | (LogicalType::Double, ColumnData::Double(_))
                | (LogicalType::Varchar, ColumnData::Varchar(_))
                | (LogicalType::Blob, ColumnData::Blob(_))
                | (LogicalType::Uuid, ColumnData::Uuid(_))
                | (LogicalType::Json(_), ColumnData::Json(_))
        ) || match (logical_type, self) {
            (LogicalType::Opaque(opaque), ColumnData::Opaque(array)) => {
                array.data_type() == &opaque.storage
            }
            _ => false,
        }
    }
}

impl PartialEq for ColumnData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnData::Boolean(a), ColumnData::Boolean(b)) => a == b,
            (ColumnData::Integer(a), ColumnData::Integer(b)) => a == b,
            (ColumnData::BigInt(a), ColumnData::BigInt(b)) => a == b,
            (ColumnData::Double(a), ColumnData::Double(b)) => a == b,
            (ColumnData::Varchar(a), ColumnData::Varchar(b)) => a == b,
            (ColumnData::Blob(a), ColumnData::Blob(b)) => a == b,
            (ColumnData::Uuid(a), ColumnData::Uuid(b)) => a == b,
            (ColumnData::Json(a), ColumnData::Json(b)) => a == b,
            (ColumnData::Opaque(a), ColumnData::Opaque(b)) => a.to_data() == b.to_data(),
            _ => false,
        }
    }
}

/// One column of engine values typed by the logical type catalog.
///
/// Invariant: `data` is the representation of `logical_type.storage_type()`.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeColumn {
    logical_type: LogicalType,
    data: ColumnData,
}

impl NativeColumn {
    /// Pair `data` with `logical_type`, rejecting representations that do not
    /// hold values of that type.
    pub fn try_new(logical_type: LogicalType, data: ColumnData) -> Result<Self> {
        if !data.matches(&logical_type) {
            return Err(Error::Internal(format!(
                "column data does not hold values of type {logical_type}"
            )));
        }
        Ok(Self { logical_type, data })
    }

    pub fn boolean(values: Vec<Option<bool>>) -> Self {
        Self::plain(LogicalType::Boolean, ColumnData::Boolean(values))
    }

    pub fn integer(values: Vec<Option<i32>>) -> Self {
        Self::plain(LogicalType::Integer, ColumnData::Integer(values))
    }

    pub fn bigint(values: Vec<Option<i64>>) -> Self {
        Self::plain(LogicalType::BigInt, ColumnData::BigInt(values))
    }

    pub fn double(values: Vec<Option<f64>>) -> Self {
        Self::plain(LogicalType::Double, ColumnData::Double(values))
    }

    pub fn varchar<S: Into<String>>(values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::plain(LogicalType::Varchar, ColumnData::Varchar(values))
    }

    pub fn blob(values: Vec<Option<Vec<u8>>>) -> Self {
        Self::plain(LogicalType::Blob, ColumnData::Blob(values))
    }

    pub fn uuid(values: Vec<Option<Uuid>>) -> Self {
        Self::plain(LogicalType::Uuid, ColumnData::Uuid(values))
    }

    pub fn json<S: Into<String>>(values: Vec<Option<S>>) -> Self {
        Self::json_with_layout(values, None)
    }

    /// JSON text that must be exported in `layout` (see [`LogicalType::Json`]).
    pub fn json_with_layout<S: Into<String>>(
        values: Vec<Option<S>>,
        layout: Option<TextLayout>,
    ) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::plain(LogicalType::Json(layout), ColumnData::Json(values))
    }

    #[inline]
    fn plain(logical_type: LogicalType, data: ColumnData) -> Self {
        Self { logical_type, data }
    }

    #[inline]
    pub fn logical_type(&self) -> &LogicalType {
        &self.logical_type
    }

    #[inline]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn into_parts(self) -> (LogicalType, ColumnData) {
        (self.logical_type, self.data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        self.data.is_null(idx)
    }

    /// Positions of all null slots, in ascending order.
    pub fn null_positions(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.is_null(i)).collect()
    }

    /// Copy of rows `[offset, offset + len)`; windows past the end are clamped.
    pub fn slice(&self, offset: usize, len: usize) -> NativeColumn {
        NativeColumn {
            logical_type: self.logical_type.clone(),
            data: self.data.slice(offset, len),
        }
    }

    /// Append the rows of `columns` in order. All columns must share one
    /// logical type.
    pub fn concat(columns: &[NativeColumn]) -> Result<NativeColumn> {
        let (first, rest) = columns.split_first().ok_or_else(|| {
            Error::InvalidArgumentError("cannot concatenate zero columns".into())
        })?;
        if let Some(other) = rest.iter().find(|c| c.logical_type != first.logical_type) {
            return Err(Error::InvalidArgumentError(format!(
                "cannot concatenate {} column with {} column",
                first.logical_type, other.logical_type
            )));
        }

        macro_rules! extend_all {
            ($variant:ident, $head:expr) => {{
                let mut out = $head.clone();
                for column in rest {
                    match &column.data {
                        ColumnData::$variant(values) => out.extend(values.iter().cloned()),
                        _ => {
                            return Err(Error::Internal(
                                "column data disagrees with its logical type".into(),
                            ));
                        }
                    }
                }
                ColumnData::$variant(out)
            }};
        }

        let data = match &first.data {
            ColumnData::Boolean(v) => extend_all!(Boolean, v),
            ColumnData::Integer(v) => extend_all!(Integer, v),
            ColumnData::BigInt(v) => extend_all!(BigInt, v),
            ColumnData::Double(v) => extend_all!(Double, v),
            ColumnData::Varchar(v) => extend_all!(Varchar, v),
            ColumnData::Blob(v) => extend_all!(Blob, v),
            ColumnData::Uuid(v) => extend_all!(Uuid, v),
            ColumnData::Json(v) => extend_all!(Json, v),
            ColumnData::Opaque(head) => {
                let mut arrays: Vec<&dyn Array> = vec![head.as_ref()];
                for column in rest {
                    match &column.data {
                        ColumnData::Opaque(array) => arrays.push(array.as_ref()),
                        _ => {
                            return Err(Error::Internal(
                                "column data disagrees with its logical type".into(),
                            ));
                        }
                    }
                }
                ColumnData::Opaque(arrow::compute::concat(&arrays)?)
            }
        };

        NativeColumn::try_new(first.logical_type.clone(), data)
    }
}
