//! Materialized query results.

use llkv_result::{Error, Result};

use crate::column::NativeColumn;

/// Ordered, named native columns of equal length.
///
/// The table exclusively owns its columns. Exporting a table to Arrow
/// produces new arrays; the table itself is never modified by the bridge.
///
/// The row count is tracked separately from the columns so a table without
/// columns can still have rows.
#[derive(Debug, Clone, Default)]
pub struct NativeTable {
    names: Vec<String>,
    columns: Vec<NativeColumn>,
    /// `None` until fixed by [`with_rows`](Self::with_rows) or the first
    /// pushed column.
    rows: Option<usize>,
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table of `rows` rows and no columns. Every pushed column must have
    /// exactly `rows` rows.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Build a table from `(name, column)` pairs. All columns must have the
    /// same number of rows.
    pub fn try_new<S: Into<String>>(columns: Vec<(S, NativeColumn)>) -> Result<Self> {
        let mut table = Self::default();
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    pub fn push_column(&mut self, name: impl Into<String>, column: NativeColumn) -> Result<()> {
        let name = name.into();
        if let Some(rows) = self.rows
            && rows != column.len()
        {
            return Err(Error::InvalidArgumentError(format!(
                "column '{name}' has {} rows, expected {rows}",
                column.len()
            )));
        }
        self.rows = Some(column.len());
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.unwrap_or(0)
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> Option<&NativeColumn> {
        self.columns.get(idx)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&NativeColumn> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|idx| self.columns.get(idx))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &NativeColumn)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn into_columns(self) -> Vec<(String, NativeColumn)> {
        self.names.into_iter().zip(self.columns).collect()
    }

    /// Copy of rows `[offset, offset + len)` of every column, clamped to
    /// the table's rows.
    pub fn slice(&self, offset: usize, len: usize) -> NativeTable {
        let start = offset.min(self.num_rows());
        NativeTable {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.slice(offset, len)).collect(),
            rows: Some(len.min(self.num_rows() - start)),
        }
    }

    /// Stack `tables` vertically. Every table must have the same column names
    /// and logical types, in the same order. No tables yields an empty table.
    pub fn concat(tables: &[NativeTable]) -> Result<NativeTable> {
        let Some(first) = tables.first() else {
            return Ok(NativeTable::default());
        };
        if let Some(other) = tables.iter().find(|t| t.names != first.names) {
            return Err(Error::InvalidArgumentError(format!(
                "cannot concatenate tables with columns {:?} and {:?}",
                first.names, other.names
            )));
        }

        let mut out = NativeTable::with_rows(tables.iter().map(NativeTable::num_rows).sum());
        for (idx, name) in first.names.iter().enumerate() {
            let parts: Vec<NativeColumn> = tables
                .iter()
                .map(|t| t.columns[idx].clone())
                .collect();
            out.push_column(name.clone(), NativeColumn::concat(&parts)?)?;
        }
        Ok(out)
    }
}

impl PartialEq for NativeTable {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows() == other.num_rows()
            && self.names == other.names
            && self.columns == other.columns
    }
}
