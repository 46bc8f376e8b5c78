//! Batched export and streaming import.
//!
//! [`BatchExporter`] walks a table in fixed-size row windows and exports each
//! window as its own record batch. Batches are produced on demand, so a
//! consumer that stops early never pays for the rest of the table.

use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use llkv_result::{Error, Result};
use llkv_types::NativeTable;

use crate::bridge::ExtensionBridge;

impl ExtensionBridge {
    /// Export `table` lazily in batches of at most `batch_size` rows.
    pub fn export_batches(&self, table: NativeTable, batch_size: usize) -> Result<BatchExporter> {
        BatchExporter::try_new(self.clone(), table, batch_size)
    }

    /// Import a stream of record batches into one table.
    ///
    /// The first failing batch aborts the import. An empty stream yields an
    /// empty table.
    pub fn import_batches<I>(&self, batches: I) -> Result<NativeTable>
    where
        I: IntoIterator<Item = std::result::Result<RecordBatch, ArrowError>>,
    {
        let mut tables = Vec::new();
        for batch in batches {
            tables.push(self.import_batch(&batch?)?);
        }
        tracing::trace!("[BRIDGE_STREAM] imported {} batches", tables.len());
        NativeTable::concat(&tables)
    }
}

/// Forward-only iterator over the record batches of one table.
#[derive(Debug)]
pub struct BatchExporter {
    bridge: ExtensionBridge,
    table: NativeTable,
    schema: SchemaRef,
    batch_size: usize,
    offset: usize,
}

impl BatchExporter {
    pub fn try_new(bridge: ExtensionBridge, table: NativeTable, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidArgumentError(
                "batch size must be at least 1".into(),
            ));
        }
        let schema = bridge.export_schema(&table)?;
        Ok(Self {
            bridge,
            table,
            schema,
            batch_size,
            offset: 0,
        })
    }

    /// Schema shared by every batch.
    pub fn schema(&self) -> SchemaRef {
        SchemaRef::clone(&self.schema)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Rows not yet exported.
    pub fn remaining_rows(&self) -> usize {
        self.table.num_rows().saturating_sub(self.offset)
    }

    /// Adapt into an Arrow [`RecordBatchReader`], e.g. for IPC writers.
    pub fn into_arrow_reader(self) -> BatchExporterReader {
        BatchExporterReader { inner: self }
    }
}

impl Iterator for BatchExporter {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.remaining_rows().min(self.batch_size);
        if rows == 0 {
            return None;
        }
        let window = self.table.slice(self.offset, rows);
        tracing::trace!(
            "[BRIDGE_STREAM] batch rows {}..{}",
            self.offset,
            self.offset + rows
        );
        self.offset += rows;
        Some(self.bridge.export_table(&window))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches = self.remaining_rows().div_ceil(self.batch_size);
        (batches, Some(batches))
    }
}

/// [`RecordBatchReader`] view of a [`BatchExporter`]. Bridge errors are
/// reported as [`ArrowError::ExternalError`].
#[derive(Debug)]
pub struct BatchExporterReader {
    inner: BatchExporter,
}

impl Iterator for BatchExporterReader {
    type Item = std::result::Result<RecordBatch, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|batch| {
            batch.map_err(|err| match err {
                Error::Arrow(arrow) => arrow,
                other => ArrowError::ExternalError(Box::new(other)),
            })
        })
    }
}

impl RecordBatchReader for BatchExporterReader {
    fn schema(&self) -> SchemaRef {
        self.inner.schema()
    }
}
