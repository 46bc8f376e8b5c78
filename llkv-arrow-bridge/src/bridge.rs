//! Validating import/export between annotated Arrow arrays and native
//! columns.
//!
//! Import resolves the array's tag in the registry, checks the storage
//! against the tag's [`StorageSpec`](crate::storage::StorageSpec) and then
//! hands the storage to the tag's codec. Untagged arrays take the plain
//! physical path and unknown tags pass through as opaque columns.
//!
//! Export is the mirror image. Every conversion aborts on the first error
//! and never returns partial output.

use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use llkv_result::{Error, Result};
use llkv_types::{ColumnData, ExtensionType, LogicalType, NativeColumn, NativeTable, OpaqueType};

use crate::array::AnnotatedArray;
use crate::options::BridgeOptions;
use crate::physical;
use crate::registry::{ExtensionEntry, ExtensionRegistry};
use crate::tag::{ExtensionTag, JSON_TAG, UUID_TAG};

/// Converts between Arrow data and engine columns using one registry and
/// one set of options. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct ExtensionBridge {
    registry: Arc<ExtensionRegistry>,
    options: BridgeOptions,
}

impl Default for ExtensionBridge {
    /// Bridge over [`ExtensionRegistry::global`] with default options.
    fn default() -> Self {
        Self::new(ExtensionRegistry::global())
    }
}

impl ExtensionBridge {
    pub fn new(registry: Arc<ExtensionRegistry>) -> Self {
        Self::with_options(registry, BridgeOptions::default())
    }

    pub fn with_options(registry: Arc<ExtensionRegistry>, options: BridgeOptions) -> Self {
        Self { registry, options }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    #[inline]
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /* ------------------------------ import ------------------------------ */

    /// Convert one Arrow array into a native column.
    ///
    /// Errors:
    /// - `TypeMismatch` when a registered tag sits on the wrong storage;
    /// - `MalformedMetadata` when the tag's codec rejects the parameters;
    /// - `InvalidArgumentError` for untagged types with no native counterpart.
    pub fn import(&self, array: AnnotatedArray) -> Result<NativeColumn> {
        let (array, extension) = array.into_parts();
        let Some(extension) = extension else {
            return physical::import_array(array.as_ref());
        };
        let tag = extension.tag();

        let Some(entry) = self.registry.get(tag.as_str()) else {
            tracing::debug!(
                "[BRIDGE] unknown extension {} over {:?}; passing through",
                tag,
                array.data_type()
            );
            let logical_type = LogicalType::opaque(
                tag.as_str(),
                extension.metadata().to_vec(),
                array.data_type().clone(),
            );
            return NativeColumn::try_new(logical_type, ColumnData::Opaque(array));
        };

        entry.storage().validate(tag.as_str(), array.data_type())?;
        tracing::trace!(
            "[BRIDGE] decode {} from {:?} ({} rows)",
            tag,
            array.data_type(),
            array.len()
        );
        entry
            .codec()
            .decode(tag, extension.metadata(), array.as_ref(), &self.options)
    }

    /// Convert every column of `batch`, reading annotations from the schema.
    pub fn import_batch(&self, batch: &RecordBatch) -> Result<NativeTable> {
        let schema = batch.schema();
        let mut table = NativeTable::with_rows(batch.num_rows());
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let annotated = AnnotatedArray::from_field(field, Arc::clone(array))?;
            table.push_column(field.name().as_str(), self.import(annotated)?)?;
        }
        Ok(table)
    }

    /* ------------------------------ export ------------------------------ */

    /// Convert one native column into an Arrow array, tagged when its type
    /// maps to a registered extension.
    pub fn export(&self, column: &NativeColumn) -> Result<AnnotatedArray> {
        match column.logical_type() {
            LogicalType::Uuid if self.options.lossless_conversion => {
                self.export_canonical(UUID_TAG, column)
            }
            LogicalType::Json(_) => self.export_canonical(JSON_TAG, column),
            LogicalType::Extension(ext) => self.export_extension(ext, column),
            LogicalType::Opaque(opaque) => export_opaque(opaque, column),
            _ => self.export_untagged(column),
        }
    }

    fn export_untagged(&self, column: &NativeColumn) -> Result<AnnotatedArray> {
        let array = physical::export_data(column.data(), &self.options)?;
        Ok(AnnotatedArray::new(array))
    }

    fn export_canonical(&self, tag: &str, column: &NativeColumn) -> Result<AnnotatedArray> {
        match self.registry.get(tag) {
            Some(entry) => self.encode_with(&entry, column),
            None => self.export_untagged(column),
        }
    }

    fn export_extension(&self, ext: &ExtensionType, column: &NativeColumn) -> Result<AnnotatedArray> {
        if let Some(entry) = self.registry.get(&ext.tag) {
            return self.encode_with(&entry, column);
        }
        tracing::warn!(
            "[BRIDGE] extension {} is no longer registered; exporting plain storage",
            ext.tag
        );
        let array = physical::export_data(column.data(), &self.options)?;
        Ok(AnnotatedArray::with_extension(
            array,
            ExtensionTag::from_field_name(ext.tag.as_str())?,
            ext.metadata.clone(),
        ))
    }

    fn encode_with(&self, entry: &ExtensionEntry, column: &NativeColumn) -> Result<AnnotatedArray> {
        let (array, metadata) = entry.codec().encode(entry.tag(), column, &self.options)?;
        entry
            .storage()
            .validate(entry.tag().as_str(), array.data_type())?;
        tracing::trace!(
            "[BRIDGE] encode {} as {:?} ({} rows)",
            entry.tag(),
            array.data_type(),
            array.len()
        );
        Ok(AnnotatedArray::with_extension(
            array,
            entry.tag().clone(),
            metadata,
        ))
    }

    /// Export every column of `table` into one record batch. Fields are
    /// nullable and carry the extension annotation in their metadata.
    pub fn export_table(&self, table: &NativeTable) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(table.num_columns());
        let mut arrays = Vec::with_capacity(table.num_columns());
        for (name, column) in table.columns() {
            let annotated = self.export(column)?;
            fields.push(annotated.to_field(name)?);
            arrays.push(annotated.into_parts().0);
        }
        let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(batch)
    }

    /// Schema [`export_table`](Self::export_table) produces for `table`.
    pub fn export_schema(&self, table: &NativeTable) -> Result<SchemaRef> {
        let fields = table
            .columns()
            .map(|(name, column)| self.export(&column.slice(0, 0))?.to_field(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Arc::new(Schema::new(fields)))
    }
}

fn export_opaque(opaque: &OpaqueType, column: &NativeColumn) -> Result<AnnotatedArray> {
    let ColumnData::Opaque(array) = column.data() else {
        return Err(Error::Internal(format!(
            "opaque column {} holds native values",
            opaque.tag
        )));
    };
    Ok(AnnotatedArray::with_extension(
        Arc::clone(array),
        ExtensionTag::from_field_name(opaque.tag.as_str())?,
        opaque.metadata.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use arrow::array::{Array, ArrayRef, FixedSizeBinaryArray, Int32Array, StringArray};
    use arrow::datatypes::DataType;
    use llkv_types::Uuid;

    fn canonical() -> ExtensionBridge {
        ExtensionBridge::new(Arc::new(ExtensionRegistry::with_canonical()))
    }

    fn tagged(array: ArrayRef, tag: &str) -> AnnotatedArray {
        AnnotatedArray::with_extension(array, ExtensionTag::new(tag).unwrap(), Vec::new())
    }

    #[test]
    fn untagged_fixed_size_binary_is_not_uuid() {
        let array: ArrayRef = Arc::new(
            FixedSizeBinaryArray::try_from_iter(vec![[3u8; 16]].into_iter()).unwrap(),
        );
        let col = canonical().import(AnnotatedArray::new(array)).unwrap();
        assert_eq!(col.logical_type(), &LogicalType::Blob);
    }

    #[test]
    fn mismatch_aborts_before_decoding() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        let err = canonical().import(tagged(array, UUID_TAG)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(
            err.to_string()
                .contains("arrow.uuid must be a fixed-size binary of 16 bytes")
        );
    }

    #[test]
    fn empty_registry_passes_canonical_tags_through() {
        let bridge = ExtensionBridge::new(Arc::new(ExtensionRegistry::new()));
        let array: ArrayRef = Arc::new(StringArray::from(vec!["{}"]));
        let col = bridge.import(tagged(Arc::clone(&array), JSON_TAG)).unwrap();
        assert!(matches!(col.logical_type(), LogicalType::Opaque(_)));
        let back = bridge.export(&col).unwrap();
        assert_eq!(back, tagged(array, JSON_TAG));
    }

    #[test]
    fn uuid_export_without_registry_entry_is_untagged() {
        let bridge = ExtensionBridge::new(Arc::new(ExtensionRegistry::new()));
        let col = NativeColumn::uuid(vec![Some(Uuid::nil())]);
        let out = bridge.export(&col).unwrap();
        assert!(out.tag().is_none());
        assert_eq!(out.data_type(), &DataType::FixedSizeBinary(16));
    }

    #[test]
    fn lossy_uuid_export_drops_the_tag() {
        let bridge = ExtensionBridge::with_options(
            Arc::new(ExtensionRegistry::with_canonical()),
            BridgeOptions {
                lossless_conversion: false,
                ..Default::default()
            },
        );
        let col = NativeColumn::uuid(vec![Some(Uuid::nil()), None]);
        let out = bridge.export(&col).unwrap();
        assert!(out.tag().is_none());
        assert_eq!(out.data_type(), &DataType::Utf8);
        assert!(out.array().is_null(1));
    }

    #[test]
    fn plain_types_export_untagged() {
        let out = canonical()
            .export(&NativeColumn::integer(vec![Some(1), None]))
            .unwrap();
        assert!(out.extension().is_none());
        assert_eq!(out.data_type(), &DataType::Int32);
        assert_eq!(out.array().null_count(), 1);
    }
}
