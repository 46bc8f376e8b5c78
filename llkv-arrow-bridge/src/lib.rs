//! Arrow extension type bridge.
//!
//! Import:
//!   - Reads the extension annotation (`ARROW:extension:name` /
//!     `ARROW:extension:metadata`) from each field.
//!   - Registered tags: storage is validated against the tag's
//!     [`StorageSpec`], then decoded by the tag's codec.
//!   - Unregistered tags: passed through untouched as opaque columns.
//!   - Untagged arrays: converted by physical type.
//!
//! Export:
//!   - UUID and JSON columns are tagged `arrow.uuid` / `arrow.json` when the
//!     registry knows those tags.
//!   - User extension and opaque columns keep their tag and metadata.
//!   - Tables export as one [`RecordBatch`](arrow::record_batch::RecordBatch)
//!     or lazily as a sequence of fixed-size batches ([`BatchExporter`]).
//!
//! ```
//! use std::sync::Arc;
//!
//! use llkv_arrow_bridge::{ExtensionBridge, ExtensionRegistry};
//! use llkv_types::{NativeColumn, NativeTable, Uuid};
//!
//! let bridge = ExtensionBridge::new(Arc::new(ExtensionRegistry::with_canonical()));
//! let table = NativeTable::try_new(vec![(
//!     "id",
//!     NativeColumn::uuid(vec![Some(Uuid::nil()), None]),
//! )])
//! .unwrap();
//!
//! let batch = bridge.export_table(&table).unwrap();
//! assert_eq!(
//!     batch.schema().field(0).metadata()["ARROW:extension:name"],
//!     "arrow.uuid"
//! );
//! assert_eq!(bridge.import_batch(&batch).unwrap(), table);
//! ```

#![forbid(unsafe_code)]

pub mod array;
pub mod bridge;
pub mod codec;
pub mod options;
pub mod physical;
pub mod registry;
pub mod storage;
pub mod stream;
pub mod tag;

pub use array::{AnnotatedArray, ExtensionAnnotation};
pub use bridge::ExtensionBridge;
pub use codec::{ExtensionCodec, JsonCodec, StorageCodec, UuidCodec};
pub use options::{ArrowOffsetSize, BridgeOptions};
pub use registry::{ExtensionEntry, ExtensionRegistry};
pub use storage::StorageSpec;
pub use stream::{BatchExporter, BatchExporterReader};
pub use tag::{EXTENSION_METADATA_KEY, EXTENSION_NAME_KEY, ExtensionTag, JSON_TAG, UUID_TAG};
