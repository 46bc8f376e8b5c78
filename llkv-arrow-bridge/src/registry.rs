//! Registry of extension tags the bridge knows how to decode.
//!
//! The registry maps each [`ExtensionTag`] to one [`ExtensionEntry`]: the
//! tag's required [`StorageSpec`] and the codec that converts its values. A
//! tag missing from the registry is not an error; the bridge passes such
//! arrays through as opaque columns.
//!
//! Entries are immutable and handed out as `Arc`s, so a reader holding an
//! entry is unaffected by a concurrent `register` or `unregister`.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use arrow::datatypes::DataType;
use llkv_result::{Error, Result};
use rustc_hash::FxHashMap;

use crate::codec::{ExtensionCodec, JsonCodec, StorageCodec, UuidCodec};
use crate::physical;
use crate::storage::StorageSpec;
use crate::tag::{ExtensionTag, JSON_TAG, UUID_TAG};

/// One registered extension type.
#[derive(Debug)]
pub struct ExtensionEntry {
    tag: ExtensionTag,
    storage: StorageSpec,
    codec: Arc<dyn ExtensionCodec>,
}

impl ExtensionEntry {
    #[inline]
    pub fn tag(&self) -> &ExtensionTag {
        &self.tag
    }

    #[inline]
    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    #[inline]
    pub fn codec(&self) -> &dyn ExtensionCodec {
        self.codec.as_ref()
    }
}

/// Thread-safe tag → entry map.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    entries: RwLock<FxHashMap<ExtensionTag, Arc<ExtensionEntry>>>,
}

impl ExtensionRegistry {
    /// An empty registry. Every tagged array imports as opaque until tags
    /// are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `arrow.uuid` and `arrow.json` registered.
    pub fn with_canonical() -> Self {
        let registry = Self::new();
        registry.insert(
            ExtensionTag::from_static(UUID_TAG),
            StorageSpec::FixedSizeBinary(16),
            Arc::new(UuidCodec),
        );
        registry.insert(
            ExtensionTag::from_static(JSON_TAG),
            StorageSpec::Varchar,
            Arc::new(JsonCodec),
        );
        registry
    }

    /// Process-wide registry holding the canonical tags.
    ///
    /// Convenience for callers that do not manage their own registry; tags
    /// registered here are visible to every [`ExtensionBridge::default`].
    ///
    /// [`ExtensionBridge::default`]: crate::ExtensionBridge
    pub fn global() -> Arc<ExtensionRegistry> {
        static GLOBAL: OnceLock<Arc<ExtensionRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::with_canonical())))
    }

    /// Register `tag`, replacing any previous entry for it.
    pub fn register(
        &self,
        tag: impl Into<String>,
        storage: StorageSpec,
        codec: Arc<dyn ExtensionCodec>,
    ) -> Result<()> {
        let tag = ExtensionTag::new(tag)?;
        self.insert(tag, storage, codec);
        Ok(())
    }

    /// Register a user tag stored as exactly `storage`, with values decoded
    /// by the engine's plain conversion and parameters kept verbatim.
    ///
    /// Fails, leaving the registry unchanged, when `storage` has no native
    /// counterpart; such tags keep importing as opaque columns.
    pub fn register_storage_type(&self, tag: impl Into<String>, storage: DataType) -> Result<()> {
        let tag = tag.into();
        if !physical::has_native_counterpart(&storage) {
            return Err(Error::InvalidArgumentError(format!(
                "cannot register {tag} over {storage:?}: no native counterpart"
            )));
        }
        self.register(
            tag,
            StorageSpec::Exact(storage.clone()),
            Arc::new(StorageCodec::new(storage)),
        )
    }

    fn insert(&self, tag: ExtensionTag, storage: StorageSpec, codec: Arc<dyn ExtensionCodec>) {
        tracing::debug!("[EXT_REGISTRY] register {} ({})", tag, storage.describe());
        let entry = Arc::new(ExtensionEntry {
            tag: tag.clone(),
            storage,
            codec,
        });
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tag, entry);
    }

    /// Remove `tag`. Returns whether an entry was removed; unknown tags are
    /// ignored.
    pub fn unregister(&self, tag: &str) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(tag)
            .is_some();
        if removed {
            tracing::debug!("[EXT_REGISTRY] unregister {tag}");
        }
        removed
    }

    pub fn get(&self, tag: &str) -> Option<Arc<ExtensionEntry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(tag)
    }

    /// Registered tags in lexical order.
    pub fn tags(&self) -> Vec<ExtensionTag> {
        let mut tags: Vec<ExtensionTag> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
