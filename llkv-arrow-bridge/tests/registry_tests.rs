use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use arrow::array::{Array, ArrayRef, Date32Array, Int64Array};
use arrow::datatypes::DataType;

use llkv_arrow_bridge::{
    AnnotatedArray, ExtensionBridge, ExtensionCodec, ExtensionRegistry, ExtensionTag, StorageSpec,
    UuidCodec,
};
use llkv_types::{LogicalType, NativeColumn, Uuid};

#[test]
fn new_registry_is_empty() {
    let registry = ExtensionRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert!(registry.tags().is_empty());
}

#[test]
fn unregister_unknown_tag_is_noop() {
    let registry = ExtensionRegistry::with_canonical();
    let before = registry.tags();
    assert!(!registry.unregister("acme.never"));
    assert_eq!(registry.tags(), before);
}

#[test]
fn custom_codec_can_reuse_builtin_behavior() {
    // A vendor tag with UUID semantics, registered through the generic API.
    let registry = Arc::new(ExtensionRegistry::new());
    registry
        .register(
            "acme.guid",
            StorageSpec::FixedSizeBinary(16),
            Arc::new(UuidCodec) as Arc<dyn ExtensionCodec>,
        )
        .expect("register");
    let entry = registry.get("acme.guid").expect("entry");
    assert_eq!(entry.tag().as_str(), "acme.guid");
    assert_eq!(entry.storage().describe(), "a fixed-size binary of 16 bytes");

    let bridge = ExtensionBridge::new(Arc::clone(&registry));
    let column = NativeColumn::uuid(vec![Some(Uuid::from_u128(42)), None]);
    // Native UUIDs export under the canonical tag only; acme.guid is not it.
    let exported = bridge.export(&column).expect("export");
    assert!(exported.tag().is_none());

    let retagged = AnnotatedArray::with_extension(
        Arc::clone(exported.array()),
        ExtensionTag::new("acme.guid").expect("tag"),
        Vec::new(),
    );
    assert_eq!(bridge.import(retagged).expect("import"), column);
}

#[test]
fn registration_changes_import_behavior() {
    let registry = Arc::new(ExtensionRegistry::new());
    let bridge = ExtensionBridge::new(Arc::clone(&registry));
    let storage: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
    let annotated = AnnotatedArray::with_extension(
        storage,
        ExtensionTag::new("acme.ts").expect("tag"),
        b"unit=ms".to_vec(),
    );

    let opaque = bridge.import(annotated.clone()).expect("opaque import");
    assert!(matches!(opaque.logical_type(), LogicalType::Opaque(_)));

    registry
        .register_storage_type("acme.ts", DataType::Int64)
        .expect("register");
    let typed = bridge.import(annotated.clone()).expect("typed import");
    assert!(matches!(typed.logical_type(), LogicalType::Extension(_)));
    assert_eq!(typed.logical_type().storage_type(), &LogicalType::BigInt);

    registry.unregister("acme.ts");
    let opaque_again = bridge.import(annotated).expect("opaque import");
    assert_eq!(opaque_again, opaque);
}

#[test]
fn refused_registration_keeps_pass_through() {
    let registry = Arc::new(ExtensionRegistry::new());
    let bridge = ExtensionBridge::new(Arc::clone(&registry));
    let storage: ArrayRef = Arc::new(Date32Array::from(vec![Some(19_000), None]));
    let annotated = AnnotatedArray::with_extension(
        storage,
        ExtensionTag::new("acme.day").expect("tag"),
        b"tz=utc".to_vec(),
    );

    let err = registry
        .register_storage_type("acme.day", DataType::Date32)
        .expect_err("Date32 has no native counterpart");
    assert!(err.is_invalid_input());
    assert!(registry.is_empty());

    let column = bridge.import(annotated.clone()).expect("opaque import");
    assert!(matches!(column.logical_type(), LogicalType::Opaque(_)));
    assert_eq!(bridge.export(&column).expect("export"), annotated);
}

#[test]
fn concurrent_readers_never_see_partial_entries() {
    const WRITERS: usize = 2;
    const READERS: usize = 6;
    const ROUNDS: usize = 500;

    let registry = Arc::new(ExtensionRegistry::with_canonical());
    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let tag = format!("acme.w{w}");
                    let storage = if round % 2 == 0 {
                        DataType::Int64
                    } else {
                        DataType::Utf8
                    };
                    registry
                        .register_storage_type(tag.as_str(), storage)
                        .expect("register");
                    if round % 3 == 0 {
                        registry.unregister(&tag);
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let bridge = ExtensionBridge::new(Arc::clone(&registry));
                let storage: ArrayRef = Arc::new(Int64Array::from(vec![Some(7), None]));
                let mut observed = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    for w in 0..WRITERS {
                        let tag = format!("acme.w{w}");
                        if let Some(entry) = registry.get(&tag) {
                            // An entry is always complete: tag and storage agree
                            // with what some writer registered.
                            assert_eq!(entry.tag().as_str(), tag);
                            assert!(matches!(
                                entry.storage(),
                                StorageSpec::Exact(DataType::Int64 | DataType::Utf8)
                            ));
                            observed += 1;
                        }
                        // Import either decodes, rejects the storage, or
                        // passes through; it never panics.
                        let annotated = AnnotatedArray::with_extension(
                            Arc::clone(&storage),
                            ExtensionTag::new(tag.as_str()).expect("tag"),
                            Vec::new(),
                        );
                        if let Ok(column) = bridge.import(annotated) {
                            assert_eq!(column.len(), storage.len());
                        }
                    }
                    assert!(registry.contains("arrow.uuid"));
                }
                observed
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked");
    }
    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    // Every writer ends on an odd round that was not unregistered (499 % 3 != 0).
    for w in 0..WRITERS {
        let entry = registry.get(&format!("acme.w{w}")).expect("final entry");
        assert_eq!(entry.storage(), &StorageSpec::Exact(DataType::Utf8));
    }
    assert_eq!(registry.len(), 2 + WRITERS);
}
