use std::sync::Arc;

use arrow::array::{Array, FixedSizeBinaryArray};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions, RecordBatchReader};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use llkv_arrow_bridge::{
    ArrowOffsetSize, BridgeOptions, EXTENSION_NAME_KEY, ExtensionBridge, ExtensionRegistry,
    UUID_TAG,
};
use llkv_types::{LogicalType, NativeColumn, NativeTable, Uuid};

/* --------------------------- Shared helpers ---------------------------- */

fn bridge() -> ExtensionBridge {
    ExtensionBridge::new(Arc::new(ExtensionRegistry::with_canonical()))
}

fn mixed_table(seed: u64, rows: usize) -> NativeTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ids = Vec::with_capacity(rows);
    let mut docs = Vec::with_capacity(rows);
    let mut counts = Vec::with_capacity(rows);
    let mut labels = Vec::with_capacity(rows);
    for i in 0..rows {
        let null = rng.random_range(0..6) == 0;
        ids.push((!null).then(|| Uuid::from_u128(rng.random::<u128>())));
        docs.push((i % 4 != 0).then(|| format!("{{\"row\": {i}}}")));
        counts.push((i % 3 != 1).then_some(rng.random::<i64>()));
        labels.push(Some(format!("label-{i}")));
    }
    NativeTable::try_new(vec![
        ("id", NativeColumn::uuid(ids)),
        ("doc", NativeColumn::json(docs)),
        ("count", NativeColumn::bigint(counts)),
        ("label", NativeColumn::varchar(labels)),
    ])
    .expect("table")
}

/* -------------------------------- Tests -------------------------------- */

#[test]
fn batched_export_matches_materialized_export() {
    let bridge = bridge();
    let table = mixed_table(0x5EED, 103);

    let whole = bridge
        .import_batch(&bridge.export_table(&table).expect("export"))
        .expect("import");

    for batch_size in [1, 7, 50, 103, 1_000] {
        let exporter = bridge
            .export_batches(table.clone(), batch_size)
            .expect("exporter");
        let streamed = bridge
            .import_batches(exporter.into_arrow_reader())
            .expect("import stream");

        assert_eq!(streamed, whole, "batch size {batch_size}");
        for (name, column) in whole.columns() {
            let other = streamed.column_by_name(name).expect("column");
            assert_eq!(other.null_positions(), column.null_positions(), "{name}");
        }
    }
    assert_eq!(whole, table);
}

#[test]
fn every_batch_shares_the_announced_schema() {
    let bridge = bridge();
    let exporter = bridge
        .export_batches(mixed_table(1, 20), 6)
        .expect("exporter");
    let schema = exporter.schema();
    assert_eq!(
        schema
            .field_with_name("id")
            .expect("id field")
            .metadata()
            .get(EXTENSION_NAME_KEY)
            .map(String::as_str),
        Some(UUID_TAG)
    );

    let mut rows = 0;
    for batch in exporter {
        let batch = batch.expect("batch");
        assert_eq!(batch.schema(), schema);
        assert!(batch.num_rows() <= 6);
        rows += batch.num_rows();
    }
    assert_eq!(rows, 20);
}

#[test]
fn native_uuid_column_roundtrips_materialized_and_streamed() {
    let bridge = bridge();
    let column = NativeColumn::uuid(vec![
        Some(Uuid::nil()),
        Some(Uuid::from_u128(u128::MAX)),
        None,
    ]);
    let table = NativeTable::try_new(vec![("u", column)]).expect("table");

    let batch = bridge.export_table(&table).expect("export");
    let field = batch.schema().field(0).clone();
    assert_eq!(field.data_type(), &DataType::FixedSizeBinary(16));
    assert_eq!(
        field.metadata().get(EXTENSION_NAME_KEY).map(String::as_str),
        Some(UUID_TAG)
    );
    let storage = batch
        .column(0)
        .as_any()
        .downcast_ref::<FixedSizeBinaryArray>()
        .expect("fixed-size binary");
    assert_eq!(storage.value(0), &[0u8; 16]);
    assert_eq!(storage.value(1), &[0xffu8; 16]);
    assert!(storage.is_null(2));
    assert_eq!(bridge.import_batch(&batch).expect("import"), table);

    let streamed = bridge
        .import_batches(
            bridge
                .export_batches(table.clone(), 2)
                .expect("exporter")
                .into_arrow_reader(),
        )
        .expect("import stream");
    assert_eq!(streamed, table);
    assert_eq!(
        streamed.column(0).map(NativeColumn::logical_type),
        Some(&LogicalType::Uuid)
    );
}

#[test]
fn dropping_the_exporter_early_is_harmless() {
    let bridge = bridge();
    let table = mixed_table(2, 40);
    let mut exporter = bridge.export_batches(table.clone(), 8).expect("exporter");
    let first = exporter.next().expect("one batch").expect("batch");
    assert_eq!(first.num_rows(), 8);
    assert_eq!(exporter.remaining_rows(), 32);
    drop(exporter);

    // The table and bridge are untouched and can be exported again.
    assert_eq!(bridge.export_batches(table, 8).expect("exporter").count(), 5);
}

#[test]
fn large_offsets_apply_to_every_batch() {
    let bridge = ExtensionBridge::with_options(
        Arc::new(ExtensionRegistry::with_canonical()),
        BridgeOptions {
            offset_size: ArrowOffsetSize::Large,
            ..Default::default()
        },
    );
    let exporter = bridge
        .export_batches(mixed_table(3, 9), 4)
        .expect("exporter");
    let reader = exporter.into_arrow_reader();
    let schema = reader.schema();
    assert_eq!(
        schema.field_with_name("doc").expect("doc").data_type(),
        &DataType::LargeUtf8
    );
    assert_eq!(
        schema.field_with_name("label").expect("label").data_type(),
        &DataType::LargeUtf8
    );

    let table = bridge.import_batches(reader).expect("import");
    assert_eq!(table, mixed_table(3, 9));
}

#[test]
fn columnless_batches_keep_their_row_count() {
    let bridge = bridge();
    let batch = RecordBatch::try_new_with_options(
        Arc::new(Schema::empty()),
        Vec::new(),
        &RecordBatchOptions::new().with_row_count(Some(5)),
    )
    .expect("batch");

    let table = bridge.import_batch(&batch).expect("import");
    assert_eq!(table.num_columns(), 0);
    assert_eq!(table.num_rows(), 5);
    assert_eq!(bridge.export_table(&table).expect("export").num_rows(), 5);

    let sizes: Vec<usize> = bridge
        .export_batches(table.clone(), 2)
        .expect("exporter")
        .map(|b| b.expect("batch").num_rows())
        .collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    let streamed = bridge
        .import_batches(
            bridge
                .export_batches(table.clone(), 2)
                .expect("exporter")
                .into_arrow_reader(),
        )
        .expect("streamed import");
    assert_eq!(streamed, table);
}
