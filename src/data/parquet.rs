use crate::analysis::MetricRecord;
use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

fn metrics_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("symbol", DataType::Utf8, false),
        Field::new("asset", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("price_change_pct", DataType::Float64, false),
        Field::new("volume_change_pct", DataType::Float64, false),
        Field::new("volatility_pct", DataType::Float64, false),
        Field::new("volume", DataType::Float64, false),
    ]))
}

/// Export a metric table to Parquet format
pub fn export_metrics_to_parquet(records: &[MetricRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let schema = metrics_schema();

    let symbol: StringArray = records.iter().map(|r| Some(r.symbol.as_str())).collect();
    let asset: StringArray = records.iter().map(|r| Some(r.asset.as_str())).collect();
    let price: Float64Array = records.iter().map(|r| r.price).collect();
    let price_change: Float64Array = records.iter().map(|r| r.price_change_pct).collect();
    let volume_change: Float64Array = records.iter().map(|r| r.volume_change_pct).collect();
    let volatility: Float64Array = records.iter().map(|r| r.volatility_pct).collect();
    let volume: Float64Array = records.iter().map(|r| r.volume).collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(symbol),
            Arc::new(asset),
            Arc::new(price),
            Arc::new(price_change),
            Arc::new(volume_change),
            Arc::new(volatility),
            Arc::new(volume),
        ],
    )?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

/// Read a metric table back from Parquet format
pub fn read_metrics_from_parquet(path: impl AsRef<Path>) -> Result<Vec<MetricRecord>> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let strings = |idx: usize, name: &str| -> Result<StringArray> {
            batch
                .column(idx)
                .as_any()
                .downcast_ref::<StringArray>()
                .cloned()
                .with_context(|| format!("Failed to read {name} column"))
        };
        let floats = |idx: usize, name: &str| -> Result<Float64Array> {
            batch
                .column(idx)
                .as_any()
                .downcast_ref::<Float64Array>()
                .cloned()
                .with_context(|| format!("Failed to read {name} column"))
        };

        let symbol = strings(0, "symbol")?;
        let asset = strings(1, "asset")?;
        let price = floats(2, "price")?;
        let price_change = floats(3, "price_change_pct")?;
        let volume_change = floats(4, "volume_change_pct")?;
        let volatility = floats(5, "volatility_pct")?;
        let volume = floats(6, "volume")?;

        for i in 0..batch.num_rows() {
            records.push(MetricRecord {
                symbol: symbol.value(i).to_string(),
                asset: asset.value(i).to_string(),
                price: price.value(i),
                price_change_pct: price_change.value(i),
                volume_change_pct: volume_change.value(i),
                volatility_pct: volatility.value(i),
                volume: volume.value(i),
            });
        }
    }

    Ok(records)
}
