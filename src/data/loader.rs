//! Panel loader for the preprocessed order-book export
//!
//! The export is one table with a Unix-millisecond timestamp column and
//! `{prefix}_{variable}` columns for each venue. Columns for untracked
//! variables (`d_*`, `*_lag1`, `timestamp_et`) are ignored.

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use crate::causality::all_variables;
use crate::config::VenuesConfig;
use crate::panel::{TimeSeriesPanel, Venue, VenueTable};

use super::types::{InputFormat, LoadError};

/// Reads the export into two venue tables
#[derive(Debug, Clone)]
pub struct PanelLoader {
    timestamp_column: String,
    venues: VenuesConfig,
}

impl PanelLoader {
    /// Create a loader
    pub fn new(timestamp_column: impl Into<String>, venues: VenuesConfig) -> Self {
        Self {
            timestamp_column: timestamp_column.into(),
            venues,
        }
    }

    /// Load and align a panel
    pub fn load_panel(&self, path: impl AsRef<Path>) -> Result<TimeSeriesPanel, LoadError> {
        let (a, b) = self.load(path)?;
        Ok(TimeSeriesPanel::align(a, b)?)
    }

    /// Load both venue tables
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(VenueTable, VenueTable), LoadError> {
        let path = path.as_ref();
        let batch = match InputFormat::from_path(path)? {
            InputFormat::Csv => read_csv(path)?,
            InputFormat::Parquet => read_parquet(path)?,
        };

        let (a, b) = self.split(&batch)?;
        tracing::info!(
            path = ?path,
            rows = batch.num_rows(),
            columns_a = a.columns.len(),
            columns_b = b.columns.len(),
            "Loaded panel"
        );
        Ok((a, b))
    }

    /// Split one record batch into venue tables
    pub fn split(&self, batch: &RecordBatch) -> Result<(VenueTable, VenueTable), LoadError> {
        let timestamps = self.timestamps(batch)?;
        let mut a = VenueTable::new(timestamps.clone());
        let mut b = VenueTable::new(timestamps);

        for (_, variable) in all_variables() {
            for (venue, table) in [(Venue::A, &mut a), (Venue::B, &mut b)] {
                let name = self.venues.column(venue, variable);
                if let Some(column) = batch.column_by_name(&name) {
                    table.columns.insert(variable.to_string(), to_f64(column)?);
                }
            }
        }

        Ok((a, b))
    }

    fn timestamps(&self, batch: &RecordBatch) -> Result<Vec<DateTime<Utc>>, LoadError> {
        let column = batch
            .column_by_name(&self.timestamp_column)
            .ok_or_else(|| LoadError::MissingTimestamp(self.timestamp_column.clone()))?;
        let millis = cast(column, &DataType::Int64)?;
        let millis = millis
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| LoadError::MissingTimestamp(self.timestamp_column.clone()))?;

        millis
            .iter()
            .enumerate()
            .map(|(row, ms)| {
                ms.and_then(DateTime::from_timestamp_millis)
                    .ok_or(LoadError::InvalidTimestamp { row })
            })
            .collect()
    }
}

/// Nulls and unparsable cells become NaN
fn to_f64(column: &ArrayRef) -> Result<Vec<f64>, LoadError> {
    let values = cast(column, &DataType::Float64)?;
    let values = values
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| {
            arrow::error::ArrowError::CastError(format!(
                "cannot read {} as f64",
                column.data_type()
            ))
        })?;
    Ok(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn read_csv(path: &Path) -> Result<RecordBatch, LoadError> {
    let mut file = File::open(path)?;
    let format = arrow::csv::reader::Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = arrow::csv::ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(concat_batches(&schema, &batches)?)
}

fn read_parquet(path: &Path) -> Result<RecordBatch, LoadError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(concat_batches(&schema, &batches)?)
}
