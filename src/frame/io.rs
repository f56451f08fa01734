//! CSV and Parquet serialization for [`Frame`].
//!
//! CSV output is semicolon-delimited (measurement labels such as
//! "Temperature, K" contain commas). Parquet snapshots map text columns to
//! nullable Utf8 and numeric columns to nullable Float64, compressed with
//! ZSTD. All file writes go through a temp file in the destination directory
//! followed by an atomic rename, so an aborted run never leaves a truncated
//! artifact behind.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use tempfile::NamedTempFile;

use super::{Frame, FrameError, Value};

/// Default ZSTD level for Parquet snapshots.
const SNAPSHOT_ZSTD_LEVEL: i32 = 3;

/// Delimiter for all CSV artifacts.
pub const CSV_DELIMITER: u8 = b';';

fn temp_in_parent(path: &Path) -> Result<NamedTempFile, FrameError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(NamedTempFile::new_in(parent)?)
}

impl Frame {
    /// Write the frame as delimited CSV to any writer.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), FrameError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        wtr.write_record(self.column_names())?;
        for row in 0..self.n_rows() {
            wtr.write_record(
                self.columns()
                    .iter()
                    .map(|c| c.get(row).map(ToString::to_string).unwrap_or_default()),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the frame as semicolon-delimited CSV, atomically replacing
    /// anything already at `path`.
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FrameError> {
        let path = path.as_ref();
        let temp = temp_in_parent(path)?;
        self.write_csv(temp.as_file(), CSV_DELIMITER)?;
        temp.persist(path).map_err(|e| FrameError::Io(e.error))?;
        Ok(())
    }

    /// Read a delimited CSV file. Empty cells become `Null`, cells that
    /// parse as f64 become `Num`, everything else `Str`.
    pub fn read_csv_file<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Frame, FrameError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_path(path.as_ref())?;

        let names: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

        for record in rdr.records() {
            let record = record?;
            for (i, cell) in record.iter().enumerate() {
                if i >= columns.len() {
                    break;
                }
                columns[i].push(parse_cell(cell));
            }
        }

        let mut frame = Frame::new();
        for (name, values) in names.into_iter().zip(columns) {
            frame.add_column(name, values)?;
        }
        Ok(frame)
    }

    /// Write the frame as a Parquet snapshot, atomically replacing anything
    /// already at `path`.
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<(), FrameError> {
        let path = path.as_ref();
        let batch = self.to_record_batch()?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::try_new(SNAPSHOT_ZSTD_LEVEL)?))
            .build();

        let temp = temp_in_parent(path)?;
        let mut writer = ArrowWriter::try_new(temp.reopen()?, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        temp.persist(path).map_err(|e| FrameError::Io(e.error))?;
        Ok(())
    }

    /// Read a Parquet snapshot back into a frame. Utf8 columns load as text;
    /// any numeric column loads as Float64.
    pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Frame, FrameError> {
        let file = File::open(path.as_ref())?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let reader = builder.build()?;

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); schema.fields().len()];
        for batch in reader {
            let batch = batch?;
            for (i, array) in batch.columns().iter().enumerate() {
                append_array(&mut columns[i], schema.field(i), array)?;
            }
        }

        let mut frame = Frame::new();
        for (field, values) in schema.fields().iter().zip(columns) {
            frame.add_column(field.name().clone(), values)?;
        }
        Ok(frame)
    }

    /// Convert the frame into a single Arrow record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch, FrameError> {
        let mut fields = Vec::with_capacity(self.n_cols());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.n_cols());

        for column in self.columns() {
            if column.is_numeric() {
                fields.push(Field::new(column.name(), DataType::Float64, true));
                arrays.push(Arc::new(Float64Array::from_iter(
                    column.values().iter().map(Value::as_num),
                )));
            } else {
                fields.push(Field::new(column.name(), DataType::Utf8, true));
                arrays.push(Arc::new(StringArray::from_iter(
                    column.values().iter().map(Value::as_str),
                )));
            }
        }

        let schema = Arc::new(Schema::new(fields));
        Ok(RecordBatch::try_new(schema, arrays)?)
    }
}

fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Null
    } else if let Ok(n) = cell.parse::<f64>() {
        Value::Num(n)
    } else {
        Value::Str(cell.to_string())
    }
}

fn append_array(out: &mut Vec<Value>, field: &Field, array: &ArrayRef) -> Result<(), FrameError> {
    match field.data_type() {
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| unsupported(field))?;
            for i in 0..strings.len() {
                out.push(if strings.is_null(i) {
                    Value::Null
                } else {
                    Value::Str(strings.value(i).to_string())
                });
            }
            Ok(())
        }
        dt if dt.is_numeric() => {
            let floats = cast(array, &DataType::Float64)?;
            let floats = floats
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| unsupported(field))?;
            for i in 0..floats.len() {
                out.push(if floats.is_null(i) {
                    Value::Null
                } else {
                    Value::Num(floats.value(i))
                });
            }
            Ok(())
        }
        _ => Err(unsupported(field)),
    }
}

fn unsupported(field: &Field) -> FrameError {
    FrameError::UnsupportedType {
        column: field.name().clone(),
        data_type: field.data_type().to_string(),
    }
}
