use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{ExportDataset, ExportRecord};

/// Required column names, exactly as they appear in the source headers.
/// Column order is not significant; the names are.
pub const COL_YEAR: &str = "Tahun";
pub const COL_COUNTRY: &str = "Negara";
pub const COL_ISO3: &str = "Iso-3";
pub const COL_VALUE: &str = "Nilai";
pub const COL_WEIGHT: &str = "Berat";

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// A dataset that failed to load. Fatal for the load attempt: the caller
/// surfaces it to the user instead of falling back to an empty table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("malformed Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    BadRow { row: usize, message: String },
    #[error("dataset contains no rows")]
    Empty,
}

fn bad_row(row: usize, message: impl Into<String>) -> LoadError {
    LoadError::BadRow {
        row,
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an export dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with a `Tahun`/`Negara`/`Iso-3`/`Nilai`/`Berat` header
/// * `.json`    – `[{ "Tahun": 2010, "Negara": "...", ... }, ...]`
/// * `.parquet` – flat columns of the same names
pub fn load_file(path: &Path) -> Result<ExportDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

fn finish(records: Vec<ExportRecord>) -> Result<ExportDataset, LoadError> {
    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(ExportDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

fn parse_year(raw: &str, row: usize) -> Result<i32, LoadError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| bad_row(row, format!("'{raw}' is not a valid {COL_YEAR} (integer year)")))
}

/// Parse a numeric cell. Blank cells are missing data, not errors; a
/// negative amount is malformed input.
fn parse_amount(raw: &str, row: usize, col: &'static str) -> Result<Option<f64>, LoadError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let v = raw
        .parse::<f64>()
        .map_err(|_| bad_row(row, format!("'{raw}' is not a valid {col} (number)")))?;
    if v < 0.0 {
        return Err(bad_row(row, format!("{col} must be non-negative, got {v}")));
    }
    Ok(Some(v))
}

/// Normalize an ISO3 cell: blank → absent; anything that is not exactly three
/// ASCII letters is also treated as absent, with a warning.
fn normalize_iso3(raw: &str, row: usize) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(raw.to_ascii_uppercase())
    } else {
        log::warn!("row {row}: ignoring ill-formed ISO3 code '{raw}'");
        None
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ExportDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(csv::Reader::from_reader(file))
}

/// Parse an open CSV reader. Split out from [`load_csv`] so tests can feed
/// in-memory byte slices.
fn parse_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<ExportDataset, LoadError> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let col = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let year_idx = col(COL_YEAR)?;
    let country_idx = col(COL_COUNTRY)?;
    let iso3_idx = col(COL_ISO3)?;
    let value_idx = col(COL_VALUE)?;
    let weight_idx = col(COL_WEIGHT)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        records.push(ExportRecord {
            year: parse_year(cell(year_idx), row_no)?,
            country: cell(country_idx).trim().to_string(),
            iso3: normalize_iso3(cell(iso3_idx), row_no),
            value_usd: parse_amount(cell(value_idx), row_no, COL_VALUE)?,
            weight_kg: parse_amount(cell(weight_idx), row_no, COL_WEIGHT)?,
        });
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Tahun": 2010, "Negara": "Japan", "Iso-3": "JPN", "Nilai": 125000.0, "Berat": 5400.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ExportDataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<ExportDataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| bad_row(0, "expected a top-level JSON array of row objects"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| bad_row(row_no, "row is not a JSON object"))?;

        let year = match obj.get(COL_YEAR) {
            Some(JsonValue::Number(n)) => n
                .as_i64()
                .map(|y| y as i32)
                .ok_or_else(|| bad_row(row_no, format!("{COL_YEAR} is not an integer")))?,
            Some(JsonValue::String(s)) => parse_year(s, row_no)?,
            _ => return Err(bad_row(row_no, format!("missing {COL_YEAR}"))),
        };

        let country = match obj.get(COL_COUNTRY) {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            _ => String::new(),
        };

        let iso3 = match obj.get(COL_ISO3) {
            Some(JsonValue::String(s)) => normalize_iso3(s, row_no),
            _ => None,
        };

        records.push(ExportRecord {
            year,
            country,
            iso3,
            value_usd: json_amount(obj.get(COL_VALUE), row_no, COL_VALUE)?,
            weight_kg: json_amount(obj.get(COL_WEIGHT), row_no, COL_WEIGHT)?,
        });
    }

    finish(records)
}

fn json_amount(
    val: Option<&JsonValue>,
    row: usize,
    col: &'static str,
) -> Result<Option<f64>, LoadError> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => {
            let v = n
                .as_f64()
                .ok_or_else(|| bad_row(row, format!("{col} is not a finite number")))?;
            if v < 0.0 {
                return Err(bad_row(row, format!("{col} must be non-negative, got {v}")));
            }
            Ok(Some(v))
        }
        Some(other) => Err(bad_row(row, format!("{col} has non-numeric value {other}"))),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat `Tahun`/`Negara`/`Iso-3`/`Nilai`/`Berat`
/// columns. Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`): integers may arrive as Int32 or
/// Int64, floats as Float32 or Float64, strings as Utf8 or LargeUtf8.
fn load_parquet(path: &Path) -> Result<ExportDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        let year_col = batch_column(&batch, COL_YEAR)?;
        let country_col = batch_column(&batch, COL_COUNTRY)?;
        let iso3_col = batch_column(&batch, COL_ISO3)?;
        let value_col = batch_column(&batch, COL_VALUE)?;
        let weight_col = batch_column(&batch, COL_WEIGHT)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let year = extract_int(year_col, row)
                .ok_or_else(|| bad_row(row_no, format!("missing or non-integer {COL_YEAR}")))?
                as i32;
            let country = extract_string(country_col, row).unwrap_or_default();
            let iso3 = extract_string(iso3_col, row)
                .map(|s| normalize_iso3(&s, row_no))
                .unwrap_or(None);

            records.push(ExportRecord {
                year,
                country: country.trim().to_string(),
                iso3,
                value_usd: extract_amount(value_col, row, row_no, COL_VALUE)?,
                weight_kg: extract_amount(weight_col, row, row_no, COL_WEIGHT)?,
            });
        }
    }

    finish(records)
}

// -- Arrow column helpers --

fn batch_column<'a>(
    batch: &'a arrow::record_batch::RecordBatch,
    name: &'static str,
) -> Result<&'a Arc<dyn Array>, LoadError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn extract_int(col: &Arc<dyn Array>, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as i64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

fn extract_float(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Int32 | DataType::Int64 => extract_int(col, row).map(|v| v as f64),
        _ => None,
    }
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

fn extract_amount(
    col: &Arc<dyn Array>,
    row: usize,
    row_no: usize,
    name: &'static str,
) -> Result<Option<f64>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let v = extract_float(col, row)
        .ok_or_else(|| bad_row(row_no, format!("{name} has non-numeric type")))?;
    if v < 0.0 {
        return Err(bad_row(row_no, format!("{name} must be non-negative, got {v}")));
    }
    Ok(Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv_text: &str) -> Result<ExportDataset, LoadError> {
        parse_csv(csv::Reader::from_reader(csv_text.as_bytes()))
    }

    const SAMPLE: &str = "\
Tahun,Negara,Iso-3,Nilai,Berat
2010,Japan,JPN,200.0,20.0
2010,United States,USA,100.0,10.0
2011,United States,USA,50.0,5.0
";

    #[test]
    fn parses_rows_in_file_order() {
        let ds = parse(SAMPLE).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].country, "Japan");
        assert_eq!(ds.records[0].iso3.as_deref(), Some("JPN"));
        assert_eq!(ds.records[0].value_usd, Some(200.0));
        assert_eq!(ds.records[2].year, 2011);
        assert_eq!(ds.year_span.min, 2010);
        assert_eq!(ds.year_span.max, 2011);
    }

    #[test]
    fn column_order_is_not_significant() {
        let shuffled = "\
Berat,Iso-3,Tahun,Nilai,Negara
20.0,JPN,2010,200.0,Japan
";
        let ds = parse(shuffled).unwrap();
        assert_eq!(ds.records[0].year, 2010);
        assert_eq!(ds.records[0].country, "Japan");
        assert_eq!(ds.records[0].weight_kg, Some(20.0));
    }

    #[test]
    fn missing_column_is_rejected() {
        let err = parse("Tahun,Negara,Nilai,Berat\n2010,Japan,1.0,1.0\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(COL_ISO3)));
    }

    #[test]
    fn blank_cells_become_missing_data() {
        let ds = parse("Tahun,Negara,Iso-3,Nilai,Berat\n2010,Japan,,,5.0\n").unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.iso3, None);
        assert_eq!(rec.value_usd, None);
        assert_eq!(rec.weight_kg, Some(5.0));
        assert!(!rec.is_complete());
    }

    #[test]
    fn ill_formed_iso3_is_treated_as_absent() {
        let ds = parse("Tahun,Negara,Iso-3,Nilai,Berat\n2010,Japan,JPNX,1.0,1.0\n").unwrap();
        assert_eq!(ds.records[0].iso3, None);
    }

    #[test]
    fn iso3_is_upper_cased() {
        let ds = parse("Tahun,Negara,Iso-3,Nilai,Berat\n2010,Japan,jpn,1.0,1.0\n").unwrap();
        assert_eq!(ds.records[0].iso3.as_deref(), Some("JPN"));
    }

    #[test]
    fn non_integer_year_is_rejected() {
        let err = parse("Tahun,Negara,Iso-3,Nilai,Berat\nlast year,Japan,JPN,1.0,1.0\n").unwrap_err();
        assert!(matches!(err, LoadError::BadRow { row: 0, .. }));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = parse("Tahun,Negara,Iso-3,Nilai,Berat\n2010,Japan,JPN,-3.0,1.0\n").unwrap_err();
        assert!(matches!(err, LoadError::BadRow { row: 0, .. }));
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = parse("Tahun,Negara,Iso-3,Nilai,Berat\n").unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn json_rows_match_csv_rows() {
        let json = r#"[
            {"Tahun": 2010, "Negara": "Japan", "Iso-3": "JPN", "Nilai": 200.0, "Berat": 20.0},
            {"Tahun": 2011, "Negara": "United States", "Iso-3": "USA", "Nilai": 50.0, "Berat": null}
        ]"#;
        let ds = parse_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].country, "Japan");
        assert_eq!(ds.records[1].weight_kg, None);
        assert_eq!(ds.year_span.max, 2011);
    }

    #[test]
    fn json_rejects_non_numeric_amount() {
        let json = r#"[{"Tahun": 2010, "Negara": "Japan", "Iso-3": "JPN", "Nilai": "lots", "Berat": 1.0}]"#;
        assert!(matches!(
            parse_json(json).unwrap_err(),
            LoadError::BadRow { row: 0, .. }
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("exports.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn parquet_round_trips_through_arrow() {
        use arrow::array::{Float64Array as F64, Int64Array as I64, StringArray as Str};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_COUNTRY, DataType::Utf8, false),
            Field::new(COL_ISO3, DataType::Utf8, true),
            Field::new(COL_VALUE, DataType::Float64, true),
            Field::new(COL_WEIGHT, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(I64::from(vec![2010, 2011])),
                Arc::new(Str::from(vec!["Japan", "United States"])),
                Arc::new(Str::from(vec![Some("JPN"), None])),
                Arc::new(F64::from(vec![Some(200.0), Some(50.0)])),
                Arc::new(F64::from(vec![Some(20.0), None])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!(
            "batik_dash_loader_test_{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].iso3.as_deref(), Some("JPN"));
        assert_eq!(ds.records[1].iso3, None);
        assert_eq!(ds.records[1].weight_kg, None);
        assert_eq!(ds.records[1].value_usd, Some(50.0));
    }
}
