use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Record, Table};

/// Raw fields a dataframe reader treats as missing by default.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every path that exists and concatenate the results in the order
/// given. Missing paths are skipped with a warning; a file that exists but
/// cannot be parsed is an error.
pub fn load_tables<P: AsRef<Path>>(paths: &[P]) -> Result<Table> {
    let mut tables = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            warn!("skipping missing source file {}", path.display());
            continue;
        }
        let table = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        info!("loaded {} rows from {}", table.len(), path.display());
        tables.push(table);
    }

    Ok(Table::concat(tables))
}

/// Load a single table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – comma-delimited text with a header row
/// * `.tsv` / `.tab`   – tab-delimited text with a header row
/// * `.json`           – `[{ "Virus": "...", "Host": "...", ... }, ...]`
/// * `.parquet` / `.pq`
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" | "tab" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row required. Headers and text cells are trimmed; each column is
/// typed as a whole (integer, float, boolean or text) the way a dataframe
/// reader infers dtypes.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening delimited file")?;

    let raw_headers = reader.headers().context("reading header row")?.clone();
    if raw_headers.is_empty() {
        bail!("No columns to parse from file");
    }
    let columns = dedupe_headers(raw_headers.iter().map(str::trim));
    let width = columns.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in reader.records() {
        let record = result.context("reading delimited row")?;
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line());
            bail!("line {line}: expected {width} fields, saw {}", record.len());
        }
        let row = (0..width)
            .map(|i| {
                record
                    .get(i)
                    .filter(|field| !NA_MARKERS.contains(field))
                    .map(str::to_string)
            })
            .collect();
        raw_rows.push(row);
    }
    debug!("{}: {} columns, {} rows", path.display(), width, raw_rows.len());

    let mut typed_columns: Vec<_> = (0..width)
        .map(|i| {
            let raw: Vec<Option<&str>> = raw_rows.iter().map(|row| row[i].as_deref()).collect();
            infer_column(&raw).into_iter()
        })
        .collect();

    let records = (0..raw_rows.len())
        .map(|_| {
            columns
                .iter()
                .zip(typed_columns.iter_mut())
                .map(|(col, cells)| (col.clone(), cells.next().unwrap_or(CellValue::Missing)))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, records))
}

/// Empty names become `Unnamed: <index>`; repeats get `.1`, `.2`, ... suffixes.
fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut suffixes: BTreeMap<String, usize> = BTreeMap::new();

    for (i, name) in names.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        while out.contains(&candidate) {
            let n = suffixes.entry(base.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{base}.{n}");
        }
        out.push(candidate);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn infer_column(raw: &[Option<&str>]) -> Vec<CellValue> {
    let present: Vec<&str> = raw.iter().flatten().map(|s| s.trim()).collect();
    let has_missing = present.len() < raw.len();

    // Integer columns with holes widen to float, as a dataframe would.
    let kind = if present.is_empty() {
        ColumnKind::Text
    } else if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        if has_missing {
            ColumnKind::Float
        } else {
            ColumnKind::Integer
        }
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    };

    raw.iter()
        .map(|field| match field {
            None => CellValue::Missing,
            Some(s) => convert_cell(s.trim(), kind),
        })
        .collect()
}

fn convert_cell(s: &str, kind: ColumnKind) -> CellValue {
    let text = || CellValue::Text(s.to_string());
    match kind {
        ColumnKind::Integer => s.parse().map_or_else(|_| text(), CellValue::Integer),
        ColumnKind::Float => s.parse().map_or_else(|_| text(), CellValue::Float),
        ColumnKind::Bool => parse_bool(s).map_or_else(text, CellValue::Bool),
        ColumnKind::Text => text(),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Virus": "Rabies Virus", "Host": "Mammals", "Incubation (days)": 30 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            let key = key.trim().to_string();
            if !columns.contains(&key) {
                columns.push(key.clone());
            }
            cells.insert(key, json_to_cell(val));
        }
        records.push(Record::new(cells));
    }

    Ok(Table::new(columns, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.trim().to_string()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every column becomes a table column. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns = dedupe_headers(builder.schema().fields().iter().map(|f| f.name().trim()));
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let arrays = batch
            .columns()
            .iter()
            .map(normalize_array)
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, col_name) in columns.iter().enumerate() {
                let value = extract_cell(&arrays[col_idx], row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                cells.insert(col_name.clone(), value);
            }
            records.push(Record::new(cells));
        }
    }

    Ok(Table::new(columns, records))
}

/// Decode dictionary and view encodings, and widen small integers, so that
/// `extract_cell` only sees the plain types below.
fn normalize_array(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Dictionary(_, values) => values.as_ref().clone(),
        DataType::Utf8View => DataType::Utf8,
        DataType::Int8
        | DataType::Int16
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => DataType::Int64,
        _ => return Ok(Arc::clone(col)),
    };
    let cast_col = cast(col, &target)
        .with_context(|| format!("decoding {} column", col.data_type()))?;
    // Dictionary values may themselves be a view type.
    normalize_array(&cast_col)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Missing);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).trim().to_string()),
        DataType::LargeUtf8 => {
            CellValue::Text(col.as_string::<i64>().value(row).trim().to_string())
        }
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_from_f32(col.as_primitive::<Float32Type>().value(row)),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => {
            let text = array_value_to_string(col, row).context("formatting value")?;
            CellValue::Text(text.trim().to_string())
        }
    };
    Ok(value)
}

/// Widen through the shortest decimal form so `0.1f32` stays `0.1`.
fn float_from_f32(v: f32) -> CellValue {
    let widened = v.to_string().parse::<f64>().unwrap_or(v as f64);
    CellValue::Float(widened)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use arrow::array::{
        BooleanArray, DictionaryArray, Float32Array, Int16Array, Int32Array, StringArray,
        StringViewArray,
    };
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn trims_headers_and_text_cells() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v.csv", " Virus , Host \n  Rabies Virus ,  Mammals  \n");

        let table = load_tables(&[path]).unwrap();
        assert_eq!(table.columns(), &["Virus", "Host"]);
        let row = &table.records()[0];
        assert_eq!(row.get("Virus"), &text("Rabies Virus"));
        assert_eq!(row.get("Host"), &text("Mammals"));
    }

    #[test]
    fn blank_field_is_missing_but_whitespace_field_is_empty_text() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v.csv", "Virus,Host,Vector\nRabies,,   \n");

        let table = load_tables(&[path]).unwrap();
        let row = &table.records()[0];
        assert_eq!(row.get("Host"), &CellValue::Missing);
        assert_eq!(row.get("Vector"), &text(""));
    }

    #[test]
    fn na_markers_are_missing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v.csv", "Virus,Host\nA,N/A\nB,NaN\nC,null\n");

        let table = load_tables(&[path]).unwrap();
        assert!(table.records().iter().all(|r| r.get("Host").is_missing()));
    }

    #[test]
    fn numeric_columns_keep_their_type() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "v.csv",
            "Virus,Cases,Rate,Gappy,Zoonotic\nA, 12 ,0.5,3,True\nB,7,1,,false\n",
        );

        let table = load_tables(&[path]).unwrap();
        let a = &table.records()[0];
        let b = &table.records()[1];
        assert_eq!(a.get("Cases"), &CellValue::Integer(12));
        assert_eq!(b.get("Rate"), &CellValue::Float(1.0));
        assert_eq!(a.get("Gappy"), &CellValue::Float(3.0));
        assert_eq!(b.get("Gappy"), &CellValue::Missing);
        assert_eq!(a.get("Zoonotic"), &CellValue::Bool(true));
    }

    #[test]
    fn mixed_column_stays_text() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v.csv", "Virus,Code\nA,007\nB,x1\n");

        let table = load_tables(&[path]).unwrap();
        assert_eq!(table.records()[0].get("Code"), &text("007"));
    }

    #[test]
    fn concatenates_files_in_order_and_skips_missing_paths() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "a.csv", "Virus\nA\nB\n");
        let absent = dir.path().join("absent.csv");
        let second = write(&dir, "b.csv", "Virus,Host\nC,Bats\n");

        let table = load_tables(&[first, absent, second]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns(), &["Virus", "Host"]);
        assert_eq!(table.records()[2].get("Virus"), &text("C"));
        assert_eq!(table.records()[0].get("Host"), &CellValue::Missing);
    }

    #[test]
    fn no_existing_path_gives_empty_table() {
        let dir = TempDir::new().unwrap();
        let table = load_tables(&[dir.path().join("nope.csv")]).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_fail() {
        let dir = TempDir::new().unwrap();
        let short = write(&dir, "short.csv", "Virus,Host\nA\n");
        let table = load_tables(&[short]).unwrap();
        assert_eq!(table.records()[0].get("Host"), &CellValue::Missing);

        let long = write(&dir, "long.csv", "Virus,Host\nA,B,C\n");
        let err = load_tables(&[long]).unwrap_err();
        assert!(format!("{err:#}").contains("expected 2 fields, saw 3"));
    }

    #[test]
    fn duplicate_and_empty_headers_are_disambiguated() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v.csv", "Virus, Host ,Host,\nA,x,y,z\n");

        let table = load_tables(&[path]).unwrap();
        assert_eq!(table.columns(), &["Virus", "Host", "Host.1", "Unnamed: 3"]);
    }

    #[test]
    fn tab_delimited_files_are_supported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "f.tsv", "Fungus\tHabitat\nCandida auris \tSkin\n");

        let table = load_tables(&[path]).unwrap();
        assert_eq!(table.records()[0].get("Fungus"), &text("Candida auris"));
    }

    #[test]
    fn json_records_are_loaded_and_trimmed() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "b.json",
            r#"[{" Bacterium ": " E. coli ", "Gram": "negative", "Optimum": 37}, {"Bacterium": "S. aureus", "Gram": null}]"#,
        );

        let table = load_tables(&[path]).unwrap();
        assert!(table.has_column("Bacterium"));
        assert_eq!(table.records()[0].get("Bacterium"), &text("E. coli"));
        assert_eq!(table.records()[0].get("Optimum"), &CellValue::Integer(37));
        assert_eq!(table.records()[1].get("Gram"), &CellValue::Missing);
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.csv", "");
        assert!(load_tables(&[path]).is_err());
    }

    fn write_parquet(dir: &TempDir, name: &str, columns: Vec<(&str, ArrayRef)>) -> PathBuf {
        let path = dir.path().join(name);
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_string_encodings_are_all_trimmed() {
        let dir = TempDir::new().unwrap();
        let hosts: DictionaryArray<Int32Type> = vec![Some(" Bats "), None].into_iter().collect();
        let path = write_parquet(
            &dir,
            "v.parquet",
            vec![
                (
                    " Virus ",
                    Arc::new(StringArray::from(vec![" Rabies Virus ", "Zika"])) as ArrayRef,
                ),
                ("Host", Arc::new(hosts) as ArrayRef),
                (
                    "Transmission",
                    Arc::new(StringViewArray::from(vec![Some("  Bite  "), None])) as ArrayRef,
                ),
            ],
        );

        let table = load_tables(&[path]).unwrap();
        assert_eq!(table.columns(), &["Virus", "Host", "Transmission"]);
        let rabies = &table.records()[0];
        assert_eq!(rabies.get("Virus"), &text("Rabies Virus"));
        assert_eq!(rabies.get("Host"), &text("Bats"));
        assert_eq!(rabies.get("Transmission"), &text("Bite"));
        let zika = &table.records()[1];
        assert_eq!(zika.get("Host"), &CellValue::Missing);
        assert_eq!(zika.get("Transmission"), &CellValue::Missing);
    }

    #[test]
    fn parquet_numeric_and_boolean_columns_keep_their_type() {
        let dir = TempDir::new().unwrap();
        let path = write_parquet(
            &dir,
            "b.parquet",
            vec![
                (
                    "Bacterium",
                    Arc::new(StringArray::from(vec!["E. coli", "S. aureus"])) as ArrayRef,
                ),
                (
                    "Cases",
                    Arc::new(Int32Array::from(vec![Some(12), None])) as ArrayRef,
                ),
                (
                    "Rate",
                    Arc::new(Float32Array::from(vec![Some(0.1), Some(2.0)])) as ArrayRef,
                ),
                (
                    "Motile",
                    Arc::new(BooleanArray::from(vec![Some(true), None])) as ArrayRef,
                ),
                ("Colonies", Arc::new(Int16Array::from(vec![3, 4])) as ArrayRef),
            ],
        );

        let table = load_tables(&[path]).unwrap();
        let ecoli = &table.records()[0];
        let aureus = &table.records()[1];
        assert_eq!(ecoli.get("Cases"), &CellValue::Integer(12));
        assert_eq!(aureus.get("Cases"), &CellValue::Missing);
        assert_eq!(ecoli.get("Rate").render().as_deref(), Some("0.1"));
        assert_eq!(aureus.get("Rate").render().as_deref(), Some("2.0"));
        assert_eq!(ecoli.get("Motile"), &CellValue::Bool(true));
        assert_eq!(aureus.get("Motile"), &CellValue::Missing);
        assert_eq!(aureus.get("Colonies"), &CellValue::Integer(4));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "v.xlsx", "Virus\nA\n");
        let err = load_tables(&[path]).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension: .xlsx"));
    }
}
