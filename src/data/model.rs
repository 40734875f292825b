use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a dataframe reader
/// would infer for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Missing,
}

impl CellValue {
    /// String form of the value, or `None` when the cell is missing.
    ///
    /// Numbers render the way a dataframe stringifies them: integral floats
    /// keep a trailing `.0`, booleans are capitalised.
    pub fn render(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::Float(v) => Some(render_float(*v)),
            CellValue::Bool(true) => Some("True".to_string()),
            CellValue::Bool(false) => Some("False".to_string()),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing) || matches!(self, CellValue::Float(v) if v.is_nan())
    }

    /// Missing, or a string form that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.render().map_or(true, |s| s.trim().is_empty())
    }
}

/// Python's `repr` form: scientific notation below `1e-4` or from `1e16`
/// upward, otherwise positional with at least one fractional digit.
fn render_float(v: f64) -> String {
    let magnitude = v.abs();
    if v.is_finite() && magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{v:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            None => sci,
        };
    }
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "<missing>"),
        }
    }
}

static MISSING: CellValue = CellValue::Missing;

// ---------------------------------------------------------------------------
// Record – one row of a table
// ---------------------------------------------------------------------------

/// A single row: column_name → value. Columns the row never had read as
/// [`CellValue::Missing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(cells: BTreeMap<String, CellValue>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Table – the rows loaded for one category
// ---------------------------------------------------------------------------

/// Ordered rows plus the ordered column list. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Row-wise concatenation. Columns are the union of all inputs in order
    /// of first appearance; row order follows input order.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Self {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut columns = Vec::new();
        let mut records = Vec::new();

        for table in tables {
            for col in table.columns {
                if seen.insert(col.clone()) {
                    columns.push(col);
                }
            }
            records.extend(table.records);
        }
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
