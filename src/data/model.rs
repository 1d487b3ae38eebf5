use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the listing table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream, so it must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --
// Equality, ordering and hashing all compare floats bitwise (`total_cmp`).

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for text, booleans and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// The dtype inferred for a whole column at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Bool => "bool",
            ColumnKind::Text => "object",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Names of the columns the dashboard derivations depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingColumns {
    pub city: String,
    pub rooms: String,
    pub rent: String,
}

impl Default for ListingColumns {
    fn default() -> Self {
        Self {
            city: "city".to_string(),
            rooms: "rooms".to_string(),
            rent: "rent amount (R$)".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed upload: ordered columns and row-major cells.
///
/// Every row holds exactly `columns.len()` cells. The table is never mutated
/// after loading; derivations refer to rows by index.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ListingTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        ListingTable { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.rows[row][col]
    }

    /// Iterate `(row_index, cell)` for one column.
    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = (usize, &CellValue)> + '_ {
        self.rows.iter().enumerate().map(move |(i, r)| (i, &r[col]))
    }

    /// Distinct non-null values of a column in order of first appearance.
    pub fn distinct_values(&self, col: usize) -> Vec<CellValue> {
        let mut seen = std::collections::HashSet::new();
        self.column_cells(col)
            .filter(|(_, v)| !v.is_null())
            .filter(|(_, v)| seen.insert(*v))
            .map(|(_, v)| v.clone())
            .collect()
    }
}
