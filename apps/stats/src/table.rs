use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Cell strings read as missing values, following pandas' defaults.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File '{}' not found!", path.display())]
    NotFound { path: PathBuf },

    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("No columns to parse from file")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Int64,
    Float64,
    Object,
}

impl Dtype {
    pub fn is_numeric(self) -> bool {
        matches!(self, Dtype::Int64 | Dtype::Float64)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dtype::Int64 => "int64",
            Dtype::Float64 => "float64",
            Dtype::Object => "object",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: Dtype,
    /// `None` marks a missing value.
    pub cells: Vec<Option<String>>,
}

impl Column {
    fn new(name: String, cells: Vec<Option<String>>) -> Self {
        let dtype = infer_dtype(&cells);
        Self { name, dtype, cells }
    }

    pub fn non_null(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Present cells parsed as numbers. Empty for non-numeric columns.
    pub fn numbers(&self) -> Vec<f64> {
        if !self.dtype.is_numeric() {
            return Vec::new();
        }
        self.cells
            .iter()
            .flatten()
            .filter_map(|c| c.trim().parse::<f64>().ok())
            .collect()
    }

    /// Parsed number at `row`, `None` when missing or non-numeric.
    pub fn number_at(&self, row: usize) -> Option<f64> {
        if !self.dtype.is_numeric() {
            return None;
        }
        self.cells
            .get(row)?
            .as_deref()
            .and_then(|c| c.trim().parse::<f64>().ok())
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: usize,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.dtype.is_numeric())
    }
}

/// Loads a comma-separated file with a header row.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let table = from_reader(file)?;
    debug!(
        "Loaded {} rows × {} columns from {}",
        table.rows,
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let names = column_names(headers.iter());

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            let value = (!NULL_MARKERS.contains(&field)).then(|| field.to_string());
            cells[i].push(value);
        }
        rows += 1;
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();

    Ok(Table { columns, rows })
}

/// Blank headers become `Unnamed: i`; repeats get `.1`, `.2`, ... suffixes.
fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .enumerate()
        .map(|(i, raw)| {
            let base = match raw.trim() {
                "" => format!("Unnamed: {i}"),
                name => name.to_string(),
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base
            } else {
                format!("{base}.{n}")
            };
            *n += 1;
            name
        })
        .collect()
}

fn infer_dtype(cells: &[Option<String>]) -> Dtype {
    let present: Vec<&str> = cells.iter().flatten().map(|c| c.trim()).collect();
    if present.is_empty() {
        return Dtype::Object;
    }
    if present.len() == cells.len() && present.iter().all(|c| c.parse::<i64>().is_ok()) {
        return Dtype::Int64;
    }
    if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        return Dtype::Float64;
    }
    Dtype::Object
}
