//! Workbooks of catalog sheets
//!
//! A workbook is an Excel-style spreadsheet (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`,
//! `.ods`; sheets in workbook order), a directory of `*.csv` files (one sheet per
//! file, named by file stem and ordered by file name), a single `*.csv` file, or
//! a `*.json` object mapping sheet names to arrays of row objects.

use crate::error::{Result, TableError};
use calamine::{open_workbook_auto, Data, Reader};
use catmatch_core::{Cell, ColumnConfig, Record, Table};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A sheet selected by 0-based position or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Index(usize),
    Name(String),
}

impl SheetRef {
    /// Digits select by position, anything else by name
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<usize>() {
            Ok(index) => SheetRef::Index(index),
            Err(_) => SheetRef::Name(s.to_string()),
        }
    }
}

impl FromStr for SheetRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Index(i) => write!(f, "#{}", i),
            SheetRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// One sheet: a header row and data rows aligned to it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| TableError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Project the sheet onto the four record fields
    ///
    /// Every configured column must exist; a headerless, rowless sheet is an
    /// empty table.
    pub fn to_table(&self, columns: &ColumnConfig) -> Result<Table> {
        if self.headers.is_empty() && self.rows.is_empty() {
            return Ok(Table::new(self.name.clone(), Vec::new()));
        }

        let [title, detail, category, price] = columns.names().map(|c| self.column_index(c));
        let (title, detail, category, price) = (title?, detail?, category?, price?);

        let cell = |row: &Vec<Cell>, idx: usize| row.get(idx).cloned().unwrap_or_default();
        let records = self
            .rows
            .iter()
            .map(|row| Record {
                title: cell(row, title),
                detail: cell(row, detail),
                category: cell(row, category),
                price: cell(row, price),
            })
            .collect();

        Ok(Table::new(self.name.clone(), records))
    }

    /// Read one CSV source. Empty fields become missing cells.
    pub fn from_csv_reader<R: std::io::Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from_field).collect());
        }

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let name = sheet_name(path)?;
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(&name, file)
    }

    /// Build a sheet from a spreadsheet range; the first row holds the headers
    fn from_range(name: &str, range: &calamine::Range<Data>) -> Self {
        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header) => header.iter().map(|d| excel_cell(d).as_text()).collect(),
            None => Vec::new(),
        };
        let rows = rows.map(|row| row.iter().map(excel_cell).collect()).collect();

        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Build a sheet from an array of JSON row objects
    fn from_json_rows(name: &str, rows: &Value) -> Result<Self> {
        let rows = rows.as_array().ok_or_else(|| {
            TableError::InvalidWorkbook(format!("sheet '{}' must be an array of rows", name))
        })?;

        let mut headers: Vec<String> = Vec::new();
        for row in rows {
            let object = row.as_object().ok_or_else(|| {
                TableError::InvalidWorkbook(format!("sheet '{}' has a row that is not an object", name))
            })?;
            for key in object.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let cells = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).map(Cell::from).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            headers,
            rows: cells,
        })
    }
}

fn excel_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => Cell::from_field(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::text(other.to_string()),
    }
}

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

fn sheet_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| TableError::InvalidWorkbook(format!("unnamed sheet file {:?}", path)))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

/// An ordered collection of sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Open a spreadsheet, a CSV directory, a CSV file or a JSON workbook
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let workbook = if path.is_dir() {
            Self::from_csv_dir(path)?
        } else if SPREADSHEET_EXTENSIONS.iter().any(|ext| has_extension(path, ext)) {
            Self::from_spreadsheet(path)?
        } else if has_extension(path, "csv") {
            Self::new(vec![Sheet::from_csv_path(path)?])
        } else if has_extension(path, "json") {
            Self::from_json_str(&std::fs::read_to_string(path)?)?
        } else {
            return Err(TableError::InvalidWorkbook(format!(
                "unsupported workbook {:?} (expected .xlsx/.xls/.ods, a directory, .csv or .json)",
                path
            )));
        };

        debug!("Opened workbook {:?} with sheets {:?}", path, workbook.sheet_names());
        Ok(workbook)
    }

    /// Read every worksheet of a spreadsheet file, in workbook order
    pub fn from_spreadsheet(path: &Path) -> Result<Self> {
        let mut excel = open_workbook_auto(path)?;
        let mut sheets = Vec::new();
        for name in excel.sheet_names() {
            let range = excel.worksheet_range(&name)?;
            sheets.push(Sheet::from_range(&name, &range));
        }
        Ok(Self::new(sheets))
    }

    fn from_csv_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_extension(&path, "csv") {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(TableError::InvalidWorkbook(format!("no .csv sheets in {:?}", dir)));
        }
        paths.sort();

        let sheets = paths
            .iter()
            .map(|p| Sheet::from_csv_path(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(sheets))
    }

    /// Parse `{"Sheet name": [{"Title": ...}, ...], ...}`, keeping sheet order
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            TableError::InvalidWorkbook("JSON workbook must be an object of sheets".to_string())
        })?;

        let sheets = object
            .iter()
            .map(|(name, rows)| Sheet::from_json_rows(name, rows))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(sheets))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, sheet: &SheetRef) -> Result<&Sheet> {
        let found = match sheet {
            SheetRef::Index(i) => self.sheets.get(*i),
            SheetRef::Name(name) => self.sheets.iter().find(|s| &s.name == name),
        };
        found.ok_or_else(|| TableError::SheetNotFound(sheet.to_string()))
    }

    /// Select a sheet and project it into a [`Table`]
    pub fn table(&self, sheet: &SheetRef, columns: &ColumnConfig) -> Result<Table> {
        self.sheet(sheet)?.to_table(columns)
    }
}
