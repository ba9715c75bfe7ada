//! # catmatch Table
//!
//! Loads catalog sheets from workbooks and writes match assignments.
//!
//! A workbook is a directory of CSV files, a single CSV file, or a JSON object
//! of sheets. Sheets are selected by position or by name and projected onto the
//! configured title, detail, category and price columns.
//!
//! ```rust
//! use catmatch_core::ColumnConfig;
//! use catmatch_table::{SheetRef, Workbook};
//!
//! let workbook = Workbook::from_json_str(r#"{
//!     "Company A": [{"Title": "Red Shoes", "Detail": "", "Category": "Shoes", "Price": "$50"}],
//!     "Company B": [{"Title": "red shoes!!", "Detail": "", "Category": "Shoes", "Price": 50}]
//! }"#).unwrap();
//!
//! let b = workbook.table(&SheetRef::parse("1"), &ColumnConfig::default()).unwrap();
//! assert_eq!(b.name, "Company B");
//! assert_eq!(b.title_of(0), "red shoes!!");
//! ```

pub mod error;
pub mod output;
pub mod workbook;

pub use error::{Result, TableError};
pub use output::{write_assignment, write_assignment_to, OUTPUT_HEADER};
pub use workbook::{Sheet, SheetRef, Workbook};
