//! Service modules for level aggregation
//!
//! Discovery, parsing, averaging and report output. The workflow in
//! `crate::workflow` chains them for a run.

pub mod energy_averager;
pub mod file_scanner;
pub mod record_parser;
pub mod report_writer;

pub use energy_averager::average_file;
pub use file_scanner::{FileScanner, ScanError};
pub use record_parser::{classify_row, RecordParser, RowKind};
pub use report_writer::{ReportLayout, ReportTable, ReportWriter};
