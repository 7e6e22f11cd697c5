//! Data model for level aggregation

pub mod descriptor;
pub mod record;
pub mod table;

pub use descriptor::FileDescriptor;
pub use record::{LevelCategory, MeasurementFile, Record};
pub use table::{LevelMatrix, ResultTable, ResultTableBuilder, TableRow};
