//! Data loading and dataset management
//!
//! Turns files of heterogeneous formats into uniform rows of typed values
//! and keeps them available by name.
//!
//! ## Pipeline
//!
//! 1. [`FormatLoader`] resolves the path, checks the size limit and picks a
//!    parser from the extension
//! 2. Text formats go through [`coerce`] field by field
//! 3. [`DatasetRegistry`] derives [`DatasetInfo`](crate::types::DatasetInfo)
//!    and swaps the dataset in under its name
//!
//! ## Error Handling
//!
//! All data operations return `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `FileNotFound` / `DatasetNotFound`: unknown path or name
//! - `TooLarge`: File exceeds size limits
//! - `Format`: no parsing strategy succeeded

mod coerce;
mod csv_parser;
mod error;
mod json_parser;
mod loader;
mod registry;
mod stats;
mod tabular;

pub use coerce::*;
pub use csv_parser::*;
pub use error::*;
pub use json_parser::*;
pub use loader::*;
pub use registry::*;
pub use stats::*;
pub use tabular::*;
