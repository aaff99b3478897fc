//! Vizora core: load tabular data files into typed rows, keep them as named
//! datasets and turn visualization requests into renderer payloads.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod types;
pub mod viz;

pub use config::VizoraConfig;
pub use dashboard::{Dashboard, DatasetPayload};
pub use types::{DatasetInfo, Row, Value};
