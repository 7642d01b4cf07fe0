//! CLI library for testing purposes

pub mod config;
pub mod discovery;
pub mod report;
pub mod validation;

pub use config::{FileConfig, Overrides, Settings};
pub use discovery::{find_default_files, module_default_file};
pub use report::{AggregateReport, ChangeReport, FileChange, ModuleReport};
