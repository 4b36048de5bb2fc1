//! Result export and run reports.

pub mod export;
mod report;

pub use export::{
    export_clean, export_failed, save_results, write_dataset_csv, write_dataset_json,
    write_failed_csv, write_failed_json, ExportPaths, OutputFormat,
};
pub use report::{RuleReport, RunReport};
