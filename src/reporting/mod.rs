//! Scan report output

pub mod report_writer;

pub use report_writer::write_report;
