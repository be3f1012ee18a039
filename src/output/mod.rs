//! Output formatting and report generation

pub mod formatter;
pub mod report;
