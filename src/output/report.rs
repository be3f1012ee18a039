//! Run reports printed at the end of every command

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub command: String,
    pub generated_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub metrics: Vec<Metric>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: String,
}

/// Collects a report while a command runs
pub struct ReportBuilder {
    command: String,
    started: Instant,
    inputs: Vec<String>,
    outputs: Vec<String>,
    metrics: Vec<Metric>,
    warnings: Vec<String>,
}

impl ReportBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            started: Instant::now(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            metrics: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn input(mut self, path: &Path) -> Self {
        self.inputs.push(path.display().to_string());
        self
    }

    pub fn output(mut self, path: &Path) -> Self {
        self.outputs.push(path.display().to_string());
        self
    }

    pub fn metric(mut self, name: &str, value: impl ToString) -> Self {
        self.metrics.push(Metric {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Adds a warning only when `condition` holds
    pub fn warn_if(mut self, condition: bool, warning: impl Into<String>) -> Self {
        if condition {
            self.warnings.push(warning.into());
        }
        self
    }

    pub fn finish(self) -> RunReport {
        RunReport {
            command: self.command,
            generated_at: Utc::now(),
            duration_ms: self.started.elapsed().as_millis() as u64,
            inputs: self.inputs,
            outputs: self.outputs,
            metrics: self.metrics,
            warnings: self.warnings,
        }
    }
}
