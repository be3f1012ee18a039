//! Report formatters: coloured console text or JSON

use crate::error::Result;
use crate::output::report::RunReport;
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Console,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(ReportFormat::Console),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid report format: {}. Supported: console, json", s)),
        }
    }
}

pub trait OutputFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&report.command.to_uppercase()));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.duration_ms
        ));

        for input in &report.inputs {
            output.push_str(&format!("  {} {}\n", self.colorize("in ", Color::Cyan), input));
        }
        for path in &report.outputs {
            output.push_str(&format!("  {} {}\n", self.colorize("out", Color::Green), path));
        }

        if !report.metrics.is_empty() {
            let width = report.metrics.iter().map(|m| m.name.chars().count()).max().unwrap_or(0);
            output.push('\n');
            for metric in &report.metrics {
                let padding = " ".repeat(width - metric.name.chars().count());
                output.push_str(&format!("  • {}{}  {}\n", metric.name, padding, metric.value));
            }
        }

        for warning in &report.warnings {
            output.push_str(&format!("\n{} {}", self.colorize("warning:", Color::Yellow), warning));
        }
        if !report.warnings.is_empty() {
            output.push('\n');
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RunReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

pub fn formatter_for(format: ReportFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        ReportFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        ReportFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportBuilder;
    use std::path::Path;

    fn report() -> RunReport {
        ReportBuilder::new("corpus")
            .input(Path::new("data/job_postings.csv"))
            .output(Path::new("data/corpus.txt"))
            .metric("postings", 12)
            .metric("sentences", 24)
            .warn_if(true, "3 postings skipped")
            .warn_if(false, "never shown")
            .finish()
    }

    #[test]
    fn test_console_report_without_colors() {
        let text = ConsoleFormatter::new(false).format_report(&report()).unwrap();

        assert!(text.contains("█ CORPUS"));
        assert!(text.contains("in  data/job_postings.csv"));
        assert!(text.contains("out data/corpus.txt"));
        assert!(text.contains("• postings   12"));
        assert!(text.contains("• sentences  24"));
        assert!(text.contains("warning: 3 postings skipped"));
        assert!(!text.contains("never shown"));
    }

    #[test]
    fn test_json_report() {
        let json = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["command"], "corpus");
        assert_eq!(value["metrics"][1]["name"], "sentences");
        assert_eq!(value["metrics"][1]["value"], "24");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
