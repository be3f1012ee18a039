//! CSV job posting input

use crate::error::{JobSynonymsError, Result};
use crate::processing::document::JobPosting;
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Cell values read as missing, the same set pandas' CSV reader uses
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// A CSV row as read; any field may be absent or empty
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostingRow {
    pub job_title: Option<String>,
    pub requirements: Option<String>,
    pub summary: Option<String>,
}

impl PostingRow {
    /// Absent fields become empty strings
    pub fn into_posting(self) -> JobPosting {
        JobPosting {
            job_title: present(self.job_title),
            requirements: present(self.requirements),
            summary: present(self.summary),
        }
    }
}

fn present(field: Option<String>) -> String {
    field.filter(|value| !is_missing(value)).unwrap_or_default()
}

pub struct PostingReader {
    path: PathBuf,
}

impl PostingReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<csv::Reader<std::fs::File>> {
        if !self.path.exists() {
            return Err(JobSynonymsError::InvalidInput(format!(
                "File does not exist: {}",
                self.path.display()
            )));
        }
        info!("Reading job postings from: {}", self.path.display());
        Ok(csv::ReaderBuilder::new().flexible(true).from_path(&self.path)?)
    }

    pub fn read_postings(&self) -> Result<Vec<JobPosting>> {
        read_postings_from(self.open()?)
    }

    pub fn read_raw_rows(&self) -> Result<Vec<Map<String, Value>>> {
        read_raw_rows_from(self.open()?)
    }
}

pub fn read_postings_from<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<JobPosting>> {
    let mut postings = Vec::new();
    for row in reader.deserialize::<PostingRow>() {
        postings.push(row?.into_posting());
    }
    debug!("Read {} postings", postings.len());
    Ok(postings)
}

/// Rows keyed by header, with missing cells dropped.
///
/// Each column gets one type across all rows: it holds JSON numbers only when
/// every present cell in it parses as one, otherwise every cell stays a string.
pub fn read_raw_rows_from<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Map<String, Value>>> {
    let headers = reader.headers()?.clone();
    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    let mut columns: Vec<Option<ColumnType>> = vec![None; headers.len()];
    for record in &records {
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            if is_missing(cell) {
                continue;
            }
            let cell_type = ColumnType::of(cell);
            *column = Some(column.map_or(cell_type, |current| current.widen(cell_type)));
        }
    }
    debug!("Column types: {:?}", headers.iter().zip(&columns).collect::<Vec<_>>());

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let mut row = Map::new();
        for ((header, cell), column) in headers.iter().zip(record.iter()).zip(&columns) {
            if is_missing(cell) {
                continue;
            }
            let column = column.unwrap_or(ColumnType::Text);
            row.insert(header.to_string(), column.value(cell));
        }
        rows.push(row);
    }

    debug!("Read {} raw rows", rows.len());
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    fn of(cell: &str) -> Self {
        if cell.parse::<i64>().is_ok() {
            ColumnType::Integer
        } else if cell.parse::<f64>().is_ok_and(f64::is_finite) {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }

    /// Narrowest type that holds both
    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (ColumnType::Text, _) | (_, ColumnType::Text) => ColumnType::Text,
            (ColumnType::Float, _) | (_, ColumnType::Float) => ColumnType::Float,
            _ => ColumnType::Integer,
        }
    }

    fn value(self, cell: &str) -> Value {
        let number = match self {
            ColumnType::Integer => cell.parse::<i64>().ok().map(Number::from),
            ColumnType::Float => cell.parse::<f64>().ok().and_then(Number::from_f64),
            ColumnType::Text => None,
        };
        number.map_or_else(|| Value::String(cell.to_string()), Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new().flexible(true).from_reader(data.as_bytes())
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let data = "id,job_title,summary\n1,エンジニア,\n2,,概要\n";
        let postings = read_postings_from(reader(data)).unwrap();

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0], JobPosting::new("エンジニア", "", ""));
        assert_eq!(postings[1], JobPosting::new("", "", "概要"));
    }

    #[test]
    fn test_quoted_multiline_fields() {
        let data = "job_title,requirements,summary\n\"営業, 法人\",\"経験\n3年以上\",x\n";
        let postings = read_postings_from(reader(data)).unwrap();

        assert_eq!(postings[0].job_title, "営業, 法人");
        assert_eq!(postings[0].requirements, "経験\n3年以上");
    }

    #[test]
    fn test_raw_rows_drop_empty_cells_and_type_numbers() {
        let data = "id,job_title,salary,rate,note\n7,PM,5000000,1.5,\n";
        let rows = read_raw_rows_from(reader(data)).unwrap();

        let row = &rows[0];
        assert_eq!(row.get("id"), Some(&Value::from(7)));
        assert_eq!(row.get("job_title"), Some(&Value::from("PM")));
        assert_eq!(row.get("salary"), Some(&Value::from(5_000_000)));
        assert_eq!(row.get("rate"), Some(&Value::from(1.5)));
        assert!(!row.contains_key("note"));
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["id", "job_title", "salary", "rate"]);
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let data = "id,salary\n1,5000000\n2,応相談\n";
        let rows = read_raw_rows_from(reader(data)).unwrap();

        assert_eq!(rows[0].get("id"), Some(&Value::from(1)));
        assert_eq!(rows[0].get("salary"), Some(&Value::from("5000000")));
        assert_eq!(rows[1].get("salary"), Some(&Value::from("応相談")));
    }

    #[test]
    fn test_integer_and_float_column_is_float() {
        let data = "rate\n5\n1.5\ninf\n";
        let rows = read_raw_rows_from(reader(data)).unwrap();
        assert_eq!(rows[0].get("rate"), Some(&Value::from("5")));

        let data = "rate\n5\n1.5\n";
        let rows = read_raw_rows_from(reader(data)).unwrap();
        assert_eq!(rows[0].get("rate"), Some(&Value::from(5.0)));
        assert_eq!(rows[1].get("rate"), Some(&Value::from(1.5)));
    }

    #[test]
    fn test_missing_markers_dropped() {
        let data = "id,job_title,salary,note\n1,PM,NA,null\n2,N/A,NaN,メモ\n";
        let rows = read_raw_rows_from(reader(data)).unwrap();

        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["id", "job_title"]);
        assert_eq!(rows[1].keys().collect::<Vec<_>>(), vec!["id", "note"]);

        let postings = read_postings_from(reader("job_title,requirements,summary\nN/A,NULL,概要\n")).unwrap();
        assert_eq!(postings[0], JobPosting::new("", "", "概要"));
    }

    #[test]
    fn test_nonexistent_file() {
        let reader = PostingReader::new("tests/fixtures/nonexistent.csv");
        assert!(matches!(reader.read_postings(), Err(JobSynonymsError::InvalidInput(_))));
    }
}
