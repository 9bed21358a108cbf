//! Output formatting for resolved tag collections.
//!
//! A batch run emits one [`ResolvedRecord`] per input collection, either as a
//! single JSON array or as newline-delimited JSON.

use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::ResolvedRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON value or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Ok(Self::JsonLines),
            other => Err(ConfigError::ValidationError(format!(
                "unknown output format {other:?}"
            ))),
        }
    }
}

/// Serializes resolved records to JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer. `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write a bare value (e.g. a single resolved collection) followed by a newline.
    pub fn write_value<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        let pretty = self.pretty && self.format == OutputFormat::Json;
        self.emit(value, pretty)
    }

    /// Write a batch of records.
    ///
    /// JSON wraps them in one array; JSONL writes one compact line each.
    pub fn write_records(&mut self, records: &[ResolvedRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.emit(&records, self.pretty)?;
                self.records_written += records.len();
            }
            OutputFormat::JsonLines => {
                for record in records {
                    self.emit(record, false)?;
                    self.records_written += 1;
                }
            }
        }
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T, pretty: bool) -> io::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(source: &str, tags: serde_json::Value, dropped: usize) -> ResolvedRecord {
        ResolvedRecord {
            source: source.to_string(),
            tags,
            dropped,
        }
    }

    #[test]
    fn test_write_records_json_array() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer
            .write_records(&[
                record("a.json", json!(["solo"]), 0),
                record("b.json", json!({"x": 0.9}), 1),
            ])
            .unwrap();
        assert_eq!(writer.records_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
        assert!(output.contains("\"source\":\"b.json\""));
    }

    #[test]
    fn test_write_records_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer
            .write_records(&[
                record("t.jsonl:1", json!(["a"]), 0),
                record("t.jsonl:2", json!(["b"]), 2),
            ])
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            r#"{"source":"t.jsonl:2","tags":["b"],"dropped":2}"#
        );
    }

    #[test]
    fn test_write_value_keeps_mapping_order() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_value(&json!({"solo": 0.9, "1girl": 0.8})).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"solo\":0.9,\"1girl\":0.8}\n");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::JsonLines);
        assert_eq!("NDJSON".parse::<OutputFormat>().unwrap(), OutputFormat::JsonLines);
        assert!("invalid".parse::<OutputFormat>().is_err());
    }
}
