//! CLI output formatting module

use crate::config::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use zhsplit_core::Result;

/// Widest table cell, in characters
const MAX_CELL_WIDTH: usize = 48;

/// Output formatter for CLI results
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
    writer: Box<dyn Write + Send>,
}

impl OutputFormatter {
    /// Create a formatter writing to stdout
    pub fn with_format(format: OutputFormat, use_colors: bool) -> Self {
        Self {
            format,
            use_colors: use_colors && crate::config::supports_color(),
            writer: Box::new(io::stdout()),
        }
    }

    /// Create a formatter with custom writer
    pub fn with_writer<W: Write + Send + 'static>(
        format: OutputFormat,
        use_colors: bool,
        writer: W,
    ) -> Self {
        Self {
            format,
            use_colors: use_colors && crate::config::supports_color(),
            writer: Box::new(writer),
        }
    }

    /// Create a colorless formatter that writes into memory
    pub fn buffered(format: OutputFormat) -> (Self, OutputBuffer) {
        let buffer = OutputBuffer::default();
        (Self::with_writer(format, false, buffer.clone()), buffer)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format and output a serializable value
    pub fn output<T: Serialize>(&mut self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.output_json(value),
            OutputFormat::Yaml => self.output_yaml(value),
            OutputFormat::Pretty => self.output_pretty(value),
            OutputFormat::Compact => self.output_compact(value),
            OutputFormat::Table => self.output_table(value),
        }
    }

    fn output_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn output_yaml<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let yaml = serde_yaml::to_string(value)?;
        write!(self.writer, "{}", yaml)?;
        Ok(())
    }

    fn output_pretty<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json_value: serde_json::Value = serde_json::to_value(value)?;
        self.format_json_pretty(&json_value, 0)
    }

    /// One JSON document per line
    fn output_compact<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn output_table<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json_value: serde_json::Value = serde_json::to_value(value)?;
        self.format_as_table(&json_value)
    }

    /// Format JSON value in a pretty, human-readable way
    fn format_json_pretty(&mut self, value: &serde_json::Value, indent: usize) -> Result<()> {
        let indent_str = "  ".repeat(indent);

        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map {
                    match val {
                        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                            writeln!(self.writer, "{}{}:", indent_str, self.colorize_key(key))?;
                            self.format_json_pretty(val, indent + 1)?;
                        }
                        _ => {
                            writeln!(
                                self.writer,
                                "{}{}: {}",
                                indent_str,
                                self.colorize_key(key),
                                self.format_value(val)
                            )?;
                        }
                    }
                }
            }
            serde_json::Value::Array(arr) => {
                for (i, item) in arr.iter().enumerate() {
                    writeln!(self.writer, "{}[{}]:", indent_str, i)?;
                    self.format_json_pretty(item, indent + 1)?;
                }
            }
            _ => {
                writeln!(self.writer, "{}{}", indent_str, self.format_value(value))?;
            }
        }
        Ok(())
    }

    /// Format as a table
    ///
    /// Arrays of objects get one column per key of the first row; a single
    /// object is shown as key/value rows.
    fn format_as_table(&mut self, value: &serde_json::Value) -> Result<()> {
        match value {
            serde_json::Value::Array(rows) => {
                let columns: Vec<String> = match rows.first() {
                    Some(serde_json::Value::Object(first)) => first.keys().cloned().collect(),
                    _ => vec!["value".to_string()],
                };

                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| match row {
                        serde_json::Value::Object(map) => columns
                            .iter()
                            .map(|column| {
                                map.get(column)
                                    .map(|cell| self.value_to_string(cell))
                                    .unwrap_or_default()
                            })
                            .collect(),
                        other => vec![self.value_to_string(other)],
                    })
                    .collect();

                self.write_table(&columns, &cells)
            }
            serde_json::Value::Object(map) => {
                let columns = vec!["key".to_string(), "value".to_string()];
                let cells: Vec<Vec<String>> = map
                    .iter()
                    .map(|(key, val)| vec![key.clone(), self.value_to_string(val)])
                    .collect();

                self.write_table(&columns, &cells)
            }
            _ => {
                writeln!(self.writer, "{}", self.format_value(value))?;
                Ok(())
            }
        }
    }

    fn write_table(&mut self, columns: &[String], rows: &[Vec<String>]) -> Result<()> {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| truncate_cell(cell)).collect())
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };

        writeln!(self.writer, "{}", rule("┌", "┬", "┐"))?;
        self.write_row(columns, &widths)?;
        writeln!(self.writer, "{}", rule("├", "┼", "┤"))?;
        for row in &rows {
            self.write_row(row, &widths)?;
        }
        writeln!(self.writer, "{}", rule("└", "┴", "┘"))?;

        Ok(())
    }

    fn write_row(&mut self, cells: &[String], widths: &[usize]) -> Result<()> {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!(" {:<width$} ", cell, width = width)
            })
            .collect();
        writeln!(self.writer, "│{}│", padded.join("│"))?;
        Ok(())
    }

    /// Convert a JSON value to a string representation
    fn value_to_string(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => "-".to_string(),
            serde_json::Value::Array(arr) => format!("[{} items]", arr.len()),
            serde_json::Value::Object(obj) => format!("{{{}}} keys", obj.len()),
        }
    }

    /// Format a single value with appropriate styling
    fn format_value(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => {
                if self.use_colors {
                    format!("\x1b[32m{:?}\x1b[0m", s) // Green for strings
                } else {
                    format!("{:?}", s)
                }
            }
            serde_json::Value::Number(n) => {
                if self.use_colors {
                    format!("\x1b[36m{}\x1b[0m", n) // Cyan for numbers
                } else {
                    n.to_string()
                }
            }
            serde_json::Value::Bool(b) => {
                if self.use_colors {
                    format!("\x1b[35m{}\x1b[0m", b) // Magenta for booleans
                } else {
                    b.to_string()
                }
            }
            serde_json::Value::Null => {
                if self.use_colors {
                    "\x1b[90mnull\x1b[0m".to_string() // Gray for null
                } else {
                    "null".to_string()
                }
            }
            serde_json::Value::Array(arr) => format!("[{} items]", arr.len()),
            serde_json::Value::Object(obj) => format!("{{{}}} keys", obj.len()),
        }
    }

    fn colorize_key(&self, key: &str) -> String {
        if self.use_colors {
            format!("\x1b[34m{}\x1b[0m", key) // Blue for keys
        } else {
            key.to_string()
        }
    }

    /// Output a simple message
    pub fn message(&mut self, msg: &str) -> Result<()> {
        writeln!(self.writer, "{}", msg)?;
        Ok(())
    }

    /// Output a success message
    pub fn success(&mut self, msg: &str) -> Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[32m✓\x1b[0m {}", msg)?;
        } else {
            writeln!(self.writer, "✓ {}", msg)?;
        }
        Ok(())
    }

    /// Output an error message
    pub fn error(&mut self, msg: &str) -> Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[31m✗\x1b[0m {}", msg)?;
        } else {
            writeln!(self.writer, "✗ {}", msg)?;
        }
        Ok(())
    }
}

/// Shorten a cell to [`MAX_CELL_WIDTH`] characters on a single line
fn truncate_cell(cell: &str) -> String {
    let flat = cell.replace('\n', "⏎");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }

    let head: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", head)
}

/// In-memory output sink shared with an [`OutputFormatter`]
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        match self.inner.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
