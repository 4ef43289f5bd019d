//! Format codecs and the extension-dispatch registry
//!
//! Each codec turns a file into an in-memory value and back. The registry
//! maps a lowercase file extension to its codec and is populated once at
//! startup; callers may register additional codecs for project-specific
//! formats.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

/// Codec failures carry the underlying serializer error.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// A format capability: load a file into a value, save a value to a writer.
pub trait FormatCodec: Send + Sync {
    fn load(&self, path: &Path) -> Result<Value, CodecError>;
    fn save(&self, value: &Value, writer: &mut dyn io::Write) -> Result<(), CodecError>;
}

/// Registry mapping file extensions to codecs.
pub struct FormatRegistry {
    codecs: HashMap<String, Arc<dyn FormatCodec>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// The standard codec set: txt/log, json, yaml, toml, csv.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let text = Arc::new(TextCodec);
        registry.register("txt", text.clone());
        registry.register("log", text);
        registry.register("json", Arc::new(JsonCodec));
        registry.register("yaml", Arc::new(YamlCodec));
        registry.register("toml", Arc::new(TomlCodec));
        registry.register("csv", Arc::new(CsvCodec));
        registry
    }

    pub fn register(&mut self, extension: &str, codec: Arc<dyn FormatCodec>) {
        self.codecs.insert(extension.to_ascii_lowercase(), codec);
    }

    pub fn get(&self, extension: &str) -> Option<Arc<dyn FormatCodec>> {
        self.codecs.get(&extension.to_ascii_lowercase()).cloned()
    }

    /// Registered extensions, sorted, for diagnostics.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.codecs.keys().cloned().collect();
        extensions.sort();
        extensions
    }
}

/// Lowercase extension of a path, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn codec_err(message: impl Into<String>) -> CodecError {
    message.into().into()
}

/// Plain text as an array of lines (without terminators).
pub struct TextCodec;

impl FormatCodec for TextCodec {
    fn load(&self, path: &Path) -> Result<Value, CodecError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Value::Array(
            content
                .lines()
                .map(|line| Value::String(line.to_string()))
                .collect(),
        ))
    }

    fn save(&self, value: &Value, writer: &mut dyn io::Write) -> Result<(), CodecError> {
        match value {
            Value::Array(lines) => {
                for line in lines {
                    let Value::String(text) = line else {
                        return Err(codec_err("text files expect an array of strings"));
                    };
                    writeln!(writer, "{text}")?;
                }
                Ok(())
            }
            Value::String(text) => {
                writer.write_all(text.as_bytes())?;
                Ok(())
            }
            other => Err(codec_err(format!(
                "text files expect an array of strings, got {}",
                json_type_name(other)
            ))),
        }
    }
}

/// JSON with insertion-ordered objects.
pub struct JsonCodec;

impl FormatCodec for JsonCodec {
    fn load(&self, path: &Path) -> Result<Value, CodecError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn save(&self, value: &Value, writer: &mut dyn io::Write) -> Result<(), CodecError> {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// YAML, mapped onto the same value type as JSON.
pub struct YamlCodec;

impl FormatCodec for YamlCodec {
    fn load(&self, path: &Path) -> Result<Value, CodecError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }

    fn save(&self, value: &Value, writer: &mut dyn io::Write) -> Result<(), CodecError> {
        serde_yaml::to_writer(writer, value)?;
        Ok(())
    }
}

/// TOML; saving requires a table-shaped value.
pub struct TomlCodec;

impl FormatCodec for TomlCodec {
    fn load(&self, path: &Path) -> Result<Value, CodecError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, value: &Value, writer: &mut dyn io::Write) -> Result<(), CodecError> {
        let rendered = toml::to_string_pretty(value)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

/// CSV as an array of header-keyed records, preserving column order.
pub struct CsvCodec;

impl FormatCodec for CsvCodec {
    fn load(&self, path: &Path) -> Result<Value, CodecError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = serde_json::Map::with_capacity(headers.len());
            for (header, field) in headers.iter().zip(record.iter()) {
                row.insert(header.to_string(), Value::String(field.to_string()));
            }
            rows.push(Value::Object(row));
        }
        Ok(Value::Array(rows))
    }

    fn save(&self, value: &Value, writer: &mut dyn io::Write) -> Result<(), CodecError> {
        let Value::Array(rows) = value else {
            return Err(codec_err(format!(
                "csv files expect an array of records, got {}",
                json_type_name(value)
            )));
        };
        let mut csv_writer = csv::Writer::from_writer(writer);
        let Some(Value::Object(first)) = rows.first() else {
            if rows.is_empty() {
                csv_writer.flush()?;
                return Ok(());
            }
            return Err(codec_err("csv records must be objects"));
        };
        // Column order comes from the first record's key order.
        let headers: Vec<String> = first.keys().cloned().collect();
        csv_writer.write_record(&headers)?;
        for row in rows {
            let Value::Object(record) = row else {
                return Err(codec_err("csv records must be objects"));
            };
            let mut fields = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = record
                    .get(header)
                    .ok_or_else(|| codec_err(format!("csv record missing column {header:?}")))?;
                fields.push(cell_text(cell));
            }
            csv_writer.write_record(&fields)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Render a cell for CSV output: strings as-is, null empty, scalars via
/// their JSON form.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of(Path::new("A.JSON")), Some("json".to_string()));
        assert_eq!(extension_of(Path::new("Makefile")), None);
    }

    #[test]
    fn default_registry_covers_the_standard_set() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.extensions(), ["csv", "json", "log", "toml", "txt", "yaml"]);
        assert!(registry.get("JSON").is_some());
        assert!(registry.get("xls").is_none());
    }
}
