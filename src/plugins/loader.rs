//! Loading and saving JSON arrays of restaurant records.
//!
//! Input is a UTF-8 JSON array of objects. Keys outside the record shape are
//! ignored and missing optional keys become `None`; anything else that does
//! not fit (bad JSON, a non-array document, a non-object element, a missing
//! or empty `name`) is a `DataFormatError` and the offending call appends
//! nothing to the working set.

use crate::core::error::GurumeError;
use crate::core::record::{Blank, RestaurantRecord};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Ordered accumulation of loaded records, prior to integration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    records: Vec<RestaurantRecord>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<usize, GurumeError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GurumeError::NotFound(path.display().to_string()),
            _ => GurumeError::IoError(e),
        })?;
        self.load_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Parse a JSON array from `reader` and append its records. Returns how
    /// many records were appended; `origin` only labels errors and logs.
    pub fn load_reader<R: Read>(&mut self, reader: R, origin: &str) -> Result<usize, GurumeError> {
        let value: Value = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                GurumeError::IoError(e.into())
            } else {
                GurumeError::data_format(origin, e.to_string())
            }
        })?;
        let records = parse_records(value, origin)?;
        let appended = records.len();
        self.records.extend(records);
        info!(origin, appended, total = self.records.len(), "loaded records");
        Ok(appended)
    }

    pub fn load_str(&mut self, content: &str, origin: &str) -> Result<usize, GurumeError> {
        self.load_reader(content.as_bytes(), origin)
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<RestaurantRecord> {
        self.records
    }
}

impl From<Vec<RestaurantRecord>> for WorkingSet {
    fn from(records: Vec<RestaurantRecord>) -> Self {
        WorkingSet { records }
    }
}

fn parse_records(value: Value, origin: &str) -> Result<Vec<RestaurantRecord>, GurumeError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(GurumeError::data_format(
                origin,
                format!("expected a JSON array, found {}", json_kind(&other)),
            ));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(GurumeError::data_format(
                origin,
                format!("element {} is {}, expected an object", idx, json_kind(&item)),
            ));
        }
        let record: RestaurantRecord = serde_json::from_value(item)
            .map_err(|e| GurumeError::data_format(origin, format!("element {}: {}", idx, e)))?;
        if record.name.is_blank() {
            return Err(GurumeError::data_format(
                origin,
                format!("element {} has an empty name", idx),
            ));
        }
        records.push(record);
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Write `records` as an indented JSON array with non-ASCII text kept literal.
pub fn write_json<W: Write>(writer: W, records: &[RestaurantRecord]) -> Result<(), GurumeError> {
    let mut ser = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;
    Ok(())
}

pub fn save_json(path: &Path, records: &[RestaurantRecord]) -> Result<(), GurumeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), records = records.len(), "saved records");
    Ok(())
}
