//! Output rendering for command results
//!
//! Commands collect their result into an [`OutputWriter`] as ordered
//! key/value records and hand it a [`Renderer`] chosen from the `--output`
//! flag. Rendering produces lines that are then printed through the
//! [`UserInterface`].

use std::fmt;

use anyhow::Result;
use console::measure_text_width;
use serde_json::{Map, Value};
use thiserror::Error;

use stratus_runtime::deps::UserInterface;

/// Output rendering errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputError {
    /// `--output` value not recognised
    #[error("invalid output format `{0}`, expected one of: human, json, custom")]
    UnknownFormat(String),

    /// Custom output requested without `--fields`
    #[error("custom output requires at least one field, e.g. --fields id,name")]
    MissingFields,

    /// A requested field does not exist on the result
    #[error("unknown field `{field}`, available fields: {available}")]
    UnknownField {
        /// Requested field
        field: String,
        /// Comma separated list of valid fields
        available: String,
    },
}

/// How results are written to stdout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Renderer {
    /// JSON object (single result) or array (list)
    Json {
        /// Indent the JSON
        pretty: bool,
    },
    /// Tab separated values of the selected fields, one line per record
    Custom(Vec<String>),
    /// Aligned text for people
    #[default]
    Human,
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { .. } => f.write_str("json"),
            Self::Custom(_) => f.write_str("custom"),
            Self::Human => f.write_str("human"),
        }
    }
}

impl Renderer {
    /// Build a renderer from the `--output`, `--fields` and `--pretty` flags
    pub fn parse(format: &str, fields: Option<&str>, pretty: bool) -> Result<Self, OutputError> {
        match format.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json { pretty }),
            "custom" => {
                let fields: Vec<String> = fields
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect();
                if fields.is_empty() {
                    return Err(OutputError::MissingFields);
                }
                Ok(Self::Custom(fields))
            }
            "human" | "table" | "" => Ok(Self::Human),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }

    /// Whether this renderer produces human readable text
    pub const fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check that every custom field is one of `available`
    ///
    /// Other renderers accept any result shape.
    pub fn check_fields(&self, available: &[&str]) -> Result<(), OutputError> {
        let Self::Custom(fields) = self else {
            return Ok(());
        };
        match fields
            .iter()
            .find(|field| !available.iter().any(|key| key.eq_ignore_ascii_case(field)))
        {
            Some(field) => Err(OutputError::UnknownField {
                field: field.clone(),
                available: available.join(", "),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    key: String,
    label: String,
    value: String,
}

/// Ordered key/value records awaiting rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputWriter {
    records: Vec<Vec<Cell>>,
}

impl OutputWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer holding a single record built from `(key, value)` pairs
    pub fn with_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut writer = Self::new();
        writer.start_line();
        for (key, value) in pairs {
            writer.append(key, value);
        }
        writer
    }

    /// Begin a new record
    pub fn start_line(&mut self) {
        self.records.push(Vec::new());
    }

    /// Add a field to the current record, labelled from its key
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let label = default_label(&key);
        self.append_with_label(key, label, value);
    }

    /// Add a field to the current record with an explicit human label
    pub fn append_with_label(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) {
        if self.records.is_empty() {
            self.start_line();
        }
        if let Some(record) = self.records.last_mut() {
            record.push(Cell {
                key: key.into(),
                label: label.into(),
                value: value.into(),
            });
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was added
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the first record as a single object
    pub fn render_single(&self, renderer: &Renderer) -> Result<Vec<String>, OutputError> {
        let record = self.records.first().map_or(&[][..], Vec::as_slice);
        match renderer {
            Renderer::Json { pretty } => Ok(vec![to_json(&record_to_json(record), *pretty)]),
            Renderer::Custom(fields) => Ok(vec![custom_line(record, fields)?]),
            Renderer::Human => Ok(key_value_lines(record)),
        }
    }

    /// Render every record as a list
    pub fn render_list(&self, renderer: &Renderer) -> Result<Vec<String>, OutputError> {
        match renderer {
            Renderer::Json { pretty } => {
                let items = self
                    .records
                    .iter()
                    .map(|record| record_to_json(record))
                    .collect();
                Ok(vec![to_json(&Value::Array(items), *pretty)])
            }
            Renderer::Custom(fields) => self
                .records
                .iter()
                .map(|record| custom_line(record, fields))
                .collect(),
            Renderer::Human => Ok(table_lines(&self.records)),
        }
    }

    /// Render the first record as a single object and print it
    pub fn write_single(&self, renderer: &Renderer, ui: &dyn UserInterface) -> Result<()> {
        tracing::debug!(%renderer, "Rendering single result");
        for line in self.render_single(renderer)? {
            ui.print(&line);
        }
        Ok(())
    }

    /// Render every record as a list and print it
    pub fn write_list(&self, renderer: &Renderer, ui: &dyn UserInterface) -> Result<()> {
        tracing::debug!(%renderer, records = self.records.len(), "Rendering list");
        for line in self.render_list(renderer)? {
            ui.print(&line);
        }
        Ok(())
    }
}

fn default_label(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn record_to_json(record: &[Cell]) -> Value {
    let map: Map<String, Value> = record
        .iter()
        .map(|cell| (cell.key.clone(), Value::String(cell.value.clone())))
        .collect();
    Value::Object(map)
}

fn to_json(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        value.to_string()
    }
}

fn custom_line(record: &[Cell], fields: &[String]) -> Result<String, OutputError> {
    let values = fields
        .iter()
        .map(|field| {
            record
                .iter()
                .find(|cell| cell.key.eq_ignore_ascii_case(field))
                .map(|cell| cell.value.clone())
                .ok_or_else(|| OutputError::UnknownField {
                    field: field.clone(),
                    available: record
                        .iter()
                        .map(|cell| cell.key.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values.join("\t"))
}

fn key_value_lines(record: &[Cell]) -> Vec<String> {
    let width = record
        .iter()
        .map(|cell| measure_text_width(&cell.label))
        .max()
        .unwrap_or(0);

    record
        .iter()
        .map(|cell| {
            let pad = width - measure_text_width(&cell.label);
            format!("{}{} : {}", " ".repeat(pad), cell.label, cell.value)
        })
        .collect()
}

fn table_lines(records: &[Vec<Cell>]) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    let headers: Vec<&str> = first.iter().map(|cell| cell.label.as_str()).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for record in records {
        for (index, cell) in record.iter().enumerate().take(widths.len()) {
            widths[index] = widths[index].max(measure_text_width(&cell.value));
        }
    }

    let row = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| {
                let pad = width.saturating_sub(measure_text_width(value));
                format!("{value}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(row(headers));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for record in records {
        lines.push(row(record.iter().map(|cell| cell.value.as_str()).collect()));
    }
    lines
}
