//! CSV and JSON dumps of the local contact collection.

use chrono::{DateTime, Utc};

use crate::{Result, model::ContactSubmission};

/// Prefix of every exported file name.
pub const FILE_PREFIX: &str = "techpro_contacts";

const CSV_HEADER: [&str; 5] = ["id", "created", "name", "details", "message"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
  Csv,
  Json,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Csv => "csv",
      Self::Json => "json",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      Self::Csv => "text/csv;charset=utf-8",
      Self::Json => "application/json",
    }
  }
}

/// A rendered export, ready to be saved under `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
  pub file_name:    String,
  pub content_type: &'static str,
  pub body:         String,
}

impl ExportFile {
  pub fn render(
    format: ExportFormat,
    contacts: &[ContactSubmission],
    now: DateTime<Utc>,
  ) -> Result<Self> {
    let body = match format {
      ExportFormat::Csv => contacts_csv(contacts),
      ExportFormat::Json => contacts_json(contacts)?,
    };
    Ok(Self {
      file_name: file_name(format, now),
      content_type: format.content_type(),
      body,
    })
  }
}

/// `techpro_contacts_<unix ms>.<ext>`
pub fn file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
  format!("{FILE_PREFIX}_{}.{}", now.timestamp_millis(), format.extension())
}

/// Header line plus one row per submission. Every value is quoted and
/// embedded quotes are doubled.
pub fn contacts_csv(contacts: &[ContactSubmission]) -> String {
  let mut lines = Vec::with_capacity(contacts.len() + 1);
  lines.push(CSV_HEADER.join(","));
  for c in contacts {
    let id = c.id.to_string();
    let row = [
      id.as_str(),
      c.created.as_str(),
      c.name.as_str(),
      c.details.as_str(),
      c.message.as_str(),
    ]
      .iter()
      .map(|v| quote(v))
      .collect::<Vec<_>>()
      .join(",");
    lines.push(row);
  }
  lines.join("\n")
}

pub fn contacts_json(contacts: &[ContactSubmission]) -> Result<String> {
  Ok(serde_json::to_string_pretty(contacts)?)
}

fn quote(v: &str) -> String { format!("\"{}\"", v.replace('"', "\"\"")) }
