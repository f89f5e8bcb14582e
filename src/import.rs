// src/import.rs
//! Reading field drafts from JSON or CSV files

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::core::FsOps;
use crate::types::{FieldDraft, LabelInput};
use crate::utils::{get_file_extension, parse_flag};
use crate::validation::FieldErrors;

/// One entry of an import file: a draft, or why the entry is not one
pub type DraftEntry = Result<FieldDraft, FieldErrors>;

fn unreadable_entry(message: String) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.push("draft", message);
    errors
}

/// One CSV row: `field_id,label_en,label_ar,input_type,is_required,choices`
#[derive(Debug, Deserialize)]
struct CsvFieldRecord {
    field_id: Option<String>,
    label_en: String,
    label_ar: Option<String>,
    input_type: String,
    is_required: Option<String>,
    choices: Option<String>,
}

impl From<CsvFieldRecord> for FieldDraft {
    fn from(record: CsvFieldRecord) -> Self {
        FieldDraft {
            field_id: record.field_id.filter(|id| !id.trim().is_empty()),
            label: LabelInput::Bilingual {
                en: record.label_en.trim().to_string(),
                ar: record
                    .label_ar
                    .map(|ar| ar.trim().to_string())
                    .filter(|ar| !ar.is_empty()),
            },
            input_type: record.input_type.trim().to_string(),
            is_required: record.is_required.as_deref().is_some_and(parse_flag),
            choices: record
                .choices
                .as_deref()
                .map(parse_choices)
                .unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// `|`-separated choices, each either `en` or `en=ar`
pub fn parse_choices(raw: &str) -> Vec<LabelInput> {
    raw.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((en, ar)) => LabelInput::Bilingual {
                en: en.trim().to_string(),
                ar: Some(ar.trim().to_string()).filter(|ar| !ar.is_empty()),
            },
            None => LabelInput::Plain(part.to_string()),
        })
        .collect()
}

/// Each CSV record becomes its own entry; a malformed record does not hide the others
pub fn parse_csv_drafts(content: &str) -> Vec<DraftEntry> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    reader
        .deserialize::<CsvFieldRecord>()
        .enumerate()
        .map(|(index, record)| {
            record.map(FieldDraft::from).map_err(|e| {
                unreadable_entry(format!("invalid CSV record {}: {}", index + 1, e))
            })
        })
        .collect()
}

/// A JSON array of drafts, or a single draft object. Only unparsable JSON
/// fails as a whole; every element is decoded on its own.
pub fn parse_json_drafts(content: &str) -> Result<Vec<DraftEntry>> {
    let value: serde_json::Value = serde_json::from_str(content).context("Invalid JSON")?;

    let elements = match value {
        serde_json::Value::Array(elements) => elements,
        single => vec![single],
    };

    Ok(elements
        .into_iter()
        .map(|element| {
            serde_json::from_value::<FieldDraft>(element)
                .map_err(|e| unreadable_entry(format!("not a field definition: {}", e)))
        })
        .collect())
}

/// Load drafts from a file, choosing the format by extension
pub async fn load_drafts(path: &Path) -> Result<Vec<DraftEntry>> {
    let content = FsOps::read_draft_file(path).await?;
    let extension = get_file_extension(&path.to_string_lossy());

    match extension.as_deref() {
        Some("csv") => Ok(parse_csv_drafts(&content)),
        _ => parse_json_drafts(&content)
            .with_context(|| format!("Failed to load drafts from {}", path.display())),
    }
}

/// Load exactly one draft from a JSON file
pub async fn load_draft(path: &Path) -> Result<FieldDraft> {
    let content = FsOps::read_draft_file(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid field draft in {}", path.display()))
}
