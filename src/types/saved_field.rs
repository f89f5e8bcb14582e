// src/types/saved_field.rs
//! Saved field template structures
//!
//! `SavedField` is the canonical, validated shape that gets persisted and
//! rendered. `FieldDraft` is what an authoring form (or an import file) hands
//! us before validation: labels may still be legacy plain strings and the
//! input type is kept as raw text so an unsupported kind can be reported like
//! any other field error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::Locale;

// ===== Bilingual Text =====

/// Text available in English and Arabic. `ar` is always concrete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LabelInput")]
pub struct BilingualText {
    pub en: String,
    pub ar: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Same text in both locales
    pub fn english(en: impl Into<String>) -> Self {
        let en = en.into();
        Self {
            ar: en.clone(),
            en,
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }
}

impl fmt::Display for BilingualText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.en == self.ar {
            write!(f, "{}", self.en)
        } else {
            write!(f, "{} / {}", self.en, self.ar)
        }
    }
}

/// One selectable option of a choice-based field
pub type Choice = BilingualText;

/// Label as it arrives from a form or from legacy storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelInput {
    Plain(String),
    Bilingual {
        #[serde(default)]
        en: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ar: Option<String>,
    },
}

impl Default for LabelInput {
    fn default() -> Self {
        LabelInput::Plain(String::new())
    }
}

impl LabelInput {
    pub fn english(&self) -> &str {
        match self {
            LabelInput::Plain(text) => text,
            LabelInput::Bilingual { en, .. } => en,
        }
    }
}

impl From<LabelInput> for BilingualText {
    fn from(raw: LabelInput) -> Self {
        match raw {
            LabelInput::Plain(text) => BilingualText::english(text),
            LabelInput::Bilingual { en, ar } => {
                let ar = ar.unwrap_or_else(|| en.clone());
                BilingualText { en, ar }
            }
        }
    }
}

impl From<BilingualText> for LabelInput {
    fn from(text: BilingualText) -> Self {
        LabelInput::Bilingual {
            en: text.en,
            ar: Some(text.ar),
        }
    }
}

impl From<&str> for LabelInput {
    fn from(text: &str) -> Self {
        LabelInput::Plain(text.to_string())
    }
}

impl From<String> for LabelInput {
    fn from(text: String) -> Self {
        LabelInput::Plain(text)
    }
}

// ===== Field Kinds =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Email,
    Date,
    Url,
    Checkbox,
    Radio,
    Dropdown,
    Tags,
    RepeatableGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported input type: '{0}'")]
pub struct UnknownFieldKind(pub String);

impl FieldKind {
    pub const ALL: [FieldKind; 11] = [
        FieldKind::Text,
        FieldKind::Textarea,
        FieldKind::Number,
        FieldKind::Email,
        FieldKind::Date,
        FieldKind::Url,
        FieldKind::Checkbox,
        FieldKind::Radio,
        FieldKind::Dropdown,
        FieldKind::Tags,
        FieldKind::RepeatableGroup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Email => "email",
            FieldKind::Date => "date",
            FieldKind::Url => "url",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Dropdown => "dropdown",
            FieldKind::Tags => "tags",
            FieldKind::RepeatableGroup => "repeatable_group",
        }
    }

    /// Kinds that cannot be answered without at least one choice
    pub fn requires_choices(&self) -> bool {
        matches!(
            self,
            FieldKind::Radio | FieldKind::Dropdown | FieldKind::Checkbox
        )
    }

    pub fn is_group(&self) -> bool {
        matches!(self, FieldKind::RepeatableGroup)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownFieldKind(s.to_string()))
    }
}

// ===== Saved Field =====

/// A validated, reusable form-field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedField {
    pub field_id: String,
    pub label: BilingualText,
    pub input_type: FieldKind,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_fields: Vec<SavedField>,
}

/// Unvalidated field as authored. See `validation::validate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: LabelInput,
    #[serde(default, deserialize_with = "lenient_input_type")]
    pub input_type: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_labels")]
    pub choices: Vec<LabelInput>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient_group_fields"
    )]
    pub group_fields: Vec<FieldDraft>,
}

// Forms send unset inputs as `null` and occasionally the wrong JSON type.
// Those must surface as field errors from `validate`, not as parse failures.

fn label_from_value(value: &Value) -> LabelInput {
    match value {
        Value::String(text) => LabelInput::Plain(text.clone()),
        Value::Object(map) => LabelInput::Bilingual {
            en: map
                .get("en")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            ar: map.get("ar").and_then(Value::as_str).map(str::to_string),
        },
        _ => LabelInput::default(),
    }
}

fn lenient_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LabelInput, D::Error> {
    Ok(label_from_value(&Value::deserialize(deserializer)?))
}

fn lenient_labels<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<LabelInput>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().map(label_from_value).collect())
}

/// Non-string input types keep their JSON text so the error names what was sent
fn lenient_input_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_group_fields<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<FieldDraft>, D::Error> {
    Ok(Option::<Vec<FieldDraft>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FieldDraft {
    pub fn new(label: impl Into<LabelInput>, input_type: FieldKind) -> Self {
        Self {
            label: label.into(),
            input_type: input_type.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn with_choices<I, L>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LabelInput>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group_fields(mut self, group_fields: Vec<FieldDraft>) -> Self {
        self.group_fields = group_fields;
        self
    }

    pub fn with_range(mut self, min_value: Option<f64>, max_value: Option<f64>) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

impl From<&SavedField> for FieldDraft {
    fn from(field: &SavedField) -> Self {
        Self {
            field_id: Some(field.field_id.clone()),
            label: field.label.clone().into(),
            input_type: field.input_type.as_str().to_string(),
            is_required: field.is_required,
            default_value: field.default_value.clone(),
            min_value: field.min_value,
            max_value: field.max_value,
            choices: field.choices.iter().cloned().map(Into::into).collect(),
            group_fields: field.group_fields.iter().map(FieldDraft::from).collect(),
        }
    }
}

// ===== Stored Field =====

/// A saved field as recorded in an owner's collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredField {
    pub owner: String,
    #[serde(flatten)]
    pub field: SavedField,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
