// src/validation.rs
//! Validation and normalization of saved field drafts
//!
//! Every rule is evaluated and every violation collected, so a form can show
//! all problems at once. Nothing here touches the store.

use chrono::Utc;
use serde::Serialize;
use std::fmt;

use crate::types::{BilingualText, FieldDraft, FieldKind, LabelInput, SavedField};
use crate::utils::slugify;

// ===== Field Errors =====

/// One problem with a draft, addressed by its path (`label.en`, `groupFields[0].choices`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Append errors of a nested field under `prefix`
    pub fn extend_scoped(&mut self, prefix: &str, nested: FieldErrors) {
        self.0.extend(nested.0.into_iter().map(|e| FieldError {
            field: format!("{}.{}", prefix, e.field),
            message: e.message,
        }));
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ===== Normalization =====

/// Canonical bilingual form of a label. Plain strings count for both locales.
pub fn normalize_label(raw: impl Into<LabelInput>) -> BilingualText {
    BilingualText::from(raw.into())
}

/// Stable identifier derived from the English label.
///
/// Labels with no usable characters get a generated token instead, so the
/// result is never empty.
pub fn derive_field_id(label: &BilingualText) -> String {
    let slug = slugify(&label.en);
    if slug.is_empty() {
        fallback_field_id()
    } else {
        slug
    }
}

fn fallback_field_id() -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("field_{}_{}", Utc::now().timestamp_millis(), &token[..8])
}

/// Fill every missing Arabic text (label, choices, group fields) from English.
pub fn normalize(draft: &FieldDraft) -> FieldDraft {
    FieldDraft {
        label: normalize_label(draft.label.clone()).into(),
        choices: draft
            .choices
            .iter()
            .cloned()
            .map(|choice| normalize_label(choice).into())
            .collect(),
        group_fields: draft.group_fields.iter().map(normalize).collect(),
        ..draft.clone()
    }
}

// ===== Validation =====

/// Check a draft and produce the canonical saved field, or every error found.
pub fn validate(draft: &FieldDraft) -> Result<SavedField, FieldErrors> {
    let mut errors = FieldErrors::new();
    let field = check_field(draft, &mut errors);

    match field {
        Some(field) if errors.is_empty() => Ok(field),
        _ => Err(errors),
    }
}

fn check_field(draft: &FieldDraft, errors: &mut FieldErrors) -> Option<SavedField> {
    let label = normalize_label(draft.label.clone());
    if label.en.trim().is_empty() {
        errors.push("label.en", "English label is required");
    }

    let input_type = if draft.input_type.trim().is_empty() {
        errors.push("inputType", "input type is required");
        None
    } else {
        match draft.input_type.parse::<FieldKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                errors.push("inputType", e.to_string());
                None
            }
        }
    };

    let choices: Vec<BilingualText> = draft.choices.iter().cloned().map(normalize_label).collect();
    if let Some(kind) = input_type.filter(FieldKind::requires_choices) {
        if choices.is_empty() {
            errors.push(
                "choices",
                format!("{} fields need at least one choice", kind),
            );
        }
        for (index, choice) in choices.iter().enumerate() {
            if choice.en.trim().is_empty() {
                errors.push(format!("choices[{}].en", index), "choice text is required");
            }
        }
    }

    if let (Some(min), Some(max)) = (draft.min_value, draft.max_value) {
        if min > max {
            errors.push(
                "maxValue",
                format!("maximum ({}) must not be lower than minimum ({})", max, min),
            );
        }
    }

    let mut group_fields = Vec::new();
    if input_type.is_some_and(|kind| kind.is_group()) {
        for (index, sub_draft) in draft.group_fields.iter().enumerate() {
            let mut sub_errors = FieldErrors::new();
            if let Some(sub_field) = check_field(sub_draft, &mut sub_errors) {
                group_fields.push(sub_field);
            }
            errors.extend_scoped(&format!("groupFields[{}]", index), sub_errors);
        }
    }

    let input_type = input_type?;
    let field_id = match draft.field_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => derive_field_id(&label),
    };

    Some(SavedField {
        field_id,
        label,
        input_type,
        is_required: draft.is_required,
        default_value: draft.default_value.clone(),
        min_value: draft.min_value,
        max_value: draft.max_value,
        choices,
        group_fields,
    })
}
