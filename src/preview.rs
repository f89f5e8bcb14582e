// src/preview.rs
//! Plain-text preview of a saved field, as an applicant would see it

use crate::types::{Locale, SavedField};

/// Render a field and its group fields in one locale. Required fields are marked with `*`.
pub fn render_preview(field: &SavedField, locale: Locale) -> String {
    let mut out = String::new();
    write_field(&mut out, field, locale, 0);
    out
}

fn write_field(out: &mut String, field: &SavedField, locale: Locale, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if field.is_required { " *" } else { "" };

    out.push_str(&format!(
        "{}{}{} [{}] ({})\n",
        indent,
        field.label.get(locale),
        marker,
        field.input_type,
        field.field_id
    ));

    match (field.min_value, field.max_value) {
        (Some(min), Some(max)) => out.push_str(&format!("{}  range: {} - {}\n", indent, min, max)),
        (Some(min), None) => out.push_str(&format!("{}  min: {}\n", indent, min)),
        (None, Some(max)) => out.push_str(&format!("{}  max: {}\n", indent, max)),
        (None, None) => {}
    }

    if let Some(default_value) = &field.default_value {
        out.push_str(&format!("{}  default: {}\n", indent, default_value));
    }

    for choice in &field.choices {
        out.push_str(&format!("{}  - {}\n", indent, choice.get(locale)));
    }

    for sub_field in &field.group_fields {
        write_field(out, sub_field, locale, depth + 1);
    }
}
