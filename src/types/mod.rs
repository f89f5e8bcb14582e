// src/types/mod.rs
//! Shapes shared by authoring forms, previews and the field store

pub mod locale;
pub mod saved_field;

pub use locale::Locale;
pub use saved_field::{
    BilingualText, Choice, FieldDraft, FieldKind, LabelInput, SavedField, StoredField,
    UnknownFieldKind,
};
