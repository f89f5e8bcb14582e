//! Saved field templates for job application forms.
//!
//! A saved field is a reusable, bilingual (English/Arabic) form-field
//! definition. This crate owns its canonical shape, the rules that validate
//! and normalize drafts before they are stored, and a per-owner SQLite store.

pub mod core;
pub mod error;
pub mod field_cli;
pub mod import;
pub mod logging;
pub mod preview;
pub mod store;
pub mod types;
pub mod utils;
pub mod validation;

pub use error::StoreError;
pub use import::DraftEntry;
pub use logging::init_logging;
pub use preview::render_preview;
pub use store::{FieldTemplateStore, ImportReport};
pub use types::{
    BilingualText, Choice, FieldDraft, FieldKind, LabelInput, Locale, SavedField, StoredField,
};
pub use validation::{derive_field_id, normalize, normalize_label, validate, FieldError, FieldErrors};
