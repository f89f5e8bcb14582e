// src/store.rs
//! Field template store: validation in front of the per-owner repository
//!
//! A draft that fails validation never reaches the database; create and update
//! are all-or-nothing.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::app_log;
use crate::core::SavedFieldRepository;
use crate::error::{Result, StoreError};
use crate::import::DraftEntry;
use crate::types::{FieldDraft, StoredField};
use crate::validation::{validate, FieldErrors};

pub struct FieldTemplateStore<'a> {
    repo: SavedFieldRepository<'a>,
}

/// Outcome of a bulk import
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub rejected: Vec<RejectedDraft>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedDraft {
    pub index: usize,
    pub label: String,
    pub errors: FieldErrors,
}

impl<'a> FieldTemplateStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: SavedFieldRepository::new(pool),
        }
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<StoredField>> {
        self.repo.list(owner).await
    }

    pub async fn get(&self, owner: &str, field_id: &str) -> Result<StoredField> {
        self.repo
            .find(owner, field_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                field_id: field_id.to_string(),
            })
    }

    /// Validate a draft and add it to the owner's collection
    pub async fn create(&self, owner: &str, draft: &FieldDraft) -> Result<StoredField> {
        let field = validate(draft).map_err(|errors| {
            app_log!(
                warn,
                "Rejected new field '{}' for {}: {}",
                draft.label.english(),
                owner,
                errors
            );
            StoreError::Invalid(errors)
        })?;

        self.repo.insert(owner, &field).await
    }

    /// Replace every settable attribute of an existing field. The id never changes.
    pub async fn update(
        &self,
        owner: &str,
        field_id: &str,
        draft: &FieldDraft,
    ) -> Result<StoredField> {
        let mut errors = FieldErrors::new();
        if let Some(requested) = draft.field_id.as_deref().map(str::trim) {
            if !requested.is_empty() && requested != field_id {
                errors.push(
                    "fieldId",
                    format!("field id cannot be changed from '{}'", field_id),
                );
            }
        }

        let mut draft = draft.clone();
        draft.field_id = Some(field_id.to_string());

        let field = match validate(&draft) {
            Ok(field) if errors.is_empty() => field,
            Ok(_) => return Err(StoreError::Invalid(errors)),
            Err(validation_errors) => {
                errors.extend(validation_errors);
                return Err(StoreError::Invalid(errors));
            }
        };

        self.repo
            .replace(owner, &field)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                field_id: field_id.to_string(),
            })
    }

    pub async fn delete(&self, owner: &str, field_id: &str) -> Result<()> {
        if self.repo.delete(owner, field_id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                field_id: field_id.to_string(),
            })
        }
    }

    /// Create each draft independently. Unreadable entries, invalid drafts
    /// and existing ids are reported, database failures abort the import.
    pub async fn import(&self, owner: &str, entries: &[DraftEntry]) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for (index, entry) in entries.iter().enumerate() {
            let draft = match entry {
                Ok(draft) => draft,
                Err(errors) => {
                    report.rejected.push(RejectedDraft {
                        index,
                        label: String::new(),
                        errors: errors.clone(),
                    });
                    continue;
                }
            };

            match self.create(owner, draft).await {
                Ok(stored) => report.created.push(stored.field.field_id),
                Err(StoreError::Conflict { field_id }) => {
                    app_log!(info, "Skipped existing field {} for {}", field_id, owner);
                    report.skipped.push(field_id);
                }
                Err(StoreError::Invalid(errors)) => report.rejected.push(RejectedDraft {
                    index,
                    label: draft.label.english().to_string(),
                    errors,
                }),
                Err(e) => return Err(e),
            }
        }

        app_log!(
            info,
            "Import for {}: {} created, {} skipped, {} rejected",
            owner,
            report.created.len(),
            report.skipped.len(),
            report.rejected.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;
    use crate::types::{BilingualText, FieldKind, LabelInput};

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());

        let draft = FieldDraft::new("Have a mobile", FieldKind::Radio).with_choices(["Yes", "No"]);
        let created = store.create("alice", &draft).await.unwrap();
        assert_eq!(created.field.field_id, "have_a_mobile");

        let fetched = store.get("alice", "have_a_mobile").await.unwrap();
        assert_eq!(fetched.field, created.field);

        let edit = FieldDraft::new(
            LabelInput::Bilingual {
                en: "Owns a mobile phone".to_string(),
                ar: Some("لديه هاتف".to_string()),
            },
            FieldKind::Radio,
        )
        .with_choices(["Yes", "No"])
        .required();
        let updated = store.update("alice", "have_a_mobile", &edit).await.unwrap();
        assert_eq!(updated.field.field_id, "have_a_mobile");
        assert_eq!(
            updated.field.label,
            BilingualText::new("Owns a mobile phone", "لديه هاتف")
        );
        assert!(updated.field.is_required);

        store.delete("alice", "have_a_mobile").await.unwrap();
        assert!(matches!(
            store.get("alice", "have_a_mobile").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_stored() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());

        let draft = FieldDraft::new("Preferred shift", FieldKind::Dropdown);
        let err = store.create("alice", &draft).await.unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains_field("choices"));
        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());

        let draft = FieldDraft::new("City", FieldKind::Text);
        store.create("alice", &draft).await.unwrap();
        assert!(matches!(
            store.create("alice", &draft).await,
            Err(StoreError::Conflict { .. })
        ));
        store.create("bob", &draft).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_rejects_changed_id() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());
        store
            .create("alice", &FieldDraft::new("City", FieldKind::Text))
            .await
            .unwrap();

        let mut edit = FieldDraft::new("", FieldKind::Text);
        edit.field_id = Some("town".to_string());
        let err = store.update("alice", "city", &edit).await.unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains_field("fieldId"));
        assert!(errors.contains_field("label.en"));

        let stored = store.get("alice", "city").await.unwrap();
        assert_eq!(stored.field.label.en, "City");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());

        let edit = FieldDraft::new("City", FieldKind::Text);
        assert!(matches!(
            store.update("alice", "city", &edit).await,
            Err(StoreError::NotFound { field_id }) if field_id == "city"
        ));
        assert!(matches!(
            store.delete("alice", "city").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_import_report() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());
        store
            .create("alice", &FieldDraft::new("City", FieldKind::Text))
            .await
            .unwrap();

        let drafts = vec![
            Ok(FieldDraft::new("City", FieldKind::Text)),
            Ok(FieldDraft::new("Salary expectation", FieldKind::Number)
                .with_range(Some(1000.0), Some(500.0))),
            Ok(FieldDraft::new("Skills", FieldKind::Tags)),
        ];

        let report = store.import("alice", &drafts).await.unwrap();
        assert_eq!(report.created, vec!["skills"]);
        assert_eq!(report.skipped, vec!["city"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert!(report.rejected[0].errors.contains_field("maxValue"));
    }

    #[tokio::test]
    async fn test_import_keeps_valid_entries_of_a_mixed_file() {
        let db = Database::in_memory().await.unwrap();
        let store = FieldTemplateStore::new(db.pool());

        let entries = crate::import::parse_json_drafts(
            r#"[
                {"label": "City", "inputType": "text"},
                {"label": null, "inputType": "text"},
                {"label": "Mood", "inputType": null},
                5,
                {"label": {"en": "Skills"}, "inputType": "tags"}
            ]"#,
        )
        .unwrap();

        let report = store.import("alice", &entries).await.unwrap();
        assert_eq!(report.created, vec!["city", "skills"]);
        assert!(report.skipped.is_empty());

        let indices: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(report.rejected[0].errors.contains_field("label.en"));
        assert_eq!(report.rejected[1].label, "Mood");
        assert!(report.rejected[1].errors.contains_field("inputType"));
        assert!(report.rejected[2].label.is_empty());
        assert!(report.rejected[2].errors.contains_field("draft"));

        assert_eq!(store.list("alice").await.unwrap().len(), 2);
    }
}
