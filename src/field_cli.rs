// src/field_cli.rs
use crate::core::{ConfigManager, Database, FsOps};
use crate::error::StoreError;
use crate::import::{load_draft, load_drafts};
use crate::preview::render_preview;
use crate::store::FieldTemplateStore;
use crate::types::{Locale, SavedField};
use crate::validation::{derive_field_id, normalize_label, validate};
use crate::app_log;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "field-templates")]
#[command(about = "Manage saved field templates for job application forms")]
pub struct FieldCli {
    #[command(subcommand)]
    pub command: FieldCommand,

    /// SQLite database file (defaults to the configured path)
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,

    /// Owner of the field collection (defaults to the configured owner)
    #[arg(long, global = true)]
    pub owner: Option<String>,
}

#[derive(Subcommand)]
pub enum FieldCommand {
    /// Initialize the database
    Init,
    /// List the owner's saved fields
    List {
        #[arg(long)]
        lang: Option<String>,
    },
    /// Preview one saved field
    Show {
        field_id: String,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Create a saved field from a JSON draft
    Add { draft: PathBuf },
    /// Replace a saved field with a JSON draft
    Update { field_id: String, draft: PathBuf },
    /// Delete a saved field
    Delete { field_id: String },
    /// Check a JSON draft without saving it
    Validate { draft: PathBuf },
    /// Print the field id derived from a label
    Slug { label: String },
    /// Import drafts from a JSON or CSV file
    Import { file: PathBuf },
    /// Export the owner's saved fields as JSON
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn handle_field_command(cli: FieldCli, config: &ConfigManager) -> Result<()> {
    let owner = cli
        .owner
        .unwrap_or_else(|| config.settings.default_owner.clone());
    let database_path = cli
        .database_path
        .unwrap_or_else(|| config.settings.database_path.clone());

    match cli.command {
        FieldCommand::Validate { draft } => validate_draft_file(&draft).await,
        FieldCommand::Slug { label } => {
            println!("{}", derive_field_id(&normalize_label(label)));
            Ok(())
        }
        command => handle_store_command(command, &owner, &database_path).await,
    }
}

async fn handle_store_command(command: FieldCommand, owner: &str, database_path: &Path) -> Result<()> {
    let db = Database::new(database_path).await?;
    let store = FieldTemplateStore::new(db.pool());

    match command {
        FieldCommand::Init => {
            db.health_check().await?;
            println!("✅ Database initialized at: {}", database_path.display());
            println!("   Tables created: saved_fields");
        }

        FieldCommand::List { lang } => {
            let locale = Locale::normalize(lang.as_deref());
            let fields = store.list(owner).await.map_err(report_store_error)?;

            if fields.is_empty() {
                println!("No saved fields for {}.", owner);
            } else {
                println!("Saved fields for {}:", owner);
                println!("{:<30} {:<18} {:<9} {}", "ID", "Type", "Required", "Label");
                println!("{}", "-".repeat(80));

                for stored in fields {
                    let field = stored.field;
                    println!(
                        "{:<30} {:<18} {:<9} {}",
                        field.field_id,
                        field.input_type,
                        if field.is_required { "yes" } else { "no" },
                        field.label.get(locale)
                    );
                }
            }
        }

        FieldCommand::Show { field_id, lang } => {
            let locale = Locale::normalize(lang.as_deref());
            let stored = store
                .get(owner, &field_id)
                .await
                .map_err(report_store_error)?;

            print!("{}", render_preview(&stored.field, locale));
            println!(
                "Created: {}  Updated: {}",
                stored.created_at.format("%Y-%m-%d %H:%M"),
                stored.updated_at.format("%Y-%m-%d %H:%M")
            );
        }

        FieldCommand::Add { draft } => {
            let draft = load_draft(&draft).await?;
            let stored = store
                .create(owner, &draft)
                .await
                .map_err(report_store_error)?;
            println!("✅ Saved field created: {}", stored.field.field_id);
        }

        FieldCommand::Update { field_id, draft } => {
            let draft = load_draft(&draft).await?;
            let stored = store
                .update(owner, &field_id, &draft)
                .await
                .map_err(report_store_error)?;
            println!("✅ Saved field updated: {}", stored.field.field_id);
        }

        FieldCommand::Delete { field_id } => {
            store
                .delete(owner, &field_id)
                .await
                .map_err(report_store_error)?;
            println!("✅ Saved field deleted: {}", field_id);
        }

        FieldCommand::Import { file } => {
            let drafts = load_drafts(&file).await?;
            let report = store
                .import(owner, &drafts)
                .await
                .map_err(report_store_error)?;

            for rejected in &report.rejected {
                if rejected.label.is_empty() {
                    println!("❌ Draft {} rejected:", rejected.index + 1);
                } else {
                    println!(
                        "❌ Draft {} ('{}') rejected:",
                        rejected.index + 1,
                        rejected.label
                    );
                }
                for error in &rejected.errors {
                    println!("   - {}", error);
                }
            }
            for field_id in &report.skipped {
                println!("⚠️  Skipped (already exists): {}", field_id);
            }

            println!("\nImport completed:");
            println!("  ✅ Created:  {}", report.created.len());
            println!("  ⚠️  Skipped:  {}", report.skipped.len());
            println!("  ❌ Rejected: {}", report.rejected.len());
        }

        FieldCommand::Export { output } => {
            let fields: Vec<SavedField> = store
                .list(owner)
                .await
                .map_err(report_store_error)?
                .into_iter()
                .map(|stored| stored.field)
                .collect();
            let json = serde_json::to_string_pretty(&fields)?;

            match output {
                Some(path) => {
                    FsOps::write_export(&path, &json).await?;
                    println!("✅ Exported {} fields to {}", fields.len(), path.display());
                }
                None => println!("{}", json),
            }
        }

        FieldCommand::Validate { .. } | FieldCommand::Slug { .. } => {}
    }

    Ok(())
}

async fn validate_draft_file(path: &Path) -> Result<()> {
    let draft = load_draft(path).await?;

    match validate(&draft) {
        Ok(field) => {
            println!("{}", serde_json::to_string_pretty(&field)?);
            Ok(())
        }
        Err(errors) => {
            println!("❌ {} problem(s) found:", errors.len());
            for error in &errors {
                println!("   - {}", error);
            }
            anyhow::bail!("Draft {} is invalid", path.display())
        }
    }
}

fn report_store_error(e: StoreError) -> anyhow::Error {
    match &e {
        StoreError::Invalid(errors) => {
            println!("❌ Field definition rejected:");
            for error in errors {
                println!("   - {}", error);
            }
        }
        StoreError::Conflict { field_id } => {
            println!("❌ Error: field '{}' already exists", field_id);
        }
        StoreError::NotFound { field_id } => {
            println!("❌ Error: field '{}' not found", field_id);
        }
        other => {
            app_log!(error, "Store operation failed: {}", other);
        }
    }
    anyhow::Error::new(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreSettings;
    use crate::store::FieldTemplateStore;

    fn config_for(dir: &Path) -> ConfigManager {
        ConfigManager {
            environment: "local".to_string(),
            settings: StoreSettings {
                database_path: dir.join("fields.db"),
                default_owner: "recruiter".to_string(),
                log_filter: "field_templates=info".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_arguments() {
        let cli = FieldCli::try_parse_from([
            "field-templates",
            "show",
            "phone",
            "--lang",
            "ar",
            "--owner",
            "alice",
        ])
        .unwrap();

        assert_eq!(cli.owner.as_deref(), Some("alice"));
        assert!(matches!(
            cli.command,
            FieldCommand::Show { ref field_id, ref lang } if field_id == "phone" && lang.as_deref() == Some("ar")
        ));

        let cli =
            FieldCli::try_parse_from(["field-templates", "--database-path", "x.db", "init"]).unwrap();
        assert_eq!(cli.database_path, Some(PathBuf::from("x.db")));

        assert!(FieldCli::try_parse_from(["field-templates", "update", "phone"]).is_err());
    }

    #[tokio::test]
    async fn test_add_import_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let draft_path = dir.path().join("mobile.json");
        std::fs::write(
            &draft_path,
            r#"{"label": {"en": "Have a mobile"}, "inputType": "radio", "choices": ["Yes", "No"]}"#,
        )
        .unwrap();
        let add = FieldCli::try_parse_from(["field-templates", "add", draft_path.to_str().unwrap()])
            .unwrap();
        handle_field_command(add, &config).await.unwrap();

        let csv_path = dir.path().join("fields.csv");
        std::fs::write(
            &csv_path,
            "field_id,label_en,label_ar,input_type,is_required,choices\n,City,المدينة,text,yes,\n,Shift,,dropdown,,\n",
        )
        .unwrap();
        let import =
            FieldCli::try_parse_from(["field-templates", "import", csv_path.to_str().unwrap()])
                .unwrap();
        handle_field_command(import, &config).await.unwrap();

        let export_path = dir.path().join("out").join("export.json");
        let export = FieldCli::try_parse_from([
            "field-templates",
            "export",
            "--output",
            export_path.to_str().unwrap(),
        ])
        .unwrap();
        handle_field_command(export, &config).await.unwrap();

        let exported: Vec<SavedField> =
            serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
        let ids: Vec<&str> = exported.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["city", "have_a_mobile"]);

        let db = Database::new(&config.settings.database_path).await.unwrap();
        let stored = FieldTemplateStore::new(db.pool())
            .get("recruiter", "city")
            .await
            .unwrap();
        assert_eq!(stored.field.label.ar, "المدينة");
        assert!(stored.field.is_required);
    }

    #[tokio::test]
    async fn test_invalid_add_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let draft_path = dir.path().join("bad.json");
        std::fs::write(
            &draft_path,
            r#"{"label": "Years of experience", "inputType": "number", "minValue": 5, "maxValue": 2}"#,
        )
        .unwrap();

        let validate_cmd =
            FieldCli::try_parse_from(["field-templates", "validate", draft_path.to_str().unwrap()])
                .unwrap();
        assert!(handle_field_command(validate_cmd, &config).await.is_err());

        let add = FieldCli::try_parse_from(["field-templates", "add", draft_path.to_str().unwrap()])
            .unwrap();
        let err = handle_field_command(add, &config).await.unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert!(store_err.field_errors().unwrap().contains_field("maxValue"));

        let db = Database::new(&config.settings.database_path).await.unwrap();
        assert!(FieldTemplateStore::new(db.pool())
            .list("recruiter")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_field_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let delete = FieldCli::try_parse_from(["field-templates", "delete", "phone"]).unwrap();
        let err = handle_field_command(delete, &config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_import_json_with_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let json_path = dir.path().join("fields.json");
        std::fs::write(
            &json_path,
            r#"[{"label": "City", "inputType": "text"}, {"label": null, "inputType": 7}, true]"#,
        )
        .unwrap();
        let import =
            FieldCli::try_parse_from(["field-templates", "import", json_path.to_str().unwrap()])
                .unwrap();
        handle_field_command(import, &config).await.unwrap();

        let db = Database::new(&config.settings.database_path).await.unwrap();
        let fields = FieldTemplateStore::new(db.pool())
            .list("recruiter")
            .await
            .unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field.field_id, "city");
    }
}
