use anyhow::Result;
use clap::Parser;
use field_templates::app_log;
use field_templates::core::ConfigManager;
use field_templates::field_cli::{handle_field_command, FieldCli};
use field_templates::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = FieldCli::parse();

    let config = ConfigManager::load()?;
    init_logging(&config.settings.log_filter)?;
    config.ensure_directories().await?;

    app_log!(info, "Environment: {}", config.environment);
    app_log!(
        info,
        "Database: {}",
        config.settings.database_path.display()
    );

    handle_field_command(cli, &config).await
}
