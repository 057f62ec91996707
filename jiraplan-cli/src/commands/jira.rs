//! Jira commands: connectivity check and field discovery

use clap::Args;
use jiraplan_core::{Config, Secrets};
use jiraplan_jira::{discover_fields, suggest_slots, IssueTracker, JiraClient};
use std::path::Path;

/// Discover custom fields used for epics, stories and estimates
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Store suggested field IDs in the config file
    #[arg(long)]
    pub apply: bool,
}

fn get_client(config: &Config) -> anyhow::Result<JiraClient> {
    let credentials = Secrets::load()?.credentials(config.jira.auth_method)?;
    Ok(JiraClient::new(config.clone(), credentials)?)
}

/// Execute the check command
pub async fn check_connection(config: &Config) -> anyhow::Result<()> {
    let client = get_client(config)?;

    println!("Testing connection to {}...", config.jira.base_url);
    let me = client.who_am_i().await?;
    println!("✅ Connected as: {}", me.display_name);

    Ok(())
}

impl FieldsArgs {
    /// Execute the fields command
    pub async fn execute(&self, config: &Config, config_path: Option<&Path>) -> anyhow::Result<()> {
        let client = get_client(config)?;
        let fields = discover_fields(&client).await?;

        if fields.is_empty() {
            println!("No matching fields found.");
            return Ok(());
        }

        println!("{:<40} {:<24} Type", "Name", "ID");
        for field in &fields {
            println!("{:<40} {:<24} {}", field.name, field.id, field.schema_type());
        }

        let suggestions = suggest_slots(&fields);
        if suggestions.is_empty() {
            return Ok(());
        }

        println!();
        println!("Suggested field slots:");
        for (slot, field) in &suggestions {
            println!("  {} = {} ({})", slot.name(), field.id, field.name);
        }

        if !self.apply {
            println!();
            println!("Run with --apply to save these to the config file.");
            return Ok(());
        }

        let path = config_path
            .map(Path::to_path_buf)
            .or_else(Config::default_config_path)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let mut updated = config.clone();
        for (slot, field) in &suggestions {
            slot.apply(&mut updated.fields, &field.id);
        }
        updated.save_to_file(&path)?;

        println!();
        println!("Saved field slots to {}", path.display());
        Ok(())
    }
}
