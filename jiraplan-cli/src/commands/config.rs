//! Configuration commands

use jiraplan_core::{AuthMethod, Config, Credentials, Secrets};
use std::path::Path;

/// Execute the config command
pub fn show_config(config: &Config, config_path: Option<&Path>) -> anyhow::Result<()> {
    let secrets = Secrets::load()?;

    println!("jiraplan Configuration");
    println!("======================");
    println!();
    println!("Jira:");
    println!("  base_url: {}", config.jira.base_url);
    println!(
        "  auth_method: {}",
        match config.jira.auth_method {
            AuthMethod::Basic => "basic",
            AuthMethod::Bearer => "bearer",
        }
    );
    println!("  project_key: {}", config.jira.project_key);
    println!("  label: {}", config.jira.label);
    println!("  request_delay: {:?}", config.jira.request_delay);
    println!();
    println!("Credentials:");
    match secrets.credentials(config.jira.auth_method) {
        Ok(Credentials::Basic { username, .. }) => {
            println!("  username: {}", username);
            println!("  token: (set)");
        }
        Ok(Credentials::Bearer { .. }) => println!("  token: (set)"),
        Err(e) => println!("  (incomplete: {})", e),
    }
    println!();
    println!("Field slots:");
    println!("  epic_name: {}", config.fields.epic_name);
    println!("  epic_link: {}", config.fields.epic_link);
    println!("  story_points: {}", config.fields.story_points);
    println!();
    println!("Issue types:");
    println!("  epic: {}", config.issue_types.epic);
    println!("  story: {}", config.issue_types.story);
    println!("  subtask: {}", config.issue_types.subtask);
    println!("  task: {}", config.issue_types.task);
    println!();

    let path = config_path
        .map(Path::to_path_buf)
        .or_else(Config::default_config_path);
    if let Some(path) = path {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
    if let Some(path) = Secrets::default_secrets_path() {
        println!("Secrets file: {}", path.display());
    }

    Ok(())
}

/// Execute the init command: write a default config and a secrets template
pub fn init(config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .or_else(Config::default_config_path)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    if path.exists() {
        println!("Config file already exists at {}", path.display());
    } else {
        Config::default().save_to_file(&path)?;
        println!("Wrote default config to {}", path.display());
    }

    match Secrets::default_secrets_path() {
        Some(secrets_path) if secrets_path.exists() => {
            println!("Secrets file already exists at {}", secrets_path.display());
        }
        _ => {
            let secrets_path = Secrets::create_template()?;
            println!("Wrote secrets template to {}", secrets_path.display());
        }
    }

    Ok(())
}
