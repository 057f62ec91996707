//! Configuration management for jiraplan
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (JIRAPLAN_*)
//! 3. Config file (~/.config/jiraplan/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// How requests are authenticated against Jira
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// Username and API token/password
    #[default]
    Basic,
    /// Personal access token (Jira 8.14+)
    Bearer,
}

/// Jira server and project settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Base URL of the Jira server
    pub base_url: String,

    /// Authentication method
    pub auth_method: AuthMethod,

    /// Key of the project issues are created in
    pub project_key: String,

    /// Label added to every created issue (empty for none)
    pub label: String,

    /// Pause after each successfully created issue
    #[serde(with = "humantime_serde")]
    pub request_delay: Duration,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jira.yourcompany.com".to_string(),
            auth_method: AuthMethod::Basic,
            project_key: "PROJ".to_string(),
            label: "EATL".to_string(),
            request_delay: Duration::from_millis(300),
        }
    }
}

/// Custom field IDs where epic name, epic link and story points are stored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldSlots {
    pub epic_name: String,
    pub epic_link: String,
    pub story_points: String,
}

impl Default for FieldSlots {
    fn default() -> Self {
        Self {
            epic_name: "customfield_10011".to_string(),
            epic_link: "customfield_10014".to_string(),
            story_points: "customfield_10016".to_string(),
        }
    }
}

/// Issue type names as configured in the Jira project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IssueTypes {
    pub epic: String,
    pub story: String,
    pub subtask: String,
    pub task: String,
}

impl Default for IssueTypes {
    fn default() -> Self {
        Self {
            epic: "Epic".to_string(),
            story: "Story".to_string(),
            subtask: "Sub-task".to_string(),
            task: "Task".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Jira server configuration
    pub jira: JiraConfig,

    /// Custom field slots
    pub fields: FieldSlots,

    /// Issue type names
    pub issue_types: IssueTypes,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        debug!(path = %path.display(), "Loaded config file");
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Write configuration to a file, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/jiraplan/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jiraplan").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - JIRAPLAN_BASE_URL: Jira base URL
    /// - JIRAPLAN_PROJECT: Project key
    /// - JIRAPLAN_LABEL: Label for created issues
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("JIRAPLAN_BASE_URL") {
            self.jira.base_url = base_url;
        }

        if let Ok(project) = std::env::var("JIRAPLAN_PROJECT") {
            self.jira.project_key = project;
        }

        if let Ok(label) = std::env::var("JIRAPLAN_LABEL") {
            self.jira.label = label;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, base_url: Option<String>, project: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.jira.base_url = url;
        }

        if let Some(p) = project {
            self.jira.project_key = p;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        path: Option<&Path>,
        base_url: Option<String>,
        project: Option<String>,
    ) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };
        Ok(config
            .with_env_overrides()
            .with_cli_overrides(base_url, project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.jira.project_key, "PROJ");
        assert_eq!(config.jira.label, "EATL");
        assert_eq!(config.jira.auth_method, AuthMethod::Basic);
        assert_eq!(config.jira.request_delay, Duration::from_millis(300));
        assert_eq!(config.fields.story_points, "customfield_10016");
        assert_eq!(config.issue_types.subtask, "Sub-task");
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(
            Some("https://jira.example.com".to_string()),
            Some("ABC".to_string()),
        );

        assert_eq!(config.jira.base_url, "https://jira.example.com");
        assert_eq!(config.jira.project_key, "ABC");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[jira]
base_url = "https://jira.example.com"
auth_method = "bearer"
project_key = "WEB"
label = ""
request_delay = "1s"

[fields]
epic_name = "customfield_1"
epic_link = "customfield_2"
story_points = "customfield_3"

[issue_types]
subtask = "Subtask"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.jira.base_url, "https://jira.example.com");
        assert_eq!(config.jira.auth_method, AuthMethod::Bearer);
        assert_eq!(config.jira.label, "");
        assert_eq!(config.jira.request_delay, Duration::from_secs(1));
        assert_eq!(config.fields.epic_link, "customfield_2");
        assert_eq!(config.issue_types.subtask, "Subtask");
        // Unset issue types keep defaults
        assert_eq!(config.issue_types.epic, "Epic");
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[jira]
project_key = "OPS"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.jira.project_key, "OPS");
        assert_eq!(config.jira.label, "EATL");
        assert_eq!(config.fields, FieldSlots::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.jira.project_key = "SAVED".to_string();
        config.fields.epic_name = "customfield_99".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[jira\nbroken").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
