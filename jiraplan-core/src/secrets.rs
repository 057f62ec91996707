//! Jira credentials
//!
//! The username and API token are kept out of `config.toml` so the config
//! can be shared. The secrets file is located at
//! `~/.config/jiraplan/secrets.toml` and must have restrictive permissions
//! (0600 on Unix).
//!
//! Loading priority, per value:
//! 1. Environment variables (JIRA_USERNAME, JIRA_TOKEN)
//! 2. Secrets file (~/.config/jiraplan/secrets.toml)

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{AuthMethod, Error, Result};

const TEMPLATE: &str = r#"# jiraplan secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)

[jira]
# Login name, only needed for auth_method = "basic"
username = ""
# API token (Cloud), password, or personal access token (Server/DC)
token = ""
"#;

/// Contents of the secrets file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    pub jira: JiraSecrets,
}

/// The `[jira]` table of the secrets file
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JiraSecrets {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl fmt::Debug for JiraSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraSecrets")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// What a Jira request is authenticated with
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username and API token or password
    Basic { username: String, token: String },
    /// Personal access token
    Bearer { token: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

impl Secrets {
    /// Load secrets from the default location, then apply environment overrides
    ///
    /// A missing file gives empty secrets.
    pub fn load() -> Result<Self> {
        let secrets = match Self::default_secrets_path() {
            Some(path) if path.exists() => Self::load_from_file(&path)?,
            _ => Self::default(),
        };
        Ok(secrets.with_env_overrides())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(path)?.permissions().mode();
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}, run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }
        }

        let contents = std::fs::read_to_string(path)?;
        let secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        debug!(path = %path.display(), "Loaded secrets file");
        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/jiraplan/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jiraplan").join("secrets.toml"))
    }

    /// Apply JIRA_USERNAME and JIRA_TOKEN from the environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(username) = var("JIRA_USERNAME").filter(|v| !v.trim().is_empty()) {
            debug!("Using Jira username from JIRA_USERNAME");
            self.jira.username = Some(username);
        }

        if let Some(token) = var("JIRA_TOKEN").filter(|v| !v.trim().is_empty()) {
            debug!("Using Jira token from JIRA_TOKEN");
            self.jira.token = Some(token);
        }

        self
    }

    /// Build the credentials for the given auth method
    ///
    /// Values are trimmed; a blank value counts as missing. Basic auth needs
    /// both a username and a token, bearer auth only the token.
    pub fn credentials(&self, method: AuthMethod) -> Result<Credentials> {
        let token = non_blank(&self.jira.token).ok_or_else(|| {
            Error::Config(
                "Jira token not found. Set JIRA_TOKEN or add token to \
                 ~/.config/jiraplan/secrets.toml"
                    .to_string(),
            )
        })?;

        match method {
            AuthMethod::Bearer => Ok(Credentials::Bearer { token }),
            AuthMethod::Basic => {
                let username = non_blank(&self.jira.username).ok_or_else(|| {
                    Error::Config(
                        "Jira username not found. Set JIRA_USERNAME or add username to \
                         ~/.config/jiraplan/secrets.toml"
                            .to_string(),
                    )
                })?;
                Ok(Credentials::Basic { username, token })
            }
        }
    }

    /// Create a template secrets file at the default location
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;
        Self::write_template(&path)?;
        Ok(path)
    }

    /// Write an empty secrets template to `path`
    ///
    /// Parent directories are created. The file is created with mode 0600 on
    /// Unix and an existing file is never overwritten.
    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )),
            _ => Error::Io(e),
        })?;
        file.write_all(TEMPLATE.as_bytes())?;

        warn!(path = %path.display(), "Created secrets template - please add your credentials");
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn secrets(username: Option<&str>, token: Option<&str>) -> Secrets {
        Secrets {
            jira: JiraSecrets {
                username: username.map(str::to_string),
                token: token.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[jira]
username = "alice"
token = "abc123"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(
            secrets.credentials(AuthMethod::Basic).unwrap(),
            Credentials::Basic {
                username: "alice".to_string(),
                token: "abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_basic_needs_username() {
        let err = secrets(None, Some("abc")).credentials(AuthMethod::Basic).unwrap_err();
        assert!(err.to_string().contains("JIRA_USERNAME"));

        let err = secrets(Some("  "), Some("abc")).credentials(AuthMethod::Basic).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bearer_ignores_username() {
        let credentials = secrets(None, Some(" pat ")).credentials(AuthMethod::Bearer).unwrap();
        assert_eq!(credentials, Credentials::Bearer { token: "pat".to_string() });
    }

    #[test]
    fn test_blank_token_is_missing() {
        for method in [AuthMethod::Basic, AuthMethod::Bearer] {
            let err = secrets(Some("alice"), Some("")).credentials(method).unwrap_err();
            assert!(err.to_string().contains("JIRA_TOKEN"));
        }
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [("JIRA_USERNAME", "bob"), ("JIRA_TOKEN", "")].into();
        let secrets = secrets(Some("alice"), Some("file-token"))
            .with_overrides(|name| env.get(name).map(|v| v.to_string()));

        // Empty variables do not clear file values
        assert_eq!(
            secrets.credentials(AuthMethod::Basic).unwrap(),
            Credentials::Basic {
                username: "bob".to_string(),
                token: "file-token".to_string(),
            }
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let credentials = secrets(Some("alice"), Some("s3cret"))
            .credentials(AuthMethod::Basic)
            .unwrap();
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));

        let debug = format!("{:?}", secrets(None, Some("s3cret")));
        assert!(!debug.contains("s3cret"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "[jira]\ntoken = \"test\"\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = Secrets::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_template_is_private_and_loadable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jiraplan").join("secrets.toml");
        Secrets::write_template(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // The empty template loads but yields no credentials yet
        let loaded = Secrets::load_from_file(&path).unwrap();
        assert!(loaded.credentials(AuthMethod::Bearer).is_err());

        let err = Secrets::write_template(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
