//! Issue tracker abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The authenticated user, as returned by `GET myself`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Myself {
    pub display_name: String,
}

/// A field definition, as returned by `GET field`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraField {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub kind: String,
}

impl JiraField {
    /// Schema type, or "?" when the field has none
    pub fn schema_type(&self) -> &str {
        self.schema.as_ref().map(|s| s.kind.as_str()).unwrap_or("?")
    }
}

/// Response of a successful `POST issue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
}

/// Optional values attached to a new issue
///
/// Which of these end up in the request depends on the issue type and the
/// configured field slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueOptions {
    pub description: Option<String>,
    pub story_points: Option<u32>,
    pub epic_key: Option<String>,
    pub parent_key: Option<String>,
    pub epic_name: Option<String>,
}

/// Remote issue tracker operations used by the importer
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch the authenticated user; used as a connectivity check
    async fn who_am_i(&self) -> Result<Myself>;

    /// List all field definitions
    async fn list_fields(&self) -> Result<Vec<JiraField>>;

    /// Create an issue of the given type
    async fn create_issue(
        &self,
        issue_type: &str,
        summary: &str,
        options: &IssueOptions,
    ) -> Result<CreatedIssue>;
}

/// Tracker for dry runs, which never reach the network
///
/// Every operation fails. A dry-run import makes no calls, so it can run
/// without credentials or a reachable server.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTracker;

#[async_trait]
impl IssueTracker for OfflineTracker {
    async fn who_am_i(&self) -> Result<Myself> {
        Err(offline())
    }

    async fn list_fields(&self) -> Result<Vec<JiraField>> {
        Err(offline())
    }

    async fn create_issue(
        &self,
        _issue_type: &str,
        _summary: &str,
        _options: &IssueOptions,
    ) -> Result<CreatedIssue> {
        Err(offline())
    }
}

fn offline() -> Error {
    Error::Other("offline tracker makes no requests".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_myself() {
        let me: Myself =
            serde_json::from_str(r#"{"displayName":"Alice","name":"alice","active":true}"#)
                .unwrap();
        assert_eq!(me.display_name, "Alice");
    }

    #[test]
    fn test_deserialize_fields() {
        let json = r#"[
            {"id":"customfield_10016","name":"Story Points","schema":{"type":"number"}},
            {"id":"summary","name":"Summary"}
        ]"#;
        let fields: Vec<JiraField> = serde_json::from_str(json).unwrap();
        assert_eq!(fields[0].schema_type(), "number");
        assert_eq!(fields[1].schema_type(), "?");
    }

    #[tokio::test]
    async fn test_offline_tracker_refuses_every_call() {
        let tracker = OfflineTracker;
        assert!(tracker.who_am_i().await.is_err());
        assert!(tracker.list_fields().await.is_err());
        let err = tracker
            .create_issue("Task", "x", &IssueOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Other(_)));
    }
}
