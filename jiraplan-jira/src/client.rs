//! Jira REST API client using reqwest

use async_trait::async_trait;
use jiraplan_core::{Config, Credentials};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use url::Url;

use crate::tracker::{CreatedIssue, IssueOptions, IssueTracker, JiraField, Myself};
use crate::{Error, Result};

/// Path of the REST API below the server base URL
const API_PATH: &str = "rest/api/2/";

/// Jira API client for a single project
pub struct JiraClient {
    http: reqwest::Client,
    api_base: Url,
    credentials: Credentials,
    config: Config,
}

impl JiraClient {
    /// Create a new Jira client
    ///
    /// Credentials come from [`jiraplan_core::Secrets::credentials`].
    pub fn new(config: Config, credentials: Credentials) -> Result<Self> {
        let api_base = api_base_url(&config.jira.base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("jiraplan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(base_url = %api_base, project = %config.jira.project_key, "Created Jira client");

        Ok(Self {
            http,
            api_base,
            credentials,
            config,
        })
    }

    /// Full URL of the REST API root
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Send a request and decode the JSON response
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = self.api_base.join(endpoint)?;
        debug!(%method, %url, "Jira request");

        let mut req = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        req = match &self.credentials {
            Credentials::Basic { username, token } => req.basic_auth(username, Some(token)),
            Credentials::Bearer { token } => req.bearer_auth(token),
        };

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn who_am_i(&self) -> Result<Myself> {
        self.request(Method::GET, "myself", None).await
    }

    async fn list_fields(&self) -> Result<Vec<JiraField>> {
        self.request(Method::GET, "field", None).await
    }

    async fn create_issue(
        &self,
        issue_type: &str,
        summary: &str,
        options: &IssueOptions,
    ) -> Result<CreatedIssue> {
        debug!(issue_type, summary, "Creating issue");

        let fields = build_issue_fields(&self.config, issue_type, summary, options);
        let body = json!({ "fields": fields });

        self.request(Method::POST, "issue", Some(&body)).await
    }
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("api_base", &self.api_base.as_str())
            .field("project", &self.config.jira.project_key)
            .finish_non_exhaustive()
    }
}

/// Resolve `<base>/rest/api/2/` from the configured server URL
fn api_base_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url.trim_end_matches('/'))?;
    if base.cannot_be_a_base() {
        return Err(Error::Other(format!("Invalid Jira base URL: {}", base_url)));
    }

    let mut root = base.as_str().trim_end_matches('/').to_string();
    root.push('/');
    Ok(Url::parse(&root)?.join(API_PATH)?)
}

/// Build the `fields` object of a create-issue request
///
/// Project, summary, issue type and labels are always set. Description,
/// story points, epic name, epic link and parent are only set when a value
/// is given and, for custom fields, a slot is configured. Epic name goes on
/// epics only, epic link on stories only, parent on subtasks only.
pub fn build_issue_fields(
    config: &Config,
    issue_type: &str,
    summary: &str,
    options: &IssueOptions,
) -> Map<String, Value> {
    let types = &config.issue_types;
    let slots = &config.fields;

    let mut fields = Map::new();
    fields.insert("project".into(), json!({ "key": config.jira.project_key }));
    fields.insert("summary".into(), json!(summary));
    fields.insert("issuetype".into(), json!({ "name": issue_type }));
    let labels: Vec<&str> = if config.jira.label.is_empty() {
        Vec::new()
    } else {
        vec![config.jira.label.as_str()]
    };
    fields.insert("labels".into(), json!(labels));

    if let Some(description) = non_empty(&options.description) {
        fields.insert("description".into(), json!(description));
    }

    if let Some(points) = options.story_points.filter(|&p| p > 0) {
        if !slots.story_points.is_empty() {
            fields.insert(slots.story_points.clone(), json!(points));
        }
    }

    if issue_type == types.epic && !slots.epic_name.is_empty() {
        if let Some(name) = non_empty(&options.epic_name) {
            fields.insert(slots.epic_name.clone(), json!(name));
        }
    }

    if issue_type == types.story && !slots.epic_link.is_empty() {
        if let Some(epic_key) = non_empty(&options.epic_key) {
            fields.insert(slots.epic_link.clone(), json!(epic_key));
        }
    }

    if issue_type == types.subtask {
        if let Some(parent_key) = non_empty(&options.parent_key) {
            fields.insert("parent".into(), json!({ "key": parent_key }));
        }
    }

    fields
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_base_fields_always_set() {
        let fields = build_issue_fields(&config(), "Task", "Do it", &IssueOptions::default());
        assert_eq!(fields["project"], json!({ "key": "PROJ" }));
        assert_eq!(fields["summary"], json!("Do it"));
        assert_eq!(fields["issuetype"], json!({ "name": "Task" }));
        assert_eq!(fields["labels"], json!(["EATL"]));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_empty_label_gives_empty_list() {
        let mut config = config();
        config.jira.label.clear();
        let fields = build_issue_fields(&config, "Task", "Do it", &IssueOptions::default());
        assert_eq!(fields["labels"], json!([]));
    }

    #[test]
    fn test_description_only_when_non_empty() {
        let options = IssueOptions {
            description: Some(String::new()),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Task", "x", &options);
        assert!(!fields.contains_key("description"));

        let options = IssueOptions {
            description: Some("Notes: hi".to_string()),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Task", "x", &options);
        assert_eq!(fields["description"], json!("Notes: hi"));
    }

    #[test]
    fn test_story_points_need_positive_value_and_slot() {
        let options = IssueOptions {
            story_points: Some(0),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Task", "x", &options);
        assert!(!fields.contains_key("customfield_10016"));

        let options = IssueOptions {
            story_points: Some(5),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Task", "x", &options);
        assert_eq!(fields["customfield_10016"], json!(5));

        let mut no_slot = config();
        no_slot.fields.story_points.clear();
        let fields = build_issue_fields(&no_slot, "Task", "x", &options);
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_epic_name_only_on_epics() {
        let options = IssueOptions {
            epic_name: Some("EPIC-1: Auth".to_string()),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Epic", "EPIC-1: Auth", &options);
        assert_eq!(fields["customfield_10011"], json!("EPIC-1: Auth"));

        let fields = build_issue_fields(&config(), "Story", "EPIC-1: Auth", &options);
        assert!(!fields.contains_key("customfield_10011"));
    }

    #[test]
    fn test_epic_link_only_on_stories() {
        let options = IssueOptions {
            epic_key: Some("PROJ-1".to_string()),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Story", "s", &options);
        assert_eq!(fields["customfield_10014"], json!("PROJ-1"));

        let fields = build_issue_fields(&config(), "Task", "s", &options);
        assert!(!fields.contains_key("customfield_10014"));
    }

    #[test]
    fn test_story_without_epic_key_has_no_link() {
        let options = IssueOptions {
            epic_key: None,
            story_points: Some(3),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Story", "s", &options);
        assert!(!fields.contains_key("customfield_10014"));
    }

    #[test]
    fn test_subtask_gets_parent_and_never_epic_link() {
        let options = IssueOptions {
            parent_key: Some("PROJ-7".to_string()),
            epic_key: Some("PROJ-1".to_string()),
            epic_name: Some("name".to_string()),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Sub-task", "sub", &options);
        assert_eq!(fields["parent"], json!({ "key": "PROJ-7" }));
        assert!(!fields.contains_key("customfield_10014"));
        assert!(!fields.contains_key("customfield_10011"));
    }

    #[test]
    fn test_parent_ignored_for_other_types() {
        let options = IssueOptions {
            parent_key: Some("PROJ-7".to_string()),
            ..Default::default()
        };
        let fields = build_issue_fields(&config(), "Task", "t", &options);
        assert!(!fields.contains_key("parent"));
    }

    #[test]
    fn test_api_base_url() {
        let url = api_base_url("https://jira.example.com").unwrap();
        assert_eq!(url.as_str(), "https://jira.example.com/rest/api/2/");

        let url = api_base_url("https://example.com/jira/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/jira/rest/api/2/");
        assert_eq!(
            url.join("myself").unwrap().as_str(),
            "https://example.com/jira/rest/api/2/myself"
        );
    }

    #[test]
    fn test_api_base_url_invalid() {
        assert!(api_base_url("not a url").is_err());
        assert!(api_base_url("mailto:someone@example.com").is_err());
    }

    fn credentials() -> Credentials {
        Credentials::Basic {
            username: "alice".to_string(),
            token: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let mut config = config();
        config.jira.base_url = "not a url".to_string();
        let err = JiraClient::new(config, credentials()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_client_new() {
        let client = JiraClient::new(config(), credentials()).unwrap();
        assert_eq!(
            client.api_base().as_str(),
            "https://jira.yourcompany.com/rest/api/2/"
        );
        let debug = format!("{:?}", client);
        assert!(!debug.contains("s3cret"));
    }
}
