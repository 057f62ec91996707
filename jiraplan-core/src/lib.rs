//! jiraplan Core - planning document parsing and configuration
//!
//! This crate turns a PLANNING.md document into a typed hierarchy of epics,
//! stories, subtasks and standalone tasks, and loads the Jira settings used
//! to create them.

pub mod config;
pub mod error;
pub mod plan;
pub mod secrets;

pub use config::{AuthMethod, Config, FieldSlots, IssueTypes, JiraConfig};
pub use error::{Error, Result};
pub use plan::{count_issues, parse_plan, Epic, IssueCounts, Plan, Story, Subtask, Task};
pub use secrets::{Credentials, JiraSecrets, Secrets};
