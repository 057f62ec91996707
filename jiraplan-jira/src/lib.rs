//! jiraplan Jira - Jira integration for jiraplan
//!
//! This crate provides the issue-tracker capability, a Jira REST client
//! implementing it, field discovery, and the staged creation of a parsed
//! plan as Jira issues.

mod client;
mod create;
mod error;
mod fields;
mod log;
mod tracker;

pub use client::{build_issue_fields, JiraClient};
pub use create::{import_plan, ImportOptions, DEFAULT_THROTTLE};
pub use error::{Error, Result, MAX_ERROR_DETAIL};
pub use fields::{discover_fields, suggest_slots, FieldSlot, FIELD_KEYWORDS};
pub use log::{ImportLog, LogEntry, LogStatus};
pub use tracker::{
    CreatedIssue, FieldSchema, IssueOptions, IssueTracker, JiraField, Myself, OfflineTracker,
};
