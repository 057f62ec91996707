//! CLI command implementations

pub mod config;
pub mod jira;
pub mod plan;

pub use jira::FieldsArgs;
pub use plan::{CreateArgs, ParseArgs};
