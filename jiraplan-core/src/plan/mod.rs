//! Plan parsing
//!
//! This module handles parsing of PLANNING.md files that describe
//! epics, their stories and subtasks, and a flat list of standalone tasks.

mod parser;
mod types;

pub use parser::parse_plan;
pub use types::{count_issues, Epic, IssueCounts, Plan, Story, Subtask, Task};
