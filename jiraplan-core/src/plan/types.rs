//! Plan hierarchy types

use serde::{Deserialize, Serialize};

/// A parsed planning document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Epics in document order
    pub epics: Vec<Epic>,
    /// Standalone tasks in document order
    pub tasks: Vec<Task>,
}

/// An epic and the stories that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    /// Epic identifier (e.g., "EPIC-1")
    pub id: String,
    /// Epic title
    pub title: String,
    /// Description from the quoted line under the heading
    pub description: String,
    /// Stories in this epic
    pub stories: Vec<Story>,
    /// Jira issue key, set once the epic has been created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_key: Option<String>,
}

/// A story inside an epic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story identifier (e.g., "STORY-1.2")
    pub id: String,
    /// Story title
    pub title: String,
    /// User-story description
    pub description: String,
    /// Total story points from the table's total row
    pub story_points: u32,
    /// Subtasks from the story table
    pub subtasks: Vec<Subtask>,
    /// Jira issue key, set once the story has been created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_key: Option<String>,
}

/// A subtask row of a story table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub story_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_key: Option<String>,
}

/// A standalone task from the tasks section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier (e.g., "TASK-3")
    pub id: String,
    /// Summary in the form "TASK-3: Title"
    pub title: String,
    /// "Notes: ..." when the notes column is filled in, else empty
    pub description: String,
    pub story_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_key: Option<String>,
}

impl Epic {
    pub(crate) fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            stories: Vec::new(),
            jira_key: None,
        }
    }
}

impl Story {
    pub(crate) fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            story_points: 0,
            subtasks: Vec::new(),
            jira_key: None,
        }
    }

    /// Get the ID of the epic this story belongs to (e.g., "EPIC-2" from "STORY-2.4")
    pub fn epic_id(&self) -> Option<String> {
        self.id
            .strip_prefix("STORY-")
            .and_then(|rest| rest.split_once('.'))
            .map(|(epic, _)| format!("EPIC-{}", epic))
    }
}

/// Number of issues a plan will create, per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub epics: usize,
    pub stories: usize,
    pub subtasks: usize,
    pub tasks: usize,
    pub total: usize,
}

impl Plan {
    /// Count the issues in this plan
    pub fn counts(&self) -> IssueCounts {
        count_issues(self)
    }

    /// Iterate over all stories, epic order outer and story order inner
    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.epics.iter().flat_map(|e| e.stories.iter())
    }
}

/// Count epics, stories, subtasks and tasks in a plan
pub fn count_issues(plan: &Plan) -> IssueCounts {
    let epics = plan.epics.len();
    let stories = plan.epics.iter().map(|e| e.stories.len()).sum();
    let subtasks = plan.stories().map(|s| s.subtasks.len()).sum();
    let tasks = plan.tasks.len();

    IssueCounts {
        epics,
        stories,
        subtasks,
        tasks,
        total: epics + stories + subtasks + tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_with_subtasks(id: &str, n: usize) -> Story {
        let mut story = Story::new(id, "Story");
        for i in 0..n {
            story.subtasks.push(Subtask {
                title: format!("Sub {}", i),
                story_points: 1,
                jira_key: None,
            });
        }
        story
    }

    #[test]
    fn test_count_empty_plan() {
        let counts = count_issues(&Plan::default());
        assert_eq!(counts, IssueCounts::default());
    }

    #[test]
    fn test_count_issues() {
        let mut epic1 = Epic::new("EPIC-1", "First");
        epic1.stories.push(story_with_subtasks("STORY-1.1", 2));
        epic1.stories.push(story_with_subtasks("STORY-1.2", 3));
        let mut epic2 = Epic::new("EPIC-2", "Second");
        epic2.stories.push(story_with_subtasks("STORY-2.1", 0));

        let plan = Plan {
            epics: vec![epic1, epic2],
            tasks: vec![Task {
                id: "TASK-1".to_string(),
                title: "TASK-1: Thing".to_string(),
                description: String::new(),
                story_points: 2,
                jira_key: None,
            }],
        };

        let counts = plan.counts();
        assert_eq!(counts.epics, 2);
        assert_eq!(counts.stories, 3);
        assert_eq!(counts.subtasks, 5);
        assert_eq!(counts.tasks, 1);
        assert_eq!(counts.total, 11);
    }

    #[test]
    fn test_story_epic_id() {
        assert_eq!(
            Story::new("STORY-3.4", "x").epic_id(),
            Some("EPIC-3".to_string())
        );
        assert_eq!(Story::new("bogus", "x").epic_id(), None);
    }
}
