//! PLANNING.md parser
//!
//! The document is scanned once, line by line. Headings open epics, stories
//! and the standalone tasks section; tables under a story list its subtasks.
//! Lines that match nothing are ignored.

use std::ops::ControlFlow;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::types::{Epic, Plan, Story, Subtask, Task};

/// `## Özet Tablo` / `## Önerilen Sprint` and friends: report sections after
/// which nothing is parsed
static SECTION_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^## (Özet Tablo|Önerilen Sprint|Summary Table|Suggested Sprint)")
        .expect("valid regex")
});

/// `## 🟣 EPIC-1 · Title`
static EPIC_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^## .* (EPIC-\d+) . (.+)$").expect("valid regex"));

/// `> *Description*`
static EPIC_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^> \*(.+)\*$").expect("valid regex"));

/// `## 🟡 TASK'LAR`
static TASKS_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## .* TASK").expect("valid regex"));

/// `### 🔵 STORY-1.2 · Title`
static STORY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^### .* (STORY-\d+\.\d+) . (.+)$").expect("valid regex"));

/// `**"As a user, I want ..."**`
static STORY_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\*\*"(.+)"\*\*$"#).expect("valid regex"));

/// `| **Toplam** | **12** |`
static TOTAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(Toplam|Total)\*\*").expect("valid regex"));

static BOLD_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(\d+)\*\*").expect("valid regex"));

static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|[- ]+\|").expect("valid regex"));

static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\| Subtask").expect("valid regex"));

/// `| ⬜ Title | 3 |`
static SUBTASK_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\| ⬜ (.+?) \| (\d+) \|").expect("valid regex"));

/// `| TASK-1 | Title | 2 | Notes |`
static TASK_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\| (TASK-\d+) \| (.+?) \| (\d+) \|(.*)").expect("valid regex")
});

/// Parse a PLANNING.md document into a plan
///
/// Stories whose `STORY-<n>.<m>` prefix names an epic that has not been seen
/// yet are parsed but left out of the plan.
pub fn parse_plan(content: &str) -> Plan {
    let mut state = ParserState::default();

    for line in content.lines() {
        if state.feed(line.trim_end()).is_break() {
            break;
        }
    }

    state.plan
}

/// Where the story currently receiving descriptions and subtasks lives
#[derive(Debug)]
enum StoryCursor {
    /// Inside `plan.epics[epic].stories[story]`
    Attached { epic: usize, story: usize },
    /// No matching epic; collected and then discarded
    Orphan(Story),
}

#[derive(Debug, Default)]
struct ParserState {
    plan: Plan,
    current_epic: Option<usize>,
    current_story: Option<StoryCursor>,
    in_tasks: bool,
}

impl ParserState {
    fn feed(&mut self, line: &str) -> ControlFlow<()> {
        if SECTION_END.is_match(line) {
            debug!(line, "Reached summary section, stopping");
            return ControlFlow::Break(());
        }

        if let Some(caps) = EPIC_HEADING.captures(line) {
            self.plan.epics.push(Epic::new(&caps[1], caps[2].trim()));
            self.current_epic = Some(self.plan.epics.len() - 1);
            self.current_story = None;
            self.in_tasks = false;
            return ControlFlow::Continue(());
        }

        if self.current_story.is_none() {
            if let Some(epic) = self.current_epic_mut() {
                if let Some(caps) = EPIC_DESCRIPTION.captures(line) {
                    epic.description = caps[1].trim().to_string();
                    return ControlFlow::Continue(());
                }
            }
        }

        if TASKS_HEADING.is_match(line) {
            self.in_tasks = true;
            self.current_story = None;
            return ControlFlow::Continue(());
        }

        if self.in_tasks {
            if let Some(task) = parse_task_row(line) {
                self.plan.tasks.push(task);
            }
            return ControlFlow::Continue(());
        }

        if let Some(caps) = STORY_HEADING.captures(line) {
            let story = Story::new(&caps[1], caps[2].trim());
            self.current_story = Some(self.attach_story(story));
            return ControlFlow::Continue(());
        }

        if let Some(story) = self.current_story_mut() {
            parse_story_line(story, line);
        }

        ControlFlow::Continue(())
    }

    /// Append a story to the first epic named by its `STORY-<epic>.<n>` ID
    fn attach_story(&mut self, story: Story) -> StoryCursor {
        let epic_id = story.epic_id();
        let position = epic_id
            .as_deref()
            .and_then(|id| self.plan.epics.iter().position(|e| e.id == id));

        match position {
            Some(epic) => {
                let stories = &mut self.plan.epics[epic].stories;
                stories.push(story);
                StoryCursor::Attached {
                    epic,
                    story: stories.len() - 1,
                }
            }
            None => {
                debug!(
                    story = %story.id,
                    epic = epic_id.as_deref().unwrap_or_default(),
                    "Story has no matching epic, dropping"
                );
                StoryCursor::Orphan(story)
            }
        }
    }

    fn current_epic_mut(&mut self) -> Option<&mut Epic> {
        self.current_epic.and_then(|i| self.plan.epics.get_mut(i))
    }

    fn current_story_mut(&mut self) -> Option<&mut Story> {
        match &mut self.current_story {
            Some(StoryCursor::Attached { epic, story }) => self
                .plan
                .epics
                .get_mut(*epic)
                .and_then(|e| e.stories.get_mut(*story)),
            Some(StoryCursor::Orphan(story)) => Some(story),
            None => None,
        }
    }
}

/// Handle a line inside a story block: description, total row or subtask row
fn parse_story_line(story: &mut Story, line: &str) {
    if let Some(caps) = STORY_DESCRIPTION.captures(line) {
        story.description = caps[1].trim().to_string();
        return;
    }

    if TOTAL_MARKER.is_match(line) {
        let total = BOLD_NUMBER
            .captures_iter(line)
            .last()
            .and_then(|caps| caps[1].parse().ok());
        if let Some(points) = total {
            story.story_points = points;
        }
        return;
    }

    if TABLE_SEPARATOR.is_match(line) || TABLE_HEADER.is_match(line) {
        return;
    }

    if let Some(caps) = SUBTASK_ROW.captures(line) {
        if let Ok(story_points) = caps[2].parse() {
            story.subtasks.push(Subtask {
                title: caps[1].trim().replace('`', ""),
                story_points,
                jira_key: None,
            });
        }
    }
}

/// Parse a row of the standalone tasks table
fn parse_task_row(line: &str) -> Option<Task> {
    let caps = TASK_ROW.captures(line)?;
    let story_points = caps[3].parse().ok()?;

    let id = caps[1].trim().to_string();
    let notes = caps[4].trim();
    let notes = notes.strip_prefix('|').unwrap_or(notes);
    let notes = notes.strip_suffix('|').unwrap_or(notes).trim();

    Some(Task {
        title: format!("{}: {}", id, caps[2].trim()),
        description: if notes.is_empty() {
            String::new()
        } else {
            format!("Notes: {}", notes)
        },
        id,
        story_points,
        jira_key: None,
    })
}
