//! Issue creation from plan
//!
//! Issues are created strictly one after another in four phases: epics,
//! stories, subtasks, then standalone tasks. Keys returned by Jira are
//! written back into the plan so later phases can link to them.

use std::time::Duration;

use jiraplan_core::{Config, Epic, IssueTypes, Plan, Story, Task};
use tracing::debug;

use crate::log::ImportLog;
use crate::tracker::{IssueOptions, IssueTracker};
use crate::Result;

/// Placeholder keys assigned during a dry run
const DRY_EPIC_KEY: &str = "DRY-EPIC";
const DRY_STORY_KEY: &str = "DRY-STORY";
const DRY_SUBTASK_KEY: &str = "DRY-SUB";
const DRY_TASK_KEY: &str = "DRY-TASK";

/// Default pause after each created issue
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(300);

/// Options for importing a plan
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Log and assign placeholder keys without calling Jira
    pub dry_run: bool,
    /// Issue type names to create
    pub issue_types: IssueTypes,
    /// Pause after each successfully created issue
    pub throttle: Duration,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            issue_types: IssueTypes::default(),
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl ImportOptions {
    /// Options using the issue types and request delay from a config
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            dry_run,
            issue_types: config.issue_types.clone(),
            throttle: config.jira.request_delay,
        }
    }
}

/// Create every item of a plan as a Jira issue
///
/// Failures never abort the run except for the initial connection check;
/// everything that happened is reported in the returned log.
pub async fn import_plan(
    plan: &mut Plan,
    tracker: &dyn IssueTracker,
    options: &ImportOptions,
) -> ImportLog {
    let mut importer = Importer {
        tracker,
        options,
        log: ImportLog::new(),
    };

    if !options.dry_run && !importer.check_connection().await {
        return importer.log;
    }

    importer.log.info("── Phase 1/4: Epics ──");
    for epic in &mut plan.epics {
        importer.create_epic(epic).await;
    }

    importer.log.info("── Phase 2/4: Stories ──");
    for epic in &mut plan.epics {
        let epic_key = epic.jira_key.clone();
        for story in &mut epic.stories {
            importer.create_story(story, epic_key.as_deref()).await;
        }
    }

    importer.log.info("── Phase 3/4: Subtasks ──");
    for story in plan.epics.iter_mut().flat_map(|e| e.stories.iter_mut()) {
        importer.create_subtasks(story).await;
    }

    importer.log.info("── Phase 4/4: Tasks ──");
    for task in &mut plan.tasks {
        importer.create_task(task).await;
    }

    let total = plan.counts().total;
    let errors = importer.log.error_count();
    importer.log.info(format!(
        "── Done: {} issues{}, {} errors ──",
        total,
        if options.dry_run { " (dry run)" } else { "" },
        errors
    ));

    importer.log
}

struct Importer<'a> {
    tracker: &'a dyn IssueTracker,
    options: &'a ImportOptions,
    log: ImportLog,
}

impl Importer<'_> {
    async fn check_connection(&mut self) -> bool {
        self.log.info("Testing connection...");
        match self.tracker.who_am_i().await {
            Ok(me) => {
                self.log.ok(format!("Connected as: {}", me.display_name));
                true
            }
            Err(e) => {
                self.log.err(format!("Connection failed: {}", e));
                false
            }
        }
    }

    /// Create one issue, pausing afterwards if it succeeded
    async fn create(
        &self,
        issue_type: &str,
        summary: &str,
        options: IssueOptions,
    ) -> Result<String> {
        let created = self
            .tracker
            .create_issue(issue_type, summary, &options)
            .await?;

        debug!(key = %created.key, issue_type, "Issue created");
        if !self.options.throttle.is_zero() {
            tokio::time::sleep(self.options.throttle).await;
        }

        Ok(created.key)
    }

    async fn create_epic(&mut self, epic: &mut Epic) {
        let summary = format!("{}: {}", epic.id, epic.title);

        if self.options.dry_run {
            self.log.dry(format!("[Epic] {}", summary));
            epic.jira_key = Some(DRY_EPIC_KEY.to_string());
            return;
        }

        let options = IssueOptions {
            description: Some(epic.description.clone()),
            epic_name: Some(summary.clone()),
            ..Default::default()
        };

        match self
            .create(&self.options.issue_types.epic, &summary, options)
            .await
        {
            Ok(key) => {
                self.log
                    .ok(format!("Epic -> {}  [{}] {}", key, epic.id, epic.title));
                epic.jira_key = Some(key);
            }
            Err(e) => self.log.err(format!("Epic failed [{}]: {}", epic.id, e)),
        }
    }

    async fn create_story(&mut self, story: &mut Story, epic_key: Option<&str>) {
        let summary = format!("{}: {}", story.id, story.title);

        if self.options.dry_run {
            self.log.dry(format!(
                "  [Story] {} ({}SP)  epic={}",
                summary,
                story.story_points,
                epic_key.unwrap_or_default()
            ));
            story.jira_key = Some(DRY_STORY_KEY.to_string());
            return;
        }

        let options = IssueOptions {
            description: Some(story.description.clone()),
            story_points: Some(story.story_points),
            epic_key: epic_key.map(str::to_string),
            ..Default::default()
        };

        match self
            .create(&self.options.issue_types.story, &summary, options)
            .await
        {
            Ok(key) => {
                self.log
                    .ok(format!("Story -> {}  [{}] {}", key, story.id, story.title));
                story.jira_key = Some(key);
            }
            Err(e) => self.log.err(format!("Story failed [{}]: {}", story.id, e)),
        }
    }

    async fn create_subtasks(&mut self, story: &mut Story) {
        let parent_key = story.jira_key.clone();

        for subtask in &mut story.subtasks {
            if self.options.dry_run {
                self.log.dry(format!(
                    "    [Subtask] {} ({}SP)  parent={}",
                    subtask.title,
                    subtask.story_points,
                    parent_key.as_deref().unwrap_or_default()
                ));
                subtask.jira_key = Some(DRY_SUBTASK_KEY.to_string());
                continue;
            }

            let Some(parent) = parent_key.as_deref() else {
                self.log.skip(format!(
                    "    Skipped subtask (no parent key): {}",
                    subtask.title
                ));
                continue;
            };

            let options = IssueOptions {
                story_points: Some(subtask.story_points),
                parent_key: Some(parent.to_string()),
                ..Default::default()
            };

            match self
                .create(&self.options.issue_types.subtask, &subtask.title, options)
                .await
            {
                Ok(key) => {
                    self.log
                        .ok(format!("  Subtask -> {}  {}", key, subtask.title));
                    subtask.jira_key = Some(key);
                }
                Err(e) => self
                    .log
                    .err(format!("  Subtask failed [{}]: {}", subtask.title, e)),
            }
        }
    }

    async fn create_task(&mut self, task: &mut Task) {
        if self.options.dry_run {
            self.log
                .dry(format!("[Task] {} ({}SP)", task.title, task.story_points));
            task.jira_key = Some(DRY_TASK_KEY.to_string());
            return;
        }

        let options = IssueOptions {
            description: Some(task.description.clone()),
            story_points: Some(task.story_points),
            ..Default::default()
        };

        match self
            .create(&self.options.issue_types.task, &task.title, options)
            .await
        {
            Ok(key) => {
                self.log.ok(format!("Task -> {}  {}", key, task.title));
                task.jira_key = Some(key);
            }
            Err(e) => self.log.err(format!("Task failed [{}]: {}", task.id, e)),
        }
    }
}
