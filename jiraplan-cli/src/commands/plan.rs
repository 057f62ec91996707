//! Plan commands: preview a planning document and create its issues

use clap::Args;
use jiraplan_core::{parse_plan, Config, Plan, Secrets};
use jiraplan_jira::{import_plan, ImportLog, ImportOptions, JiraClient, LogStatus, OfflineTracker};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Parse a planning document and show what it contains
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Path to plan file
    #[arg(short, long, default_value = "PLANNING.md")]
    pub file: PathBuf,

    /// Print the parsed plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create Jira issues for every item in a planning document
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to plan file
    #[arg(short, long, default_value = "PLANNING.md")]
    pub file: PathBuf,

    /// Log what would be created without calling Jira
    #[arg(long)]
    pub dry_run: bool,

    /// Print the annotated plan and the log as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CreateReport<'a> {
    plan: &'a Plan,
    log: &'a ImportLog,
}

impl ParseArgs {
    /// Execute the parse command
    pub fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        let plan = read_plan(&self.file)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            return Ok(());
        }

        print_counts(&self.file, &plan);
        println!();
        print_tree(&plan, verbose);
        Ok(())
    }
}

impl CreateArgs {
    /// Execute the create command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut plan = read_plan(&self.file)?;

        if !self.json {
            print_counts(&self.file, &plan);
            println!();
        }

        let options = ImportOptions::from_config(config, self.dry_run);

        let log = if self.dry_run {
            import_plan(&mut plan, &OfflineTracker, &options).await
        } else {
            let credentials = Secrets::load()?.credentials(config.jira.auth_method)?;
            let client = JiraClient::new(config.clone(), credentials)?;
            if !self.json {
                println!(
                    "Creating issues in project {} at {}...",
                    config.jira.project_key, config.jira.base_url
                );
                println!();
            }
            import_plan(&mut plan, &client, &options).await
        };

        if self.json {
            let report = CreateReport {
                plan: &plan,
                log: &log,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_log(&log);
        }

        if log.error_count() > 0 {
            anyhow::bail!("{} issue(s) failed", log.error_count());
        }

        Ok(())
    }
}

fn read_plan(file: &Path) -> anyhow::Result<Plan> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let plan = parse_plan(&content);
    tracing::debug!(
        file = %file.display(),
        epics = plan.epics.len(),
        tasks = plan.tasks.len(),
        "Parsed plan"
    );
    Ok(plan)
}

fn print_counts(file: &Path, plan: &Plan) {
    let counts = plan.counts();
    println!(
        "Parsed {}: {} epics, {} stories, {} subtasks, {} tasks ({} total)",
        file.display(),
        counts.epics,
        counts.stories,
        counts.subtasks,
        counts.tasks,
        counts.total
    );
}

fn print_tree(plan: &Plan, verbose: bool) {
    for epic in &plan.epics {
        println!("🟣 {} · {}", epic.id, epic.title);
        if verbose && !epic.description.is_empty() {
            println!("   {}", epic.description);
        }

        for story in &epic.stories {
            println!("  🔵 {} · {} ({}SP)", story.id, story.title, story.story_points);
            if verbose && !story.description.is_empty() {
                println!("     \"{}\"", story.description);
            }
            for sub in &story.subtasks {
                println!("      ⬜ {} ({}SP)", sub.title, sub.story_points);
            }
        }
        println!();
    }

    if !plan.tasks.is_empty() {
        println!("🟡 Tasks ({})", plan.tasks.len());
        for task in &plan.tasks {
            println!("  {} ({}SP)", task.title, task.story_points);
            if verbose && !task.description.is_empty() {
                println!("     {}", task.description);
            }
        }
    }
}

fn print_log(log: &ImportLog) {
    for entry in log {
        let icon = match entry.status {
            LogStatus::Ok => "✅",
            LogStatus::Err => "❌",
            LogStatus::Skip => "⏭️",
            LogStatus::Dry => "📝",
            LogStatus::Info => "  ",
        };
        println!("{} {:<4} {}", icon, entry.status.tag(), entry.message);
    }
}
