//! Field discovery
//!
//! Jira instances store epic name, epic link and story points in custom
//! fields whose IDs differ per installation. These helpers list the
//! candidate fields and map them onto the configured slots.

use jiraplan_core::FieldSlots;
use tracing::debug;

use crate::tracker::{IssueTracker, JiraField};
use crate::Result;

/// Lower-cased name fragments of fields worth showing
pub const FIELD_KEYWORDS: &[&str] = &[
    "epic", "story", "point", "estimate", "sprint", "rank", "parent",
];

/// A configurable field slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    EpicName,
    EpicLink,
    StoryPoints,
}

impl FieldSlot {
    /// Guess which slot a field fills from its name
    pub fn suggest(field_name: &str) -> Option<Self> {
        let name = field_name.to_lowercase();
        if name.contains("epic name") {
            Some(FieldSlot::EpicName)
        } else if name.contains("epic link") {
            Some(FieldSlot::EpicLink)
        } else if name.contains("story point") || name.contains("estimate") {
            Some(FieldSlot::StoryPoints)
        } else {
            None
        }
    }

    /// Store a field ID in this slot
    pub fn apply(self, slots: &mut FieldSlots, field_id: &str) {
        let target = match self {
            FieldSlot::EpicName => &mut slots.epic_name,
            FieldSlot::EpicLink => &mut slots.epic_link,
            FieldSlot::StoryPoints => &mut slots.story_points,
        };
        *target = field_id.to_string();
    }

    /// Config key of this slot
    pub fn name(self) -> &'static str {
        match self {
            FieldSlot::EpicName => "epic_name",
            FieldSlot::EpicLink => "epic_link",
            FieldSlot::StoryPoints => "story_points",
        }
    }
}

/// List fields related to epics, stories and estimation, sorted by name ignoring case
pub async fn discover_fields(tracker: &dyn IssueTracker) -> Result<Vec<JiraField>> {
    let all = tracker.list_fields().await?;
    let total = all.len();

    let mut found: Vec<JiraField> = all
        .into_iter()
        .filter(|f| {
            let name = f.name.to_lowercase();
            FIELD_KEYWORDS.iter().any(|k| name.contains(k))
        })
        .collect();
    found.sort_by_key(|f| f.name.to_lowercase());

    debug!(total, matched = found.len(), "Discovered fields");
    Ok(found)
}

/// Pair each slot with the first field that looks like it
pub fn suggest_slots(fields: &[JiraField]) -> Vec<(FieldSlot, &JiraField)> {
    let mut suggestions: Vec<(FieldSlot, &JiraField)> = Vec::new();
    for field in fields {
        if let Some(slot) = FieldSlot::suggest(&field.name) {
            if !suggestions.iter().any(|(s, _)| *s == slot) {
                suggestions.push((slot, field));
            }
        }
    }
    suggestions
}
