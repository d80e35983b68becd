//! Recurring compliance maintenance cycles.
//!
//! A cycle is a checklist (sections of tasks) with a repeat frequency and the
//! date window of its active period. Behavior lives in [`crate::core::rollover`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a cycle repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "quarterly")]
    Quarterly,
    #[serde(rename = "biannual")]
    Biannual,
    #[serde(rename = "annual")]
    Annual,
    #[serde(rename = "5yearly")]
    FiveYearly,
    #[serde(rename = "10yearly")]
    TenYearly,
}

impl Frequency {
    pub const ALL: [Self; 7] = [
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Biannual,
        Self::Annual,
        Self::FiveYearly,
        Self::TenYearly,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Biannual => "Biannual",
            Self::Annual => "Annual",
            Self::FiveYearly => "5-Yearly",
            Self::TenYearly => "10-Yearly",
        }
    }

    /// Length of one period in calendar months, `None` for weekly cycles.
    #[must_use]
    pub const fn months(self) -> Option<u32> {
        match self {
            Self::Weekly => None,
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Biannual => Some(6),
            Self::Annual => Some(12),
            Self::FiveYearly => Some(60),
            Self::TenYearly => Some(120),
        }
    }
}

/// One checklist item.
///
/// `completed_by` and `completed_at` are present exactly when `completed` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Display name of whoever ticked the task off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A titled group of tasks within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tasks: Vec<Task>,
}

impl Section {
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// A recurring maintenance checklist and its active period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceCycle {
    pub id: String,
    pub name: String,
    pub frequency: Frequency,
    /// Regulatory reference, purely informational
    #[serde(default, rename = "moeReference", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub current_cycle_start: DateTime<Utc>,
    pub current_cycle_end: DateTime<Utc>,
    /// Starts at 1, increases by exactly one per rollover
    pub cycle_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rollover: Option<DateTime<Utc>>,
    pub sections: Vec<Section>,
}

impl MaintenanceCycle {
    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.sections.iter().map(|s| s.tasks.len()).sum()
    }

    #[must_use]
    pub fn completed_tasks(&self) -> usize {
        self.sections.iter().map(Section::completed_count).sum()
    }

    /// Mutable lookup of a task by section and task id.
    pub fn task_mut(&mut self, section_id: &str, task_id: &str) -> Option<&mut Task> {
        self.sections
            .iter_mut()
            .find(|s| s.id == section_id)?
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
    }
}
