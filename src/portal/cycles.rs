//! Cycle operations: ticking off tasks and rolling cycles over.
//!
//! Both are reserved to property managers and administrators. Neither runs on
//! a schedule; the caller decides when a period is closed.

use super::Portal;
use crate::{
    core::rollover::{self, RolloverResult},
    errors::Result,
    models::{MaintenanceCycle, Role, Task},
    storage::BlobStore,
};
use chrono::Utc;
use tracing::{info, instrument};

impl<S: BlobStore> Portal<S> {
    #[must_use]
    pub fn cycle(&self, cycle_id: &str) -> Option<&MaintenanceCycle> {
        self.cycles.iter().find(|c| c.id == cycle_id)
    }

    /// Flips a task's completion, stamping the logged-in user's name when it
    /// becomes complete. Unknown ids are a no-op returning `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn toggle_task(
        &mut self,
        cycle_id: &str,
        section_id: &str,
        task_id: &str,
    ) -> Result<Option<Task>> {
        let actor_name = self
            .require_role(Role::can_manage_cycles, "update cycle tasks")?
            .name
            .clone();

        let now = Utc::now();
        let Some(cycle) = self.cycles.iter_mut().find(|c| c.id == cycle_id) else {
            return Ok(None);
        };
        if rollover::toggle_task(cycle, section_id, task_id, &actor_name, now).is_none() {
            return Ok(None);
        }
        let task = cycle.task_mut(section_id, task_id).cloned();

        info!("Task '{}' in cycle '{}' toggled", task_id, cycle_id);
        self.persist_cycles().await;
        Ok(task)
    }

    /// Closes the cycle's current period and opens the next one from now.
    #[instrument(skip(self))]
    pub async fn rollover_cycle(&mut self, cycle_id: &str) -> Result<Option<RolloverResult>> {
        self.require_role(Role::can_manage_cycles, "roll over cycles")?;

        let Some(cycle) = self.cycles.iter_mut().find(|c| c.id == cycle_id) else {
            return Ok(None);
        };
        let result = rollover::rollover(cycle, Utc::now());

        info!(
            "Cycle '{}' rolled over to period {} ({}/{} tasks were complete)",
            result.cycle_name, result.cycle_number, result.tasks_completed, result.total_tasks
        );
        self.persist_cycles().await;
        Ok(Some(result))
    }
}
