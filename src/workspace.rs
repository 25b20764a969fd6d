use log::info;
use std::rc::Rc;

use crate::codec;
use crate::models::DARK_MODE_KEY;
use crate::repos::{CalendarRepository, NoteRepository, TaskRepository, TimeBlockRepository};
use crate::repository::RepoError;
use crate::store::Store;
use crate::views::DashboardMetrics;

/// Every repository of the board, opened over one shared store.
pub struct Workspace {
    store: Rc<dyn Store>,
    pub tasks: TaskRepository,
    pub calendar: CalendarRepository,
    pub time_blocks: TimeBlockRepository,
    pub notes: NoteRepository,
}

impl Workspace {
    pub fn open(store: Rc<dyn Store>) -> Self {
        let workspace = Self {
            tasks: TaskRepository::load(Rc::clone(&store)),
            calendar: CalendarRepository::load(Rc::clone(&store)),
            time_blocks: TimeBlockRepository::load(Rc::clone(&store)),
            notes: NoteRepository::load(Rc::clone(&store)),
            store,
        };
        info!(
            "event=workspace_open tasks={} calendar_tasks={} time_blocks={} notes={}",
            workspace.tasks.tasks().len(),
            workspace.calendar.tasks().len(),
            workspace.time_blocks.blocks().len(),
            workspace.notes.notes().len()
        );
        workspace
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Dashboard figures as currently persisted.
    pub fn dashboard(&self) -> DashboardMetrics {
        DashboardMetrics::from_store(self.store.as_ref())
    }

    /// Absent or unreadable values mean light mode.
    pub fn dark_mode(&self) -> bool {
        let raw = self.store.get(DARK_MODE_KEY).ok().flatten();
        codec::decode_value(raw.as_deref()).unwrap_or(false)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), RepoError> {
        self.store
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })?;
        Ok(())
    }

    pub fn toggle_dark_mode(&self) -> Result<bool, RepoError> {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}
