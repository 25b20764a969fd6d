pub mod calendar;
pub mod cli;
pub mod codec;
pub mod config;
pub mod ids;
pub mod logging;
pub mod models;
pub mod ordering;
pub mod repos;
pub mod repository;
pub mod schedule;
pub mod store;
pub mod utils;
pub mod views;
pub mod workspace;

pub use config::Config;
pub use models::{
    BlockColor, CalendarTask, ClockTime, Note, NoteColor, Priority, Record, RecordId, Task,
    TimeBlock,
};
pub use repos::{CalendarRepository, NoteRepository, TaskRepository, TimeBlockRepository};
pub use repository::{RepoError, Repository};
pub use store::{MemoryStore, SqliteStore, Store, StoreError};
pub use utils::Profile;
pub use views::{DashboardMetrics, MonthView};
pub use workspace::Workspace;
