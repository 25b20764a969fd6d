//! Typed repositories, one per schema.
//!
//! Input that would break a schema invariant (blank text, zero duration) is
//! dropped silently: `add` returns `Ok(None)` and edits return `Ok(false)`.

use chrono::{NaiveDate, Utc};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::rc::Rc;

use crate::calendar::{self, DateKey};
use crate::models::{
    BlockColor, CalendarTask, ClockTime, Note, NoteColor, NotePosition, Priority, RecordId, Task,
    TimeBlock,
};
use crate::repository::{RepoError, Repository};
use crate::schedule::{self, HourBucket};
use crate::store::Store;

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub struct TaskRepository {
    inner: Repository<Task>,
}

impl TaskRepository {
    pub fn load(store: Rc<dyn Store>) -> Self {
        Self {
            inner: Repository::load(store),
        }
    }

    pub fn reload(&mut self) {
        self.inner.reload();
    }

    /// Tasks in their manual order.
    pub fn tasks(&self) -> &[Task] {
        self.inner.records()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Task> {
        self.inner.get(id)
    }

    pub fn add(&mut self, text: &str, priority: Priority) -> Result<Option<RecordId>, RepoError> {
        if is_blank(text) {
            debug!("event=task_add status=rejected reason=blank_text");
            return Ok(None);
        }
        let id = self.inner.fresh_id();
        self.inner.insert(Task {
            id: id.clone(),
            text: text.to_string(),
            completed: false,
            priority,
            created_at: Utc::now(),
        })?;
        Ok(Some(id))
    }

    pub fn toggle(&mut self, id: &RecordId) -> Result<bool, RepoError> {
        self.inner.update(id, |task| task.completed = !task.completed)
    }

    pub fn edit(&mut self, id: &RecordId, text: &str) -> Result<bool, RepoError> {
        if is_blank(text) {
            return Ok(false);
        }
        self.inner.update(id, |task| task.text = text.to_string())
    }

    pub fn set_priority(&mut self, id: &RecordId, priority: Priority) -> Result<bool, RepoError> {
        self.inner.update(id, |task| task.priority = priority)
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<bool, RepoError> {
        self.inner.remove(id)
    }

    /// Drag-and-drop from `source` to `destination`; `None` means the drop was
    /// cancelled.
    pub fn move_task(
        &mut self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<bool, RepoError> {
        self.inner.move_item(source, destination)
    }

    pub fn reorder(&mut self, order: &[RecordId]) -> Result<(), RepoError> {
        self.inner.reorder(order)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks().iter().filter(|task| task.completed).count()
    }
}

pub struct CalendarRepository {
    inner: Repository<CalendarTask>,
}

impl CalendarRepository {
    pub fn load(store: Rc<dyn Store>) -> Self {
        Self {
            inner: Repository::load(store),
        }
    }

    pub fn reload(&mut self) {
        self.inner.reload();
    }

    pub fn tasks(&self) -> &[CalendarTask] {
        self.inner.records()
    }

    pub fn get(&self, id: &RecordId) -> Option<&CalendarTask> {
        self.inner.get(id)
    }

    pub fn add<D: DateKey + ?Sized>(
        &mut self,
        title: &str,
        date: &D,
        time: Option<ClockTime>,
        priority: Priority,
    ) -> Result<Option<RecordId>, RepoError> {
        if is_blank(title) {
            debug!("event=calendar_add status=rejected reason=blank_title");
            return Ok(None);
        }
        let id = self.inner.fresh_id();
        self.inner.insert(CalendarTask {
            id: id.clone(),
            title: title.to_string(),
            date: date.date_key(),
            time,
            priority,
        })?;
        Ok(Some(id))
    }

    pub fn edit(&mut self, id: &RecordId, title: &str) -> Result<bool, RepoError> {
        if is_blank(title) {
            return Ok(false);
        }
        self.inner.update(id, |task| task.title = title.to_string())
    }

    pub fn reschedule<D: DateKey + ?Sized>(
        &mut self,
        id: &RecordId,
        date: &D,
        time: Option<ClockTime>,
    ) -> Result<bool, RepoError> {
        let date: NaiveDate = date.date_key();
        self.inner.update(id, |task| {
            task.date = date;
            task.time = time;
        })
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<bool, RepoError> {
        self.inner.remove(id)
    }

    pub fn tasks_for<D: DateKey + ?Sized>(&self, day: &D) -> Vec<&CalendarTask> {
        calendar::tasks_for_date(self.tasks(), day)
    }
}

pub struct TimeBlockRepository {
    inner: Repository<TimeBlock>,
}

impl TimeBlockRepository {
    pub fn load(store: Rc<dyn Store>) -> Self {
        Self {
            inner: Repository::load(store),
        }
    }

    pub fn reload(&mut self) {
        self.inner.reload();
    }

    /// Blocks in start-time order.
    pub fn blocks(&self) -> &[TimeBlock] {
        self.inner.records()
    }

    pub fn get(&self, id: &RecordId) -> Option<&TimeBlock> {
        self.inner.get(id)
    }

    /// Schedule a block; the collection is re-sorted by start time afterwards.
    pub fn add(
        &mut self,
        time: ClockTime,
        title: &str,
        duration: u32,
        color: BlockColor,
    ) -> Result<Option<RecordId>, RepoError> {
        if is_blank(title) || duration == 0 {
            debug!("event=time_block_add status=rejected duration={duration}");
            return Ok(None);
        }
        let id = self.inner.fresh_id();
        let block = TimeBlock {
            id: id.clone(),
            time,
            title: title.to_string(),
            duration,
            color,
        };
        self.inner.insert_arranged(block, schedule::sort_chronologically)?;
        Ok(Some(id))
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<bool, RepoError> {
        self.inner.remove(id)
    }

    pub fn buckets(&self) -> Vec<HourBucket<'_>> {
        schedule::hour_buckets(self.blocks())
    }

    pub fn total_minutes(&self) -> u64 {
        schedule::total_minutes(self.blocks())
    }
}

pub struct NoteRepository {
    inner: Repository<Note>,
}

impl NoteRepository {
    pub fn load(store: Rc<dyn Store>) -> Self {
        Self {
            inner: Repository::load(store),
        }
    }

    pub fn reload(&mut self) {
        self.inner.reload();
    }

    pub fn notes(&self) -> &[Note] {
        self.inner.records()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Note> {
        self.inner.get(id)
    }

    /// Pin a new note with a random palette color and placement.
    pub fn add(&mut self, content: &str) -> Result<Option<RecordId>, RepoError> {
        let mut rng = rand::thread_rng();
        let color = NoteColor::DRAW.choose(&mut rng).copied().unwrap_or_default();
        let position = NotePosition {
            x: rng.gen_range(0.0..100.0),
            y: rng.gen_range(0.0..100.0),
        };
        self.add_with(content, color, position)
    }

    pub fn add_with(
        &mut self,
        content: &str,
        color: NoteColor,
        position: NotePosition,
    ) -> Result<Option<RecordId>, RepoError> {
        if is_blank(content) {
            debug!("event=note_add status=rejected reason=blank_content");
            return Ok(None);
        }
        let id = self.inner.fresh_id();
        self.inner.insert(Note {
            id: id.clone(),
            content: content.to_string(),
            color,
            position,
            created_at: Utc::now(),
        })?;
        Ok(Some(id))
    }

    /// Replace the note text. Unlike `add`, empty content is allowed while editing.
    pub fn edit(&mut self, id: &RecordId, content: &str) -> Result<bool, RepoError> {
        self.inner.update(id, |note| note.content = content.to_string())
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<bool, RepoError> {
        self.inner.remove(id)
    }
}
