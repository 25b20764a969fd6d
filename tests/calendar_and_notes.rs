use chrono::{NaiveDate, NaiveDateTime};
use planboard::calendar::{bucket_by_date, parse_date_key};
use planboard::models::{CALENDAR_TASKS_KEY, NOTES_KEY, NotePosition};
use planboard::{
    CalendarRepository, MemoryStore, MonthView, NoteColor, NoteRepository, Priority, Store,
};
use std::rc::Rc;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn date_times_on_the_same_day_share_a_bucket() {
    let store = Rc::new(MemoryStore::new());
    let mut repo = CalendarRepository::load(store.clone());
    let late: NaiveDateTime = "2024-03-15T23:59:00".parse().unwrap();
    let early: NaiveDateTime = "2024-03-15T00:00:01".parse().unwrap();
    repo.add("late", &late, None, Priority::Low).unwrap().unwrap();
    repo.add("early", &early, None, Priority::High).unwrap().unwrap();

    assert_eq!(repo.tasks_for(&day(2024, 3, 15)).len(), 2);
    assert!(repo.tasks_for(&day(2024, 3, 16)).is_empty());

    let buckets = bucket_by_date(repo.tasks());
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[&day(2024, 3, 15)].len(), 2);

    let raw = store.get(CALENDAR_TASKS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"date\":\"2024-03-15\""));
    assert!(!raw.contains("\"time\""));
}

#[test]
fn foreign_date_time_strings_are_normalized_on_load() {
    let raw = r#"[
        {"id":"1","title":"from iso","date":"2024-03-15T23:59:00","priority":"Medium"},
        {"id":"2","title":"plain","date":"2024-03-15","time":"9:30","priority":"Low"},
        {"id":"3","title":"broken","date":"someday","priority":"Low"}
    ]"#;
    let store = Rc::new(MemoryStore::with_entries([(CALENDAR_TASKS_KEY, raw)]));
    let repo = CalendarRepository::load(store);
    assert_eq!(repo.tasks().len(), 2);
    assert_eq!(repo.tasks_for(&parse_date_key("2024-03-15T00:00:01").unwrap()).len(), 2);
    assert_eq!(repo.tasks()[1].time.unwrap().to_string(), "09:30");
}

#[test]
fn blank_titles_are_rejected_and_reschedule_moves_buckets() {
    let store = Rc::new(MemoryStore::new());
    let mut repo = CalendarRepository::load(store.clone());
    assert_eq!(repo.add(" ", &day(2024, 1, 1), None, Priority::Low).unwrap(), None);
    assert_eq!(store.writes(), 0);

    let id = repo
        .add("dentist", &day(2024, 1, 1), Some("14:00".parse().unwrap()), Priority::Medium)
        .unwrap()
        .unwrap();
    assert!(repo.reschedule(&id, &day(2024, 1, 2), None).unwrap());
    assert!(repo.tasks_for(&day(2024, 1, 1)).is_empty());
    assert_eq!(repo.tasks_for(&day(2024, 1, 2))[0].time, None);
    assert!(repo.edit(&id, "orthodontist").unwrap());
    assert!(repo.remove(&id).unwrap());
    assert!(!repo.remove(&id).unwrap());
}

#[test]
fn month_view_lays_out_cells_and_previews() {
    let store = Rc::new(MemoryStore::new());
    let mut repo = CalendarRepository::load(store);
    for title in ["one", "two", "three", "four"] {
        repo.add(title, &day(2024, 2, 29), None, Priority::Medium).unwrap();
    }
    repo.add("other month", &day(2024, 3, 1), None, Priority::Medium).unwrap();

    let view = MonthView::build(2024, 2, repo.tasks(), day(2024, 2, 10)).unwrap();
    assert_eq!(view.title(), "February 2024");
    assert_eq!(view.days.len(), 29);
    // February 1, 2024 was a Thursday.
    assert_eq!(view.leading_blanks, 4);
    assert_eq!(view.weeks(), 5);

    let leap_day = view.day(29).unwrap();
    let preview: Vec<&str> = leap_day.preview.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(preview, vec!["one", "two"]);
    assert_eq!(leap_day.overflow, 2);
    assert_eq!(leap_day.total(), 4);
    assert!(view.day(10).unwrap().is_today);
    assert!(!leap_day.is_today);
    assert_eq!(view.days.iter().map(|c| c.total()).sum::<usize>(), 4);

    assert!(MonthView::build(2024, 13, repo.tasks(), day(2024, 2, 10)).is_none());
}

#[test]
fn notes_add_edit_remove() {
    let store = Rc::new(MemoryStore::new());
    let mut repo = NoteRepository::load(store.clone());
    assert_eq!(repo.add("   ").unwrap(), None);

    let id = repo.add("call mom").unwrap().unwrap();
    let note = repo.get(&id).unwrap();
    assert!(NoteColor::ALL.contains(&note.color));
    assert!((0.0..100.0).contains(&note.position.x));
    assert!((0.0..100.0).contains(&note.position.y));

    // Content may be emptied while editing.
    assert!(repo.edit(&id, "").unwrap());
    assert_eq!(NoteRepository::load(store.clone()).get(&id).unwrap().content, "");

    assert!(repo.remove(&id).unwrap());
    assert!(!repo.remove(&id).unwrap());
    assert_eq!(store.get(NOTES_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn notes_keep_explicit_color_and_position() {
    let store = Rc::new(MemoryStore::new());
    let mut repo = NoteRepository::load(store.clone());
    let position = NotePosition { x: 12.5, y: 80.0 };
    repo.add_with("pinned", NoteColor::Lime, position).unwrap().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&store.get(NOTES_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(raw[0]["color"], "#4ADE80");
    assert_eq!(raw[0]["position"]["x"], 12.5);
    assert!(raw[0].get("createdAt").is_some());
}
