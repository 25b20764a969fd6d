use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::calendar::WEEKDAY_LABELS;
use crate::config::Config;
use crate::models::{BlockColor, ClockTime, Priority, RecordId};
use crate::repository::RepoError;
use crate::schedule;
use crate::utils::{parse_date, today};
use crate::views::MonthView;
use crate::workspace::Workspace;

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "Tasks, calendar, time blocks and sticky notes from the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the ordered task list
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage dated calendar tasks
    #[command(subcommand)]
    Cal(CalendarCommand),
    /// Manage today's time blocks
    #[command(subcommand)]
    Block(BlockCommand),
    /// Manage sticky notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Show productivity metrics
    Dashboard {
        /// Print the metrics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or set the dark mode preference
    DarkMode {
        /// "on", "off" or "toggle"; omit to show the current value
        state: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task at the end of the list
    Add {
        text: String,
        /// High, Medium or Low
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// List tasks in order
    List,
    /// Toggle a task's completed flag
    Done { id: String },
    /// Replace a task's text
    Edit { id: String, text: String },
    /// Delete a task
    Rm { id: String },
    /// Move the task at position FROM to position TO (1-based)
    Move { from: usize, to: usize },
}

#[derive(Subcommand)]
pub enum CalendarCommand {
    /// Add a task on a day
    Add {
        title: String,
        /// Day (YYYY-MM-DD, today, tomorrow); defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Time of day (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// List tasks for one day
    Day {
        /// Day (YYYY-MM-DD, today, tomorrow); defaults to today
        date: Option<String>,
    },
    /// Show a month overview
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Delete a calendar task
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum BlockCommand {
    /// Schedule a block
    Add {
        /// Start time (HH:MM)
        time: String,
        title: String,
        /// Minutes
        #[arg(short, long)]
        duration: Option<u32>,
        /// Palette color name or hex
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Show the hourly schedule
    List,
    /// Delete a block
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Pin a new note
    Add { content: String },
    /// Replace a note's content
    Edit { id: String, content: String },
    /// Delete a note
    Rm { id: String },
    /// List notes
    List,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Repository error: {0}")]
    RepoError(#[from] RepoError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to encode output: {0}")]
    OutputError(#[from] serde_json::Error),
}

/// Dispatch one parsed command against the workspace
pub fn run(command: Commands, workspace: &mut Workspace, config: &Config) -> Result<(), CliError> {
    match command {
        Commands::Task(cmd) => handle_task(cmd, workspace, config),
        Commands::Cal(cmd) => handle_calendar(cmd, workspace, config),
        Commands::Block(cmd) => handle_block(cmd, workspace, config),
        Commands::Note(cmd) => handle_note(cmd, workspace),
        Commands::Dashboard { json } => handle_dashboard(json, workspace),
        Commands::DarkMode { state } => handle_dark_mode(state.as_deref(), workspace),
    }
}

fn parse_priority(raw: Option<&str>, config: &Config) -> Result<Priority, CliError> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e| CliError::InvalidArgument(format!("{}", e))),
        None => Ok(config.default_priority),
    }
}

fn parse_day(raw: Option<&str>) -> Result<chrono::NaiveDate, CliError> {
    match raw {
        Some(raw) => parse_date(raw)
            .ok_or_else(|| CliError::DateParseError(format!("Invalid date '{}'", raw))),
        None => Ok(today()),
    }
}

fn parse_time(raw: &str) -> Result<ClockTime, CliError> {
    raw.parse()
        .map_err(|e| CliError::InvalidArgument(format!("{}", e)))
}

fn report(changed: bool, what: &str, id: &str) {
    if changed {
        println!("{} {}", what, id);
    } else {
        println!("Nothing changed (no item with ID {})", id);
    }
}

/// Handle the task subcommands
pub fn handle_task(
    cmd: TaskCommand,
    workspace: &mut Workspace,
    config: &Config,
) -> Result<(), CliError> {
    let tasks = &mut workspace.tasks;
    match cmd {
        TaskCommand::Add { text, priority } => {
            let priority = parse_priority(priority.as_deref(), config)?;
            match tasks.add(&text, priority)? {
                Some(id) => println!("Task created successfully (ID: {})", id),
                None => println!("Task text is empty; nothing added"),
            }
        }
        TaskCommand::List => {
            for (index, task) in tasks.tasks().iter().enumerate() {
                let mark = if task.completed { "x" } else { " " };
                println!(
                    "{:>3}. [{}] {:<6} {}  ({})",
                    index + 1,
                    mark,
                    task.priority,
                    task.text,
                    task.id
                );
            }
            println!("{}/{} completed", tasks.completed_count(), tasks.tasks().len());
        }
        TaskCommand::Done { id } => {
            report(tasks.toggle(&RecordId::new(id.as_str()))?, "Toggled task", &id)
        }
        TaskCommand::Edit { id, text } => {
            report(tasks.edit(&RecordId::new(id.as_str()), &text)?, "Updated task", &id)
        }
        TaskCommand::Rm { id } => {
            report(tasks.remove(&RecordId::new(id.as_str()))?, "Deleted task", &id)
        }
        TaskCommand::Move { from, to } => {
            let (Some(source), Some(destination)) = (from.checked_sub(1), to.checked_sub(1)) else {
                return Err(CliError::InvalidArgument("positions start at 1".to_string()));
            };
            if tasks.move_task(source, Some(destination))? {
                println!("Moved task {} to position {}", from, to);
            } else {
                println!("No task at position {}", from);
            }
        }
    }
    Ok(())
}

/// Handle the calendar subcommands
pub fn handle_calendar(
    cmd: CalendarCommand,
    workspace: &mut Workspace,
    config: &Config,
) -> Result<(), CliError> {
    let calendar = &mut workspace.calendar;
    match cmd {
        CalendarCommand::Add { title, date, time, priority } => {
            let date = parse_day(date.as_deref())?;
            let time = time.as_deref().map(parse_time).transpose()?;
            let priority = parse_priority(priority.as_deref(), config)?;
            match calendar.add(&title, &date, time, priority)? {
                Some(id) => println!("Calendar task created for {} (ID: {})", date, id),
                None => println!("Title is empty; nothing added"),
            }
        }
        CalendarCommand::Day { date } => {
            let date = parse_day(date.as_deref())?;
            println!("{}", date.format("%A, %B %-d"));
            let tasks = calendar.tasks_for(&date);
            if tasks.is_empty() {
                println!("No tasks for this date");
            }
            for task in tasks {
                let time = task.time.map(|t| t.to_string()).unwrap_or_else(|| "--:--".to_string());
                println!("  {} {:<6} {}  ({})", time, task.priority, task.title, task.id);
            }
        }
        CalendarCommand::Month { year, month } => {
            let now = today();
            let year = year.unwrap_or_else(|| chrono::Datelike::year(&now));
            let month = month.unwrap_or_else(|| chrono::Datelike::month(&now));
            let view = MonthView::build(year, month, calendar.tasks(), now).ok_or_else(|| {
                CliError::InvalidArgument(format!("No such month: {}-{}", year, month))
            })?;
            println!("{}", view.title());
            for line in month_grid(&view) {
                println!("{}", line);
            }
            for cell in view.days.iter().filter(|cell| cell.total() > 0) {
                let titles: Vec<&str> = cell.preview.iter().map(|t| t.title.as_str()).collect();
                let more = if cell.overflow > 0 {
                    format!(" +{} more", cell.overflow)
                } else {
                    String::new()
                };
                let today_mark = if cell.is_today { " (today)" } else { "" };
                println!("  {}{}: {}{}", cell.date, today_mark, titles.join(", "), more);
            }
        }
        CalendarCommand::Rm { id } => report(
            calendar.remove(&RecordId::new(id.as_str()))?,
            "Deleted calendar task",
            &id,
        ),
    }
    Ok(())
}

/// Sunday-first grid of day numbers. Days with tasks carry a `*`, today is
/// bracketed.
pub fn month_grid(view: &MonthView<'_>) -> Vec<String> {
    let mut lines = vec![
        WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{:>4}", label))
            .collect::<String>(),
    ];
    let mut cells: Vec<String> = (0..view.leading_blanks).map(|_| "    ".to_string()).collect();
    for cell in &view.days {
        let day = chrono::Datelike::day(&cell.date);
        let mark = if cell.total() > 0 { "*" } else { " " };
        cells.push(if cell.is_today {
            format!("[{:>2}]", day)
        } else {
            format!(" {:>2}{}", day, mark)
        });
    }
    for week in cells.chunks(7) {
        lines.push(week.concat().trim_end().to_string());
    }
    lines
}

/// Handle the time-block subcommands
pub fn handle_block(
    cmd: BlockCommand,
    workspace: &mut Workspace,
    config: &Config,
) -> Result<(), CliError> {
    let blocks = &mut workspace.time_blocks;
    match cmd {
        BlockCommand::Add { time, title, duration, color } => {
            let time = parse_time(&time)?;
            let duration = duration.unwrap_or(config.default_block_duration);
            let color = match color {
                Some(raw) => raw
                    .parse::<BlockColor>()
                    .map_err(|e| CliError::InvalidArgument(format!("{}", e)))?,
                None => BlockColor::default(),
            };
            match blocks.add(time, &title, duration, color)? {
                Some(id) => println!("Time block scheduled at {} (ID: {})", time, id),
                None => println!("Title is empty or duration is zero; nothing added"),
            }
        }
        BlockCommand::List => {
            for bucket in blocks.buckets() {
                println!("{:>8}", bucket.label());
                for block in &bucket.blocks {
                    println!(
                        "          {} {} · {} min  ({})",
                        block.time, block.title, block.duration, block.id
                    );
                }
            }
            let outside = blocks
                .blocks()
                .iter()
                .filter(|block| schedule::bucket_of(block).is_none())
                .count();
            if outside > 0 {
                println!("{} block(s) outside 8:00 AM - 7:00 PM not shown", outside);
            }
        }
        BlockCommand::Rm { id } => {
            report(blocks.remove(&RecordId::new(id.as_str()))?, "Deleted time block", &id)
        }
    }
    Ok(())
}

/// Handle the note subcommands
pub fn handle_note(cmd: NoteCommand, workspace: &mut Workspace) -> Result<(), CliError> {
    let notes = &mut workspace.notes;
    match cmd {
        NoteCommand::Add { content } => match notes.add(&content)? {
            Some(id) => println!("Note created successfully (ID: {})", id),
            None => println!("Note is empty; nothing added"),
        },
        NoteCommand::Edit { id, content } => {
            report(notes.edit(&RecordId::new(id.as_str()), &content)?, "Updated note", &id)
        }
        NoteCommand::Rm { id } => {
            report(notes.remove(&RecordId::new(id.as_str()))?, "Deleted note", &id)
        }
        NoteCommand::List => {
            for note in notes.notes() {
                println!("[{}] {}  ({})", note.color.name(), note.content, note.id);
            }
        }
    }
    Ok(())
}

/// Handle the dashboard command
pub fn handle_dashboard(json: bool, workspace: &Workspace) -> Result<(), CliError> {
    let metrics = workspace.dashboard();
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }
    println!("Tasks completed:   {}/{}", metrics.completed_tasks, metrics.total_tasks);
    println!("Completion rate:   {}%", metrics.completion_rate);
    println!(
        "Priorities:        High {} · Medium {} · Low {}",
        metrics.priorities.high, metrics.priorities.medium, metrics.priorities.low
    );
    if metrics.priorities.unset > 0 {
        println!("Unprioritized:     {}", metrics.priorities.unset);
    }
    println!(
        "Scheduled:         {} hours across {} time blocks",
        metrics.scheduled_hours, metrics.time_blocks
    );
    println!("{} high-priority tasks need attention.", metrics.high_priority_tasks());
    Ok(())
}

/// Handle the dark-mode command
pub fn handle_dark_mode(state: Option<&str>, workspace: &Workspace) -> Result<(), CliError> {
    let enabled = match state.map(str::to_ascii_lowercase).as_deref() {
        None => workspace.dark_mode(),
        Some("on") => {
            workspace.set_dark_mode(true)?;
            true
        }
        Some("off") => {
            workspace.set_dark_mode(false)?;
            false
        }
        Some("toggle") => workspace.toggle_dark_mode()?,
        Some(other) => {
            return Err(CliError::InvalidArgument(format!(
                "Expected on, off or toggle, got '{}'",
                other
            )));
        }
    };
    println!("Dark mode: {}", if enabled { "on" } else { "off" });
    Ok(())
}
