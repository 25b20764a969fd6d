use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TASKS_KEY: &str = "tasks";
pub const CALENDAR_TASKS_KEY: &str = "calendarTasks";
pub const TIME_BLOCKS_KEY: &str = "timeBlocks";
pub const NOTES_KEY: &str = "notes";
pub const DARK_MODE_KEY: &str = "darkMode";

/// A schema persisted as one JSON array under its own store key.
///
/// Producers and consumers of a key share the same `Record` type, so the
/// dashboard reads exactly the shape the task list writes.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Store key holding the whole collection.
    const KEY: &'static str;
    /// Schema version of the record shape.
    const VERSION: u32 = 1;

    fn id(&self) -> &RecordId;
}

/// Opaque record identifier, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown priority: {0} (expected High, Medium or Low)")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPriority(s.to_string()))
    }
}

/// Wall-clock time of day with minute precision.
///
/// Always written as zero-padded `HH:MM`, so the persisted strings sort the
/// same way the values do. Parsing accepts `9:05` and a trailing `:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid clock time '{0}' (expected HH:MM)")]
pub struct ParseClockTimeError(pub String);

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());
        let mut parts = s.trim().split(':');
        let mut field = |max_len: usize| -> Result<u8, ParseClockTimeError> {
            let part = parts.next().ok_or_else(err)?;
            let digits = part.bytes().all(|b| b.is_ascii_digit());
            if part.is_empty() || part.len() > max_len || !digits {
                return Err(err());
            }
            part.parse().map_err(|_| err())
        };
        let hour = field(2)?;
        let minute = field(2)?;
        // Seconds are accepted from `<input type="time" step>` style values and dropped.
        if let Some(seconds) = parts.next() {
            if seconds.len() != 2 || !seconds.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
        }
        if parts.next().is_some() {
            return Err(err());
        }
        ClockTime::new(hour, minute).ok_or_else(err)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown color: {0}")]
pub struct UnknownColor(pub String);

/// Time-block palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BlockColor {
    #[default]
    Blue,
    Red,
    Green,
    Amber,
    Violet,
    Pink,
    Teal,
    Orange,
}

impl BlockColor {
    pub const ALL: [BlockColor; 8] = [
        BlockColor::Blue,
        BlockColor::Red,
        BlockColor::Green,
        BlockColor::Amber,
        BlockColor::Violet,
        BlockColor::Pink,
        BlockColor::Teal,
        BlockColor::Orange,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            BlockColor::Blue => "#3B82F6",
            BlockColor::Red => "#EF4444",
            BlockColor::Green => "#10B981",
            BlockColor::Amber => "#F59E0B",
            BlockColor::Violet => "#8B5CF6",
            BlockColor::Pink => "#EC4899",
            BlockColor::Teal => "#14B8A6",
            BlockColor::Orange => "#F97316",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockColor::Blue => "blue",
            BlockColor::Red => "red",
            BlockColor::Green => "green",
            BlockColor::Amber => "amber",
            BlockColor::Violet => "violet",
            BlockColor::Pink => "pink",
            BlockColor::Teal => "teal",
            BlockColor::Orange => "orange",
        }
    }
}

impl FromStr for BlockColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BlockColor::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for BlockColor {
    type Error = UnknownColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BlockColor> for String {
    fn from(color: BlockColor) -> Self {
        color.hex().to_string()
    }
}

/// Sticky-note palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NoteColor {
    #[default]
    Yellow,
    Red,
    Green,
    Blue,
    Purple,
    Rose,
    Lime,
}

impl NoteColor {
    pub const ALL: [NoteColor; 7] = [
        NoteColor::Yellow,
        NoteColor::Red,
        NoteColor::Green,
        NoteColor::Blue,
        NoteColor::Purple,
        NoteColor::Rose,
        NoteColor::Lime,
    ];

    /// Slots a new note's color is drawn from. Yellow fills two of them.
    pub const DRAW: [NoteColor; 8] = [
        NoteColor::Yellow,
        NoteColor::Red,
        NoteColor::Green,
        NoteColor::Blue,
        NoteColor::Purple,
        NoteColor::Rose,
        NoteColor::Lime,
        NoteColor::Yellow,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            NoteColor::Yellow => "#FBBF24",
            NoteColor::Red => "#F87171",
            NoteColor::Green => "#34D399",
            NoteColor::Blue => "#60A5FA",
            NoteColor::Purple => "#A78BFA",
            NoteColor::Rose => "#FB7185",
            NoteColor::Lime => "#4ADE80",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NoteColor::Yellow => "yellow",
            NoteColor::Red => "red",
            NoteColor::Green => "green",
            NoteColor::Blue => "blue",
            NoteColor::Purple => "purple",
            NoteColor::Rose => "rose",
            NoteColor::Lime => "lime",
        }
    }
}

impl FromStr for NoteColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NoteColor::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for NoteColor {
    type Error = UnknownColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteColor> for String {
    fn from(color: NoteColor) -> Self {
        color.hex().to_string()
    }
}

/// Cosmetic placement of a sticky note, both axes in `[0, 100)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NotePosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Record for Task {
    const KEY: &'static str = TASKS_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarTask {
    pub id: RecordId,
    pub title: String,
    #[serde(with = "date_key_format")]
    pub date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_time"
    )]
    pub time: Option<ClockTime>,
    pub priority: Priority,
}

impl Record for CalendarTask {
    const KEY: &'static str = CALENDAR_TASKS_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: RecordId,
    pub time: ClockTime,
    pub title: String,
    /// Length in minutes.
    pub duration: u32,
    #[serde(default, deserialize_with = "palette_or_default")]
    pub color: BlockColor,
}

impl Record for TimeBlock {
    const KEY: &'static str = TIME_BLOCKS_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "palette_or_default")]
    pub color: NoteColor,
    #[serde(default)]
    pub position: NotePosition,
    pub created_at: DateTime<Utc>,
}

impl Record for Note {
    const KEY: &'static str = NOTES_KEY;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// `date` is written as `YYYY-MM-DD` but read from any date or date-time string.
mod date_key_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::calendar::parse_date_key(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }
}

fn deserialize_optional_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ClockTime>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Off-palette or non-string colors read as the palette default.
fn palette_or_default<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: FromStr + Default,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|color| color.parse().ok())
        .unwrap_or_default())
}
