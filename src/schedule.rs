//! Time-block placement on the day schedule.
//!
//! Blocks are shown in twelve hourly buckets from 08:00 to 19:00. A block
//! belongs to the bucket of its start hour only; its duration never spills it
//! into later buckets. Overlapping blocks are allowed.

use crate::models::TimeBlock;

pub const FIRST_BUCKET_HOUR: u8 = 8;
pub const BUCKET_COUNT: u8 = 12;

/// One display row of the schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBucket<'a> {
    pub hour: u8,
    pub blocks: Vec<&'a TimeBlock>,
}

impl HourBucket<'_> {
    pub fn label(&self) -> String {
        hour_label(self.hour)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub fn bucket_hours() -> impl Iterator<Item = u8> {
    FIRST_BUCKET_HOUR..FIRST_BUCKET_HOUR + BUCKET_COUNT
}

/// Stable sort by start time; blocks starting at the same minute keep their
/// insertion order.
pub fn sort_chronologically(blocks: &mut [TimeBlock]) {
    blocks.sort_by_key(|block| block.time);
}

/// Display bucket for `block`, or `None` when it starts outside 08:00-19:59.
pub fn bucket_of(block: &TimeBlock) -> Option<u8> {
    let hour = block.time.hour();
    bucket_hours().any(|h| h == hour).then_some(hour)
}

pub fn blocks_for_hour(blocks: &[TimeBlock], hour: u8) -> Vec<&TimeBlock> {
    blocks.iter().filter(|block| block.time.hour() == hour).collect()
}

pub fn hour_buckets(blocks: &[TimeBlock]) -> Vec<HourBucket<'_>> {
    bucket_hours()
        .map(|hour| HourBucket {
            hour,
            blocks: blocks_for_hour(blocks, hour),
        })
        .collect()
}

/// Twelve-hour label for a bucket row, e.g. `8:00 AM` or `12:00 PM`.
pub fn hour_label(hour: u8) -> String {
    match hour {
        0 => "12:00 AM".to_string(),
        1..=11 => format!("{hour}:00 AM"),
        12 => "12:00 PM".to_string(),
        _ => format!("{}:00 PM", hour - 12),
    }
}

pub fn total_minutes(blocks: &[TimeBlock]) -> u64 {
    blocks.iter().map(|block| u64::from(block.duration)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockColor, ClockTime, RecordId};

    fn block(id: &str, time: &str, duration: u32) -> TimeBlock {
        TimeBlock {
            id: RecordId::from(id),
            time: time.parse::<ClockTime>().unwrap(),
            title: format!("block {id}"),
            duration,
            color: BlockColor::default(),
        }
    }

    #[test]
    fn sorts_mixed_padding_chronologically() {
        let mut blocks = vec![
            block("a", "14:00", 60),
            block("b", "9:30", 30),
            block("c", "09:00", 60),
        ];
        sort_chronologically(&mut blocks);
        let times: Vec<String> = blocks.iter().map(|b| b.time.to_string()).collect();
        assert_eq!(times, vec!["09:00", "09:30", "14:00"]);
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let mut blocks = vec![block("first", "10:00", 30), block("second", "10:00", 30)];
        sort_chronologically(&mut blocks);
        assert_eq!(blocks[0].id.as_str(), "first");
    }

    #[test]
    fn duration_never_spills_into_later_buckets() {
        let blocks = vec![block("long", "08:50", 90)];
        let buckets = hour_buckets(&blocks);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].hour, 8);
        assert_eq!(buckets[0].blocks.len(), 1);
        assert!(buckets[1..].iter().all(HourBucket::is_empty));
    }

    #[test]
    fn blocks_outside_working_hours_have_no_bucket() {
        assert_eq!(bucket_of(&block("early", "07:59", 30)), None);
        assert_eq!(bucket_of(&block("late", "20:00", 30)), None);
        assert_eq!(bucket_of(&block("last", "19:45", 30)), Some(19));
    }

    #[test]
    fn labels() {
        assert_eq!(hour_label(8), "8:00 AM");
        assert_eq!(hour_label(12), "12:00 PM");
        assert_eq!(hour_label(19), "7:00 PM");
        assert_eq!(hour_label(0), "12:00 AM");
    }

    #[test]
    fn minutes_add_up() {
        let blocks = vec![block("a", "09:00", 60), block("b", "10:00", 90)];
        assert_eq!(total_minutes(&blocks), 150);
        assert_eq!(total_minutes(&[]), 0);
    }
}
