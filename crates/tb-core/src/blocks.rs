//! Block generation.
//!
//! A day is tiled into `MINUTES_PER_DAY / duration` contiguous blocks starting
//! at local midnight. Generation runs in two passes:
//!
//! 1. Direct mapping: each block takes the first entry (in list order) whose
//!    start time falls inside `[start, end)`.
//! 2. Continuation: walking forward, every elapsed block without an entry
//!    inherits the most recent entry seen earlier that day. Current and future
//!    blocks are never filled.
//!
//! `now` is supplied by the caller so every block of one call agrees on it.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::category::CategorySelection;
use crate::entry::{TimeEntry, resolve_selections};
use crate::types::BlockDuration;

/// One fixed-size slice of a day. Derived on every call, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock<'a> {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// The block's own entry, or one inherited by continuation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<&'a TimeEntry>,

    /// `now` lies in `[start_time, end_time)`.
    pub is_current: bool,

    /// The block ended before `now`.
    pub is_past: bool,

    /// The entry was inherited from an earlier block.
    pub is_continued: bool,
}

impl<'a> TimeBlock<'a> {
    /// The entry logged directly in this block, ignoring continuation.
    pub const fn own_entry(&self) -> Option<&'a TimeEntry> {
        if self.is_continued { None } else { self.entry }
    }

    /// Resolved selections of the block's entry, own or inherited.
    pub fn selections(&self) -> &'a [CategorySelection] {
        match self.entry {
            Some(entry) => resolve_selections(entry),
            None => &[],
        }
    }

    /// Only blocks that have started can be logged.
    pub const fn is_loggable(&self) -> bool {
        self.is_current || self.is_past
    }
}

/// The instant a calendar day begins in `tz`.
///
/// Ambiguous midnights resolve to the earlier instant. When midnight falls in
/// a DST gap, 01:00 local is used instead.
///
/// Blocks always span `MINUTES_PER_DAY` from this instant. On a 23-hour day
/// the last hour of blocks overlaps the next day's first; on a 25-hour day
/// the last local hour falls between the day's blocks and the next day's.
pub fn day_start<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let local = |hour| {
        day.and_hms_opt(hour, 0, 0)
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
    };
    local(0).or_else(|| local(1)).map_or_else(
        || day.and_time(NaiveTime::MIN).and_utc(),
        |start| start.with_timezone(&Utc),
    )
}

/// Generates the blocks of `day` with continuation applied.
///
/// `entries` may include entries from other days; only those starting inside a
/// block are mapped. When several entries start in the same block the first in
/// list order wins.
pub fn generate_blocks<'a, Tz: TimeZone>(
    day: NaiveDate,
    tz: &Tz,
    duration: BlockDuration,
    entries: &'a [TimeEntry],
    now: DateTime<Utc>,
) -> Vec<TimeBlock<'a>> {
    let start_of_day = day_start(day, tz);
    let step = duration.as_duration();

    let mut blocks: Vec<TimeBlock<'a>> = (0..duration.blocks_per_day())
        .map(|index| {
            let start_time =
                start_of_day + Duration::minutes(i64::from(index * duration.minutes()));
            let end_time = start_time + step;
            TimeBlock {
                start_time,
                end_time,
                entry: entries
                    .iter()
                    .find(|entry| entry.starts_within(start_time, end_time)),
                is_current: start_time <= now && now < end_time,
                is_past: end_time < now,
                is_continued: false,
            }
        })
        .collect();

    continue_entries(&mut blocks);

    tracing::trace!(
        %day,
        blocks = blocks.len(),
        logged = blocks.iter().filter(|b| b.own_entry().is_some()).count(),
        "generated day blocks"
    );
    blocks
}

/// Fills elapsed, unlogged blocks with the most recent earlier entry.
///
/// Blocks must be in chronological order. State never crosses the slice, so
/// the first blocks of a day stay empty until something is logged.
pub fn continue_entries(blocks: &mut [TimeBlock<'_>]) {
    let mut last_entry = None;
    for block in blocks {
        if block.entry.is_some() {
            last_entry = block.entry;
        } else if block.is_past {
            if let Some(entry) = last_entry {
                block.entry = Some(entry);
                block.is_continued = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::FixedOffset;

    use crate::entry::CategoryTags;
    use crate::types::{CategoryId, EntryId, UserId};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        day().and_hms_opt(hour, minute, 0).unwrap().and_utc()
    }

    fn entry(id: &str, start: DateTime<Utc>) -> TimeEntry {
        TimeEntry::new(
            EntryId::new(id).unwrap(),
            UserId::new("user-1").unwrap(),
            start,
            start + Duration::minutes(30),
            CategoryTags::Legacy(CategorySelection::new(
                CategoryId::new("default-work").unwrap(),
            )),
        )
    }

    fn entry_id<'a>(block: &TimeBlock<'a>) -> Option<&'a str> {
        block.entry.map(|e| e.id.as_str())
    }

    #[test]
    fn blocks_tile_the_day_for_every_duration() {
        let now = at(12, 0);
        for duration in BlockDuration::ALL {
            let blocks = generate_blocks(day(), &Utc, duration, &[], now);
            assert_eq!(blocks.len() as u32, duration.blocks_per_day());
            assert_eq!(blocks[0].start_time, at(0, 0));
            assert_eq!(
                blocks.last().unwrap().end_time,
                at(0, 0) + Duration::days(1)
            );
            for pair in blocks.windows(2) {
                assert_eq!(pair[0].end_time, pair[1].start_time);
            }
            for block in &blocks {
                assert_eq!(block.end_time - block.start_time, duration.as_duration());
            }
        }
    }

    #[test]
    fn no_entries_leaves_every_block_empty() {
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Sixty, &[], at(23, 0));
        assert!(blocks.iter().all(|b| b.entry.is_none() && !b.is_continued));
    }

    #[test]
    fn current_and_past_flags() {
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Thirty, &[], at(10, 10));
        let current: Vec<_> = blocks.iter().filter(|b| b.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].start_time, at(10, 0));
        assert!(!current[0].is_past);
        assert_eq!(blocks.iter().filter(|b| b.is_past).count(), 20);
        assert!(blocks[19].is_past && blocks[19].is_loggable());
        assert!(!blocks[21].is_loggable());
    }

    #[test]
    fn block_ending_exactly_now_is_neither_past_nor_current() {
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Thirty, &[], at(10, 0));
        assert!(!blocks[19].is_past);
        assert!(!blocks[19].is_current);
        assert!(blocks[20].is_current);
    }

    #[test]
    fn continuation_fills_elapsed_gaps() {
        let entries = vec![entry("first", at(0, 0)), entry("second", at(2, 30))];
        // Block 10 is 05:00-05:30; now sits inside block 11.
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Thirty, &entries, at(5, 45));

        assert_eq!(entry_id(&blocks[0]), Some("first"));
        assert!(!blocks[0].is_continued);
        for block in &blocks[1..=4] {
            assert_eq!(entry_id(block), Some("first"));
            assert!(block.is_continued);
        }
        assert_eq!(entry_id(&blocks[5]), Some("second"));
        assert!(!blocks[5].is_continued);
        for block in &blocks[6..=10] {
            assert_eq!(entry_id(block), Some("second"));
            assert!(block.is_continued);
        }
        assert!(blocks[11].is_current);
        assert_eq!(blocks[11].entry, None);
        assert!(blocks[12..].iter().all(|b| b.entry.is_none()));
    }

    #[test]
    fn continuation_never_marks_current_or_future_blocks() {
        let entries = vec![entry("e", at(1, 0))];
        for now in [at(1, 10), at(9, 59), at(18, 30)] {
            let blocks = generate_blocks(day(), &Utc, BlockDuration::Fifteen, &entries, now);
            assert!(
                blocks
                    .iter()
                    .filter(|b| b.is_continued)
                    .all(|b| b.is_past && !b.is_current)
            );
            assert!(blocks.iter().filter(|b| !b.is_loggable()).all(|b| b.entry.is_none()));
        }
    }

    #[test]
    fn blocks_before_first_entry_stay_empty() {
        let entries = vec![entry("late", at(8, 0))];
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Sixty, &entries, at(20, 0));
        assert!(blocks[..8].iter().all(|b| b.entry.is_none()));
        assert_eq!(entry_id(&blocks[8]), Some("late"));
        assert!(blocks[9..19].iter().all(|b| b.is_continued));
        assert!(!blocks[19].is_past && blocks[19].entry.is_none());
    }

    #[test]
    fn future_entry_is_shown_but_not_continued() {
        let entries = vec![entry("planned", at(15, 0))];
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Sixty, &entries, at(9, 30));
        assert_eq!(entry_id(&blocks[15]), Some("planned"));
        assert!(blocks[16].entry.is_none());
    }

    #[test]
    fn first_matching_entry_wins() {
        let entries = vec![entry("newer", at(9, 40)), entry("older", at(9, 5))];
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Sixty, &entries, at(12, 0));
        assert_eq!(entry_id(&blocks[9]), Some("newer"));
    }

    #[test]
    fn entry_on_block_boundary_belongs_to_later_block() {
        let entries = vec![entry("e", at(10, 30))];
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Thirty, &entries, at(9, 0));
        assert!(blocks[20].entry.is_none());
        assert_eq!(entry_id(&blocks[21]), Some("e"));
    }

    #[test]
    fn entries_from_other_days_are_ignored() {
        let yesterday = at(22, 0) - Duration::days(1);
        let entries = vec![entry("yesterday", yesterday)];
        let blocks = generate_blocks(day(), &Utc, BlockDuration::Thirty, &entries, at(23, 0));
        assert!(blocks.iter().all(|b| b.entry.is_none()));
    }

    #[test]
    fn generation_is_idempotent_for_fixed_now() {
        let entries = vec![entry("a", at(3, 0)), entry("b", at(7, 15))];
        let first = generate_blocks(day(), &Utc, BlockDuration::Fifteen, &entries, at(11, 5));
        let second = generate_blocks(day(), &Utc, BlockDuration::Fifteen, &entries, at(11, 5));
        assert_eq!(first, second);
    }

    #[test]
    fn day_starts_at_local_midnight() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = day_start(day(), &tz);
        assert_eq!(start, at(0, 0) - Duration::hours(2));

        let blocks = generate_blocks(day(), &tz, BlockDuration::OneTwenty, &[], at(0, 0));
        assert_eq!(blocks[0].start_time, start);
        assert!(blocks[1].is_current);
    }

    #[test]
    fn dst_days_keep_a_fixed_block_count() {
        let tz = chrono_tz::America::New_York;
        let utc = |month, day, hour| {
            NaiveDate::from_ymd_opt(2025, month, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
                .and_utc()
        };

        // 23-hour day: the last local hour of blocks overlaps March 10.
        let spring = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let blocks = generate_blocks(spring, &tz, BlockDuration::Thirty, &[], utc(3, 9, 0));
        assert_eq!(blocks.len(), 48);
        assert_eq!(blocks[0].start_time, utc(3, 9, 5));
        assert_eq!(blocks[47].end_time, utc(3, 10, 5));
        assert_eq!(day_start(spring.succ_opt().unwrap(), &tz), utc(3, 10, 4));

        // 25-hour day: 23:00-00:00 local is not covered by either day.
        let fall = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let blocks = generate_blocks(fall, &tz, BlockDuration::Sixty, &[], utc(11, 2, 0));
        assert_eq!(blocks.len(), 24);
        assert_eq!(blocks[0].start_time, utc(11, 2, 4));
        assert_eq!(blocks[23].end_time, utc(11, 3, 4));
        assert_eq!(day_start(fall.succ_opt().unwrap(), &tz), utc(11, 3, 5));
    }

    #[test]
    fn own_entry_ignores_continuation() {
        let entries = vec![entry("e", at(0, 0))];
        let blocks = generate_blocks(day(), &Utc, BlockDuration::OneTwenty, &entries, at(6, 0));
        assert_eq!(blocks[0].own_entry().map(|e| e.id.as_str()), Some("e"));
        assert!(blocks[1].own_entry().is_none());
        assert_eq!(blocks[1].selections().len(), 1);
        assert!(blocks[5].selections().is_empty());
    }
}
