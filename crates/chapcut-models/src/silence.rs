//! Silence intervals and their grouping into chapter-boundary regions.
//!
//! The detector reports every silence longer than its minimum duration. A
//! chapter heading in a narrated recording shows up as a *cluster* of such
//! silences (the narrator pauses, says the heading, pauses again), so
//! intervals are grouped: a gap of `MAX_CHAPTER_HEADER_SECS` or more of
//! non-silent audio ends the current group.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timestamp::format_seconds;

/// Longest spoken chapter heading we expect between two silences, seconds.
///
/// Doubles as the grouping gap threshold and the "opening silence" window:
/// a lone silence only counts as a boundary when it begins this close to
/// the start of the file.
pub const MAX_CHAPTER_HEADER_SECS: f64 = 2.0;

/// A detected silence interval, in seconds from the start of the file.
///
/// Intervals arrive chronological and non-overlapping, with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Silence {
    pub start: f64,
    pub end: f64,
}

impl Silence {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for Silence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_seconds(self.start),
            format_seconds(self.end)
        )
    }
}

/// A run of consecutive silences judged to belong to one boundary region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceGroup {
    pub silences: Vec<Silence>,
}

impl SilenceGroup {
    /// Wrap an ordered, non-empty run of silences.
    pub fn new(silences: Vec<Silence>) -> Self {
        debug_assert!(!silences.is_empty(), "silence groups are never empty");
        Self { silences }
    }

    /// Where the chapter bounded by this group begins.
    ///
    /// A single leading silence means the recording opens with dead air
    /// before the first heading, so the chapter starts at time 0; with two
    /// or more silences the heading sits between them and the chapter
    /// starts when the first silence ends.
    pub fn start(&self) -> f64 {
        match self.silences.as_slice() {
            [] | [_] => 0.0,
            [first, ..] => first.end,
        }
    }

    /// Where the boundary region ends: the last silence begins the next
    /// stretch of narration.
    pub fn end(&self) -> f64 {
        self.silences.last().map_or(0.0, |s| s.start)
    }

    pub fn duration(&self) -> f64 {
        self.end() - self.start()
    }

    /// Whether this group marks a chapter boundary.
    ///
    /// Multi-silence groups always do; a lone silence qualifies only when
    /// it starts within `MAX_CHAPTER_HEADER_SECS` of time 0 (an opening
    /// silence before chapter 0). Stray isolated silences elsewhere are
    /// noise.
    pub fn is_chapter_boundary(&self) -> bool {
        self.silences.len() > 1
            || self
                .silences
                .first()
                .is_some_and(|s| s.start < MAX_CHAPTER_HEADER_SECS)
    }
}

/// Partition detected silences into boundary-region groups, in order.
///
/// A new group starts whenever the gap between an interval and its
/// predecessor reaches `MAX_CHAPTER_HEADER_SECS` (a gap exactly equal to
/// the threshold splits). Every input interval lands in exactly one group;
/// nothing is filtered here. An empty input yields an empty vector.
pub fn group_silences(silences: &[Silence]) -> Vec<SilenceGroup> {
    let mut groups = Vec::new();
    let mut current: Vec<Silence> = Vec::new();

    for &silence in silences {
        if let Some(prev) = current.last() {
            if silence.start - prev.end >= MAX_CHAPTER_HEADER_SECS {
                groups.push(SilenceGroup::new(std::mem::take(&mut current)));
            }
        }
        current.push(silence);
    }

    if !current.is_empty() {
        groups.push(SilenceGroup::new(current));
    }

    groups
}
