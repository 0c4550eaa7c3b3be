//! Time-window splitting for concurrent datapoints retrieval.

/// A half-open time interval `[start, end)` assigned to one concurrent
/// sub-fetch. Timestamps are epoch milliseconds, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Window start (inclusive).
    pub start: i64,
    /// Window end (exclusive).
    pub end: i64,
}

impl Window {
    /// Creates a new window.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Returns the window width in milliseconds.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.end - self.start
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Splits `[start, end)` into at most `max_windows` windows for concurrent
/// fetch.
///
/// When a granularity is given, window widths are multiples of it so that
/// no aggregation period is split across two windows, and consecutive
/// windows are spaced one granularity apart so that no bucket is reported
/// by two windows. Raw data (`granularity_ms == None`) divides the range
/// evenly with one-millisecond spacing.
///
/// `max_windows == 1` always yields the single window `[start, end)`;
/// an empty range yields no windows.
pub fn split_windows(
    start: i64,
    end: i64,
    granularity_ms: Option<i64>,
    max_windows: usize,
) -> Vec<Window> {
    let span = end - start;
    if span <= 0 || max_windows == 0 {
        return Vec::new();
    }
    let granularity_ms = granularity_ms.unwrap_or(1).max(1);

    // Never use more windows than there are aggregation buckets in range.
    let steps = (max_windows as i64).min((span / granularity_ms).max(1));
    let width = span / steps;

    let mut windows: Vec<Window> = Vec::with_capacity(steps as usize);
    let mut next_start = start;
    while windows.last().is_none_or(|w| w.end < end) && next_start < end {
        let next_end = (next_start + width).min(end);
        windows.push(Window::new(next_start, next_end));
        next_start += width + granularity_ms;
    }
    windows
}
