use chrono::{Duration, NaiveDate};

/// Widest date span the provider accepts in a single `/matches` query.
pub const MAX_SPAN_DAYS: u32 = 10;

/// An inclusive `[from, to]` date range no wider than `MAX_SPAN_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl SubWindow {
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Split `[start, start + days_forward)` into consecutive sub-windows of at
/// most `max_span` days. A zero-length range is treated as a single day.
/// Windows stop at the last representable date.
pub fn sub_windows(start: NaiveDate, days_forward: u32, max_span: u32) -> Vec<SubWindow> {
    let total = days_forward.max(1);
    let span = max_span.max(1);

    let mut windows = Vec::new();
    let mut offset = 0u32;
    while offset < total {
        let len = span.min(total - offset);
        let Some(from) = start.checked_add_signed(Duration::days(offset as i64)) else {
            break;
        };
        let to = from
            .checked_add_signed(Duration::days(len as i64 - 1))
            .unwrap_or(NaiveDate::MAX);
        windows.push(SubWindow { from, to });
        offset += len;
    }
    windows
}
