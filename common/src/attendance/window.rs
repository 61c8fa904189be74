//! 1ブロック内の日別・時段別の出退勤抽出
//!
//! 13行目から最大31行が日付行。ブロック先頭列に「01 六」のような日付セル、
//! 早診は +1〜+5 列、晚診は +6〜+9 列に打刻時刻が並ぶ。

use super::block::BlockAnchor;
use crate::cell::RawGrid;
use crate::datetime::{minutes_between, parse_hhmm, YearMonth};
use crate::diagnostics::{Diagnostic, Parsed, SkipReason, SourceKind};
use crate::types::{AttendanceEntry, Period};
use chrono::NaiveTime;
use regex::Regex;
use std::ops::Range;

/// 最初の日付行
pub const FIRST_DAY_ROW: usize = 12;
/// 日付行の最大数
pub const DAY_ROWS: usize = 31;

/// 時段ごとの走査列（ブロック先頭からのオフセット）
const PERIOD_WINDOWS: [(Period, Range<usize>); 2] = [
    (Period::Morning, 1..6),
    (Period::Evening, 6..10),
];

lazy_static::lazy_static! {
    static ref DAY_RE: Regex = Regex::new(r"^(\d{1,2})").unwrap();
    static ref CLOCK_CELL_RE: Regex = Regex::new(r"^\d{1,2}:\d{2}$").unwrap();
}

/// ブロックから出退勤レコードを抽出
pub fn extract_entries(
    grid: &RawGrid,
    anchor: &BlockAnchor,
    year_month: YearMonth,
) -> Parsed<AttendanceEntry> {
    let mut parsed = Parsed::default();
    let last_row = (FIRST_DAY_ROW + DAY_ROWS).min(grid.height());

    for row in FIRST_DAY_ROW..last_row {
        let date_cell = grid.cell(row, anchor.base_col).text();
        if date_cell.is_empty() {
            continue;
        }

        let Some(day) = day_of_month(&date_cell) else {
            parsed.note(Diagnostic::dropped(
                SourceKind::Attendance,
                row,
                SkipReason::NoDayNumber(date_cell),
            ));
            continue;
        };
        let date = year_month.day(day);

        for (period, offsets) in PERIOD_WINDOWS.iter() {
            let times = collect_times(grid, row, anchor.base_col, offsets.clone(), &mut parsed);
            let (Some(start), Some(end)) = (times.first(), times.last()) else {
                continue;
            };

            parsed.push(AttendanceEntry {
                employee: anchor.employee.clone(),
                date: date.clone(),
                period: *period,
                start_time: *start,
                end_time: *end,
                duration_min: minutes_between(*start, *end),
            });
        }
    }

    parsed
}

/// 日付セル先頭の1〜2桁を日として取り出す
fn day_of_month(text: &str) -> Option<u32> {
    DAY_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .filter(|day| (1..=31).contains(day))
}

/// 走査列の打刻時刻を昇順で返す
///
/// 末尾の `-` を除去した値が `H:MM` / `HH:MM` に一致するものだけを採用。
fn collect_times(
    grid: &RawGrid,
    row: usize,
    base_col: usize,
    offsets: Range<usize>,
    parsed: &mut Parsed<AttendanceEntry>,
) -> Vec<NaiveTime> {
    let mut times = Vec::new();
    for offset in offsets {
        let raw = grid.cell(row, base_col + offset).text();
        let cleaned = raw.trim_end_matches('-').trim();
        if !CLOCK_CELL_RE.is_match(cleaned) {
            continue;
        }
        match parse_hhmm(cleaned) {
            Some(time) => times.push(time),
            None => parsed.note(Diagnostic::dropped(
                SourceKind::Attendance,
                row,
                SkipReason::UnparsableTime(raw.clone()),
            )),
        }
    }
    times.sort();
    times
}
