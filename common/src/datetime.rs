//! 日付・時刻の正規化
//!
//! - 日付は `YYYY-MM-DD` に統一（時刻部分の除去、`/` → `-`、月日のゼロ埋め）
//! - 「上午 8:20:00」「下午 5:30」のような午前/午後付き時刻を24時間制に変換
//! - 解析できない時刻は `None`（呼び出し側では所要時間0として扱う）

use crate::cell::Cell;
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: i64 = 24 * 60;

lazy_static::lazy_static! {
    static ref CLOCK_RE: Regex = Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").unwrap();
    static ref HHMM_RE: Regex = Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap();
    // 英字の午前/午後は数字・空白の直後にあるものだけ（名前中の "am" などは除外）
    static ref MARKER_RE: Regex = Regex::new(r"上午|下午|(?i:(?:^|[\d\s])([ap])\.?m\.?(?:\s|$))").unwrap();
    static ref YEAR_MONTH_RE: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
}

/// 報告年月
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(format!("{}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// 月内の日付を `YYYY-MM-DD` で返す
    pub fn day(&self, day: u32) -> String {
        format!("{}-{:02}", self, day)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = YEAR_MONTH_RE
            .captures(s.trim())
            .ok_or_else(|| Error::InvalidMonth(s.to_string()))?;
        let year = caps[1].parse().map_err(|_| Error::InvalidMonth(s.to_string()))?;
        let month = caps[2].parse().map_err(|_| Error::InvalidMonth(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

/// 日付文字列を `YYYY-MM-DD` に正規化
///
/// 3要素に分割できない値はそのまま（区切りのみ統一して）返す。
pub fn normalize_date(raw: &str) -> String {
    let date_part = raw.split_whitespace().next().unwrap_or("");
    let date_part = match date_part.split_once('T') {
        Some((head, tail)) if tail.starts_with(|c: char| c.is_ascii_digit()) => head,
        _ => date_part,
    };
    let unified = date_part.replace('/', "-");

    let parts: Vec<&str> = unified.split('-').collect();
    if let [year, month, day] = parts.as_slice() {
        if let (Ok(m), Ok(d)) = (month.parse::<u32>(), day.parse::<u32>()) {
            return format!("{}-{:02}-{:02}", year, m, d);
        }
    }
    unified
}

/// 正規化済み日付を `NaiveDate` に変換
pub fn parse_date(normalized: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(normalized, "%Y-%m-%d").ok()
}

/// 午前/午後の付いた時刻を解析
///
/// 午後かつ時≠12なら+12、午前かつ時=12なら0時とする。
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let marker = MARKER_RE.captures(text).map(|caps| match caps.get(1) {
        Some(letter) => letter.as_str().to_lowercase(),
        None => caps[0].to_string(),
    });
    let is_pm = matches!(marker.as_deref(), Some(m) if m == "下午" || m == "p");
    let is_am = matches!(marker.as_deref(), Some(m) if m == "上午" || m == "a");

    let caps = CLOCK_RE.captures(text)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let second: u32 = match caps.get(3) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };

    if is_pm && hour != 12 {
        hour += 12;
    } else if is_am && hour == 12 {
        hour = 0;
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// `H:MM` / `HH:MM` のみを受け付ける厳密な解析
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let caps = HHMM_RE.captures(raw.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// 終了−開始（分）。負なら日跨ぎとして1440分を加算
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    let diff = end.signed_duration_since(start).num_minutes();
    if diff < 0 {
        diff + MINUTES_PER_DAY
    } else {
        diff
    }
}

/// 基準時刻を超えた分数（超えなければ0）
pub fn minutes_past(time: NaiveTime, threshold: NaiveTime) -> i64 {
    time.signed_duration_since(threshold).num_minutes().max(0)
}

/// 終了−開始（時間）。日跨ぎ補正なし（負の値もそのまま）
pub fn hours_between_unwrapped(start: NaiveTime, end: NaiveTime) -> f64 {
    end.signed_duration_since(start).num_seconds() as f64 / 3600.0
}

/// 時刻らしい値か（名前欄の判定用）
pub fn is_time_like(text: &str) -> bool {
    text.contains(':') || MARKER_RE.is_match(text)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// セルの日付を `YYYY-MM-DD` で返す（空なら `None`）
pub fn cell_date(cell: &Cell) -> Option<String> {
    match cell {
        Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d").to_string()),
        other => other.non_empty_text().map(|text| normalize_date(&text)),
    }
}

/// セルの時刻（日時セルは時刻部分、文字列は `parse_clock`）
pub fn cell_clock(cell: &Cell) -> Option<NaiveTime> {
    match cell {
        Cell::DateTime(dt) => Some(dt.time()),
        other => parse_clock(&other.text()),
    }
}

/// 時刻セルの表示形（解析できれば `HH:MM`）
pub fn clock_display(cell: &Cell) -> String {
    match cell_clock(cell) {
        Some(time) => format_hhmm(time),
        None => cell.text(),
    }
}

/// `HH:MM` 形式でのシリアライズ
pub mod hhmm {
    use super::{format_hhmm, parse_hhmm};
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hhmm(&s).ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {}", s)))
    }
}
