//! 正規化済みレコードの型定義
//!
//! 3つのソースから生成されるレコード:
//! - AttendanceEntry: 刷卡記錄（考勤報表）の (社員, 日, 時段) ごとの出退勤
//! - AbnormalEntry: 異常考勤統計表の遅刻分数
//! - ReportEntry: 加班報表の 加班 / 請假 / 家訪 の各行

use crate::datetime::hhmm;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 診療時段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "早診")]
    Morning,
    #[serde(rename = "午診")]
    Afternoon,
    #[serde(rename = "晚診")]
    Evening,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Morning => "早診",
            Period::Afternoon => "午診",
            Period::Evening => "晚診",
        }
    }

    /// 1文字のキーワード（早/午/晚）で判定
    pub fn from_keyword(text: &str) -> Option<Self> {
        if text.contains('早') {
            Some(Period::Morning)
        } else if text.contains('午') {
            Some(Period::Afternoon)
        } else if text.contains('晚') {
            Some(Period::Evening)
        } else {
            None
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 出退勤レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub employee: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub period: Period,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration_min: i64,
}

impl AttendanceEntry {
    pub fn duration_hours(&self) -> f64 {
        crate::datetime::round2(self.duration_min as f64 / 60.0)
    }
}

/// 遅刻統計レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbnormalEntry {
    pub employee: String,
    pub date: String,
    pub late_minutes: f64,
}

/// 加班・門診上班
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeReport {
    pub employee: String,
    pub date: String,
    pub period: Option<Period>,
    /// 解析できれば `HH:MM`、できなければ元の文字列
    pub start_time: String,
    pub end_time: String,
    pub elapsed_minutes: i64,
    pub ot_attribute: String,
    pub note: String,
}

/// 請假
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveReport {
    pub employee: String,
    pub date: String,
    /// 未正規化の時段文字列
    pub period: Option<String>,
    pub leave_type: String,
    pub reason: String,
}

/// 家訪
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitReport {
    pub employee: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub patient_name: String,
    /// 日跨ぎ補正なし
    pub duration_hr: f64,
}

/// 加班報表の1行（回報屬性で分岐済み）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReportEntry {
    Overtime(OvertimeReport),
    Leave(LeaveReport),
    Visit(VisitReport),
}

impl ReportEntry {
    pub fn employee(&self) -> &str {
        match self {
            ReportEntry::Overtime(r) => &r.employee,
            ReportEntry::Leave(r) => &r.employee,
            ReportEntry::Visit(r) => &r.employee,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            ReportEntry::Overtime(r) => &r.date,
            ReportEntry::Leave(r) => &r.date,
            ReportEntry::Visit(r) => &r.date,
        }
    }
}
