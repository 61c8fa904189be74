//! 遅刻・加班・請假時数の判定基準

use crate::datetime::hhmm;
use crate::types::Period;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// 請假時段の「全天」マーカー
const FULL_DAY_MARKER: char = '全';
/// 請假時段の「診」マーカー（1診分）
const SHIFT_MARKER: char = '診';

/// 判定基準
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// 早診の遅刻基準
    #[serde(with = "hhmm")]
    pub morning_late_after: NaiveTime,
    /// 晚診の遅刻基準
    #[serde(with = "hhmm")]
    pub evening_late_after: NaiveTime,
    /// 早診の加班基準（退勤がこれを超えた分）
    #[serde(with = "hhmm")]
    pub morning_overtime_after: NaiveTime,
    /// 晚診の加班基準
    #[serde(with = "hhmm")]
    pub evening_overtime_after: NaiveTime,
    pub full_day_leave_hours: f64,
    pub shift_leave_hours: f64,
    /// マーカーのない時段の請假時数
    pub default_leave_hours: f64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            morning_late_after: hm(8, 5),
            evening_late_after: hm(16, 5),
            morning_overtime_after: hm(12, 10),
            evening_overtime_after: hm(20, 10),
            full_day_leave_hours: 8.0,
            shift_leave_hours: 4.0,
            default_leave_hours: 4.0,
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl RuleSet {
    /// 午診には基準なし
    pub fn late_threshold(&self, period: Period) -> Option<NaiveTime> {
        match period {
            Period::Morning => Some(self.morning_late_after),
            Period::Evening => Some(self.evening_late_after),
            Period::Afternoon => None,
        }
    }

    pub fn overtime_cutoff(&self, period: Period) -> Option<NaiveTime> {
        match period {
            Period::Morning => Some(self.morning_overtime_after),
            Period::Evening => Some(self.evening_overtime_after),
            Period::Afternoon => None,
        }
    }

    /// 請假時段 → 時数（時段なしは0）
    pub fn leave_hours(&self, period: Option<&str>) -> f64 {
        match period {
            None => 0.0,
            Some(p) if p.contains(FULL_DAY_MARKER) => self.full_day_leave_hours,
            Some(p) if p.contains(SHIFT_MARKER) => self.shift_leave_hours,
            Some(_) => self.default_leave_hours,
        }
    }
}
