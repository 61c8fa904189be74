//! 社員ごとの月次集計
//!
//! ## 処理フロー
//! 1. 出退勤ごとの遅刻分数（早診 08:05 / 晚診 16:05 基準）
//! 2. 加班・請假は出退勤のある日付に限定（家訪は対象外）
//! 3. 加班は (日付, 時段) で出退勤と結合し、退勤時刻と基準（12:10 / 20:10）の差を採用
//! 4. 請假時段から時数を換算
//! 5. 月次合計・明細・家訪の週別集計を作成
//!
//! 集計はリクエストごとに再計算し、キャッシュしない。

pub mod tables;

pub use tables::{SummaryTable, TableValue};

use crate::datetime::{format_hhmm, minutes_past, parse_date, round2};
use crate::rules::RuleSet;
use crate::types::{
    AbnormalEntry, AttendanceEntry, LeaveReport, OvertimeReport, Period, ReportEntry, VisitReport,
};
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// 請假明細の対象範囲
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateScope {
    /// 出退勤のある日付のみ
    #[default]
    AttendanceDays,
    /// すべて（月次合計は常に出退勤日のみ）
    All,
}

#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    pub leave_scope: DateScope,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub month: String,
    pub total_late_minutes: i64,
    pub total_overtime_minutes: i64,
    pub total_on_duty_hours: f64,
    pub total_leave_hours: f64,
    /// 異常考勤統計表の遅刻分数の合計（照合用）
    pub reported_late_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeDetail {
    pub date: String,
    pub period: Option<Period>,
    pub start_time: String,
    pub end_time: String,
    pub elapsed_minutes: i64,
    pub ot_attribute: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDetail {
    pub date: String,
    pub period: Option<String>,
    pub leave_type: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyEntry {
    pub date: String,
    pub period: Period,
    pub start_time: String,
    pub end_time: String,
    pub duration_hr: f64,
    pub overtime_minutes: i64,
    pub late_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEntry {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub patient_name: String,
    pub duration_hr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitWeek {
    /// ISO週番号
    pub week: u32,
    pub duration_hr: f64,
}

/// 社員1人分の集計結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub employee: String,
    pub monthly: MonthlyTotals,
    pub overtime: Vec<OvertimeDetail>,
    pub leave: Vec<LeaveDetail>,
    pub duty: Vec<DutyEntry>,
    pub visits: Vec<VisitEntry>,
    pub visit_weekly: Vec<VisitWeek>,
}

/// 社員の集計を作成
///
/// 入力はすべての社員を含んでよい（ここで絞り込む）。日付は正規化済みであること。
pub fn summarize(
    employee: &str,
    attendance: &[AttendanceEntry],
    abnormal: &[AbnormalEntry],
    report: &[ReportEntry],
    rules: &RuleSet,
    options: &SummaryOptions,
) -> EmployeeSummary {
    let mut swipes: Vec<&AttendanceEntry> =
        attendance.iter().filter(|a| a.employee == employee).collect();
    swipes.sort_by(|a, b| {
        (&a.date, a.period, a.start_time, a.end_time).cmp(&(&b.date, b.period, b.start_time, b.end_time))
    });

    let reports: Vec<&ReportEntry> = report.iter().filter(|r| r.employee() == employee).collect();
    let valid_dates: HashSet<&str> = swipes.iter().map(|a| a.date.as_str()).collect();

    let overtime = overtime_details(&swipes, &reports, &valid_dates, rules);

    let leave_all: Vec<&LeaveReport> = reports
        .iter()
        .filter_map(|r| match r {
            ReportEntry::Leave(l) => Some(l),
            _ => None,
        })
        .collect();
    let leave_counted: Vec<&LeaveReport> = leave_all
        .iter()
        .copied()
        .filter(|l| valid_dates.contains(l.date.as_str()))
        .collect();

    let late_of = |a: &AttendanceEntry| {
        rules
            .late_threshold(a.period)
            .map(|threshold| minutes_past(a.start_time, threshold))
            .unwrap_or(0)
    };

    let mut overtime_by_slot: HashMap<(&str, Period), i64> = HashMap::new();
    for ot in &overtime {
        if let Some(period) = ot.period {
            *overtime_by_slot.entry((ot.date.as_str(), period)).or_insert(0) += ot.elapsed_minutes;
        }
    }

    let duty: Vec<DutyEntry> = swipes
        .iter()
        .map(|a| DutyEntry {
            date: a.date.clone(),
            period: a.period,
            start_time: format_hhmm(a.start_time),
            end_time: format_hhmm(a.end_time),
            duration_hr: a.duration_hours(),
            overtime_minutes: overtime_by_slot
                .get(&(a.date.as_str(), a.period))
                .copied()
                .unwrap_or(0),
            late_minutes: late_of(*a),
        })
        .collect();

    let monthly = MonthlyTotals {
        month: month_label(&swipes, &reports),
        total_late_minutes: swipes.iter().map(|a| late_of(*a)).sum(),
        total_overtime_minutes: overtime.iter().map(|o| o.elapsed_minutes).sum(),
        total_on_duty_hours: round2(
            swipes.iter().map(|a| a.duration_min as f64).sum::<f64>() / 60.0,
        ),
        total_leave_hours: leave_counted
            .iter()
            .map(|l| rules.leave_hours(l.period.as_deref()))
            .sum(),
        reported_late_minutes: abnormal
            .iter()
            .filter(|a| a.employee == employee)
            .map(|a| a.late_minutes)
            .sum(),
    };

    let leave_listed = match options.leave_scope {
        DateScope::AttendanceDays => &leave_counted,
        DateScope::All => &leave_all,
    };
    let mut leave: Vec<LeaveDetail> = leave_listed
        .iter()
        .map(|l| LeaveDetail {
            date: l.date.clone(),
            period: l.period.clone(),
            leave_type: l.leave_type.clone(),
            reason: l.reason.clone(),
        })
        .collect();
    leave.sort_by(|a, b| {
        (&a.date, &a.period, &a.leave_type, &a.reason).cmp(&(&b.date, &b.period, &b.leave_type, &b.reason))
    });

    let mut visit_reports: Vec<&VisitReport> = reports
        .iter()
        .filter_map(|r| match r {
            ReportEntry::Visit(v) => Some(v),
            _ => None,
        })
        .collect();
    visit_reports.sort_by(|a, b| {
        (&a.date, &a.start_time, &a.patient_name).cmp(&(&b.date, &b.start_time, &b.patient_name))
    });

    let visits: Vec<VisitEntry> = visit_reports
        .iter()
        .map(|v| VisitEntry {
            date: v.date.clone(),
            start_time: v.start_time.clone(),
            end_time: v.end_time.clone(),
            patient_name: v.patient_name.clone(),
            duration_hr: v.duration_hr,
        })
        .collect();

    EmployeeSummary {
        employee: employee.to_string(),
        monthly,
        overtime,
        leave,
        duty,
        visit_weekly: visit_weekly(&visit_reports),
        visits,
    }
}

/// 出退勤日の加班を (日付, 時段) で出退勤と結合して加班分数を算出
fn overtime_details(
    swipes: &[&AttendanceEntry],
    reports: &[&ReportEntry],
    valid_dates: &HashSet<&str>,
    rules: &RuleSet,
) -> Vec<OvertimeDetail> {
    let mut details: Vec<OvertimeDetail> = reports
        .iter()
        .filter_map(|r| match r {
            ReportEntry::Overtime(ot) if valid_dates.contains(ot.date.as_str()) => Some(ot),
            _ => None,
        })
        .map(|ot: &OvertimeReport| {
            let swipe = ot.period.and_then(|period| {
                swipes
                    .iter()
                    .find(|a| a.date == ot.date && a.period == period)
            });

            let elapsed_minutes = match (swipe, ot.period.and_then(|p| rules.overtime_cutoff(p))) {
                (Some(a), Some(cutoff)) => minutes_past(a.end_time, cutoff),
                _ => 0,
            };

            let (start_time, end_time) = match swipe {
                Some(a) => (format_hhmm(a.start_time), format_hhmm(a.end_time)),
                None => (ot.start_time.clone(), ot.end_time.clone()),
            };

            OvertimeDetail {
                date: ot.date.clone(),
                period: ot.period,
                start_time,
                end_time,
                elapsed_minutes,
                ot_attribute: ot.ot_attribute.clone(),
                note: ot.note.clone(),
            }
        })
        .collect();

    details.sort_by(|a, b| {
        (&a.date, a.period, &a.ot_attribute, &a.note, &a.start_time, &a.end_time)
            .cmp(&(&b.date, b.period, &b.ot_attribute, &b.note, &b.start_time, &b.end_time))
    });
    details
}

/// 最も早い出退勤日の年月。なければ報告の日付、それもなければ "Unknown"
fn month_label(swipes: &[&AttendanceEntry], reports: &[&ReportEntry]) -> String {
    let earliest = swipes
        .iter()
        .map(|a| a.date.as_str())
        .min()
        .or_else(|| reports.iter().map(|r| r.date()).filter(|d| !d.is_empty()).min());

    match earliest {
        Some(date) => date.chars().take(7).collect(),
        None => "Unknown".to_string(),
    }
}

/// ISO週番号ごとの家訪時間（日付が解析できないものは除外）
fn visit_weekly(visits: &[&VisitReport]) -> Vec<VisitWeek> {
    let mut weeks: BTreeMap<u32, f64> = BTreeMap::new();
    for visit in visits {
        match parse_date(&visit.date) {
            Some(date) => *weeks.entry(date.iso_week().week()).or_insert(0.0) += visit.duration_hr,
            None => tracing::debug!(date = %visit.date, "visit date not parseable, left out of weekly summary"),
        }
    }

    weeks
        .into_iter()
        .map(|(week, hours)| VisitWeek {
            week,
            duration_hr: round2(hours),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn swipe(date: &str, period: Period, start: (u32, u32), end: (u32, u32)) -> AttendanceEntry {
        let (start, end) = (t(start.0, start.1), t(end.0, end.1));
        AttendanceEntry {
            employee: "A".into(),
            date: date.into(),
            period,
            start_time: start,
            end_time: end,
            duration_min: crate::datetime::minutes_between(start, end),
        }
    }

    fn overtime(date: &str, period: Option<Period>) -> ReportEntry {
        ReportEntry::Overtime(OvertimeReport {
            employee: "A".into(),
            date: date.into(),
            period,
            start_time: "16:00".into(),
            end_time: "20:30".into(),
            elapsed_minutes: 270,
            ot_attribute: "病人多".into(),
            note: String::new(),
        })
    }

    fn leave(date: &str, period: &str) -> ReportEntry {
        ReportEntry::Leave(LeaveReport {
            employee: "A".into(),
            date: date.into(),
            period: Some(period.into()),
            leave_type: "特休".into(),
            reason: String::new(),
        })
    }

    fn visit(date: &str, hours: f64) -> ReportEntry {
        ReportEntry::Visit(VisitReport {
            employee: "A".into(),
            date: date.into(),
            start_time: "14:00".into(),
            end_time: "15:00".into(),
            patient_name: "林奶奶".into(),
            duration_hr: hours,
        })
    }

    fn run(attendance: &[AttendanceEntry], report: &[ReportEntry]) -> EmployeeSummary {
        summarize("A", attendance, &[], report, &RuleSet::default(), &SummaryOptions::default())
    }

    #[test]
    fn test_single_morning_swipe() {
        let summary = summarize(
            "A",
            &[swipe("2026-02-06", Period::Morning, (8, 10), (12, 20))],
            &[AbnormalEntry { employee: "A".into(), date: "2026-02-06".into(), late_minutes: 5.0 }],
            &[],
            &RuleSet::default(),
            &SummaryOptions::default(),
        );
        assert_eq!(summary.monthly.month, "2026-02");
        assert_eq!(summary.monthly.total_late_minutes, 5);
        assert_eq!(summary.monthly.reported_late_minutes, 5.0);
        assert_eq!(summary.monthly.total_overtime_minutes, 0);
        assert_eq!(summary.monthly.total_on_duty_hours, 4.17);
        assert_eq!(summary.monthly.total_leave_hours, 0.0);
        assert_eq!(summary.duty[0].start_time, "08:10");
    }

    #[test]
    fn test_late_rule_boundaries() {
        let summary = run(
            &[
                swipe("2026-02-02", Period::Morning, (8, 5), (12, 0)),
                swipe("2026-02-03", Period::Morning, (8, 6), (12, 0)),
                swipe("2026-02-03", Period::Evening, (16, 20), (20, 0)),
            ],
            &[],
        );
        let lates: Vec<i64> = summary.duty.iter().map(|d| d.late_minutes).collect();
        assert_eq!(lates, vec![0, 1, 15]);
        assert_eq!(summary.monthly.total_late_minutes, 16);
    }

    #[test]
    fn test_overtime_uses_attendance_clock_out() {
        let summary = run(
            &[
                swipe("2026-02-06", Period::Evening, (16, 0), (20, 10)),
                swipe("2026-02-07", Period::Evening, (16, 0), (20, 25)),
            ],
            &[overtime("2026-02-06", Some(Period::Evening)), overtime("2026-02-07", Some(Period::Evening))],
        );
        let elapsed: Vec<i64> = summary.overtime.iter().map(|o| o.elapsed_minutes).collect();
        assert_eq!(elapsed, vec![0, 15]);
        assert_eq!(summary.overtime[1].end_time, "20:25");
        assert_eq!(summary.monthly.total_overtime_minutes, 15);
        assert_eq!(summary.duty[1].overtime_minutes, 15);
    }

    #[test]
    fn test_overtime_without_matching_period_is_zero() {
        let summary = run(
            &[swipe("2026-02-06", Period::Morning, (8, 0), (13, 0))],
            &[overtime("2026-02-06", Some(Period::Evening)), overtime("2026-02-06", None)],
        );
        assert_eq!(summary.overtime.len(), 2);
        assert!(summary.overtime.iter().all(|o| o.elapsed_minutes == 0));
        // 出退勤がなければ報告自身の時刻を表示
        assert!(summary.overtime.iter().any(|o| o.end_time == "20:30"));
    }

    #[test]
    fn test_overtime_and_leave_restricted_to_attendance_days() {
        let summary = run(
            &[swipe("2026-02-06", Period::Morning, (8, 0), (12, 0))],
            &[
                overtime("2026-02-09", Some(Period::Morning)),
                leave("2026-02-06", "早診"),
                leave("2026-02-10", "全天"),
                visit("2026-02-11", 1.5),
            ],
        );
        assert!(summary.overtime.is_empty());
        assert_eq!(summary.leave.len(), 1);
        assert_eq!(summary.monthly.total_leave_hours, 4.0);
        // 家訪は日付で絞り込まない
        assert_eq!(summary.visits.len(), 1);
    }

    #[test]
    fn test_unfiltered_leave_scope_lists_all_but_counts_attendance_days() {
        let options = SummaryOptions { leave_scope: DateScope::All };
        let summary = summarize(
            "A",
            &[swipe("2026-02-06", Period::Morning, (8, 0), (12, 0))],
            &[],
            &[leave("2026-02-10", "全天")],
            &RuleSet::default(),
            &options,
        );
        assert_eq!(summary.leave.len(), 1);
        assert_eq!(summary.leave[0].date, "2026-02-10");
        assert_eq!(summary.monthly.total_leave_hours, 0.0);
    }

    #[test]
    fn test_leave_hours_by_marker() {
        let summary = run(
            &[
                swipe("2026-02-02", Period::Morning, (8, 0), (12, 0)),
                swipe("2026-02-03", Period::Morning, (8, 0), (12, 0)),
                swipe("2026-02-04", Period::Morning, (8, 0), (12, 0)),
            ],
            &[leave("2026-02-02", "全天"), leave("2026-02-03", "晚診"), leave("2026-02-04", "下午")],
        );
        assert_eq!(summary.monthly.total_leave_hours, 16.0);
    }

    #[test]
    fn test_visit_weekly_by_iso_week() {
        let summary = run(
            &[],
            &[visit("2026-02-02", 1.0), visit("2026-02-08", 0.5), visit("2026-02-09", 2.0), visit("unknown", 3.0)],
        );
        assert_eq!(
            summary.visit_weekly,
            vec![
                VisitWeek { week: 6, duration_hr: 1.5 },
                VisitWeek { week: 7, duration_hr: 2.0 },
            ]
        );
        assert_eq!(summary.visits.len(), 4);
    }

    #[test]
    fn test_month_label_fallbacks() {
        let with_swipes = run(
            &[
                swipe("2026-02-10", Period::Morning, (8, 0), (12, 0)),
                swipe("2026-01-31", Period::Evening, (16, 0), (20, 0)),
            ],
            &[],
        );
        assert_eq!(with_swipes.monthly.month, "2026-01");

        let report_only = run(&[], &[visit("2026-03-04", 1.0)]);
        assert_eq!(report_only.monthly.month, "2026-03");

        let nothing = run(&[], &[]);
        assert_eq!(nothing.monthly.month, "Unknown");
        assert_eq!(nothing.monthly.total_on_duty_hours, 0.0);
    }

    #[test]
    fn test_totals_are_order_independent() {
        let a = vec![
            swipe("2026-02-06", Period::Morning, (8, 10), (12, 20)),
            swipe("2026-02-07", Period::Evening, (16, 7), (20, 40)),
        ];
        let r = vec![overtime("2026-02-07", Some(Period::Evening)), leave("2026-02-06", "全天")];
        let mut a_rev = a.clone();
        a_rev.reverse();
        let mut r_rev = r.clone();
        r_rev.reverse();

        assert_eq!(run(&a, &r), run(&a_rev, &r_rev));
    }

    #[test]
    fn test_detail_rows_with_same_date_are_order_independent() {
        let a = vec![swipe("2026-02-06", Period::Evening, (16, 0), (20, 30))];
        let mut ot_first = overtime("2026-02-06", Some(Period::Evening));
        if let ReportEntry::Overtime(ot) = &mut ot_first {
            ot.ot_attribute = "支援".into();
        }
        let mut sick = leave("2026-02-06", "早診");
        if let ReportEntry::Leave(l) = &mut sick {
            l.leave_type = "病假".into();
        }
        let r = vec![
            ot_first,
            overtime("2026-02-06", Some(Period::Evening)),
            leave("2026-02-06", "早診"),
            sick,
            leave("2026-02-06", "全天"),
        ];
        let mut r_rev = r.clone();
        r_rev.reverse();

        let forward = run(&a, &r);
        assert_eq!(forward, run(&a, &r_rev));
        assert_eq!(forward.overtime[0].ot_attribute, "支援");
        let types: Vec<&str> = forward.leave.iter().map(|l| l.leave_type.as_str()).collect();
        // 全天 → 早診（特休, 病假）
        assert_eq!(types, vec!["特休", "特休", "病假"]);
    }

    #[test]
    fn test_other_employees_are_ignored() {
        let mut other = swipe("2026-02-06", Period::Morning, (9, 0), (12, 0));
        other.employee = "B".into();
        let summary = run(&[other], &[]);
        assert!(summary.duty.is_empty());
    }
}
