//! 集計結果の表形式（Excel・端末表示・JSON共通）

use super::EmployeeSummary;
use crate::types::Period;
use serde::Serialize;

pub const MONTHLY_REPORT: &str = "Monthly Report";
pub const OVERTIME_DETAIL: &str = "Overtime Detail";
pub const LEAVE_DETAILS: &str = "Leave Details";
pub const DUTY_TIME_ENTRIES: &str = "Duty Time Entries";
pub const VISIT_ENTRIES: &str = "Visit Entries";
pub const VISIT_WEEKLY_SUMMARY: &str = "Visit Weekly Summary";

/// 表のセル値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableValue {
    Text(String),
    Integer(i64),
    /// 小数2桁で表示
    Number(f64),
}

impl TableValue {
    pub fn display(&self) -> String {
        match self {
            TableValue::Text(s) => s.clone(),
            TableValue::Integer(n) => n.to_string(),
            TableValue::Number(n) => format!("{:.2}", n),
        }
    }
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        TableValue::Text(s.to_string())
    }
}

impl From<String> for TableValue {
    fn from(s: String) -> Self {
        TableValue::Text(s)
    }
}

impl From<i64> for TableValue {
    fn from(n: i64) -> Self {
        TableValue::Integer(n)
    }
}

impl From<f64> for TableValue {
    fn from(n: f64) -> Self {
        TableValue::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<TableValue>>,
}

fn period_text(period: Option<Period>) -> TableValue {
    period.map(|p| p.label()).unwrap_or_default().into()
}

impl EmployeeSummary {
    /// 6表（月次・加班・請假・出勤・家訪・家訪週計）をこの順で返す
    pub fn tables(&self) -> Vec<SummaryTable> {
        let m = &self.monthly;

        vec![
            SummaryTable {
                name: MONTHLY_REPORT,
                headers: vec![
                    "Month",
                    "Total Late Mins",
                    "Total Overtime Mins",
                    "Total On-Duty Hours",
                    "Total Leave Hours",
                    "Reported Late Mins",
                ],
                rows: vec![vec![
                    m.month.clone().into(),
                    m.total_late_minutes.into(),
                    m.total_overtime_minutes.into(),
                    m.total_on_duty_hours.into(),
                    m.total_leave_hours.into(),
                    m.reported_late_minutes.into(),
                ]],
            },
            SummaryTable {
                name: OVERTIME_DETAIL,
                headers: vec![
                    "Date",
                    "Period",
                    "Start Time",
                    "End Time",
                    "Elapsed Minutes",
                    "OT Attribute",
                    "Patient/Note",
                ],
                rows: self
                    .overtime
                    .iter()
                    .map(|o| {
                        vec![
                            o.date.clone().into(),
                            period_text(o.period),
                            o.start_time.clone().into(),
                            o.end_time.clone().into(),
                            o.elapsed_minutes.into(),
                            o.ot_attribute.clone().into(),
                            o.note.clone().into(),
                        ]
                    })
                    .collect(),
            },
            SummaryTable {
                name: LEAVE_DETAILS,
                headers: vec!["Date", "Period", "Type", "Reason"],
                rows: self
                    .leave
                    .iter()
                    .map(|l| {
                        vec![
                            l.date.clone().into(),
                            l.period.clone().unwrap_or_default().into(),
                            l.leave_type.clone().into(),
                            l.reason.clone().into(),
                        ]
                    })
                    .collect(),
            },
            SummaryTable {
                name: DUTY_TIME_ENTRIES,
                headers: vec![
                    "Date",
                    "Period",
                    "Start Time",
                    "End Time",
                    "Total Duration (hr)",
                    "Overtime Duration (min)",
                    "Late Duration (min)",
                ],
                rows: self
                    .duty
                    .iter()
                    .map(|d| {
                        vec![
                            d.date.clone().into(),
                            period_text(Some(d.period)),
                            d.start_time.clone().into(),
                            d.end_time.clone().into(),
                            d.duration_hr.into(),
                            d.overtime_minutes.into(),
                            d.late_minutes.into(),
                        ]
                    })
                    .collect(),
            },
            SummaryTable {
                name: VISIT_ENTRIES,
                headers: vec!["Date", "Start Time", "End Time", "Patient Name", "Total Duration (hr)"],
                rows: self
                    .visits
                    .iter()
                    .map(|v| {
                        vec![
                            v.date.clone().into(),
                            v.start_time.clone().into(),
                            v.end_time.clone().into(),
                            v.patient_name.clone().into(),
                            v.duration_hr.into(),
                        ]
                    })
                    .collect(),
            },
            SummaryTable {
                name: VISIT_WEEKLY_SUMMARY,
                headers: vec!["Week", "Total Duration (hr)"],
                rows: self
                    .visit_weekly
                    .iter()
                    .map(|w| vec![TableValue::Integer(w.week as i64), w.duration_hr.into()])
                    .collect(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use crate::summary::{summarize, SummaryOptions};

    #[test]
    fn test_six_tables_in_order() {
        let summary = summarize("A", &[], &[], &[], &RuleSet::default(), &SummaryOptions::default());
        let names: Vec<&str> = summary.tables().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                MONTHLY_REPORT,
                OVERTIME_DETAIL,
                LEAVE_DETAILS,
                DUTY_TIME_ENTRIES,
                VISIT_ENTRIES,
                VISIT_WEEKLY_SUMMARY
            ]
        );
    }

    #[test]
    fn test_rows_match_header_width() {
        let summary = summarize("A", &[], &[], &[], &RuleSet::default(), &SummaryOptions::default());
        for table in summary.tables() {
            for row in &table.rows {
                assert_eq!(row.len(), table.headers.len(), "{}", table.name);
            }
        }
    }

    #[test]
    fn test_display_values() {
        assert_eq!(TableValue::Number(4.1666).display(), "4.17");
        assert_eq!(TableValue::Integer(15).display(), "15");
        assert_eq!(TableValue::from("早診").display(), "早診");
    }
}
