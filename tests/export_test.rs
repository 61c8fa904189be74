//! Excel/JSON出力の統合テスト
//!
//! 書き出したブックを calamine で開き直して検証する

use attendance_common::types::{LeaveReport, ReportEntry};
use attendance_common::{summarize, AttendanceEntry, EmployeeSummary, Period, RuleSet, SummaryOptions};
use attendance_summary::cli::ExportFormat;
use attendance_summary::export::{self, excel, json};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveTime;
use tempfile::tempdir;

fn sample_summary(employee: &str) -> EmployeeSummary {
    let start = NaiveTime::from_hms_opt(8, 10, 0).unwrap();
    let end = NaiveTime::from_hms_opt(12, 20, 0).unwrap();
    let attendance = vec![AttendanceEntry {
        employee: employee.into(),
        date: "2026-02-06".into(),
        period: Period::Morning,
        start_time: start,
        end_time: end,
        duration_min: 250,
    }];
    let report = vec![ReportEntry::Leave(LeaveReport {
        employee: employee.into(),
        date: "2026-02-06".into(),
        period: Some("晚診".into()),
        leave_type: "特休".into(),
        reason: String::new(),
    })];
    summarize(employee, &attendance, &[], &report, &RuleSet::default(), &SummaryOptions::default())
}

#[test]
fn test_workbook_has_six_sheets() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("A_2026-02.xlsx");

    excel::write_summary_workbook(&sample_summary("A"), &path).expect("Excel generation failed");
    assert!(path.exists());

    let mut workbook = open_workbook_auto(&path).expect("Failed to reopen workbook");
    assert_eq!(
        workbook.sheet_names(),
        vec![
            "Monthly Report",
            "Overtime Detail",
            "Leave Details",
            "Duty Time Entries",
            "Visit Entries",
            "Visit Weekly Summary",
        ]
    );

    let monthly = workbook.worksheet_range("Monthly Report").unwrap();
    assert_eq!(monthly.get_value((0, 0)), Some(&Data::String("Month".into())));
    assert_eq!(monthly.get_value((1, 0)), Some(&Data::String("2026-02".into())));
    assert_eq!(monthly.get_value((1, 1)), Some(&Data::Float(5.0)));
    assert_eq!(monthly.get_value((1, 4)), Some(&Data::Float(4.0)));

    let duty = workbook.worksheet_range("Duty Time Entries").unwrap();
    assert_eq!(duty.get_value((1, 1)), Some(&Data::String("早診".into())));
}

#[test]
fn test_export_summaries_to_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("reports");
    let summaries = vec![sample_summary("A"), sample_summary("B")];

    let written = export::export_summaries(&summaries, &ExportFormat::All, &out).unwrap();

    assert_eq!(written.len(), 4);
    assert!(out.join("A_2026-02.xlsx").exists());
    assert!(out.join("B_2026-02.json").exists());
}

#[test]
fn test_single_export_uses_given_file_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("february.xlsx");

    let written = export::export_summaries(&[sample_summary("A")], &ExportFormat::Excel, &out).unwrap();
    assert_eq!(written, vec![out.clone()]);
    assert!(out.exists());
}

#[test]
fn test_json_contains_tables() {
    let document = json::summary_json(&sample_summary("A")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();

    assert_eq!(value["employee"], "A");
    assert_eq!(value["monthly"]["totalLateMinutes"], 5);
    assert_eq!(value["tables"].as_array().unwrap().len(), 6);
    assert_eq!(value["tables"][0]["name"], "Monthly Report");
}
