//! 取り込み済みデータの保持
//!
//! 3ファイルを検証・解析して `Dataset` を作り、成功したときだけ差し替える。
//! 取り込みに失敗しても直前のデータはそのまま残る。

use crate::abnormal::parse_abnormal_stats;
use crate::attendance::{parse_attendance, AttendanceSource};
use crate::cell::Table;
use crate::datetime::YearMonth;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::report::parse_report;
use crate::rules::RuleSet;
use crate::summary::{summarize, EmployeeSummary, SummaryOptions};
use crate::types::{AbnormalEntry, AttendanceEntry, ReportEntry};
use serde::Serialize;
use std::collections::BTreeSet;

/// 読み込み済みの3ソース
#[derive(Debug, Clone)]
pub struct Sources {
    pub attendance: AttendanceSource,
    pub abnormal: Table,
    pub report: Table,
}

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// ブロックに年月がないときに使う報告月
    pub month_override: Option<YearMonth>,
}

/// 取り込みは成功したが注意が必要な状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// 考勤報表から出退勤が1件も取れなかった
    EmptyAttendance,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::EmptyAttendance => write!(f, "No attendance entries were found in the attendance report"),
        }
    }
}

/// 正規化済みの3テーブル
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub attendance: Vec<AttendanceEntry>,
    pub abnormal: Vec<AbnormalEntry>,
    pub report: Vec<ReportEntry>,
    pub diagnostics: Vec<Diagnostic>,
    pub warnings: Vec<Warning>,
}

impl Dataset {
    /// 考勤報表と加班報表に現れる社員名（ソート済み・重複なし）
    pub fn employees(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .attendance
            .iter()
            .map(|a| a.employee.as_str())
            .chain(self.report.iter().map(|r| r.employee()))
            .collect();
        names.into_iter().map(String::from).collect()
    }

    pub fn contains(&self, employee: &str) -> bool {
        self.attendance.iter().any(|a| a.employee == employee)
            || self.report.iter().any(|r| r.employee() == employee)
    }
}

/// 検証・解析（異常考勤統計表 → 員工回報表 → 考勤報表の順）
pub fn build_dataset(sources: Sources, options: &IngestOptions) -> Result<Dataset> {
    let abnormal = parse_abnormal_stats(sources.abnormal)?;
    let report = parse_report(&sources.report)?;
    let attendance = parse_attendance(&sources.attendance, options.month_override)?;

    let mut warnings = Vec::new();
    if attendance.records.is_empty() {
        tracing::warn!("attendance report produced no entries");
        warnings.push(Warning::EmptyAttendance);
    }

    let mut diagnostics = attendance.diagnostics;
    diagnostics.extend(abnormal.diagnostics);
    diagnostics.extend(report.diagnostics);

    tracing::info!(
        attendance = attendance.records.len(),
        abnormal = abnormal.records.len(),
        report = report.records.len(),
        diagnostics = diagnostics.len(),
        "dataset built"
    );

    Ok(Dataset {
        attendance: attendance.records,
        abnormal: abnormal.records,
        report: report.records,
        diagnostics,
        warnings,
    })
}

/// 現在のデータと判定基準
#[derive(Debug, Clone, Default)]
pub struct Session {
    dataset: Option<Dataset>,
    rules: RuleSet,
}

impl Session {
    pub fn new(rules: RuleSet) -> Self {
        Self { dataset: None, rules }
    }

    /// 取り込み。失敗時は既存データを変更しない
    pub fn ingest(&mut self, sources: Sources, options: &IngestOptions) -> Result<&Dataset> {
        let dataset = build_dataset(sources, options)?;
        Ok(self.dataset.insert(dataset))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn employees(&self) -> Result<Vec<String>> {
        Ok(self.current()?.employees())
    }

    /// 社員の集計（都度計算）
    pub fn summary(&self, employee: &str, options: &SummaryOptions) -> Result<EmployeeSummary> {
        let dataset = self.current()?;
        if !dataset.contains(employee) {
            return Err(Error::UnknownEmployee(employee.to_string()));
        }
        Ok(summarize(
            employee,
            &dataset.attendance,
            &dataset.abnormal,
            &dataset.report,
            &self.rules,
            options,
        ))
    }

    fn current(&self) -> Result<&Dataset> {
        self.dataset.as_ref().ok_or(Error::NotIngested)
    }
}
