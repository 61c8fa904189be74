//! 行単位の診断情報
//!
//! 行レベルの異常は失敗にせず、行を破棄するか値を0にして続行する。
//! その内容をここに記録して呼び出し側へ返す。

use serde::Serialize;
use std::fmt;

/// 入力ソースの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    Attendance,
    AbnormalStats,
    Report,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Attendance => "Attendance Report",
            SourceKind::AbnormalStats => "Abnormal Stats",
            SourceKind::Report => "Overtime Report",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 異常の理由
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    MissingEmployee,
    MissingDate,
    NoDayNumber(String),
    UnrecognizedCategory(String),
    UnparsableTime(String),
    UnparsableDate(String),
    NonNumericLateValue(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingEmployee => write!(f, "missing employee"),
            SkipReason::MissingDate => write!(f, "missing date"),
            SkipReason::NoDayNumber(v) => write!(f, "no day number in '{}'", v),
            SkipReason::UnrecognizedCategory(v) => write!(f, "unrecognized category '{}'", v),
            SkipReason::UnparsableTime(v) => write!(f, "unparsable time '{}'", v),
            SkipReason::UnparsableDate(v) => write!(f, "unparsable date '{}'", v),
            SkipReason::NonNumericLateValue(v) => write!(f, "non-numeric late value '{}'", v),
        }
    }
}

/// 行に対して取った処置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowAction {
    /// 行を破棄
    Dropped,
    /// 値を0として採用
    Zeroed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub source: SourceKind,
    /// 0始まりのデータ行番号（刷卡記錄はシート上の行）
    pub row: usize,
    pub reason: SkipReason,
    pub action: RowAction,
}

impl Diagnostic {
    pub fn dropped(source: SourceKind, row: usize, reason: SkipReason) -> Self {
        Self { source, row, reason, action: RowAction::Dropped }
    }

    pub fn zeroed(source: SourceKind, row: usize, reason: SkipReason) -> Self {
        Self { source, row, reason, action: RowAction::Zeroed }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            RowAction::Dropped => "dropped",
            RowAction::Zeroed => "zeroed",
        };
        write!(f, "[{}] row {}: {} ({})", self.source, self.row, self.reason, action)
    }
}

/// パース結果（レコード＋診断）
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self { records: Vec::new(), diagnostics: Vec::new() }
    }
}

impl<T> Parsed<T> {
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn note(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "row anomaly");
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: Parsed<T>) {
        self.records.extend(other.records);
        self.diagnostics.extend(other.diagnostics);
    }
}
