//! 加班報表（加班・請假・家訪）の解析
//!
//! フォーム回答をそのまま出力した表で、行によっては「回報屬性」以降の値が
//! 1列右にずれている（余計な値が1つ挿入されている）。
//!
//! ## 処理フロー
//! 1. 列名 → 位置の対応表（`ReportSchema`）を一度だけ解決・検証
//! 2. 行ごとに社員名を決定（名前欄 → 時間戳記欄の順、時刻らしい値は除外）
//! 3. 回報屬性のキーワード判定。該当しなければ次のセルを判定し、
//!    該当すればこの行だけ全フィールドを+1列ずらして読む
//! 4. キーワードで分岐して `ReportEntry` を生成

use crate::cell::{cell_at, Cell, Table};
use crate::datetime::{
    cell_clock, cell_date, clock_display, hours_between_unwrapped, is_time_like, minutes_between,
};
use crate::diagnostics::{Diagnostic, Parsed, SkipReason, SourceKind};
use crate::error::{Error, Result};
use crate::types::{LeaveReport, OvertimeReport, Period, ReportEntry, VisitReport};

/// 加班報表の列名
pub mod columns {
    pub const TIMESTAMP: &str = "時間戳記";
    pub const NAME: &str = "姓名";
    pub const CATEGORY: &str = "回報屬性";
    pub const WORK_DATE: &str = "上班日期";
    pub const CLOCK_IN: &str = "上班時間（打卡時間）";
    pub const CLOCK_OUT: &str = "下班時間（打卡時間）";
    pub const OT_ATTRIBUTE: &str = "加班屬性";
    pub const PERIOD: &str = "時段";
    pub const LEAVE_DATE: &str = "請假日期";
    pub const LEAVE_PERIOD: &str = "請假時段";
    pub const LEAVE_TYPE: &str = "請假屬性";
    pub const LEAVE_REASON: &str = "請假事由";
    pub const VISIT_DATE: &str = "家訪日期";
    pub const VISIT_START: &str = "家訪開始時間（離開診所的時間）";
    pub const VISIT_END: &str = "家訪結束時間（回到診所的時間）";
    pub const PATIENT_NAME: &str = "病人姓名";

    /// 加班時の病人欄は列名が長く揺れるため部分一致で探す
    pub const OT_PATIENT_MARKERS: [&str; 2] = ["加班時", "病人"];
}

pub const REQUIRED_COLUMNS: [&str; 2] = [columns::NAME, columns::CATEGORY];

/// 回報屬性の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Overtime,
    Leave,
    Visit,
}

impl Category {
    /// 「加班」「門診上班」→ 加班、「請假」→ 請假、「家訪」→ 家訪
    pub fn classify(text: &str) -> Option<Self> {
        if text.contains("加班") || text.contains("門診上班") {
            Some(Category::Overtime)
        } else if text.contains("請假") {
            Some(Category::Leave)
        } else if text.contains("家訪") {
            Some(Category::Visit)
        } else {
            None
        }
    }
}

/// 列名 → 位置の対応表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSchema {
    pub version: u32,
    name: usize,
    category: usize,
    timestamp: Option<usize>,
    work_date: Option<usize>,
    clock_in: Option<usize>,
    clock_out: Option<usize>,
    ot_attribute: Option<usize>,
    ot_patient: Option<usize>,
    period: Option<usize>,
    leave_date: Option<usize>,
    leave_period: Option<usize>,
    leave_type: Option<usize>,
    leave_reason: Option<usize>,
    visit_date: Option<usize>,
    visit_start: Option<usize>,
    visit_end: Option<usize>,
    patient_name: Option<usize>,
}

impl ReportSchema {
    pub const VERSION: u32 = 1;

    /// 必須列（姓名・回報屬性）を検証し、その他の列位置を解決
    pub fn resolve(table: &Table) -> Result<Self> {
        let missing = table.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                source_name: SourceKind::Report.display_name().to_string(),
                columns: missing,
            });
        }

        let find = |name: &str| table.column_index(name);
        let [ot_context, patient] = columns::OT_PATIENT_MARKERS;
        let ot_patient = table
            .columns()
            .iter()
            .position(|c| c.contains(ot_context) && c.contains(patient));

        Ok(Self {
            version: Self::VERSION,
            name: find(columns::NAME).unwrap_or_default(),
            category: find(columns::CATEGORY).unwrap_or_default(),
            timestamp: find(columns::TIMESTAMP),
            work_date: find(columns::WORK_DATE),
            clock_in: find(columns::CLOCK_IN),
            clock_out: find(columns::CLOCK_OUT),
            ot_attribute: find(columns::OT_ATTRIBUTE),
            ot_patient,
            period: find(columns::PERIOD),
            leave_date: find(columns::LEAVE_DATE),
            leave_period: find(columns::LEAVE_PERIOD),
            leave_type: find(columns::LEAVE_TYPE),
            leave_reason: find(columns::LEAVE_REASON),
            visit_date: find(columns::VISIT_DATE),
            visit_start: find(columns::VISIT_START),
            visit_end: find(columns::VISIT_END),
            patient_name: find(columns::PATIENT_NAME),
        })
    }
}

/// 1行分のずれを考慮したセル参照
struct ShiftedRow<'a> {
    cells: &'a [Cell],
    offset: usize,
}

impl ShiftedRow<'_> {
    fn get(&self, index: Option<usize>) -> &Cell {
        match index {
            Some(i) => cell_at(self.cells, i + self.offset),
            None => Cell::empty(),
        }
    }

    fn text(&self, index: Option<usize>) -> String {
        self.get(index).text()
    }
}

/// 加班報表を解析
pub fn parse_report(table: &Table) -> Result<Parsed<ReportEntry>> {
    let schema = ReportSchema::resolve(table)?;
    let mut parsed = Parsed::default();

    for (row_idx, row) in table.rows().iter().enumerate() {
        parse_row(&schema, row_idx, row, &mut parsed);
    }

    tracing::debug!(
        records = parsed.records.len(),
        skipped = parsed.diagnostics.len(),
        "parsed report table"
    );
    Ok(parsed)
}

fn parse_row(schema: &ReportSchema, row_idx: usize, row: &[Cell], parsed: &mut Parsed<ReportEntry>) {
    let note = |reason| Diagnostic::dropped(SourceKind::Report, row_idx, reason);

    let Some(employee) = resolve_employee(cell_at(row, schema.name), schema.timestamp.map(|i| cell_at(row, i)))
    else {
        parsed.note(note(SkipReason::MissingEmployee));
        return;
    };

    let primary = cell_at(row, schema.category).text();
    let (category, offset) = match Category::classify(&primary) {
        Some(category) => (category, 0),
        None => match Category::classify(&cell_at(row, schema.category + 1).text()) {
            Some(category) => {
                tracing::debug!(row = row_idx, "column shift detected");
                (category, 1)
            }
            None => {
                parsed.note(note(SkipReason::UnrecognizedCategory(primary)));
                return;
            }
        },
    };
    let shifted = ShiftedRow { cells: row, offset };

    let entry = match category {
        Category::Overtime => overtime_entry(schema, &shifted, employee, row_idx, parsed),
        Category::Leave => leave_entry(schema, &shifted, employee),
        Category::Visit => visit_entry(schema, &shifted, employee, row_idx, parsed),
    };

    match entry {
        Some(entry) => parsed.push(entry),
        None => parsed.note(note(SkipReason::MissingDate)),
    }
}

/// 名前欄 → 時間戳記欄の順に、時刻らしくない値を採用
///
/// どちらも時刻らしい場合は名前欄の値をそのまま使う。
fn resolve_employee(name: &Cell, timestamp: Option<&Cell>) -> Option<String> {
    let candidates = [Some(name), timestamp];
    candidates
        .iter()
        .flatten()
        .filter_map(|cell| cell.non_empty_text())
        .find(|text| !is_time_like(text))
        .or_else(|| name.non_empty_text())
}

fn overtime_entry(
    schema: &ReportSchema,
    row: &ShiftedRow<'_>,
    employee: String,
    row_idx: usize,
    parsed: &mut Parsed<ReportEntry>,
) -> Option<ReportEntry> {
    let date = cell_date(row.get(schema.work_date))?;
    let clock_in = row.get(schema.clock_in);
    let clock_out = row.get(schema.clock_out);

    let elapsed_minutes = match (cell_clock(clock_in), cell_clock(clock_out)) {
        (Some(start), Some(end)) => minutes_between(start, end),
        (start, end) => {
            // 空でない解析不能セルのうち最初のもの
            let bad = [(clock_in, start.is_none()), (clock_out, end.is_none())]
                .into_iter()
                .find(|(cell, failed)| *failed && !cell.is_empty());
            if let Some((cell, _)) = bad {
                parsed.note(Diagnostic::zeroed(
                    SourceKind::Report,
                    row_idx,
                    SkipReason::UnparsableTime(cell.text()),
                ));
            }
            0
        }
    };

    Some(ReportEntry::Overtime(OvertimeReport {
        employee,
        date,
        period: Period::from_keyword(&row.text(schema.period)),
        start_time: clock_display(clock_in),
        end_time: clock_display(clock_out),
        elapsed_minutes,
        ot_attribute: row.text(schema.ot_attribute),
        note: row.text(schema.ot_patient),
    }))
}

fn leave_entry(schema: &ReportSchema, row: &ShiftedRow<'_>, employee: String) -> Option<ReportEntry> {
    let date = cell_date(row.get(schema.leave_date))?;
    Some(ReportEntry::Leave(LeaveReport {
        employee,
        date,
        period: row.get(schema.leave_period).non_empty_text(),
        leave_type: row.text(schema.leave_type),
        reason: row.text(schema.leave_reason),
    }))
}

fn visit_entry(
    schema: &ReportSchema,
    row: &ShiftedRow<'_>,
    employee: String,
    row_idx: usize,
    parsed: &mut Parsed<ReportEntry>,
) -> Option<ReportEntry> {
    let date = cell_date(row.get(schema.visit_date))?;
    let departure = row.get(schema.visit_start);
    let arrival = row.get(schema.visit_end);

    let duration_hr = match (cell_clock(departure), cell_clock(arrival)) {
        (Some(start), Some(end)) => hours_between_unwrapped(start, end),
        _ => {
            if !departure.is_empty() || !arrival.is_empty() {
                parsed.note(Diagnostic::zeroed(
                    SourceKind::Report,
                    row_idx,
                    SkipReason::UnparsableTime(format!("{} / {}", departure.text(), arrival.text())),
                ));
            }
            0.0
        }
    };

    Some(ReportEntry::Visit(VisitReport {
        employee,
        date,
        start_time: clock_display(departure),
        end_time: clock_display(arrival),
        patient_name: row.text(schema.patient_name),
        duration_hr,
    }))
}
