//! 考勤報表（刷卡記錄）の解析
//!
//! ## 処理フロー
//! 1. 社員シートの選択（シート名が `12,47` のような数字リストのもの）
//! 2. 15列ごとの社員ブロック検出（名前・報告年月）
//! 3. 日別・時段別の出退勤抽出

pub mod block;
pub mod window;

pub use block::{locate_block, locate_blocks, BlockAnchor, BLOCK_WIDTH};
pub use window::extract_entries;

use crate::cell::RawGrid;
use crate::datetime::YearMonth;
use crate::diagnostics::{Parsed, SourceKind};
use crate::error::{Error, Result};
use crate::types::AttendanceEntry;
use regex::Regex;

lazy_static::lazy_static! {
    static ref EMPLOYEE_SHEET_RE: Regex = Regex::new(r"^\d+(,\d+)*$").unwrap();
}

/// 考勤報表の入力
#[derive(Debug, Clone)]
pub enum AttendanceSource {
    /// 単一グリッド（CSV/TSV など）
    Grid(RawGrid),
    /// シート名 → グリッド（ブック）
    Sheets(Vec<(String, RawGrid)>),
}

/// シート名が社員IDリスト形式か
pub fn is_employee_sheet(name: &str) -> bool {
    EMPLOYEE_SHEET_RE.is_match(name.trim())
}

/// 対象シートを選択
///
/// ブックの場合は社員シートのみ。1枚もなければ構造エラー。
pub fn select_employee_sheets(source: &AttendanceSource) -> Result<Vec<(&str, &RawGrid)>> {
    match source {
        AttendanceSource::Grid(grid) => Ok(vec![("", grid)]),
        AttendanceSource::Sheets(sheets) => {
            let selected: Vec<(&str, &RawGrid)> = sheets
                .iter()
                .filter(|(name, _)| is_employee_sheet(name))
                .map(|(name, grid)| (name.as_str(), grid))
                .collect();
            if selected.is_empty() {
                return Err(Error::NoEmployeeSheets {
                    source_name: SourceKind::Attendance.display_name().to_string(),
                });
            }
            Ok(selected)
        }
    }
}

/// 考勤報表全体を解析
///
/// 年月の見つからないブロックは `month_override` があればそれを使い、
/// なければ `MissingYearMonth` で失敗する。
pub fn parse_attendance(
    source: &AttendanceSource,
    month_override: Option<YearMonth>,
) -> Result<Parsed<AttendanceEntry>> {
    let mut parsed = Parsed::default();

    for (sheet, grid) in select_employee_sheets(source)? {
        let blocks = locate_blocks(grid);
        tracing::debug!(sheet, blocks = blocks.len(), "located employee blocks");

        for anchor in blocks {
            let year_month = match anchor.year_month.or(month_override) {
                Some(ym) => ym,
                None => {
                    return Err(Error::MissingYearMonth {
                        employee: anchor.employee.clone(),
                        sheet: sheet.to_string(),
                        column: anchor.base_col,
                    })
                }
            };
            parsed.extend(extract_entries(grid, &anchor, year_month));
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn employee_grid(name: &str, month: Option<&str>) -> RawGrid {
        let mut rows = vec![vec![Cell::Empty; 15]; 14];
        if let Some(m) = month {
            rows[2][0] = Cell::from(m);
        }
        rows[3][0] = Cell::from("姓名");
        rows[3][1] = Cell::from(name);
        rows[12][0] = Cell::from("06 五");
        rows[12][1] = Cell::from("08:10");
        rows[12][2] = Cell::from("12:20");
        RawGrid::new(rows)
    }

    #[test]
    fn test_is_employee_sheet() {
        assert!(is_employee_sheet("12,47"));
        assert!(is_employee_sheet("3"));
        assert!(!is_employee_sheet("排班"));
        assert!(!is_employee_sheet("12,"));
    }

    #[test]
    fn test_only_employee_sheets_are_parsed() {
        let source = AttendanceSource::Sheets(vec![
            ("Summary".into(), employee_grid("X", Some("2026-02"))),
            ("1,2".into(), employee_grid("A", Some("2026-02"))),
        ]);
        let parsed = parse_attendance(&source, None).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].employee, "A");
        assert_eq!(parsed.records[0].date, "2026-02-06");
    }

    #[test]
    fn test_no_employee_sheets_is_structural_error() {
        let source = AttendanceSource::Sheets(vec![("Sheet1".into(), RawGrid::default())]);
        let err = parse_attendance(&source, None).unwrap_err();
        assert!(matches!(err, Error::NoEmployeeSheets { .. }));
    }

    #[test]
    fn test_missing_year_month_fails_without_override() {
        let source = AttendanceSource::Grid(employee_grid("A", None));
        let err = parse_attendance(&source, None).unwrap_err();
        assert!(matches!(err, Error::MissingYearMonth { ref employee, .. } if employee == "A"));
    }

    #[test]
    fn test_missing_year_month_uses_override() {
        let source = AttendanceSource::Grid(employee_grid("A", None));
        let ym = YearMonth::new(2026, 3).unwrap();
        let parsed = parse_attendance(&source, Some(ym)).unwrap();
        assert_eq!(parsed.records[0].date, "2026-03-06");
    }

    #[test]
    fn test_block_month_takes_precedence_over_override() {
        let source = AttendanceSource::Grid(employee_grid("A", Some("2026-02")));
        let ym = YearMonth::new(2026, 3).unwrap();
        let parsed = parse_attendance(&source, Some(ym)).unwrap();
        assert_eq!(parsed.records[0].date, "2026-02-06");
    }
}
