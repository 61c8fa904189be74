//! 異常考勤統計表の解析
//!
//! エクスポートによってはタイトル行が先頭に入り、本来のヘッダーが
//! 2〜5行目にずれている。その場合はヘッダー行を探して昇格させる。

use crate::cell::{cell_at, Cell, Table};
use crate::datetime::cell_date;
use crate::diagnostics::{Diagnostic, Parsed, SkipReason, SourceKind};
use crate::error::{Error, Result};
use crate::types::AbnormalEntry;

pub const NAME_COLUMN: &str = "姓名";
pub const DATE_COLUMN: &str = "日期";
pub const LATE_MINUTES_COLUMN: &str = "遲到時間（分鐘）";
pub const REQUIRED_COLUMNS: [&str; 3] = [NAME_COLUMN, DATE_COLUMN, LATE_MINUTES_COLUMN];

const LATE_MINUTES_KEYWORD: &str = "遲到時間";
const ABSENCE_MARKER: &str = "曠工";
/// ヘッダー候補として調べる先頭行数
const HEADER_SCAN_ROWS: usize = 5;

/// ヘッダーを復元
///
/// 列名に「遲到時間」がなければ先頭5行から「遲到時間」と「姓名」を両方含む
/// 最初の行をヘッダーにする。列名の改行は常に除去する（何度呼んでも同じ結果）。
pub fn recover_header(mut table: Table) -> Table {
    if !contains_keyword(table.columns(), LATE_MINUTES_KEYWORD) {
        let header_row = table
            .rows()
            .iter()
            .take(HEADER_SCAN_ROWS)
            .position(|row| {
                let texts: Vec<String> = row.iter().map(Cell::text).collect();
                contains_keyword(&texts, LATE_MINUTES_KEYWORD) && contains_keyword(&texts, NAME_COLUMN)
            });
        if let Some(index) = header_row {
            tracing::debug!(index, "promoting displaced header row");
            table.promote_row(index);
        }
    }

    table.map_columns(|c| c.replace(['\n', '\r'], ""));
    table
}

fn contains_keyword(values: &[String], keyword: &str) -> bool {
    values.iter().any(|v| v.contains(keyword))
}

/// 必須列の検証
pub fn validate_columns(table: &Table) -> Result<()> {
    let missing = table.missing_columns(&REQUIRED_COLUMNS);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingColumns {
            source_name: SourceKind::AbnormalStats.display_name().to_string(),
            columns: missing,
        })
    }
}

/// ヘッダー復元・検証・行抽出
pub fn parse_abnormal_stats(table: Table) -> Result<Parsed<AbnormalEntry>> {
    let table = recover_header(table);
    validate_columns(&table)?;

    // 検証済みなので位置は必ず存在する
    let position = |name: &str| table.column_index(name).unwrap_or(usize::MAX);
    let name_idx = position(NAME_COLUMN);
    let date_idx = position(DATE_COLUMN);
    let late_idx = position(LATE_MINUTES_COLUMN);

    let mut parsed = Parsed::default();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let Some(employee) = cell_at(row, name_idx).non_empty_text() else {
            parsed.note(Diagnostic::dropped(SourceKind::AbnormalStats, row_idx, SkipReason::MissingEmployee));
            continue;
        };
        let Some(date) = cell_date(cell_at(row, date_idx)) else {
            parsed.note(Diagnostic::dropped(SourceKind::AbnormalStats, row_idx, SkipReason::MissingDate));
            continue;
        };

        let late_minutes = match late_minutes(cell_at(row, late_idx)) {
            Ok(minutes) => minutes,
            Err(raw) => {
                parsed.note(Diagnostic::zeroed(
                    SourceKind::AbnormalStats,
                    row_idx,
                    SkipReason::NonNumericLateValue(raw),
                ));
                0.0
            }
        };

        parsed.push(AbnormalEntry {
            employee,
            date,
            late_minutes,
        });
    }

    Ok(parsed)
}

/// 空欄・「曠工」は0、その他の非数値は `Err(元の値)`
fn late_minutes(cell: &Cell) -> std::result::Result<f64, String> {
    if cell.is_empty() || cell.text() == ABSENCE_MARKER {
        return Ok(0.0);
    }
    match cell.as_number() {
        Some(n) if n.is_finite() => Ok(n.max(0.0)),
        _ => Err(cell.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    fn displaced_table() -> Table {
        Table::from_rows(vec![
            row(&["異常考勤統計表", "", "", ""]),
            row(&["部門：診所", "", "", ""]),
            row(&["工號", "姓名", "日期", "遲到時間\n（分鐘）"]),
            row(&["001", "A", "2026-02-06 00:00:00", "5"]),
            row(&["001", "A", "2026/2/7", "曠工"]),
            row(&["002", "B", "2026-02-06", "abc"]),
            row(&["", "", "", ""]),
        ])
    }

    #[test]
    fn test_promotes_displaced_header() {
        let table = recover_header(displaced_table());
        assert_eq!(
            table.columns(),
            &["工號", "姓名", "日期", "遲到時間（分鐘）"].map(String::from)
        );
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_recovery_is_idempotent() {
        let once = recover_header(displaced_table());
        let twice = recover_header(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_header_already_valid_only_strips_newlines() {
        let table = Table::from_rows(vec![
            row(&["姓名", "日期", "遲到時間\n（分鐘）"]),
            row(&["A", "2026-02-06", "3"]),
        ]);
        let recovered = recover_header(table);
        assert_eq!(recovered.columns()[2], "遲到時間（分鐘）");
        assert_eq!(recovered.len(), 1);
    }

    #[test]
    fn test_header_beyond_scan_window_is_not_promoted() {
        let mut rows = vec![row(&["title", ""])];
        for _ in 0..5 {
            rows.push(row(&["", ""]));
        }
        rows.push(row(&["姓名", "遲到時間（分鐘）"]));
        let table = recover_header(Table::from_rows(rows));
        assert_eq!(table.columns()[0], "title");
    }

    #[test]
    fn test_parse_rows() {
        let parsed = parse_abnormal_stats(displaced_table()).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.records[0].date, "2026-02-06");
        assert_eq!(parsed.records[0].late_minutes, 5.0);
        assert_eq!(parsed.records[1].date, "2026-02-07");
        assert_eq!(parsed.records[1].late_minutes, 0.0);
        assert_eq!(parsed.records[2].late_minutes, 0.0);
        // 非数値の0化と空行の破棄
        assert_eq!(parsed.diagnostics.len(), 2);
    }

    #[test]
    fn test_missing_columns_error() {
        let table = Table::from_rows(vec![row(&["姓名", "日期"]), row(&["A", "2026-02-06"])]);
        let err = parse_abnormal_stats(table).unwrap_err();
        match err {
            Error::MissingColumns { source_name, columns } => {
                assert_eq!(source_name, "Abnormal Stats");
                assert_eq!(columns, vec!["遲到時間（分鐘）".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
