//! Excel/ODS読み込み（calamine）

use attendance_common::{Cell, RawGrid};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

const MINUTES_PER_DAY: f64 = 1440.0;

/// 全シートをグリッドとして読み込む
///
/// 範囲の開始位置に合わせて空セルを補い、列番号をシート上の絶対位置に揃える。
pub fn read_sheets(path: &Path) -> Result<Vec<(String, RawGrid)>, calamine::Error> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        sheets.push((name, RawGrid::new(absolute_rows(&range))));
    }

    Ok(sheets)
}

/// 先頭シートの行（範囲の開始位置は補正しない）
pub fn read_first_sheet_rows(path: &Path) -> Result<Vec<Vec<Cell>>, calamine::Error> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(name) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook.worksheet_range(&name)?;
    Ok(range.rows().map(|row| row.iter().map(convert_cell).collect()).collect())
}

fn absolute_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // 時刻のみのセル（1日未満）は HH:MM の文字列として扱う
        Data::DateTime(dt) if (0.0..1.0).contains(&dt.as_f64()) => Cell::Text(clock_of_day(dt.as_f64())),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Text(dt.to_string()),
        },
        Data::DateTimeIso(s) => chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(Cell::DateTime)
            .unwrap_or_else(|_| Cell::from(s.as_str())),
        Data::DurationIso(s) => Cell::from(s.as_str()),
    }
}

/// 1日に対する割合を `HH:MM` に（浮動小数の誤差で1分ずれないよう分単位で丸める）
fn clock_of_day(fraction: f64) -> String {
    let minutes = (fraction * MINUTES_PER_DAY).round() as u32 % 1440;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
