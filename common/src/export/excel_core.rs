//! Excel生成（共通ライブラリ）
//!
//! 集計表1つにつき1シート。シート名はExcelの上限31文字で切り詰める。

use crate::error::Result;
use crate::summary::{SummaryTable, TableValue};
use rust_xlsxwriter::*;

/// Excelのシート名上限
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// シート名を31文字に切り詰め
pub fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_CHARS).collect()
}

/// 表をExcelバッファに生成
pub fn generate_excel_buffer(tables: &[SummaryTable]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let number_format = Format::new().set_num_format("0.00");

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(table.name))?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
            worksheet.set_column_width(col as u16, column_width(table, col))?;
        }

        for (idx, row) in table.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                let col = col as u16;
                match value {
                    TableValue::Text(s) => worksheet.write_string(row_num, col, s)?,
                    TableValue::Integer(n) => worksheet.write_number(row_num, col, *n as f64)?,
                    TableValue::Number(n) => {
                        worksheet.write_number_with_format(row_num, col, *n, &number_format)?
                    }
                };
            }
        }

        // 先頭行を固定
        worksheet.set_freeze_panes(1, 0)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// ヘッダーと値の最大文字数から列幅を決める（全角は2文字分）
fn column_width(table: &SummaryTable, col: usize) -> f64 {
    let width_of = |s: &str| -> usize { s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum() };

    let longest = table
        .rows
        .iter()
        .filter_map(|row| row.get(col))
        .map(|v| width_of(&v.display()))
        .chain(table.headers.get(col).map(|h| width_of(h)))
        .max()
        .unwrap_or(8);

    (longest.clamp(8, 40) + 2) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_truncated() {
        let long = "Visit Weekly Summary For The Whole Month";
        assert_eq!(sheet_name(long).chars().count(), 31);
        assert_eq!(sheet_name("Monthly Report"), "Monthly Report");
    }

    #[test]
    fn test_generates_buffer() {
        let tables = vec![SummaryTable {
            name: "Monthly Report",
            headers: vec!["Month", "Total Late Mins"],
            rows: vec![vec![TableValue::from("2026-02"), TableValue::Integer(5)]],
        }];
        let buffer = generate_excel_buffer(&tables).unwrap();
        // xlsx は zip
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_column_width_bounds() {
        let table = SummaryTable {
            name: "t",
            headers: vec!["A"],
            rows: vec![vec![TableValue::from("x".repeat(100))]],
        };
        assert_eq!(column_width(&table, 0), 42.0);
    }
}
