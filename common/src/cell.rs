//! セル・グリッド・テーブルのモデル
//!
//! 読み込み側（calamine / csv）から渡される未型付けの値を保持する。
//! ヒューリスティックはすべて `Cell::text()` の表示形を対象に判定する。

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 未型付けセル値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn empty() -> &'static Cell {
        &EMPTY
    }

    /// 空白のみのテキストも空とみなす
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 表示形（前後の空白を除去）
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 空でなければ表示形を返す
    pub fn non_empty_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.text())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// ヘッダーなしの矩形グリッド（刷卡記錄の1シート分）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// 範囲外は `Cell::Empty`
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// 列名付きテーブル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// 先頭行をヘッダーとして扱う
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows.remove(0);
        let columns = header.iter().map(Cell::text).collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名の完全一致で位置を返す
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 必須列のうち存在しないものを列挙
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// `index` 行目をヘッダーに昇格し、それ以前の行とその行を削除
    pub(crate) fn promote_row(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        let header = self.rows[index].iter().map(Cell::text).collect();
        self.rows.drain(..=index);
        self.columns = header;
    }

    pub(crate) fn map_columns(&mut self, f: impl Fn(&str) -> String) {
        self.columns = self.columns.iter().map(|c| f(c)).collect();
    }
}

/// 行内の位置参照（範囲外は `Cell::Empty`）
pub fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_text_integral_number() {
        assert_eq!(Cell::Number(5.0).text(), "5");
        assert_eq!(Cell::Number(2.5).text(), "2.5");
    }

    #[test]
    fn test_text_datetime() {
        let dt = NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(dt).text(), "2026-02-01 00:00:00");
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert!(Cell::Text("   ".into()).is_empty());
        assert_eq!(Cell::from(""), Cell::Empty);
    }

    #[test]
    fn test_grid_out_of_range() {
        let grid = RawGrid::new(vec![vec![Cell::from("a")]]);
        assert_eq!(grid.cell(0, 0).text(), "a");
        assert!(grid.cell(3, 9).is_empty());
        assert_eq!(grid.width(), 1);
    }

    #[test]
    fn test_promote_row() {
        let mut table = Table::from_rows(vec![
            vec![Cell::from("title"), Cell::Empty],
            vec![Cell::from("x"), Cell::from("y")],
            vec![Cell::from("姓名"), Cell::from("日期")],
            vec![Cell::from("A"), Cell::from("2026-02-01")],
        ]);
        table.promote_row(1);
        assert_eq!(table.columns(), &["姓名".to_string(), "日期".to_string()]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_columns() {
        let table = Table::new(vec!["姓名".into()], vec![]);
        assert_eq!(table.missing_columns(&["姓名", "日期"]), vec!["日期".to_string()]);
    }
}
