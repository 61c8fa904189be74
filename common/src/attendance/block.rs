//! 社員ブロックの検出
//!
//! 刷卡記錄のシートは15列ごとに社員ブロックが並ぶ。各ブロックの先頭12行
//! （ヘッダー領域）から「姓名」ラベルと報告年月を探す。

use crate::cell::RawGrid;
use crate::datetime::YearMonth;
use regex::Regex;

/// ブロック幅（列数）
pub const BLOCK_WIDTH: usize = 15;
/// ヘッダー領域の行数
pub const HEADER_ROWS: usize = 12;

const NAME_LABEL: &str = "姓名";

lazy_static::lazy_static! {
    static ref YEAR_MONTH_TOKEN_RE: Regex = Regex::new(r"(20\d{2})-(\d{2})").unwrap();
}

/// 検出された社員ブロック
#[derive(Debug, Clone, PartialEq)]
pub struct BlockAnchor {
    /// ブロック先頭の列
    pub base_col: usize,
    pub employee: String,
    /// ヘッダー領域に年月が見つからなければ `None`
    pub year_month: Option<YearMonth>,
}

/// グリッド全体から社員ブロックを列挙（名前のないブロックは除外）
pub fn locate_blocks(grid: &RawGrid) -> Vec<BlockAnchor> {
    (0..grid.width())
        .step_by(BLOCK_WIDTH)
        .filter_map(|base_col| locate_block(grid, base_col))
        .collect()
}

/// 1ブロック分のヘッダー領域を行優先・左から右に走査
///
/// 名前は「姓名」を含むセルの右隣。年月は最初に見つかったものを採用。
pub fn locate_block(grid: &RawGrid, base_col: usize) -> Option<BlockAnchor> {
    let mut employee: Option<String> = None;
    let mut year_month: Option<YearMonth> = None;

    for row in 0..HEADER_ROWS.min(grid.height()) {
        for offset in 0..BLOCK_WIDTH {
            let col = base_col + offset;
            let text = grid.cell(row, col).text();
            if text.is_empty() {
                continue;
            }

            if employee.is_none() && text.contains(NAME_LABEL) {
                employee = grid.cell(row, col + 1).non_empty_text();
            }

            if year_month.is_none() {
                year_month = find_year_month(&text);
            }
        }
    }

    employee.map(|employee| BlockAnchor {
        base_col,
        employee,
        year_month,
    })
}

/// `2026-02` 形式の年月トークンを探す
pub fn find_year_month(text: &str) -> Option<YearMonth> {
    YEAR_MONTH_TOKEN_RE.captures_iter(text).find_map(|caps| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        YearMonth::new(year, month).ok()
    })
}
