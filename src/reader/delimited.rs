//! CSV/TSV読み込み

use attendance_common::{Cell, RawGrid};
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// ヘッダーなし・行ごとに列数が違ってもよい
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<Vec<Cell>>, csv::Error> {
    let content = std::fs::read_to_string(path)?;
    parse_rows(content.trim_start_matches(UTF8_BOM), delimiter)
}

pub fn read_grid(path: &Path, delimiter: u8) -> Result<RawGrid, csv::Error> {
    Ok(RawGrid::new(read_rows(path, delimiter)?))
}

fn parse_rows(content: &str, delimiter: u8) -> Result<Vec<Vec<Cell>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    Ok(rows)
}
