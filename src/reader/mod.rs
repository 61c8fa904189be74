//! 入力ファイルの読み込み
//!
//! 拡張子でブック（calamine）と区切りテキスト（csv）を振り分け、
//! 共通ライブラリの `Cell` / `RawGrid` / `Table` に変換する。

mod delimited;
mod workbook;

use crate::error::{AttendanceError, Result};
use attendance_common::{AttendanceSource, Error, SourceKind, Sources, Table};
use std::path::Path;

/// ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
    Tsv,
}

impl InputFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Csv),
            "tsv" | "txt" => Ok(InputFormat::Tsv),
            _ => Err(AttendanceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(AttendanceError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 読み込み失敗を「表として読めない」構造エラーに変換
fn unreadable(kind: SourceKind, detail: impl std::fmt::Display) -> AttendanceError {
    AttendanceError::Core(Error::UnreadableSource {
        source_name: kind.display_name().to_string(),
        detail: detail.to_string(),
    })
}

/// 考勤報表（ブックなら全シート、CSV/TSVなら単一グリッド）
pub fn read_attendance(path: &Path) -> Result<AttendanceSource> {
    ensure_exists(path)?;
    let kind = SourceKind::Attendance;

    let source = match InputFormat::detect(path)? {
        InputFormat::Workbook => {
            AttendanceSource::Sheets(workbook::read_sheets(path).map_err(|e| unreadable(kind, e))?)
        }
        format => AttendanceSource::Grid(
            delimited::read_grid(path, delimiter(format)).map_err(|e| unreadable(kind, e))?,
        ),
    };
    Ok(source)
}

/// 表形式のソース（ブックなら先頭シート、先頭行がヘッダー）
pub fn read_table(path: &Path, kind: SourceKind) -> Result<Table> {
    ensure_exists(path)?;

    let rows = match InputFormat::detect(path)? {
        InputFormat::Workbook => workbook::read_first_sheet_rows(path).map_err(|e| unreadable(kind, e))?,
        format => delimited::read_rows(path, delimiter(format)).map_err(|e| unreadable(kind, e))?,
    };
    tracing::debug!(source = kind.display_name(), rows = rows.len(), "read table");
    Ok(Table::from_rows(rows))
}

/// 3ファイルをまとめて読み込む
pub fn read_sources(attendance: &Path, abnormal: &Path, report: &Path) -> Result<Sources> {
    Ok(Sources {
        attendance: read_attendance(attendance)?,
        abnormal: read_table(abnormal, SourceKind::AbnormalStats)?,
        report: read_table(report, SourceKind::Report)?,
    })
}

fn delimiter(format: InputFormat) -> u8 {
    match format {
        InputFormat::Tsv => b'\t',
        _ => b',',
    }
}
