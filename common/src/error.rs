//! エラー型定義
//!
//! 構造的な失敗（必須列の欠落・読めないソース・年月不明）のみをエラーとする。
//! 行単位の異常は `diagnostics` に記録され、ここには来ない。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Please go back and check the file '{source_name}', missing columns: {}", .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("'{source_name}' could not be read as a table: {detail}")]
    UnreadableSource { source_name: String, detail: String },

    #[error("'{source_name}' does not contain valid employee sheets matching the pattern (e.g., '1,2,3')")]
    NoEmployeeSheets { source_name: String },

    #[error("No year-month found for employee '{employee}' (sheet '{sheet}', column {column}); pass an explicit reporting month")]
    MissingYearMonth {
        employee: String,
        sheet: String,
        column: usize,
    },

    #[error("Invalid reporting month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("No data has been ingested yet")]
    NotIngested,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
