use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していないファイル形式です: {0}（xlsx/xls/xlsm/ods/csv/tsv）")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Core(#[from] attendance_common::Error),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("CSV読み込みエラー: {0}")]
    CsvRead(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
