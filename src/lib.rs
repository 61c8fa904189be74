//! Attendance Summary CLI
//!
//! ファイル読み込み・出力・対話選択。解析と集計は `attendance_common` が担う。

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod reader;
pub mod selector;
