//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::Result;
use attendance_common::export::excel_core::generate_excel_buffer;
use attendance_common::EmployeeSummary;
use std::path::Path;

/// 社員1人分の6表を1ブックに出力
pub fn write_summary_workbook(summary: &EmployeeSummary, output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(&summary.tables())?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;

    tracing::info!(path = %output_path.display(), employee = %summary.employee, "workbook written");
    Ok(())
}
