pub mod excel;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use attendance_common::EmployeeSummary;
use std::path::{Path, PathBuf};

/// ファイル名に使えない文字を置換
fn file_stem_for(summary: &EmployeeSummary) -> String {
    let name: String = summary
        .employee
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    format!("{}_{}", name, summary.monthly.month)
}

/// 出力先の決定
///
/// 1人分で拡張子付きのパスが指定されていればその名前を使い、
/// それ以外はディレクトリとみなして `社員名_年月.拡張子` を作る。
pub fn output_path_for(output: &Path, summary: &EmployeeSummary, single: bool, extension: &str) -> PathBuf {
    if single && !output.is_dir() && output.extension().is_some() {
        output.with_extension(extension)
    } else {
        output.join(format!("{}.{}", file_stem_for(summary), extension))
    }
}

/// ファイル出力（JSON / Excel）。書き出したパスを返す
pub fn export_summaries(
    summaries: &[EmployeeSummary],
    format: &ExportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let single = summaries.len() == 1;
    if !single || output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let mut written = Vec::new();
    for summary in summaries {
        if format.includes_excel() {
            let path = output_path_for(output, summary, single, "xlsx");
            println!("- Excelを生成中... ({})", summary.employee);
            excel::write_summary_workbook(summary, &path)?;
            println!("✔ Excel出力: {}", path.display());
            written.push(path);
        }
        if format.includes_json() {
            let path = output_path_for(output, summary, single, "json");
            json::write_summary_json(summary, &path)?;
            println!("✔ JSON出力: {}", path.display());
            written.push(path);
        }
    }

    Ok(written)
}
