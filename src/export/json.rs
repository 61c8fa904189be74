use crate::error::Result;
use attendance_common::{EmployeeSummary, SummaryTable};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SummaryDocument<'a> {
    #[serde(flatten)]
    summary: &'a EmployeeSummary,
    tables: Vec<SummaryTable>,
}

/// 集計値と6表をまとめたJSON
pub fn summary_json(summary: &EmployeeSummary) -> Result<String> {
    let document = SummaryDocument {
        summary,
        tables: summary.tables(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn write_summary_json(summary: &EmployeeSummary, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, summary_json(summary)?)?;
    Ok(())
}
