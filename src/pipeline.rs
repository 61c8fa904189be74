//! 取り込みから集計までの処理

use crate::cli::EmployeeSelection;
use crate::error::Result;
use crate::reader;
use attendance_common::{
    EmployeeSummary, IngestOptions, RuleSet, Session, SummaryOptions, YearMonth,
};
use std::path::Path;

/// 3ファイルを読み込んでセッションに取り込む
pub fn ingest_files(
    attendance: &Path,
    abnormal: &Path,
    report: &Path,
    month_override: Option<YearMonth>,
    rules: RuleSet,
) -> Result<Session> {
    let sources = reader::read_sources(attendance, abnormal, report)?;
    let mut session = Session::new(rules);
    session.ingest(sources, &IngestOptions { month_override })?;
    Ok(session)
}

/// 選択に応じた社員の集計
pub fn summaries(
    session: &Session,
    selection: &EmployeeSelection,
    options: &SummaryOptions,
) -> Result<Vec<EmployeeSummary>> {
    let employees = match selection {
        EmployeeSelection::All => session.employees()?,
        EmployeeSelection::One(name) => vec![name.clone()],
    };

    employees
        .iter()
        .map(|name| Ok(session.summary(name, options)?))
        .collect()
}
