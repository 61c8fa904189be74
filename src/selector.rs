//! 社員の対話式選択

use crate::error::{AttendanceError, Result};
use dialoguer::Select;

/// 一覧から社員を選ぶ（先頭は「全員」）
pub fn select_employee_interactive(employees: &[String]) -> Result<Option<String>> {
    let mut items = vec!["(全員)".to_string()];
    items.extend(employees.iter().cloned());

    let index = Select::new()
        .with_prompt("社員を選択してください")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| AttendanceError::Prompt(e.to_string()))?;

    Ok(selection_at(employees, index))
}

/// 0 は全員、それ以外は社員
fn selection_at(employees: &[String], index: usize) -> Option<String> {
    index.checked_sub(1).and_then(|i| employees.get(i).cloned())
}
