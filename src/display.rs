//! 端末への表形式表示

use attendance_common::{Diagnostic, EmployeeSummary, SummaryTable};

/// 表示幅（全角は2）
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

/// 1表を文字列に整形
pub fn render_table(table: &SummaryTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.display()).collect())
        .collect();

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| display_width(c))
                .chain(std::iter::once(display_width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| pad(v, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("■ {}\n", table.name));
    out.push_str(&line(table.headers.clone()));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.push('\n');
    if cells.is_empty() {
        out.push_str("(なし)\n");
    }
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub fn print_summary(summary: &EmployeeSummary) {
    println!("👤 {} ({})\n", summary.employee, summary.monthly.month);
    for table in summary.tables() {
        println!("{}", render_table(&table));
    }
}

/// 診断の件数（詳細表示時は全件）
pub fn print_diagnostics(diagnostics: &[Diagnostic], detailed: bool) {
    if diagnostics.is_empty() {
        return;
    }
    println!("⚠ {}行をスキップ/補正しました", diagnostics.len());
    if detailed {
        for diagnostic in diagnostics {
            println!("  {}", diagnostic);
        }
    } else {
        println!("  （--diagnostics で詳細を表示）");
    }
}
