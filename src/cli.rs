use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(about = "考勤報表・異常考勤統計表・加班報表から社員別の月次集計を作成", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 3ファイルの指定（analyze / employees 共通）
#[derive(clap::Args, Debug, Clone)]
pub struct InputFiles {
    /// 考勤報表（刷卡記錄）
    #[arg(required = true)]
    pub attendance: PathBuf,

    /// 異常考勤統計表
    #[arg(required = true)]
    pub abnormal: PathBuf,

    /// 加班報表（員工回報表）
    #[arg(required = true)]
    pub report: PathBuf,

    /// 年月の見つからないブロックに使う報告月 (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 3ファイルを取り込み、社員別の集計を出力
    Analyze {
        #[command(flatten)]
        inputs: InputFiles,

        /// 対象社員（all で全員。省略時は一覧から選択）
        #[arg(short, long)]
        employee: Option<String>,

        /// 出力形式 (table/json/excel/all)
        #[arg(short, long, default_value = "table")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 請假明細を出勤日に限定しない（合計は常に出勤日のみ）
        #[arg(long)]
        all_leave: bool,

        /// 行単位の診断をすべて表示
        #[arg(long)]
        diagnostics: bool,
    },

    /// 取り込んだ社員名の一覧
    Employees {
        #[command(flatten)]
        inputs: InputFiles,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の報告月を設定 (YYYY-MM)
        #[arg(long)]
        set_month: Option<String>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// 端末に表示
    #[default]
    Table,
    Json,
    Excel,
    All,
}

impl ExportFormat {
    pub fn includes_table(&self) -> bool {
        matches!(self, ExportFormat::Table | ExportFormat::All)
    }

    pub fn includes_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::All)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::All)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(ExportFormat::Table),
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use table, json, excel, or all", s)),
        }
    }
}

/// 対象社員の指定
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmployeeSelection {
    All,
    One(String),
}

impl EmployeeSelection {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            EmployeeSelection::All
        } else {
            EmployeeSelection::One(value.trim().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert!(ExportFormat::All.includes_json());
        assert!(!ExportFormat::Table.includes_excel());
    }

    #[test]
    fn test_employee_selection() {
        assert_eq!(EmployeeSelection::parse("ALL"), EmployeeSelection::All);
        assert_eq!(EmployeeSelection::parse(" 王小明 "), EmployeeSelection::One("王小明".into()));
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "attendance", "analyze", "a.xlsx", "b.xlsx", "c.csv", "-e", "all", "-f", "json", "--month", "2026-02",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { inputs, employee, format, .. } => {
                assert_eq!(inputs.month.as_deref(), Some("2026-02"));
                assert_eq!(employee.as_deref(), Some("all"));
                assert_eq!(format, ExportFormat::Json);
            }
            _ => panic!("expected analyze"),
        }
    }
}
