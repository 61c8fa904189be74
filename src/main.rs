use attendance_summary::{cli, config, display, error, export, pipeline, selector};
use attendance_common::{DateScope, SummaryOptions, YearMonth};
use clap::Parser;
use cli::{Cli, Commands, EmployeeSelection, InputFiles};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// コマンドライン指定 → 設定ファイルの順で報告月を決める
fn resolve_month(inputs: &InputFiles, config: &Config) -> Result<Option<YearMonth>> {
    match &inputs.month {
        Some(month) => Ok(Some(month.parse()?)),
        None => Ok(config.reporting_month),
    }
}

fn ingest(inputs: &InputFiles, config: &Config) -> Result<attendance_common::Session> {
    let month = resolve_month(inputs, config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("ファイルを読み込み中...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let session = pipeline::ingest_files(
        &inputs.attendance,
        &inputs.abnormal,
        &inputs.report,
        month,
        config.rules.clone(),
    );
    spinner.finish_and_clear();
    session
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { inputs, employee, format, output, all_leave, diagnostics } => {
            println!("📋 attendance-summary - 月次集計\n");

            // 1. 取り込み
            println!("[1/3] ファイルを取り込み中...");
            let session = ingest(&inputs, &config)?;
            let dataset = session.dataset().ok_or(attendance_common::Error::NotIngested)?;
            println!(
                "✔ 出退勤 {}件 / 異常 {}件 / 回報 {}件\n",
                dataset.attendance.len(),
                dataset.abnormal.len(),
                dataset.report.len()
            );
            for warning in &dataset.warnings {
                println!("⚠ {}", warning);
            }
            display::print_diagnostics(&dataset.diagnostics, diagnostics || cli.verbose);

            // 2. 社員の選択・集計
            println!("[2/3] 集計中...");
            let selection = match employee {
                Some(name) => EmployeeSelection::parse(&name),
                None => match selector::select_employee_interactive(&session.employees()?)? {
                    Some(name) => EmployeeSelection::One(name),
                    None => EmployeeSelection::All,
                },
            };
            let options = SummaryOptions {
                leave_scope: if all_leave { DateScope::All } else { DateScope::AttendanceDays },
            };
            let summaries = pipeline::summaries(&session, &selection, &options)?;
            println!("✔ {}名分を集計\n", summaries.len());

            // 3. 出力
            println!("[3/3] 出力中...");
            if format.includes_table() {
                for summary in &summaries {
                    display::print_summary(summary);
                }
            }
            if format.includes_json() || format.includes_excel() {
                let output_dir = output
                    .or_else(|| config.output_dir.clone())
                    .unwrap_or_else(|| std::path::PathBuf::from("."));
                export::export_summaries(&summaries, &format, &output_dir)?;
            }

            println!("\n✅ 完了");
        }

        Commands::Employees { inputs } => {
            let session = ingest(&inputs, &config)?;
            for name in session.employees()? {
                println!("{}", name);
            }
        }

        Commands::Config { show, set_month, reset } => {
            let mut config = config;
            let show = show || (!reset && set_month.is_none());

            if reset {
                config.reset()?;
                println!("✔ 設定を初期化しました");
            }

            if let Some(month) = set_month {
                config.set_reporting_month(&month)?;
                println!("✔ 報告月を設定しました: {}", month);
            }

            if show {
                let rules = &config.rules;
                println!("設定: {}", Config::config_path()?.display());
                println!(
                    "  報告月: {}",
                    config.reporting_month.map(|m| m.to_string()).unwrap_or_else(|| "未設定".into())
                );
                println!(
                    "  出力先: {}",
                    config.output_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| ".".into())
                );
                println!(
                    "  遅刻基準: 早診 {} / 晚診 {}",
                    rules.morning_late_after.format("%H:%M"),
                    rules.evening_late_after.format("%H:%M")
                );
                println!(
                    "  加班基準: 早診 {} / 晚診 {}",
                    rules.morning_overtime_after.format("%H:%M"),
                    rules.evening_overtime_after.format("%H:%M")
                );
                println!(
                    "  請假時数: 全天 {}h / 1診 {}h / その他 {}h",
                    rules.full_day_leave_hours, rules.shift_leave_hours, rules.default_leave_hours
                );
            }
        }
    }

    Ok(())
}
