//! Attendance Summary Common Library
//!
//! 考勤報表・異常考勤統計表・加班報表の解析と社員別集計

pub mod abnormal;
pub mod attendance;
pub mod cell;
pub mod datetime;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod report;
pub mod rules;
pub mod session;
pub mod summary;
pub mod types;

pub use attendance::{parse_attendance, AttendanceSource};
pub use cell::{Cell, RawGrid, Table};
pub use datetime::YearMonth;
pub use diagnostics::{Diagnostic, Parsed, SourceKind};
pub use error::{Error, Result};
pub use rules::RuleSet;
pub use session::{build_dataset, Dataset, IngestOptions, Session, Sources, Warning};
pub use summary::{summarize, DateScope, EmployeeSummary, SummaryOptions, SummaryTable, TableValue};
pub use types::{AbnormalEntry, AttendanceEntry, Period, ReportEntry};
