use crate::error::{AttendanceError, Result};
use attendance_common::{RuleSet, YearMonth};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// 遅刻・加班・請假の判定基準
    pub rules: RuleSet,
    /// 出力先ディレクトリ（未指定時はカレント）
    pub output_dir: Option<PathBuf>,
    /// 年月の見つからないブロックに使う報告月
    pub reporting_month: Option<YearMonth>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AttendanceError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("attendance-summary").join("config.json"))
    }

    pub fn set_reporting_month(&mut self, month: &str) -> Result<()> {
        let month: YearMonth = month.parse()?;
        self.reporting_month = Some(month);
        self.save()
    }

    /// 判定基準・報告月を初期値に戻す
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::default();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.rules, RuleSet::default());
        assert!(config.reporting_month.is_none());
    }

    #[test]
    fn test_reporting_month_round_trip() {
        let config: Config = serde_json::from_str(r#"{"reporting_month":"2026-02"}"#).unwrap();
        assert_eq!(config.reporting_month, Some(YearMonth::new(2026, 2).unwrap()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"2026-02\""));
    }
}
