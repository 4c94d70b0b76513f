//! 計劃參數配置

use serde::{Deserialize, Serialize};

/// 看板與日曆參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 即將到期的天數窗口（含上限）
    pub near_expiry_days: i64,

    /// 月檢視每格最多顯示筆數，其餘收合為「+N more」
    pub month_cell_limit: usize,

    /// 週檢視的生產站列（依顯示順序）
    pub stations: Vec<String>,
}

impl PlanningConfig {
    /// 創建新的配置
    pub fn new() -> Self {
        Self {
            near_expiry_days: 90,
            month_cell_limit: 3,
            stations: Vec::new(),
        }
    }

    /// 建構器模式：設置即將到期天數
    pub fn with_near_expiry_days(mut self, days: i64) -> Self {
        self.near_expiry_days = days;
        self
    }

    /// 建構器模式：設置月檢視每格上限
    pub fn with_month_cell_limit(mut self, limit: usize) -> Self {
        self.month_cell_limit = limit;
        self
    }

    /// 建構器模式：設置生產站列
    pub fn with_stations<S: Into<String>>(mut self, stations: impl IntoIterator<Item = S>) -> Self {
        self.stations = stations.into_iter().map(Into::into).collect();
        self
    }

    /// 從 JSON 載入（缺少的欄位使用預設值）
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlanningConfig::default();
        assert_eq!(config.near_expiry_days, 90);
        assert_eq!(config.month_cell_limit, 3);
        assert!(config.stations.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = PlanningConfig::new()
            .with_near_expiry_days(30)
            .with_month_cell_limit(5)
            .with_stations(["Granulation", "Compression"]);

        assert_eq!(config.near_expiry_days, 30);
        assert_eq!(config.month_cell_limit, 5);
        assert_eq!(config.stations, vec!["Granulation", "Compression"]);
    }

    #[test]
    fn test_from_json_partial() {
        let config = PlanningConfig::from_json(r#"{ "stations": ["Coating"] }"#).unwrap();
        assert_eq!(config.near_expiry_days, 90);
        assert_eq!(config.stations, vec!["Coating"]);
    }
}
