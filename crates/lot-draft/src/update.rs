//! 更新內容（送往後端的部分更新）

use lot_core::PlannedMonth;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 批次部分更新
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotUpdate {
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_month: Option<PlannedMonth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_code: Option<String>,
}

impl LotUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            planned_month: None,
            lot_code: None,
        }
    }

    pub fn with_planned_month(mut self, month: PlannedMonth) -> Self {
        self.planned_month = Some(month);
        self
    }

    pub fn with_lot_code(mut self, lot_code: impl Into<String>) -> Self {
        self.lot_code = Some(lot_code.into());
        self
    }

    /// 是否沒有任何欄位需要更新
    pub fn is_empty(&self) -> bool {
        self.planned_month.is_none() && self.lot_code.is_none()
    }
}

/// 將更新序列化為 JSON 陣列
pub fn to_json(updates: &[LotUpdate]) -> lot_core::Result<String> {
    Ok(serde_json::to_string(updates)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let id = Uuid::new_v4();
        let update = LotUpdate::new(id).with_lot_code("5075");

        let json: serde_json::Value = serde_json::from_str(&to_json(&[update]).unwrap()).unwrap();

        assert_eq!(json[0]["id"], id.to_string());
        assert_eq!(json[0]["lotCode"], "5075");
        assert!(json[0].get("plannedMonth").is_none());
    }

    #[test]
    fn test_is_empty() {
        let id = Uuid::new_v4();
        assert!(LotUpdate::new(id).is_empty());
        assert!(!LotUpdate::new(id).with_planned_month(PlannedMonth::May).is_empty());
    }
}
