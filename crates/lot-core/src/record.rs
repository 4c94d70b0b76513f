//! 批次記錄模型

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::PlannedMonth;

/// 批次狀態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    /// 已計劃
    #[default]
    Planned,
    /// 生產中
    InProduction,
    /// 品質審查
    QualityReview,
    /// 已放行
    Released,
    /// 已拒收
    Rejected,
    /// 暫停
    OnHold,
}

impl LotStatus {
    /// 解析狀態字串（不分大小寫，接受空白、連字號或底線分隔）
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "planned" => Some(LotStatus::Planned),
            "inproduction" => Some(LotStatus::InProduction),
            "qualityreview" => Some(LotStatus::QualityReview),
            "released" => Some(LotStatus::Released),
            "rejected" => Some(LotStatus::Rejected),
            "onhold" => Some(LotStatus::OnHold),
            _ => None,
        }
    }
}

/// 批次優先級
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl LotPriority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(LotPriority::Low),
            "normal" | "medium" => Some(LotPriority::Normal),
            "high" => Some(LotPriority::High),
            "urgent" | "critical" => Some(LotPriority::Urgent),
            _ => None,
        }
    }
}

/// 可排入日曆的項目
pub trait Schedulable {
    fn item_id(&self) -> Uuid;

    fn scheduled_start(&self) -> Option<NaiveDateTime>;

    fn scheduled_end(&self) -> Option<NaiveDateTime>;

    /// 生產站（週檢視的列鍵）
    fn station(&self) -> Option<&str>;
}

/// 批次記錄（由後端建立與維護）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotRecord {
    /// 批次ID（由後端指派）
    pub id: Uuid,

    /// 產品名稱
    pub product: String,

    /// 工廠
    pub plant: Option<String>,

    /// 製造區域
    pub manufacturing_area: Option<String>,

    /// 計劃月份
    pub planned_month: Option<PlannedMonth>,

    /// 批號
    pub lot_code: Option<String>,

    /// 排程開始
    pub scheduled_start: Option<NaiveDateTime>,

    /// 排程結束
    pub scheduled_end: Option<NaiveDateTime>,

    /// 有效期限
    pub expiry: Option<NaiveDate>,

    /// 生產站
    pub production_station: Option<String>,

    pub status: LotStatus,

    pub priority: LotPriority,

    /// 批量
    pub lot_size: Option<Decimal>,
}

impl LotRecord {
    /// 創建新的批次記錄
    pub fn new(product: String) -> Self {
        Self::with_id(Uuid::new_v4(), product)
    }

    /// 以既有ID創建（後端快照）
    pub fn with_id(id: Uuid, product: String) -> Self {
        Self {
            id,
            product,
            plant: None,
            manufacturing_area: None,
            planned_month: None,
            lot_code: None,
            scheduled_start: None,
            scheduled_end: None,
            expiry: None,
            production_station: None,
            status: LotStatus::default(),
            priority: LotPriority::default(),
            lot_size: None,
        }
    }

    /// 建構器模式：設置工廠
    pub fn with_plant(mut self, plant: impl Into<String>) -> Self {
        self.plant = Some(plant.into());
        self
    }

    /// 建構器模式：設置製造區域
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.manufacturing_area = Some(area.into());
        self
    }

    /// 建構器模式：設置計劃月份
    pub fn with_planned_month(mut self, month: PlannedMonth) -> Self {
        self.planned_month = Some(month);
        self
    }

    /// 建構器模式：設置批號
    pub fn with_lot_code(mut self, lot_code: impl Into<String>) -> Self {
        self.lot_code = Some(lot_code.into());
        self
    }

    /// 建構器模式：設置排程區間
    pub fn with_schedule(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.scheduled_start = Some(start);
        self.scheduled_end = Some(end);
        self
    }

    /// 建構器模式：設置有效期限
    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// 建構器模式：設置生產站
    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.production_station = Some(station.into());
        self
    }

    pub fn with_status(mut self, status: LotStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: LotPriority) -> Self {
        self.priority = priority;
        self
    }

    /// 建構器模式：設置批量
    pub fn with_lot_size(mut self, lot_size: Decimal) -> Self {
        self.lot_size = Some(lot_size);
        self
    }

    /// 是否已排程
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some()
    }

    /// 距離有效期限的天數（負值表示已過期）
    pub fn days_until_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiry.map(|expiry| (expiry - today).num_days())
    }
}

impl Schedulable for LotRecord {
    fn item_id(&self) -> Uuid {
        self.id
    }

    fn scheduled_start(&self) -> Option<NaiveDateTime> {
        self.scheduled_start
    }

    fn scheduled_end(&self) -> Option<NaiveDateTime> {
        self.scheduled_end
    }

    fn station(&self) -> Option<&str> {
        self.production_station.as_deref()
    }
}

/// 非批次的日曆事件（設備保養、稽核等）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub station: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: String, start: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            start,
            end: None,
            station: None,
        }
    }

    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }
}

impl Schedulable for CalendarEvent {
    fn item_id(&self) -> Uuid {
        self.id
    }

    fn scheduled_start(&self) -> Option<NaiveDateTime> {
        Some(self.start)
    }

    fn scheduled_end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_create_record() {
        let record = LotRecord::new("Paracetamol 500mg".to_string());

        assert_eq!(record.product, "Paracetamol 500mg");
        assert_eq!(record.status, LotStatus::Planned);
        assert_eq!(record.priority, LotPriority::Normal);
        assert!(!record.is_scheduled());
    }

    #[test]
    fn test_record_builder() {
        let record = LotRecord::new("Ibuprofen 400mg".to_string())
            .with_plant("PLANT-01")
            .with_area("Solids")
            .with_planned_month(PlannedMonth::May)
            .with_lot_code("5075")
            .with_schedule(at(2025, 5, 5, 8), at(2025, 5, 7, 17))
            .with_station("Granulation")
            .with_lot_size(Decimal::from(1200));

        assert_eq!(record.plant.as_deref(), Some("PLANT-01"));
        assert_eq!(record.planned_month, Some(PlannedMonth::May));
        assert_eq!(record.station(), Some("Granulation"));
        assert!(record.is_scheduled());
    }

    #[test]
    fn test_days_until_expiry() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let record = LotRecord::new("Amoxicillin".to_string())
            .with_expiry(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());

        assert_eq!(record.days_until_expiry(today), Some(60));
        assert_eq!(LotRecord::new("x".to_string()).days_until_expiry(today), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(LotStatus::parse("In Production"), Some(LotStatus::InProduction));
        assert_eq!(LotStatus::parse("quality_review"), Some(LotStatus::QualityReview));
        assert_eq!(LotStatus::parse("on-hold"), Some(LotStatus::OnHold));
        assert_eq!(LotStatus::parse("archived"), None);
        assert_eq!(LotPriority::parse("Critical"), Some(LotPriority::Urgent));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = LotRecord::new("x".to_string()).with_station("Coating");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["productionStation"], "Coating");
        assert_eq!(json["status"], "planned");
    }
}
