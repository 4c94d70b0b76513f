//! 後端快照轉換
//!
//! 後端以 JSON 陣列回傳批次記錄，日期欄位為字串。轉換時無法解析的欄位
//! 一律視為缺值並留下診斷，不會讓整份快照失敗。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagnostic::{Diagnosed, Diagnostic};
use crate::month::PlannedMonth;
use crate::record::{LotPriority, LotRecord, LotStatus};

/// 後端快照中的批次記錄（原始格式）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotRecord {
    pub id: Option<Uuid>,
    pub product: String,
    pub plant: Option<String>,
    pub manufacturing_area: Option<String>,
    pub planned_month: Option<String>,
    pub lot_code: Option<String>,
    pub scheduled_start: Option<String>,
    pub scheduled_end: Option<String>,
    pub expiry: Option<String>,
    pub production_station: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub lot_size: Option<Decimal>,
}

/// 解析 JSON 快照並轉換為批次記錄
pub fn parse_snapshot(json: &str) -> crate::Result<Diagnosed<Vec<LotRecord>>> {
    let raw: Vec<SnapshotRecord> = serde_json::from_str(json)?;
    Ok(normalize_snapshot(raw))
}

/// 轉換快照記錄
pub fn normalize_snapshot(raw: Vec<SnapshotRecord>) -> Diagnosed<Vec<LotRecord>> {
    let mut records = Vec::with_capacity(raw.len());
    let mut diagnostics = Vec::new();

    for item in raw {
        let (record, mut record_diagnostics) = normalize_record(item).into_parts();
        records.push(record);
        diagnostics.append(&mut record_diagnostics);
    }

    if !diagnostics.is_empty() {
        tracing::warn!(
            "快照轉換完成：{} 筆記錄，{} 則診斷",
            records.len(),
            diagnostics.len()
        );
    } else {
        tracing::debug!("快照轉換完成：{} 筆記錄", records.len());
    }

    Diagnosed::with_diagnostics(records, diagnostics)
}

/// 轉換單筆快照記錄
pub fn normalize_record(raw: SnapshotRecord) -> Diagnosed<LotRecord> {
    let mut diagnostics = Vec::new();

    let id = match raw.id {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            diagnostics.push(
                Diagnostic::warning(format!("記錄缺少ID，已指派暫時ID {}", id)).for_record(id),
            );
            id
        }
    };

    let mut record = LotRecord::with_id(id, raw.product);
    record.plant = non_empty(raw.plant);
    record.manufacturing_area = non_empty(raw.manufacturing_area);
    record.lot_code = non_empty(raw.lot_code);
    record.production_station = non_empty(raw.production_station);
    record.lot_size = raw.lot_size;

    if let Some(label) = non_empty(raw.planned_month) {
        record.planned_month = PlannedMonth::from_label(&label);
        if record.planned_month.is_none() {
            diagnostics.push(
                Diagnostic::warning(format!("無法辨識的計劃月份: {}", label)).for_record(id),
            );
        }
    }

    record.scheduled_start = timestamp_field(id, "scheduledStart", raw.scheduled_start, &mut diagnostics);
    record.scheduled_end = timestamp_field(id, "scheduledEnd", raw.scheduled_end, &mut diagnostics);

    if let Some(value) = non_empty(raw.expiry) {
        record.expiry = parse_date(&value);
        if record.expiry.is_none() {
            diagnostics.push(
                Diagnostic::warning(format!("無法解析的日期 expiry: {}", value)).for_record(id),
            );
        }
    }

    if let Some(value) = non_empty(raw.status) {
        match LotStatus::parse(&value) {
            Some(status) => record.status = status,
            None => diagnostics.push(
                Diagnostic::info(format!("無法辨識的狀態: {}，使用預設值", value)).for_record(id),
            ),
        }
    }

    if let Some(value) = non_empty(raw.priority) {
        match LotPriority::parse(&value) {
            Some(priority) => record.priority = priority,
            None => diagnostics.push(
                Diagnostic::info(format!("無法辨識的優先級: {}，使用預設值", value)).for_record(id),
            ),
        }
    }

    Diagnosed::with_diagnostics(record, diagnostics)
}

/// 解析時間戳記
///
/// 支援 RFC 3339、`YYYY-MM-DDTHH:MM[:SS]`、`YYYY-MM-DD HH:MM[:SS]` 與純日期（午夜）。
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// 解析日期（接受帶時間的字串，只取日期部分）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|dt| dt.date()))
}

fn timestamp_field(
    id: Uuid,
    field: &str,
    value: Option<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<NaiveDateTime> {
    let value = non_empty(value)?;
    let parsed = parse_timestamp(&value);
    if parsed.is_none() {
        diagnostics.push(
            Diagnostic::warning(format!("無法解析的日期 {}: {}", field, value)).for_record(id),
        );
    }
    parsed
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
