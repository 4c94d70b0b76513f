//! 流水號配置
//!
//! 以既有批號為基礎，在每個（月份代碼、年份末位數）範圍內單調遞增配發流水號，
//! 不受記錄清單順序影響。

use std::collections::HashMap;

use lot_core::{Diagnosed, Diagnostic, LotRecord, PlannedMonth};
use uuid::Uuid;

use crate::lot_code::{year_digit, LotCode, LotCodeGenerator};

/// 流水號登記表
#[derive(Debug, Clone, Default)]
pub struct CorrelativeRegistry {
    highest: HashMap<(char, u8), u32>,
}

impl CorrelativeRegistry {
    /// 創建空的登記表
    pub fn new() -> Self {
        Self::default()
    }

    /// 從快照中的既有批號建立登記表
    pub fn from_records(records: &[LotRecord]) -> Self {
        let mut registry = Self::new();
        let mut skipped = 0usize;

        for record in records {
            match record.lot_code.as_deref().map(LotCode::parse) {
                Some(Some(code)) => registry.observe(&code),
                Some(None) => skipped += 1,
                None => {}
            }
        }

        tracing::debug!(
            "流水號登記表建立完成：{} 個範圍，略過 {} 筆無法解析的批號",
            registry.highest.len(),
            skipped
        );

        registry
    }

    /// 登記已使用的批號
    pub fn observe(&mut self, code: &LotCode) {
        let highest = self.highest.entry(code.scope()).or_insert(0);
        *highest = (*highest).max(code.correlative);
    }

    /// 範圍內目前最大的流水號
    pub fn highest(&self, month: PlannedMonth, year: i32) -> u32 {
        self.highest
            .get(&(month.month_code(), year_digit(year)))
            .copied()
            .unwrap_or(0)
    }

    /// 下一個可用流水號（不配發）；範圍已用盡時為 `None`
    pub fn peek_next(&self, month: PlannedMonth, year: i32) -> Option<u32> {
        self.highest(month, year).checked_add(1)
    }

    /// 配發下一個批號
    ///
    /// 範圍已用盡時回傳該範圍最後一個批號並附上錯誤診斷，該批號與既有批號重複。
    pub fn next_code(&mut self, month: PlannedMonth, year: i32) -> Diagnosed<LotCode> {
        match self.peek_next(month, year) {
            Some(correlative) => {
                let result = LotCodeGenerator::generate_for_month(month, correlative, year);
                self.observe(&result.value);
                result
            }
            None => {
                let mut result = LotCodeGenerator::generate_for_month(month, u32::MAX, year);
                tracing::warn!("流水號已用盡: {} 月，年份末位 {}", month, year_digit(year));
                result.push(Diagnostic::error(format!(
                    "流水號已用盡，批號 {} 已存在",
                    result.value
                )));
                result
            }
        }
    }

    /// 檢查批號唯一性
    ///
    /// 同一批號出現在多筆記錄時，每筆重複的記錄各產生一則錯誤診斷。
    /// 無法解析的舊批號以去除空白後的字串比對。
    pub fn find_duplicates(records: &[LotRecord]) -> Vec<Diagnostic> {
        let mut owners: HashMap<String, Vec<Uuid>> = HashMap::new();
        for record in records {
            let Some(raw) = record.lot_code.as_deref() else {
                continue;
            };
            let key = match LotCode::parse(raw) {
                Some(code) => code.to_string(),
                None => raw.trim().to_string(),
            };
            if !key.is_empty() {
                owners.entry(key).or_default().push(record.id);
            }
        }

        let mut duplicates: Vec<(String, Vec<Uuid>)> = owners
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .collect();
        duplicates.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut diagnostics = Vec::new();
        for (code, ids) in duplicates {
            tracing::warn!("批號重複: {}，共 {} 筆記錄", code, ids.len());
            for id in ids {
                diagnostics.push(Diagnostic::error(format!("批號重複: {}", code)).for_record(id));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lot_core::Severity;

    fn record_with_code(code: &str) -> LotRecord {
        LotRecord::new("Metformin 850mg".to_string()).with_lot_code(code)
    }

    #[test]
    fn test_next_code_continues_after_highest() {
        let records = vec![
            record_with_code("5075"),
            record_with_code("5035"),
            record_with_code("5124"), // 不同年份
            record_with_code("garbage"),
        ];

        let mut registry = CorrelativeRegistry::from_records(&records);

        assert_eq!(registry.highest(PlannedMonth::May, 2025), 7);
        assert_eq!(registry.next_code(PlannedMonth::May, 2025).value.to_string(), "5085");
        assert_eq!(registry.next_code(PlannedMonth::May, 2025).value.to_string(), "5095");
        assert_eq!(registry.next_code(PlannedMonth::May, 2024).value.to_string(), "5134");
    }

    #[test]
    fn test_empty_scope_starts_at_one() {
        let mut registry = CorrelativeRegistry::new();
        assert_eq!(registry.peek_next(PlannedMonth::January, 2026), Some(1));
        assert_eq!(registry.next_code(PlannedMonth::January, 2026).value.to_string(), "A0016");
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![record_with_code("D0025"), record_with_code("D0105")];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();

        assert_eq!(
            CorrelativeRegistry::from_records(&forward).peek_next(PlannedMonth::October, 2025),
            CorrelativeRegistry::from_records(&backward).peek_next(PlannedMonth::October, 2025),
        );
    }

    #[test]
    fn test_find_duplicates() {
        let records = vec![
            record_with_code("5075"),
            record_with_code("5085"),
            record_with_code("5075"),
        ];

        let diagnostics = CorrelativeRegistry::find_duplicates(&records);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].record_id, Some(records[0].id));
        assert_eq!(diagnostics[1].record_id, Some(records[2].id));
        assert!(CorrelativeRegistry::find_duplicates(&records[..2]).is_empty());
    }

    #[test]
    fn test_find_duplicates_of_legacy_codes() {
        let records = vec![
            record_with_code("LEGACY-7"),
            record_with_code(" LEGACY-7 "),
            record_with_code("LEGACY-8"),
            record_with_code(""),
            record_with_code(""),
        ];

        let diagnostics = CorrelativeRegistry::find_duplicates(&records);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].record_id, Some(records[0].id));
        assert_eq!(diagnostics[1].record_id, Some(records[1].id));
        assert!(diagnostics[0].message.contains("LEGACY-7"));
    }

    #[test]
    fn test_exhausted_scope_reports_error() {
        let mut registry = CorrelativeRegistry::new();
        registry.observe(&LotCode::new('5', u32::MAX, 5));

        assert_eq!(registry.peek_next(PlannedMonth::May, 2025), None);

        let result = registry.next_code(PlannedMonth::May, 2025);
        assert_eq!(result.value.correlative, u32::MAX);
        assert!(result.has_severity(Severity::Error));
        assert_eq!(registry.highest(PlannedMonth::May, 2025), u32::MAX);
    }
}
