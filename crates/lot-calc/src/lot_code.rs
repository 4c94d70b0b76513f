//! 批號產生
//!
//! 批號格式：月份代碼 + 補零流水號 + 年份末位數。
//! 月份代碼 A/D/E 使用三位流水號，其餘月份使用兩位。

use lot_core::month::{correlative_width_for_code, FALLBACK_MONTH_CODE};
use lot_core::{Diagnosed, Diagnostic, LotRecord, PlannedMonth};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 批號
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LotCode {
    /// 月份代碼
    pub month_code: char,
    /// 流水號（從 1 開始）
    pub correlative: u32,
    /// 年份末位數
    pub year_digit: u8,
}

impl LotCode {
    pub fn new(month_code: char, correlative: u32, year_digit: u8) -> Self {
        Self {
            month_code,
            correlative,
            year_digit: year_digit % 10,
        }
    }

    /// 流水號位數
    pub fn width(&self) -> usize {
        correlative_width_for_code(self.month_code)
    }

    /// 解析批號字串
    ///
    /// 流水號段至少需達月份代碼要求的位數；超過位數時不可有前導零。
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let mut chars = value.chars();

        let month_code = chars.next()?;
        if !is_month_code(month_code) {
            return None;
        }

        let year_digit = chars.next_back()?.to_digit(10)? as u8;
        let digits = chars.as_str();
        let width = correlative_width_for_code(month_code);

        if digits.len() < width || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if digits.len() > width && digits.starts_with('0') {
            return None;
        }

        let correlative: u32 = digits.parse().ok()?;
        if correlative == 0 {
            return None;
        }

        Some(Self::new(month_code, correlative, year_digit))
    }

    /// 分組鍵（月份代碼、年份末位數），流水號在此範圍內必須唯一
    pub fn scope(&self) -> (char, u8) {
        (self.month_code, self.year_digit)
    }
}

impl std::fmt::Display for LotCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{:0width$}{}",
            self.month_code,
            self.correlative,
            self.year_digit,
            width = self.width()
        )
    }
}

fn is_month_code(code: char) -> bool {
    code == FALLBACK_MONTH_CODE || PlannedMonth::ALL.iter().any(|m| m.month_code() == code)
}

/// 年份末位數
pub fn year_digit(year: i32) -> u8 {
    year.rem_euclid(10) as u8
}

/// 批號產生器
pub struct LotCodeGenerator;

impl LotCodeGenerator {
    /// 由月份標籤產生批號
    ///
    /// 無法辨識的月份標籤使用預設月份代碼 `1`，並附上警告。
    pub fn generate(month_label: &str, correlative: u32, year: i32) -> Diagnosed<LotCode> {
        match PlannedMonth::from_label(month_label) {
            Some(month) => Self::generate_for_month(month, correlative, year),
            None => {
                tracing::warn!("無法辨識的月份標籤: {:?}，使用預設代碼", month_label);
                let mut result = Self::build(FALLBACK_MONTH_CODE, correlative, year);
                result.push(Diagnostic::warning(format!(
                    "無法辨識的月份標籤 {:?}，使用預設月份代碼 {}",
                    month_label, FALLBACK_MONTH_CODE
                )));
                result
            }
        }
    }

    /// 由計劃月份產生批號
    pub fn generate_for_month(month: PlannedMonth, correlative: u32, year: i32) -> Diagnosed<LotCode> {
        Self::build(month.month_code(), correlative, year)
    }

    /// 依清單位置產生批號（流水號 = 位置 + 1）
    ///
    /// 清單順序改變時流水號也會改變，持久化的批號應改用
    /// [`crate::correlative::CorrelativeRegistry`]。
    pub fn generate_batch(
        month: PlannedMonth,
        records: &[LotRecord],
        year: i32,
    ) -> Vec<(Uuid, Diagnosed<LotCode>)> {
        tracing::debug!(
            "依位置產生批號：{} 月，{} 筆記錄（流水號隨清單順序變動）",
            month,
            records.len()
        );

        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let correlative = u32::try_from(index + 1).unwrap_or(u32::MAX);
                let result = Self::generate_for_month(month, correlative, year);
                let diagnostics = result
                    .diagnostics
                    .iter()
                    .cloned()
                    .map(|d| d.for_record(record.id))
                    .collect();
                (record.id, Diagnosed::with_diagnostics(result.value, diagnostics))
            })
            .collect()
    }

    fn build(month_code: char, correlative: u32, year: i32) -> Diagnosed<LotCode> {
        let mut diagnostics = Vec::new();

        let correlative = if correlative == 0 {
            diagnostics.push(Diagnostic::warning("流水號必須為正整數，已調整為 1"));
            1
        } else {
            correlative
        };

        let code = LotCode::new(month_code, correlative, year_digit(year));
        let max = 10u32.pow(code.width() as u32) - 1;
        if correlative > max {
            diagnostics.push(Diagnostic::warning(format!(
                "流水號 {} 超過 {} 位數上限 {}，批號長度不固定",
                correlative,
                code.width(),
                max
            )));
        }

        Diagnosed::with_diagnostics(code, diagnostics)
    }
}
